//! Cross-lane data movement: permute, blend, and DPP-style operations.
//!
//! Every operation is a (driver, reference-model) pair. The driver
//! (`exec`) redistributes a whole wavefront register file by structural
//! data movement, the way the hardware instruction would. The reference
//! model (`expect` / `expect_src`) computes, for one calling lane, which
//! source lane's value must appear there, from lane-index bit arithmetic
//! alone. The two are derived independently and the test suite checks them
//! against each other for every lane; that redundancy is the guard against
//! transcription errors in either formulation.
//!
//! None of these operations touch memory; they only rearrange values that
//! lanes already hold.

pub mod blend;
pub mod dpp;
pub mod permute;

pub use blend::{PermByte, Zip};
pub use dpp::{
    Bcast, Dpp, DppOp, Reverse, RotateL, RotateR, ShiftL, ShiftR, Shuffle2, Shuffle4, Swap,
    WFallBcast,
};
pub use permute::{BlockBcast, Gather, RotateWaveL, RotateWaveR, Scatter};

/// Lanes per DPP row.
pub const ROW_SIZE: usize = 16;
/// Lanes per DPP bank (four banks per row).
pub const BANK_SIZE: usize = 4;

pub(crate) const fn check_group(group: usize, wave: usize) {
    assert!(
        group.is_power_of_two() && group <= wave,
        "cross-lane group size must be a power of two no larger than the wavefront"
    );
}
