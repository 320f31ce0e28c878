//! Per-tile I/O arithmetic: how many transactions one lane performs and
//! how many registers it ends up holding.
//!
//! [`IoShape`] is the element-independent core: the layout generators take
//! their per-lane transaction count from it and the fragment API sizes its
//! register file against it, so its compatibility assertions gate every
//! real load/store instantiation. [`IoTraits`] layers the element type on
//! top for packed register accounting.

use crate::element::Element;
use std::marker::PhantomData;

/// Distribution of a `BLOCK_DIM x BLOCK_K` tile over one `WAVE`-lane
/// wavefront at vector width `VW`.
///
/// Every quantity is a pure function of the const parameters; instantiating
/// an incompatible combination fails the build while evaluating
/// [`Self::IO_COUNT`]. The covering invariant
/// `IO_COUNT * VW * WAVE == ELEMENT_COUNT` holds by construction.
pub struct IoShape<
    const BLOCK_DIM: usize,
    const BLOCK_K: usize,
    const VW: usize,
    const WAVE: usize = 64,
>;

impl<const BLOCK_DIM: usize, const BLOCK_K: usize, const VW: usize, const WAVE: usize>
    IoShape<BLOCK_DIM, BLOCK_K, VW, WAVE>
{
    /// Elements in the whole tile.
    pub const ELEMENT_COUNT: usize = BLOCK_DIM * BLOCK_K;

    /// Elements moved wave-wide by one vectorized transaction.
    pub const ELEMENTS_PER_IO: usize = WAVE * VW;

    /// Vectorized transactions one lane performs to cover its share.
    pub const IO_COUNT: usize = {
        assert!(WAVE == 32 || WAVE == 64, "wavefront size must be 32 or 64");
        assert!(VW > 0, "vector width must be positive");
        assert!(
            (BLOCK_DIM * BLOCK_K) % (WAVE * VW) == 0,
            "tile does not distribute evenly across the wavefront at this vector width"
        );
        Self::ELEMENT_COUNT / Self::ELEMENTS_PER_IO
    };

    /// Per-lane element count with any packing undone.
    pub const UNPACKED_SIZE: usize = Self::IO_COUNT * VW;
}

/// Compile-time I/O attributes of a `BLOCK_DIM x BLOCK_K` tile of `T`
/// elements: the [`IoShape`] quantities plus packed register accounting.
pub struct IoTraits<
    const BLOCK_DIM: usize,
    const BLOCK_K: usize,
    T,
    const VW: usize,
    const WAVE: usize = 64,
>(PhantomData<T>);

impl<const BLOCK_DIM: usize, const BLOCK_K: usize, T: Element, const VW: usize, const WAVE: usize>
    IoTraits<BLOCK_DIM, BLOCK_K, T, VW, WAVE>
{
    pub const ELEMENT_COUNT: usize = IoShape::<BLOCK_DIM, BLOCK_K, VW, WAVE>::ELEMENT_COUNT;
    pub const ELEMENTS_PER_IO: usize = IoShape::<BLOCK_DIM, BLOCK_K, VW, WAVE>::ELEMENTS_PER_IO;
    pub const IO_COUNT: usize = IoShape::<BLOCK_DIM, BLOCK_K, VW, WAVE>::IO_COUNT;
    pub const UNPACKED_SIZE: usize = IoShape::<BLOCK_DIM, BLOCK_K, VW, WAVE>::UNPACKED_SIZE;

    /// Per-lane 32-bit register slots once elements are packed.
    pub const PACKED_SIZE: usize = Self::UNPACKED_SIZE.div_ceil(T::PACK_RATIO);
}
