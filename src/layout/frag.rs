//! Tile-space iteration cores shared by the matrix-layout generators.
//!
//! Coordinates here are (dim, k) pairs inside a `BD x BK` tile, before any
//! row/column orientation is applied. The per-lane transaction count comes
//! from [`IoShape`], whose wavefront and distribution assertions therefore
//! fire for every instantiation; the cores add their own divisibility
//! checks and verify that their structural iteration nesting produces
//! exactly that count. An incompatible instantiation fails to compile as
//! soon as a load or store loop refers to `IO_COUNT`.

use crate::io_traits::IoShape;

/// Vector runs along the K axis ("orthogonal" to the block dimension).
///
/// `MAX_VW` sets the per-lane K granularity of the register mapping; each
/// `MAX_VW`-element run is performed as `MAX_VW / VW` memory transactions.
/// Keeping the register mapping keyed to `MAX_VW` makes it identical for
/// every legal `VW`, which is what lets the NT layouts serve both data
/// layouts with one in-register format.
pub(crate) struct OrthoVw<
    const BD: usize,
    const BK: usize,
    const VW: usize,
    const MAX_VW: usize,
    const WAVE: usize,
>;

impl<const BD: usize, const BK: usize, const VW: usize, const MAX_VW: usize, const WAVE: usize>
    OrthoVw<BD, BK, VW, MAX_VW, WAVE>
{
    const LARGE: bool = BD > WAVE;

    /// Transactions per `MAX_VW` register run.
    pub(crate) const SUB: usize = {
        assert!(VW > 0, "vector width must be positive");
        assert!(
            MAX_VW % VW == 0,
            "vector width must divide the layout's max vector width"
        );
        MAX_VW / VW
    };

    /// Passes over the block dimension needed when it exceeds one wavefront.
    pub(crate) const DIM_ITERS: usize = if BD > WAVE {
        assert!(
            BD % WAVE == 0,
            "block dimension must be a multiple of the wavefront size"
        );
        BD / WAVE
    } else {
        assert!(
            WAVE % BD == 0,
            "wavefront size must be a multiple of the block dimension"
        );
        1
    };

    /// K elements covered wave-wide per macro iteration.
    const K_MACRO: usize = if BD > WAVE {
        MAX_VW
    } else {
        (WAVE / BD) * MAX_VW
    };

    pub(crate) const MACRO_ITERS: usize = {
        assert!(
            BK % Self::K_MACRO == 0,
            "tile K extent must be a multiple of the wave-wide K coverage"
        );
        BK / Self::K_MACRO
    };

    pub(crate) const IO_COUNT: usize = {
        let n = IoShape::<BD, BK, VW, WAVE>::IO_COUNT;
        assert!(
            n == Self::MACRO_ITERS * Self::DIM_ITERS * Self::SUB,
            "iteration nesting must produce the per-lane transaction count"
        );
        n
    };

    fn lane_base(lane: usize) -> (usize, usize) {
        if Self::LARGE {
            (lane, 0)
        } else {
            (lane % BD, (lane / BD) * MAX_VW)
        }
    }

    /// Lane-independent part of the coordinate at `iteration`, slot 0.
    fn rel(iteration: usize) -> (usize, usize) {
        let sub = iteration % Self::SUB;
        let rest = iteration / Self::SUB;
        let dim_iter = rest % Self::DIM_ITERS;
        let macro_iter = rest / Self::DIM_ITERS;
        (dim_iter * WAVE, macro_iter * Self::K_MACRO + sub * VW)
    }

    pub(crate) fn base(lane: u32) -> (usize, usize) {
        Self::lane_base(lane as usize % WAVE)
    }

    pub(crate) fn increment(iteration: usize) -> (isize, isize) {
        let (d0, k0) = Self::rel(iteration);
        let (d1, k1) = Self::rel(iteration + 1);
        (d1 as isize - d0 as isize, k1 as isize - k0 as isize)
    }

    pub(crate) fn coord(lane: u32, iteration: usize, slot: usize) -> (usize, usize) {
        let (dim_base, k_base) = Self::base(lane);
        let (dim_rel, k_rel) = Self::rel(iteration);
        (dim_base + dim_rel, k_base + k_rel + slot)
    }
}

/// Vector runs along the block dimension ("inline" with it).
pub(crate) struct InlineVw<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize>;

impl<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize>
    InlineVw<BD, BK, VW, WAVE>
{
    /// Lanes needed to cover the block dimension once.
    const DIM_LANES: usize = {
        assert!(VW > 0, "vector width must be positive");
        assert!(
            BD % VW == 0,
            "vector width must divide the block dimension"
        );
        BD / VW
    };

    const LARGE: bool = Self::DIM_LANES > WAVE;

    pub(crate) const DIM_ITERS: usize = if BD / VW > WAVE {
        assert!(
            (BD / VW) % WAVE == 0,
            "block dimension span must be a multiple of the wavefront size"
        );
        BD / VW / WAVE
    } else {
        assert!(
            WAVE % (BD / VW) == 0,
            "wavefront size must be a multiple of the block dimension span"
        );
        1
    };

    /// K columns covered wave-wide per iteration group.
    const K_STEP: usize = if BD / VW > WAVE {
        1
    } else {
        WAVE / (BD / VW)
    };

    const K_ITERS: usize = {
        assert!(
            BK % Self::K_STEP == 0,
            "tile K extent must be a multiple of the wave-wide K coverage"
        );
        BK / Self::K_STEP
    };

    pub(crate) const IO_COUNT: usize = {
        // Pull in DIM_LANES so its divisibility check fires even on paths
        // that never compute a lane base.
        let _ = Self::DIM_LANES;
        let n = IoShape::<BD, BK, VW, WAVE>::IO_COUNT;
        assert!(
            n == Self::DIM_ITERS * Self::K_ITERS,
            "iteration nesting must produce the per-lane transaction count"
        );
        n
    };

    fn lane_base(lane: usize) -> (usize, usize) {
        if Self::LARGE {
            (lane * VW, 0)
        } else {
            ((lane % Self::DIM_LANES) * VW, lane / Self::DIM_LANES)
        }
    }

    fn rel(iteration: usize) -> (usize, usize) {
        let dim_iter = iteration % Self::DIM_ITERS;
        let k_iter = iteration / Self::DIM_ITERS;
        (dim_iter * WAVE * VW, k_iter * Self::K_STEP)
    }

    pub(crate) fn base(lane: u32) -> (usize, usize) {
        Self::lane_base(lane as usize % WAVE)
    }

    pub(crate) fn increment(iteration: usize) -> (isize, isize) {
        let (d0, k0) = Self::rel(iteration);
        let (d1, k1) = Self::rel(iteration + 1);
        (d1 as isize - d0 as isize, k1 as isize - k0 as isize)
    }

    pub(crate) fn coord(lane: u32, iteration: usize, slot: usize) -> (usize, usize) {
        let (dim_base, k_base) = Self::base(lane);
        let (dim_rel, k_rel) = Self::rel(iteration);
        (dim_base + dim_rel + slot, k_base + k_rel)
    }
}
