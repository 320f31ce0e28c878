//! Matrix-layout generators: the (orientation x vector-direction) family.
//!
//! `Col*` generators treat the block dimension as matrix rows, `Row*`
//! generators as matrix columns. `*InlineVw` runs the vector along the
//! block dimension, `*OrthoVw` along K. The NT variants serve tiles whose
//! in-register format must not depend on the data layout (accumulators):
//! they iterate with the ortho pattern at `MAX_VW` register granularity and
//! force scalar transactions when the data layout leaves the vector axis
//! non-contiguous, so an uncoalesced gather can never become a default
//! path.

use super::frag::{InlineVw, OrthoVw};
use super::{Axis, CoordDelta, DataLayout, MatrixCoord, MatrixLayout};
use std::marker::PhantomData;

fn col_coord((dim, k): (usize, usize)) -> MatrixCoord {
    MatrixCoord { row: dim, col: k }
}

fn row_coord((dim, k): (usize, usize)) -> MatrixCoord {
    MatrixCoord { row: k, col: dim }
}

fn col_delta((dim, k): (isize, isize)) -> CoordDelta {
    CoordDelta { row: dim, col: k }
}

fn row_delta((dim, k): (isize, isize)) -> CoordDelta {
    CoordDelta { row: k, col: dim }
}

/// Block dimension along rows, vector along rows. Pairs with [`super::ColMajor`].
pub struct ColInlineVw<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize = 64>;

impl<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> MatrixLayout
    for ColInlineVw<BD, BK, VW, WAVE>
{
    const IO_COUNT: usize = InlineVw::<BD, BK, VW, WAVE>::IO_COUNT;
    const VW: usize = VW;
    const VECTOR_AXIS: Axis = Axis::Row;

    fn base_coord(lane: u32) -> MatrixCoord {
        col_coord(InlineVw::<BD, BK, VW, WAVE>::base(lane))
    }

    fn incremental_coord(iteration: usize) -> CoordDelta {
        col_delta(InlineVw::<BD, BK, VW, WAVE>::increment(iteration))
    }

    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord {
        col_coord(InlineVw::<BD, BK, VW, WAVE>::coord(lane, iteration, slot))
    }
}

/// Block dimension along rows, vector along K. Pairs with [`super::RowMajor`].
pub struct ColOrthoVw<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize = 64>;

impl<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> MatrixLayout
    for ColOrthoVw<BD, BK, VW, WAVE>
{
    const IO_COUNT: usize = OrthoVw::<BD, BK, VW, VW, WAVE>::IO_COUNT;
    const VW: usize = VW;
    const VECTOR_AXIS: Axis = Axis::Col;

    fn base_coord(lane: u32) -> MatrixCoord {
        col_coord(OrthoVw::<BD, BK, VW, VW, WAVE>::base(lane))
    }

    fn incremental_coord(iteration: usize) -> CoordDelta {
        col_delta(OrthoVw::<BD, BK, VW, VW, WAVE>::increment(iteration))
    }

    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord {
        col_coord(OrthoVw::<BD, BK, VW, VW, WAVE>::coord(lane, iteration, slot))
    }
}

/// Block dimension along columns, vector along columns. Pairs with [`super::RowMajor`].
pub struct RowInlineVw<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize = 64>;

impl<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> MatrixLayout
    for RowInlineVw<BD, BK, VW, WAVE>
{
    const IO_COUNT: usize = InlineVw::<BD, BK, VW, WAVE>::IO_COUNT;
    const VW: usize = VW;
    const VECTOR_AXIS: Axis = Axis::Col;

    fn base_coord(lane: u32) -> MatrixCoord {
        row_coord(InlineVw::<BD, BK, VW, WAVE>::base(lane))
    }

    fn incremental_coord(iteration: usize) -> CoordDelta {
        row_delta(InlineVw::<BD, BK, VW, WAVE>::increment(iteration))
    }

    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord {
        row_coord(InlineVw::<BD, BK, VW, WAVE>::coord(lane, iteration, slot))
    }
}

/// Block dimension along columns, vector along K (rows). Pairs with [`super::ColMajor`].
pub struct RowOrthoVw<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize = 64>;

impl<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> MatrixLayout
    for RowOrthoVw<BD, BK, VW, WAVE>
{
    const IO_COUNT: usize = OrthoVw::<BD, BK, VW, VW, WAVE>::IO_COUNT;
    const VW: usize = VW;
    const VECTOR_AXIS: Axis = Axis::Row;

    fn base_coord(lane: u32) -> MatrixCoord {
        row_coord(OrthoVw::<BD, BK, VW, VW, WAVE>::base(lane))
    }

    fn incremental_coord(iteration: usize) -> CoordDelta {
        row_delta(OrthoVw::<BD, BK, VW, VW, WAVE>::increment(iteration))
    }

    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord {
        row_coord(OrthoVw::<BD, BK, VW, VW, WAVE>::coord(lane, iteration, slot))
    }
}

/// Col-oriented layout whose register format is independent of the data
/// layout. Vectors run along K, so row-major data admits `VW` up to
/// `MAX_VW`; column-major (transposed) data must use `VW == 1`.
pub struct ColNT<
    DL,
    const BD: usize,
    const BK: usize,
    const VW: usize,
    const MAX_VW: usize,
    const WAVE: usize = 64,
>(PhantomData<DL>);

impl<
        DL: DataLayout,
        const BD: usize,
        const BK: usize,
        const VW: usize,
        const MAX_VW: usize,
        const WAVE: usize,
    > MatrixLayout for ColNT<DL, BD, BK, VW, MAX_VW, WAVE>
{
    const IO_COUNT: usize = {
        assert!(
            DL::CONTIGUOUS_AXIS as u8 == Axis::Col as u8 || VW == 1,
            "transposed data layout requires vector width 1"
        );
        OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::IO_COUNT
    };
    const VW: usize = VW;
    const VECTOR_AXIS: Axis = Axis::Col;

    fn base_coord(lane: u32) -> MatrixCoord {
        col_coord(OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::base(lane))
    }

    fn incremental_coord(iteration: usize) -> CoordDelta {
        col_delta(OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::increment(iteration))
    }

    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord {
        col_coord(OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::coord(lane, iteration, slot))
    }
}

/// Row-oriented counterpart of [`ColNT`]: vectors run along K (rows), so
/// column-major data admits `VW` up to `MAX_VW` and row-major data must use
/// `VW == 1`.
pub struct RowNT<
    DL,
    const BD: usize,
    const BK: usize,
    const VW: usize,
    const MAX_VW: usize,
    const WAVE: usize = 64,
>(PhantomData<DL>);

impl<
        DL: DataLayout,
        const BD: usize,
        const BK: usize,
        const VW: usize,
        const MAX_VW: usize,
        const WAVE: usize,
    > MatrixLayout for RowNT<DL, BD, BK, VW, MAX_VW, WAVE>
{
    const IO_COUNT: usize = {
        assert!(
            DL::CONTIGUOUS_AXIS as u8 == Axis::Row as u8 || VW == 1,
            "transposed data layout requires vector width 1"
        );
        OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::IO_COUNT
    };
    const VW: usize = VW;
    const VECTOR_AXIS: Axis = Axis::Row;

    fn base_coord(lane: u32) -> MatrixCoord {
        row_coord(OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::base(lane))
    }

    fn incremental_coord(iteration: usize) -> CoordDelta {
        row_delta(OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::increment(iteration))
    }

    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord {
        row_coord(OrthoVw::<BD, BK, VW, MAX_VW, WAVE>::coord(lane, iteration, slot))
    }
}
