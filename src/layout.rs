//! Data-layout addressing and per-lane matrix-layout generators.
//!
//! Two orthogonal concepts live here. A [`DataLayout`] says how a matrix is
//! addressed in linear memory (row-major or column-major). A
//! [`MatrixLayout`] says which tile element each wavefront lane touches at
//! each I/O iteration, split into "where does this lane start"
//! ([`MatrixLayout::base_coord`]) and "how does it advance"
//! ([`MatrixLayout::incremental_coord`]) so the load and store loops share
//! one layout-agnostic body.

mod frag;
mod matrix;

pub use matrix::{ColInlineVw, ColNT, ColOrthoVw, RowInlineVw, RowNT, RowOrthoVw};

use crate::config::MAX_TRANSACTION_BYTES;

/// A matrix axis. Transactions wider than one element must run along the
/// axis that is contiguous in the chosen [`DataLayout`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Axis {
    Row = 0,
    Col = 1,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MatrixCoord {
    pub row: usize,
    pub col: usize,
}

/// Signed coordinate difference, produced by the incremental-offset path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CoordDelta {
    pub row: isize,
    pub col: isize,
}

/// Addressing scheme mapping matrix coordinates to linear memory.
///
/// The mapping is affine in (row, col), so coordinate deltas translate
/// directly into linear offset deltas via [`DataLayout::offset_delta`].
pub trait DataLayout: Copy + Default + Send + Sync + 'static {
    /// Axis along which consecutive elements are adjacent in memory.
    const CONTIGUOUS_AXIS: Axis;

    fn offset(coord: MatrixCoord, ld: usize) -> usize;
    fn offset_delta(delta: CoordDelta, ld: usize) -> isize;
}

/// Rows are `ld` elements apart; columns are contiguous.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RowMajor;

/// Columns are `ld` elements apart; rows are contiguous.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ColMajor;

impl DataLayout for RowMajor {
    const CONTIGUOUS_AXIS: Axis = Axis::Col;

    fn offset(coord: MatrixCoord, ld: usize) -> usize {
        coord.row * ld + coord.col
    }

    fn offset_delta(delta: CoordDelta, ld: usize) -> isize {
        delta.row * ld as isize + delta.col
    }
}

impl DataLayout for ColMajor {
    const CONTIGUOUS_AXIS: Axis = Axis::Row;

    fn offset(coord: MatrixCoord, ld: usize) -> usize {
        coord.col * ld + coord.row
    }

    fn offset_delta(delta: CoordDelta, ld: usize) -> isize {
        delta.col * ld as isize + delta.row
    }
}

/// Per-lane iteration pattern over one `BlockDim x BlockK` tile.
///
/// Implementations guarantee the coverage property: over all lanes of the
/// wavefront, iterations `0..IO_COUNT` and vector slots `0..VW`, the
/// produced coordinates tile the block exactly once, with no overlap and no
/// gap. Iteration order is always increasing and is part of the contract;
/// stores must write in the same order loads read.
pub trait MatrixLayout {
    /// Number of vectorized transactions each lane performs.
    const IO_COUNT: usize;
    /// Elements per transaction.
    const VW: usize;
    /// Matrix axis the `VW` elements of one transaction run along.
    const VECTOR_AXIS: Axis;

    /// Coordinate of the first element this lane touches.
    fn base_coord(lane: u32) -> MatrixCoord;

    /// Delta applied after finishing `iteration` to reach the start of
    /// `iteration + 1`. Lane-independent by construction.
    fn incremental_coord(iteration: usize) -> CoordDelta;

    /// Element-granular mapping: coordinate of vector slot `slot` of
    /// transaction `iteration`. `coord(lane, 0, 0) == base_coord(lane)`,
    /// and walking the increments from the base reproduces
    /// `coord(lane, i, 0)`.
    fn coord(lane: u32, iteration: usize, slot: usize) -> MatrixCoord;
}

/// Largest vector width usable for a tile: caps the transaction at
/// [`MAX_TRANSACTION_BYTES`], and requires the width to divide the vector
/// axis and the tile to distribute evenly over the wavefront.
pub const fn max_vector_width(
    vector_axis_len: usize,
    tile_elements: usize,
    elem_size: usize,
    wave: usize,
) -> usize {
    let mut vw = MAX_TRANSACTION_BYTES / elem_size;
    while vw > 1 {
        if vector_axis_len % vw == 0 && tile_elements % (wave * vw) == 0 {
            return vw;
        }
        vw /= 2;
    }
    1
}
