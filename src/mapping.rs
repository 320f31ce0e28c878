//! Coordinate plumbing between the launch grid, matrix space, and linear
//! memory.

use crate::layout::{DataLayout, MatrixCoord};
use std::marker::PhantomData;

/// Maps between (wave grid position) and (matrix coordinate, linear
/// offset) for `BLOCK_HEIGHT x BLOCK_WIDTH` tiles under data layout `Dl`.
///
/// The lane-mapping arithmetic requires the X extent of a thread block to
/// be a multiple of the wavefront size; `wave_coord` assumes the caller
/// upholds that.
pub struct MappingUtil<const BLOCK_HEIGHT: usize, const BLOCK_WIDTH: usize, Dl, const WAVE: usize = 64>(
    PhantomData<Dl>,
);

impl<const BLOCK_HEIGHT: usize, const BLOCK_WIDTH: usize, Dl: DataLayout, const WAVE: usize>
    MappingUtil<BLOCK_HEIGHT, BLOCK_WIDTH, Dl, WAVE>
{
    /// Lane index of a thread within its wavefront.
    pub fn lane_id(thread_x: usize) -> u32 {
        (thread_x % WAVE) as u32
    }

    /// (row, column) position of a thread's wavefront in the wave grid.
    pub fn wave_coord(thread_x: usize, thread_y: usize) -> (usize, usize) {
        (thread_y, thread_x / WAVE)
    }

    /// Matrix coordinate of the tile owned by the wave at `wave_coord`.
    pub fn matrix_coord(wave_row: usize, wave_col: usize) -> MatrixCoord {
        MatrixCoord {
            row: wave_row * BLOCK_HEIGHT,
            col: wave_col * BLOCK_WIDTH,
        }
    }

    /// Linear offset of a matrix coordinate under the data layout.
    pub fn data_offset(coord: MatrixCoord, ld: usize) -> usize {
        Dl::offset(coord, ld)
    }

    /// Base linear offset of the tile owned by the wave at `wave_coord`.
    pub fn tile_offset(wave_row: usize, wave_col: usize, ld: usize) -> usize {
        Self::data_offset(Self::matrix_coord(wave_row, wave_col), ld)
    }
}
