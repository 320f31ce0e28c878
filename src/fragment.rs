//! Cooperative-matrix fragments: one lane's register share of a tile.

use crate::{
    element::Element,
    io::{TileLoad, TileStore},
    io_traits::IoShape,
    layout::{
        ColInlineVw, ColMajor, ColOrthoVw, DataLayout, MatrixCoord, MatrixLayout, RowInlineVw,
        RowNT, RowOrthoVw, RowMajor,
    },
};
use std::marker::PhantomData;

/// Left-hand operand of an MMA step, an `M x K` tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixA;
/// Right-hand operand, a `K x N` tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixB;
/// Accumulator, an `M x N` tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Accumulator;

/// Matrix-layout generators chosen per fragment role for a given data
/// layout. Closed-set dispatch: a role's vectors must run along the data
/// layout's contiguous axis, so each (role, layout) pair has exactly one
/// generator.
pub trait FragmentLayouts: DataLayout {
    type A<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize>: MatrixLayout;
    type B<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize>: MatrixLayout;
    type Acc<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize>: MatrixLayout;
}

impl FragmentLayouts for ColMajor {
    type A<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> =
        ColInlineVw<BD, BK, VW, WAVE>;
    type B<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> =
        RowOrthoVw<BD, BK, VW, WAVE>;
    type Acc<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> =
        RowNT<ColMajor, BD, BK, VW, VW, WAVE>;
}

impl FragmentLayouts for RowMajor {
    type A<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> =
        ColOrthoVw<BD, BK, VW, WAVE>;
    type B<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> =
        RowInlineVw<BD, BK, VW, WAVE>;
    // NT keeps the accumulator's register format layout-independent;
    // row-major accumulator tiles therefore take the scalar path (VW = 1).
    type Acc<const BD: usize, const BK: usize, const VW: usize, const WAVE: usize> =
        RowNT<RowMajor, BD, BK, VW, VW, WAVE>;
}

/// One lane's registers for a tile of an `M x N x K` multiply-accumulate.
///
/// `FRAG` is the per-lane register count and must equal the tile's element
/// count divided by the wavefront size; a mismatch fails at compile time.
/// `VW` is the vector width used for memory transactions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Fragment<
    Use,
    const M: usize,
    const N: usize,
    const K: usize,
    T,
    Dl,
    const FRAG: usize,
    const VW: usize = 1,
    const WAVE: usize = 64,
> {
    regs: [T; FRAG],
    _marker: PhantomData<(Use, Dl)>,
}

impl<
        Use,
        const M: usize,
        const N: usize,
        const K: usize,
        T: Element,
        Dl,
        const FRAG: usize,
        const VW: usize,
        const WAVE: usize,
    > Fragment<Use, M, N, K, T, Dl, FRAG, VW, WAVE>
{
    pub fn new() -> Self {
        Self {
            regs: [T::zeroed(); FRAG],
            _marker: PhantomData,
        }
    }

    /// Sets every register of this lane to `value`.
    pub fn fill(&mut self, value: T) {
        self.regs = [value; FRAG];
    }

    pub fn regs(&self) -> &[T; FRAG] {
        &self.regs
    }

    pub fn regs_mut(&mut self) -> &mut [T; FRAG] {
        &mut self.regs
    }
}

impl<
        Use,
        const M: usize,
        const N: usize,
        const K: usize,
        T: Element,
        Dl,
        const FRAG: usize,
        const VW: usize,
        const WAVE: usize,
    > Default for Fragment<Use, M, N, K, T, Dl, FRAG, VW, WAVE>
{
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! fragment_role {
    ($use:ty, $layout:ident, $bd:ident, $bk:ident, $doc_tile:literal) => {
        impl<
                const M: usize,
                const N: usize,
                const K: usize,
                T: Element,
                Dl: FragmentLayouts,
                const FRAG: usize,
                const VW: usize,
                const WAVE: usize,
            > Fragment<$use, M, N, K, T, Dl, FRAG, VW, WAVE>
        {
            const SIZE_OK: () = assert!(
                FRAG == IoShape::<$bd, $bk, VW, WAVE>::UNPACKED_SIZE,
                "fragment register count must equal the per-lane share of the tile"
            );

            #[doc = concat!("Loads this lane's share of the ", $doc_tile, " tile at `data`.")]
            pub fn load_matrix_sync(&mut self, data: &[T], ld: usize, lane: u32) {
                let () = Self::SIZE_OK;
                TileLoad::<Dl::$layout<$bd, $bk, VW, WAVE>, Dl, T, VW>::load_slice(
                    &mut self.regs,
                    data,
                    ld,
                    lane,
                );
            }

            #[doc = concat!("Stores this lane's share of the ", $doc_tile, " tile into `data`.")]
            pub fn store_matrix_sync(&self, data: &mut [T], ld: usize, lane: u32) {
                let () = Self::SIZE_OK;
                TileStore::<Dl::$layout<$bd, $bk, VW, WAVE>, Dl, T, VW>::store_slice(
                    data,
                    &self.regs,
                    ld,
                    lane,
                );
            }

            /// Matrix coordinate held by register `reg` of `lane`.
            pub fn coord_of(&self, lane: u32, reg: usize) -> MatrixCoord {
                <Dl::$layout<$bd, $bk, VW, WAVE>>::coord(lane, reg / VW, reg % VW)
            }
        }
    };
}

fragment_role!(MatrixA, A, M, K, "`M x K` A");
fragment_role!(MatrixB, B, N, K, "`K x N` B");
fragment_role!(Accumulator, Acc, N, M, "`M x N` accumulator");
