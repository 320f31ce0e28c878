//! Opaque vectorized load/store primitives.
//!
//! The single-transaction primitives reinterpret `VW` contiguous elements
//! as one vector register value. The tile primitives ([`TileLoad`],
//! [`TileStore`]) repeat that transaction `IO_COUNT` times, advancing by a
//! [`MatrixLayout`]'s incremental offsets, to fill or drain one lane's
//! share of a tile.

use crate::{
    element::Element,
    layout::{DataLayout, MatrixLayout},
};
use bytemuck::{Pod, Zeroable};
use std::marker::PhantomData;

/// Contents of one vector register: `VW` elements moved by a single
/// memory transaction.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(transparent)]
pub struct VecReg<T, const VW: usize>(pub [T; VW]);

unsafe impl<T: Pod, const VW: usize> Zeroable for VecReg<T, VW> {}
unsafe impl<T: Pod, const VW: usize> Pod for VecReg<T, VW> {}

/// Single-transaction vectorized load.
pub struct OpaqueLoad<T, const VW: usize>(PhantomData<T>);

impl<T: Element, const VW: usize> OpaqueLoad<T, VW> {
    /// Reads `VW` elements starting `offset` elements past `ptr` as one
    /// register value.
    ///
    /// # Safety
    /// `offset + VW` elements starting at `ptr` must be readable. No bounds
    /// checking is performed.
    pub unsafe fn exec(ptr: *const T, offset: usize) -> VecReg<T, VW> {
        ptr.add(offset).cast::<VecReg<T, VW>>().read_unaligned()
    }
}

/// Single-transaction vectorized store.
pub struct OpaqueStore<T, const VW: usize>(PhantomData<T>);

impl<T: Element, const VW: usize> OpaqueStore<T, VW> {
    /// Writes one register value over the `VW` elements starting `offset`
    /// elements past `ptr`.
    ///
    /// # Safety
    /// `offset + VW` elements starting at `ptr` must be writable. No bounds
    /// checking is performed.
    pub unsafe fn exec(ptr: *mut T, offset: usize, reg: VecReg<T, VW>) {
        ptr.add(offset).cast::<VecReg<T, VW>>().write_unaligned(reg);
    }
}

/// Fills one lane's register file from a tile in memory.
pub struct TileLoad<Ml, Dl, T, const VW: usize>(PhantomData<(Ml, Dl, T)>);

impl<Ml: MatrixLayout, Dl: DataLayout, T: Element, const VW: usize> TileLoad<Ml, Dl, T, VW> {
    const CHECKS: () = {
        assert!(VW == Ml::VW, "vector width must match the matrix layout's");
        assert!(
            Ml::VW == 1 || Ml::VECTOR_AXIS as u8 == Dl::CONTIGUOUS_AXIS as u8,
            "vectorized transactions must run along the data layout's contiguous axis"
        );
    };

    /// Register-file length this loader fills.
    pub const UNPACKED_SIZE: usize = Ml::IO_COUNT * VW;

    /// Loads this lane's share of the tile at `data` into `frag`.
    ///
    /// # Safety
    /// Every offset the layout produces for `lane` (each spanning `VW`
    /// elements) must be readable at `data`. The buffer must hold the full
    /// tile for the given leading dimension.
    pub unsafe fn load(frag: &mut [T], data: *const T, ld: usize, lane: u32) {
        let () = Self::CHECKS;
        assert_eq!(frag.len(), Self::UNPACKED_SIZE);

        let mut offset = Dl::offset(Ml::base_coord(lane), ld);
        for i in 0..Ml::IO_COUNT {
            let reg = OpaqueLoad::<T, VW>::exec(data, offset);
            frag[i * VW..(i + 1) * VW].copy_from_slice(&reg.0);
            if i + 1 < Ml::IO_COUNT {
                offset = offset
                    .wrapping_add_signed(Dl::offset_delta(Ml::incremental_coord(i), ld));
            }
        }
    }

    /// Bounds-checked variant of [`Self::load`] over a slice.
    pub fn load_slice(frag: &mut [T], data: &[T], ld: usize, lane: u32) {
        let () = Self::CHECKS;
        assert_eq!(frag.len(), Self::UNPACKED_SIZE);

        let mut offset = Dl::offset(Ml::base_coord(lane), ld);
        for i in 0..Ml::IO_COUNT {
            frag[i * VW..(i + 1) * VW].copy_from_slice(&data[offset..offset + VW]);
            if i + 1 < Ml::IO_COUNT {
                offset = offset
                    .checked_add_signed(Dl::offset_delta(Ml::incremental_coord(i), ld))
                    .expect("layout walked below the buffer start");
            }
        }
    }
}

/// Drains one lane's register file back into a tile in memory.
///
/// The iteration order is identical to [`TileLoad`]'s, which is what makes
/// an immediate load/store round trip reproduce the source exactly.
pub struct TileStore<Ml, Dl, T, const VW: usize>(PhantomData<(Ml, Dl, T)>);

impl<Ml: MatrixLayout, Dl: DataLayout, T: Element, const VW: usize> TileStore<Ml, Dl, T, VW> {
    const CHECKS: () = {
        assert!(VW == Ml::VW, "vector width must match the matrix layout's");
        assert!(
            Ml::VW == 1 || Ml::VECTOR_AXIS as u8 == Dl::CONTIGUOUS_AXIS as u8,
            "vectorized transactions must run along the data layout's contiguous axis"
        );
    };

    pub const UNPACKED_SIZE: usize = Ml::IO_COUNT * VW;

    /// Stores this lane's register file into the tile at `data`.
    ///
    /// # Safety
    /// Every offset the layout produces for `lane` (each spanning `VW`
    /// elements) must be writable at `data`.
    pub unsafe fn store(data: *mut T, frag: &[T], ld: usize, lane: u32) {
        let () = Self::CHECKS;
        assert_eq!(frag.len(), Self::UNPACKED_SIZE);

        let mut offset = Dl::offset(Ml::base_coord(lane), ld);
        for i in 0..Ml::IO_COUNT {
            let mut reg = VecReg::<T, VW>::zeroed();
            reg.0.copy_from_slice(&frag[i * VW..(i + 1) * VW]);
            OpaqueStore::<T, VW>::exec(data, offset, reg);
            if i + 1 < Ml::IO_COUNT {
                offset = offset
                    .wrapping_add_signed(Dl::offset_delta(Ml::incremental_coord(i), ld));
            }
        }
    }

    /// Bounds-checked variant of [`Self::store`] over a slice.
    pub fn store_slice(data: &mut [T], frag: &[T], ld: usize, lane: u32) {
        let () = Self::CHECKS;
        assert_eq!(frag.len(), Self::UNPACKED_SIZE);

        let mut offset = Dl::offset(Ml::base_coord(lane), ld);
        for i in 0..Ml::IO_COUNT {
            data[offset..offset + VW].copy_from_slice(&frag[i * VW..(i + 1) * VW]);
            if i + 1 < Ml::IO_COUNT {
                offset = offset
                    .checked_add_signed(Dl::offset_delta(Ml::incremental_coord(i), ld))
                    .expect("layout walked below the buffer start");
            }
        }
    }
}
