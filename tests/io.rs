//! Load/store round-trip properties of the tile IO primitives.

use rand::Rng;
use rand_pcg::Pcg64Mcg;
use wavemma::element::Element;
use wavemma::io::{TileLoad, TileStore};
use wavemma::layout::{
    ColInlineVw, ColMajor, ColNT, ColOrthoVw, DataLayout, MatrixLayout, RowInlineVw, RowMajor,
    RowNT, RowOrthoVw,
};

fn tile<T: Element>(len: usize, seed: u64) -> Vec<T> {
    let mut rng = Pcg64Mcg::new(seed as u128);
    (0..len)
        .map(|_| T::from_f64(rng.gen_range(0i32..120) as f64))
        .collect()
}

/// Loading every lane's share of a tile and immediately storing it back
/// must reproduce the source buffer byte for byte.
fn round_trip<Ml, Dl, T, const VW: usize, const WAVE: usize>(ld: usize, len: usize)
where
    Ml: MatrixLayout,
    Dl: DataLayout,
    T: Element,
{
    let src = tile::<T>(len, 0x1dea + len as u64);
    let mut dst = vec![T::from_f64(0.0); len];

    let frag_len = TileLoad::<Ml, Dl, T, VW>::UNPACKED_SIZE;
    for lane in 0..WAVE as u32 {
        let mut frag = vec![T::from_f64(0.0); frag_len];
        TileLoad::<Ml, Dl, T, VW>::load_slice(&mut frag, &src, ld, lane);
        TileStore::<Ml, Dl, T, VW>::store_slice(&mut dst, &frag, ld, lane);
    }

    assert_eq!(src, dst);
}

macro_rules! round_trip_tests {
    ($($name:ident: $ml:ty, $dl:ty, $t:ty, $vw:expr, $wave:expr, $ld:expr, $len:expr;)*) => {$(
        #[test]
        fn $name() {
            round_trip::<$ml, $dl, $t, $vw, $wave>($ld, $len);
        }
    )*};
}

round_trip_tests! {
    col_inline_f16: ColInlineVw<16, 16, 4, 64>, ColMajor, half::f16, 4, 64, 16, 256;
    col_inline_f32_scalar: ColInlineVw<16, 16, 1, 64>, ColMajor, f32, 1, 64, 16, 256;
    col_inline_i8_wide: ColInlineVw<32, 32, 8, 64>, ColMajor, i8, 8, 64, 32, 1024;
    col_inline_large_dim: ColInlineVw<256, 4, 2, 64>, ColMajor, f32, 2, 64, 256, 1024;
    col_ortho_f16: ColOrthoVw<16, 16, 4, 64>, RowMajor, half::f16, 4, 64, 16, 256;
    col_ortho_bf16: ColOrthoVw<16, 32, 8, 64>, RowMajor, half::bf16, 8, 64, 32, 512;
    col_ortho_large_dim: ColOrthoVw<128, 8, 2, 64>, RowMajor, f32, 2, 64, 8, 1024;
    row_inline_u32: RowInlineVw<16, 16, 4, 64>, RowMajor, u32, 4, 64, 16, 256;
    row_ortho_f64: RowOrthoVw<32, 8, 2, 64>, ColMajor, f64, 2, 64, 8, 256;
    col_nt_vectored: ColNT<RowMajor, 16, 16, 4, 4, 64>, RowMajor, f32, 4, 64, 16, 256;
    col_nt_scalar: ColNT<ColMajor, 16, 16, 1, 4, 64>, ColMajor, f32, 1, 64, 16, 256;
    row_nt_vectored: RowNT<ColMajor, 16, 16, 4, 4, 64>, ColMajor, f32, 4, 64, 16, 256;
    row_nt_scalar: RowNT<RowMajor, 16, 16, 1, 4, 64>, RowMajor, f32, 1, 64, 16, 256;
    wave32_f16: ColInlineVw<16, 16, 8, 32>, ColMajor, half::f16, 8, 32, 16, 256;
    wave32_ortho: ColOrthoVw<16, 16, 8, 32>, RowMajor, half::f16, 8, 32, 16, 256;
}

/// The unchecked pointer walk and the slice walk must visit the same
/// addresses.
#[test]
fn raw_load_matches_checked_load() {
    type Ml = ColOrthoVw<16, 32, 8, 64>;
    let src = tile::<half::bf16>(512, 7);

    for lane in 0..64 {
        let mut raw = vec![half::bf16::from_f64(0.0); 8];
        let mut checked = raw.clone();
        unsafe {
            TileLoad::<Ml, RowMajor, half::bf16, 8>::load(&mut raw, src.as_ptr(), 32, lane);
        }
        TileLoad::<Ml, RowMajor, half::bf16, 8>::load_slice(&mut checked, &src, 32, lane);
        assert_eq!(raw, checked, "lane {lane}");
    }
}

#[test]
fn raw_store_matches_checked_store() {
    type Ml = RowInlineVw<16, 16, 4, 64>;
    let frag_len = TileStore::<Ml, RowMajor, f32, 4>::UNPACKED_SIZE;

    let mut raw = vec![0.0f32; 256];
    let mut checked = vec![0.0f32; 256];
    for lane in 0..64 {
        let frag = tile::<f32>(frag_len, 100 + lane as u64);
        unsafe {
            TileStore::<Ml, RowMajor, f32, 4>::store(raw.as_mut_ptr(), &frag, 16, lane);
        }
        TileStore::<Ml, RowMajor, f32, 4>::store_slice(&mut checked, &frag, 16, lane);
    }
    assert_eq!(raw, checked);
}

/// A padded leading dimension must leave the padding untouched.
#[test]
fn store_respects_leading_dimension_padding() {
    type Ml = ColInlineVw<16, 16, 4, 64>;
    let ld = 24;
    let sentinel = f32::from_f64(-1.0);
    let mut dst = vec![sentinel; ld * 16];

    let src = tile::<f32>(ld * 16, 11);
    for lane in 0..64 {
        let mut frag = vec![0.0f32; 4];
        TileLoad::<Ml, ColMajor, f32, 4>::load_slice(&mut frag, &src, ld, lane);
        TileStore::<Ml, ColMajor, f32, 4>::store_slice(&mut dst, &frag, ld, lane);
    }

    for col in 0..16 {
        let start = col * ld;
        assert_eq!(&dst[start..start + 16], &src[start..start + 16]);
        assert!(dst[start + 16..start + ld].iter().all(|&x| x == sentinel));
    }
}
