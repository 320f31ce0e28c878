//! Driver-versus-reference equivalence for the cross-lane operations.
//!
//! Every operation carries two independent implementations: a structural
//! slice movement (the driver) and a per-lane index formula (the
//! reference). These tests exercise both against each other over random
//! register files, then pin the boundary behaviors explicitly.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_pcg::Pcg64Mcg;
use wavemma::cross_lane::dpp::DppOp;
use wavemma::cross_lane::{
    Bcast, BlockBcast, Dpp, Gather, PermByte, Reverse, RotateL, RotateR, RotateWaveL, RotateWaveR,
    Scatter, ShiftL, ShiftR, Shuffle2, Shuffle4, Swap, WFallBcast, Zip,
};

fn rng(seed: u64) -> Pcg64Mcg {
    Pcg64Mcg::new(seed as u128)
}

fn wave_u32<const WAVE: usize>(seed: u64) -> [u32; WAVE] {
    let mut rng = rng(seed);
    std::array::from_fn(|_| rng.gen())
}

fn check_dpp<Op, const RM: u32, const BM: u32, const BC: bool, const WAVE: usize>()
where
    Op: DppOp,
{
    let src = wave_u32::<WAVE>(0xd1);
    let prev = wave_u32::<WAVE>(0xd2);
    let out = Dpp::<Op, RM, BM, BC>::exec(&src, &prev);
    for lane in 0..WAVE {
        assert_eq!(
            out[lane],
            Dpp::<Op, RM, BM, BC>::expect(lane, &src, &prev),
            "lane {lane}"
        );
    }
}

macro_rules! dpp_tests {
    ($($name:ident: $op:ty, $rm:expr, $bm:expr, $bc:expr, $wave:expr;)*) => {$(
        #[test]
        fn $name() {
            check_dpp::<$op, $rm, $bm, $bc, $wave>();
        }
    )*};
}

dpp_tests! {
    bcast_pairs: Bcast<2, 1>, 0xf, 0xf, false, 64;
    bcast_rows: Bcast<16, 3>, 0xf, 0xf, false, 64;
    bcast_banks_wave32: Bcast<4, 0>, 0xf, 0xf, false, 32;
    reverse_rows: Reverse<16>, 0xf, 0xf, false, 64;
    reverse_pairs: Reverse<2>, 0xf, 0xf, true, 64;
    reverse_half_wave32: Reverse<16>, 0xf, 0xf, false, 32;
    rotate_l_rows: RotateL<16, 5>, 0xf, 0xf, false, 64;
    rotate_l_max_dist: RotateL<16, 15>, 0xf, 0xf, false, 64;
    rotate_r_banks: RotateR<4, 1>, 0xf, 0xf, false, 64;
    shift_l_bound0: ShiftL<16, 1>, 0xf, 0xf, true, 64;
    shift_l_prev: ShiftL<16, 3>, 0xf, 0xf, false, 64;
    shift_r_bound0: ShiftR<16, 2>, 0xf, 0xf, true, 64;
    shift_r_prev_wave32: ShiftR<8, 1>, 0xf, 0xf, false, 32;
    shuffle2: Shuffle2<1, 0>, 0xf, 0xf, false, 64;
    shuffle4: Shuffle4<3, 0, 2, 1>, 0xf, 0xf, false, 64;
    swap_rows: Swap<16>, 0xf, 0xf, false, 64;
    swap_banks_wave32: Swap<4>, 0xf, 0xf, false, 32;
    // Widest legal swaps: the paired groups span the whole wavefront.
    swap_wave_halves: Swap<32>, 0xf, 0xf, false, 64;
    swap_halves_wave32: Swap<16>, 0xf, 0xf, false, 32;
    wfall_bcast_rows: WFallBcast<16>, 0xf, 0xf, false, 64;
    wfall_bcast_banks: WFallBcast<4>, 0xf, 0xf, false, 64;
    masked_rows: Bcast<16, 0>, 0x5, 0xf, false, 64;
    masked_banks: Reverse<16>, 0xf, 0x3, false, 64;
    masked_both_bound0: ShiftL<16, 4>, 0xa, 0x9, true, 64;
}

/// A left rotate moves values toward higher local indices; at the maximum
/// distance the first element of each row lands on the last lane.
#[test]
fn rotate_l_wraps_to_row_end() {
    let src: [u32; 64] = std::array::from_fn(|l| l as u32);
    let prev = [0u32; 64];
    let out = Dpp::<RotateL<16, 15>, 0xf, 0xf, false>::exec(&src, &prev);
    for row in 0..4 {
        let base = row * 16;
        assert_eq!(out[base + 15], src[base]);
        assert_eq!(out[base], src[base + 1]);
    }
}

/// With bound control set, the vacant leading lane of every row reads zero
/// instead of its previous value.
#[test]
fn shift_l_bound_ctrl_zeroes_vacancies() {
    let src: [u32; 64] = std::array::from_fn(|l| l as u32 + 1);
    let prev: [u32; 64] = [0xdead; 64];

    let zeroed = Dpp::<ShiftL<16, 1>, 0xf, 0xf, true>::exec(&src, &prev);
    let kept = Dpp::<ShiftL<16, 1>, 0xf, 0xf, false>::exec(&src, &prev);
    for row in 0..4 {
        let base = row * 16;
        assert_eq!(zeroed[base], 0);
        assert_eq!(kept[base], 0xdead);
        for i in 1..16 {
            assert_eq!(zeroed[base + i], src[base + i - 1]);
        }
    }
}

/// Lanes whose row or bank write-mask bit is unset keep their previous
/// value regardless of the pattern.
#[test]
fn write_masks_gate_rows_and_banks() {
    let src = wave_u32::<64>(21);
    let prev = wave_u32::<64>(22);
    let out = Dpp::<Reverse<16>, 0x2, 0xc, false>::exec(&src, &prev);
    for lane in 0..64 {
        let row = lane / 16;
        let bank = (lane % 16) / 4;
        if row != 1 || bank < 2 {
            assert_eq!(out[lane], prev[lane], "lane {lane} should be masked off");
        } else {
            assert_eq!(out[lane], src[lane ^ 15], "lane {lane}");
        }
    }
}

/// The first sub-group of a wavefront-fall broadcast passes through
/// unchanged; each later one reads the last lane of its predecessor.
#[test]
fn wfall_bcast_first_group_passes_through() {
    let src: [u32; 64] = std::array::from_fn(|l| l as u32 * 10);
    let prev = [0u32; 64];
    let out = Dpp::<WFallBcast<16>, 0xf, 0xf, false>::exec(&src, &prev);
    assert_eq!(&out[..16], &src[..16]);
    for g in 1..4 {
        for i in 0..16 {
            assert_eq!(out[g * 16 + i], src[g * 16 - 1]);
        }
    }
}

#[test]
fn gather_matches_reference() {
    let src = wave_u32::<64>(31);
    let mut idx = [0u32; 64];
    let mut r = rng(32);
    for slot in idx.iter_mut() {
        *slot = r.gen_range(0..64);
    }
    let out = Gather::exec(&src, &idx);
    for lane in 0..64 {
        assert_eq!(out[lane], Gather::expect(lane, &src, &idx), "lane {lane}");
    }
}

#[test]
fn scatter_matches_reference() {
    let src = wave_u32::<32>(41);
    let mut idx = [0u32; 32];
    let mut r = rng(42);
    // Force collisions and holes.
    for slot in idx.iter_mut() {
        *slot = r.gen_range(0..16);
    }
    let out = Scatter::exec(&src, &idx);
    for lane in 0..32 {
        assert_eq!(out[lane], Scatter::expect(lane, &src, &idx), "lane {lane}");
    }
    // Destinations no lane targeted read zero.
    assert!(out[16..].iter().all(|&x| x == 0));
}

/// Scattering through a permutation and gathering through the same one is
/// the identity.
#[test]
fn scatter_then_gather_inverts_on_permutations() {
    let src = wave_u32::<64>(51);
    let mut idx: [u32; 64] = std::array::from_fn(|l| l as u32);
    idx.shuffle(&mut rng(52));

    let scattered = Scatter::exec(&src, &idx);
    let back = Gather::exec(&scattered, &idx);
    assert_eq!(back, src);
}

#[test]
fn block_bcast_matches_reference() {
    let src = wave_u32::<64>(61);
    let out = BlockBcast::<32, 5>::exec(&src);
    for lane in 0..64 {
        assert_eq!(out[lane], BlockBcast::<32, 5>::expect(lane, &src));
        assert_eq!(out[lane], src[(lane & !31) | 5]);
    }
}

#[test]
fn wave_rotates_match_reference() {
    let src = wave_u32::<64>(71);
    let left = RotateWaveL::<9>::exec(&src);
    let right = RotateWaveR::<9>::exec(&src);
    for lane in 0..64 {
        assert_eq!(left[lane], RotateWaveL::<9>::expect(lane, &src));
        assert_eq!(right[lane], RotateWaveR::<9>::expect(lane, &src));
        assert_eq!(left[lane], src[(lane + 64 - 9) % 64]);
    }
    // Opposite rotations cancel.
    assert_eq!(RotateWaveR::<9>::exec(&left), src);
}

#[test]
fn perm_byte_matches_reference() {
    let src0 = wave_u32::<64>(81);
    let src1 = wave_u32::<64>(82);
    let out = PermByte::<0, 4, 1, 5>::exec(&src0, &src1);
    for lane in 0..64 {
        assert_eq!(
            out[lane],
            PermByte::<0, 4, 1, 5>::expect(lane, &src0, &src1),
            "lane {lane}"
        );
    }
}

/// Selectors below four pull bytes from the first source, the rest from the
/// second, in little-endian order.
#[test]
fn perm_byte_selector_halves() {
    let src0 = [0x4433_2211u32; 64];
    let src1 = [0xddcc_bbaau32; 64];
    let out = PermByte::<3, 2, 4, 7>::exec(&src0, &src1);
    assert_eq!(out[0], u32::from_le_bytes([0x44, 0x33, 0xaa, 0xdd]));
}

#[test]
fn zip_matches_reference() {
    let src0 = wave_u32::<64>(91);
    let src1 = wave_u32::<64>(92);
    for lane in 0..64 {
        assert_eq!(
            Zip::<1>::exec(&src0, &src1)[lane],
            Zip::<1>::expect(lane, &src0, &src1)
        );
        assert_eq!(
            Zip::<4>::exec(&src0, &src1)[lane],
            Zip::<4>::expect(lane, &src0, &src1)
        );
        assert_eq!(
            Zip::<16>::exec(&src0, &src1)[lane],
            Zip::<16>::expect(lane, &src0, &src1)
        );
    }
}

#[test]
fn zip_alternates_groups() {
    let src0 = [1u32; 64];
    let src1 = [2u32; 64];
    let out = Zip::<16>::exec(&src0, &src1);
    for lane in 0..64 {
        let want = if lane & 16 == 0 { 1 } else { 2 };
        assert_eq!(out[lane], want, "lane {lane}");
    }
}
