//! The wave-level multiply-accumulate step.

use crate::{
    element::Element,
    fragment::{Accumulator, Fragment, FragmentLayouts, MatrixA, MatrixB},
};

/// Performs `acc += a * b` over one wavefront's worth of fragments.
///
/// The slices hold one fragment per lane, in lane order. Products are
/// accumulated in `f64` in ascending-k order and rounded into the
/// accumulator element type exactly once per output element; the fixed
/// order is part of the contract, so results are bit-reproducible and
/// directly comparable against a scalar triple-loop reference.
#[profiling::function]
pub fn mma_sync<
    const M: usize,
    const N: usize,
    const K: usize,
    Ti: Element,
    Ta: Element,
    DlA: FragmentLayouts,
    DlB: FragmentLayouts,
    DlC: FragmentLayouts,
    const FA: usize,
    const FB: usize,
    const FC: usize,
    const VA: usize,
    const VB: usize,
    const VC: usize,
    const WAVE: usize,
>(
    acc: &mut [Fragment<Accumulator, M, N, K, Ta, DlC, FC, VC, WAVE>],
    a: &[Fragment<MatrixA, M, N, K, Ti, DlA, FA, VA, WAVE>],
    b: &[Fragment<MatrixB, M, N, K, Ti, DlB, FB, VB, WAVE>],
) {
    assert_eq!(a.len(), WAVE, "expected one A fragment per lane");
    assert_eq!(b.len(), WAVE, "expected one B fragment per lane");
    assert_eq!(acc.len(), WAVE, "expected one accumulator fragment per lane");
    tracing::trace!(m = M, n = N, k = K, "wave mma step");

    // Reassemble the operand tiles from the per-lane register files via
    // the same layout mapping the loads used.
    let mut tile_a = vec![0.0f64; M * K];
    for (lane, frag) in a.iter().enumerate() {
        for (reg, &v) in frag.regs().iter().enumerate() {
            let c = frag.coord_of(lane as u32, reg);
            tile_a[c.row * K + c.col] = v.to_f64();
        }
    }
    let mut tile_b = vec![0.0f64; K * N];
    for (lane, frag) in b.iter().enumerate() {
        for (reg, &v) in frag.regs().iter().enumerate() {
            let c = frag.coord_of(lane as u32, reg);
            tile_b[c.row * N + c.col] = v.to_f64();
        }
    }
    let mut tile_c = vec![0.0f64; M * N];
    for (lane, frag) in acc.iter().enumerate() {
        for (reg, &v) in frag.regs().iter().enumerate() {
            let c = frag.coord_of(lane as u32, reg);
            tile_c[c.row * N + c.col] = v.to_f64();
        }
    }

    for m in 0..M {
        for n in 0..N {
            let mut sum = tile_c[m * N + n];
            for k in 0..K {
                sum += tile_a[m * K + k] * tile_b[k * N + n];
            }
            tile_c[m * N + n] = sum;
        }
    }

    for (lane, frag) in acc.iter_mut().enumerate() {
        for reg in 0..FC {
            let c = frag.coord_of(lane as u32, reg);
            frag.regs_mut()[reg] = Ta::from_f64(tile_c[c.row * N + c.col]);
        }
    }
}
