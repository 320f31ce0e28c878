//! DPP-style operations: fixed topological redistributions over rows and
//! banks, with write masks and bound control.

use super::{check_group, BANK_SIZE, ROW_SIZE};
use crate::element::Element;
use std::marker::PhantomData;

/// One DPP redistribution pattern.
///
/// `exec` is the driver path: it moves `src` structurally and marks lanes
/// whose source fell outside their group (shift vacancies) as invalid.
/// `expect_src` is the reference model: the source lane for a given calling
/// lane, from lane-index bit arithmetic, or `None` for a vacancy.
pub trait DppOp {
    /// Sub-group size the pattern operates within.
    const GROUP: usize;

    /// Full lane span one application touches. Patterns crossing adjacent
    /// sub-groups ([`Swap`]) override this; the wavefront must be at least
    /// this wide.
    const SPAN: usize = Self::GROUP;

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    );

    fn expect_src(lane: usize) -> Option<usize>;
}

/// Driver wrapper applying a [`DppOp`] under write masks and bound control.
///
/// `ROW_MASK` and `BANK_MASK` are 4-bit masks; a lane whose row (16 lanes)
/// or bank (4 lanes) bit is unset keeps its previous value, not the moved
/// one. A lane whose source fell out of bounds receives zero when
/// `BOUND_CTRL` is set, its previous value otherwise.
pub struct Dpp<Op, const ROW_MASK: u32, const BANK_MASK: u32, const BOUND_CTRL: bool>(
    PhantomData<Op>,
);

impl<Op: DppOp, const ROW_MASK: u32, const BANK_MASK: u32, const BOUND_CTRL: bool>
    Dpp<Op, ROW_MASK, BANK_MASK, BOUND_CTRL>
{
    const CHECKS: () = {
        assert!(ROW_MASK <= 0xf && BANK_MASK <= 0xf, "write masks are 4 bits");
    };

    /// Driver path over one wavefront register file.
    pub fn exec<T: Element, const WAVE: usize>(src: &[T; WAVE], prev: &[T; WAVE]) -> [T; WAVE] {
        let () = Self::CHECKS;
        const { check_group(Op::SPAN, WAVE) };

        let mut moved = [T::zeroed(); WAVE];
        let mut valid = [false; WAVE];
        Op::exec(src, &mut moved, &mut valid);

        let mut out = *prev;
        for (row_idx, row) in out.chunks_mut(ROW_SIZE).enumerate() {
            if ROW_MASK & (1 << row_idx) == 0 {
                continue;
            }
            for (bank_idx, bank) in row.chunks_mut(BANK_SIZE).enumerate() {
                if BANK_MASK & (1 << bank_idx) == 0 {
                    continue;
                }
                let base = row_idx * ROW_SIZE + bank_idx * BANK_SIZE;
                for (i, slot) in bank.iter_mut().enumerate() {
                    let lane = base + i;
                    if valid[lane] {
                        *slot = moved[lane];
                    } else if BOUND_CTRL {
                        *slot = T::zeroed();
                    }
                }
            }
        }
        out
    }

    /// Reference model for a single calling lane.
    pub fn expect<T: Element, const WAVE: usize>(
        lane: usize,
        src: &[T; WAVE],
        prev: &[T; WAVE],
    ) -> T {
        let () = Self::CHECKS;
        const { check_group(Op::SPAN, WAVE) };

        let row_bit = (lane / ROW_SIZE) & 0x3;
        let bank_bit = (lane % ROW_SIZE) / BANK_SIZE;
        if ROW_MASK & (1 << row_bit) == 0 || BANK_MASK & (1 << bank_bit) == 0 {
            return prev[lane];
        }
        match Op::expect_src(lane) {
            Some(s) => src[s],
            None if BOUND_CTRL => T::zeroed(),
            None => prev[lane],
        }
    }
}

/// Broadcast element `SRC` of each `GROUP`-lane sub-group to the whole
/// sub-group.
pub struct Bcast<const GROUP: usize, const SRC: usize>;

impl<const GROUP: usize, const SRC: usize> DppOp for Bcast<GROUP, SRC> {
    const GROUP: usize = {
        assert!(SRC < GROUP, "broadcast source must lie inside the group");
        GROUP
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for (chunk, src_chunk) in out.chunks_mut(GROUP).zip(src.chunks(GROUP)) {
            chunk.fill(src_chunk[SRC]);
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        // Keep the group bits, replace the local index with the source.
        Some((lane & !(GROUP - 1)) | SRC)
    }
}

/// Reverse each `GROUP`-lane sub-group (row mirror).
pub struct Reverse<const GROUP: usize>;

impl<const GROUP: usize> DppOp for Reverse<GROUP> {
    const GROUP: usize = GROUP;

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        out.copy_from_slice(src);
        for chunk in out.chunks_mut(GROUP) {
            chunk.reverse();
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        Some(lane ^ (GROUP - 1))
    }
}

/// Rotate each sub-group left by `DIST`: values move toward higher local
/// indices, wrapping around.
pub struct RotateL<const GROUP: usize, const DIST: usize>;

impl<const GROUP: usize, const DIST: usize> DppOp for RotateL<GROUP, DIST> {
    const GROUP: usize = {
        assert!(DIST < GROUP, "rotate distance must be less than the group");
        GROUP
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        out.copy_from_slice(src);
        for chunk in out.chunks_mut(GROUP) {
            chunk.rotate_right(DIST);
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        // Cyclic subtract within the group.
        let base = lane & !(GROUP - 1);
        let local = lane & (GROUP - 1);
        Some(base + (local + GROUP - DIST) % GROUP)
    }
}

/// Rotate each sub-group right by `DIST`: values move toward lower local
/// indices, wrapping around.
pub struct RotateR<const GROUP: usize, const DIST: usize>;

impl<const GROUP: usize, const DIST: usize> DppOp for RotateR<GROUP, DIST> {
    const GROUP: usize = {
        assert!(DIST < GROUP, "rotate distance must be less than the group");
        GROUP
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        out.copy_from_slice(src);
        for chunk in out.chunks_mut(GROUP) {
            chunk.rotate_left(DIST);
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        let base = lane & !(GROUP - 1);
        let local = lane & (GROUP - 1);
        Some(base + (local + DIST) % GROUP)
    }
}

/// Shift each sub-group left by `DIST`: a rotate with the wrapped-around
/// lanes masked out, leaving the first `DIST` lanes of every group vacant.
pub struct ShiftL<const GROUP: usize, const DIST: usize>;

impl<const GROUP: usize, const DIST: usize> DppOp for ShiftL<GROUP, DIST> {
    const GROUP: usize = {
        assert!(DIST < GROUP, "shift distance must be less than the group");
        GROUP
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for ((chunk, src_chunk), valid_chunk) in out
            .chunks_mut(GROUP)
            .zip(src.chunks(GROUP))
            .zip(valid.chunks_mut(GROUP))
        {
            chunk[DIST..].copy_from_slice(&src_chunk[..GROUP - DIST]);
            valid_chunk[DIST..].fill(true);
        }
    }

    fn expect_src(lane: usize) -> Option<usize> {
        let local = lane & (GROUP - 1);
        (local >= DIST).then(|| lane - DIST)
    }
}

/// Shift each sub-group right by `DIST`, leaving the last `DIST` lanes of
/// every group vacant.
pub struct ShiftR<const GROUP: usize, const DIST: usize>;

impl<const GROUP: usize, const DIST: usize> DppOp for ShiftR<GROUP, DIST> {
    const GROUP: usize = {
        assert!(DIST < GROUP, "shift distance must be less than the group");
        GROUP
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for ((chunk, src_chunk), valid_chunk) in out
            .chunks_mut(GROUP)
            .zip(src.chunks(GROUP))
            .zip(valid.chunks_mut(GROUP))
        {
            chunk[..GROUP - DIST].copy_from_slice(&src_chunk[DIST..]);
            valid_chunk[..GROUP - DIST].fill(true);
        }
    }

    fn expect_src(lane: usize) -> Option<usize> {
        let local = lane & (GROUP - 1);
        (local < GROUP - DIST).then(|| lane + DIST)
    }
}

/// Arbitrary shuffle of lane pairs: local lane `i` takes local element
/// `SEL_i`.
pub struct Shuffle2<const S0: usize, const S1: usize>;

impl<const S0: usize, const S1: usize> DppOp for Shuffle2<S0, S1> {
    const GROUP: usize = {
        assert!(S0 < 2 && S1 < 2, "shuffle selectors index into the group");
        2
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for (chunk, src_chunk) in out.chunks_mut(2).zip(src.chunks(2)) {
            chunk[0] = src_chunk[S0];
            chunk[1] = src_chunk[S1];
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        let base = lane & !1;
        Some(base + [S0, S1][lane & 1])
    }
}

/// Arbitrary shuffle of lane quads.
pub struct Shuffle4<const S0: usize, const S1: usize, const S2: usize, const S3: usize>;

impl<const S0: usize, const S1: usize, const S2: usize, const S3: usize> DppOp
    for Shuffle4<S0, S1, S2, S3>
{
    const GROUP: usize = {
        assert!(
            S0 < 4 && S1 < 4 && S2 < 4 && S3 < 4,
            "shuffle selectors index into the group"
        );
        4
    };

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for (chunk, src_chunk) in out.chunks_mut(4).zip(src.chunks(4)) {
            chunk[0] = src_chunk[S0];
            chunk[1] = src_chunk[S1];
            chunk[2] = src_chunk[S2];
            chunk[3] = src_chunk[S3];
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        let base = lane & !3;
        Some(base + [S0, S1, S2, S3][lane & 3])
    }
}

/// Swap adjacent `GROUP`-lane sub-groups.
pub struct Swap<const GROUP: usize>;

impl<const GROUP: usize> DppOp for Swap<GROUP> {
    const GROUP: usize = GROUP;
    // Each application reads across a pair of adjacent sub-groups.
    const SPAN: usize = 2 * GROUP;

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for (chunk, src_chunk) in out.chunks_mut(2 * GROUP).zip(src.chunks(2 * GROUP)) {
            chunk[..GROUP].copy_from_slice(&src_chunk[GROUP..]);
            chunk[GROUP..].copy_from_slice(&src_chunk[..GROUP]);
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        Some(lane ^ GROUP)
    }
}

/// "Wavefront fall" broadcast: every sub-group past the first receives the
/// last lane of the preceding sub-group; the first passes through.
pub struct WFallBcast<const GROUP: usize>;

impl<const GROUP: usize> DppOp for WFallBcast<GROUP> {
    const GROUP: usize = GROUP;

    fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        out: &mut [T; WAVE],
        valid: &mut [bool; WAVE],
    ) {
        for (g, chunk) in out.chunks_mut(GROUP).enumerate() {
            if g == 0 {
                chunk.copy_from_slice(&src[..GROUP]);
            } else {
                chunk.fill(src[g * GROUP - 1]);
            }
        }
        valid.fill(true);
    }

    fn expect_src(lane: usize) -> Option<usize> {
        if lane < GROUP {
            Some(lane)
        } else {
            Some((lane & !(GROUP - 1)) - 1)
        }
    }
}
