//! Lane-indexed gather/scatter and the operations built on the general
//! permute.

use super::check_group;
use crate::element::Element;

/// General backward permute: every lane names the source lane it reads.
pub struct Gather;

impl Gather {
    /// Driver path: `out[l] = src[idx[l]]`, indices taken modulo the
    /// wavefront size.
    pub fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        idx: &[u32; WAVE],
    ) -> [T; WAVE] {
        let mut out = [T::zeroed(); WAVE];
        for (slot, &i) in out.iter_mut().zip(idx.iter()) {
            *slot = src[i as usize % WAVE];
        }
        out
    }

    /// Reference model for one calling lane.
    pub fn expect<T: Element, const WAVE: usize>(
        lane: usize,
        src: &[T; WAVE],
        idx: &[u32; WAVE],
    ) -> T {
        const { check_group(WAVE, WAVE) };
        src[idx[lane] as usize & (WAVE - 1)]
    }
}

/// General forward permute: every lane names the destination lane it
/// writes. When several lanes target the same destination the highest
/// writing lane wins; destinations no lane targets read zero.
pub struct Scatter;

impl Scatter {
    pub fn exec<T: Element, const WAVE: usize>(
        src: &[T; WAVE],
        idx: &[u32; WAVE],
    ) -> [T; WAVE] {
        let mut out = [T::zeroed(); WAVE];
        for (lane, &i) in idx.iter().enumerate() {
            out[i as usize % WAVE] = src[lane];
        }
        out
    }

    pub fn expect<T: Element, const WAVE: usize>(
        lane: usize,
        src: &[T; WAVE],
        idx: &[u32; WAVE],
    ) -> T {
        const { check_group(WAVE, WAVE) };
        let mut value = T::zeroed();
        for (writer, &i) in idx.iter().enumerate() {
            if i as usize & (WAVE - 1) == lane {
                value = src[writer];
            }
        }
        value
    }
}

/// Broadcast element `SRC` of each `BLOCK`-lane block to the whole block,
/// spanning arbitrary power-of-two block sizes via the general permute.
pub struct BlockBcast<const BLOCK: usize, const SRC: usize>;

impl<const BLOCK: usize, const SRC: usize> BlockBcast<BLOCK, SRC> {
    const CHECKS: () = assert!(SRC < BLOCK, "broadcast source must lie inside the block");

    /// Driver path: composes gather indices block by block and runs the
    /// general permute.
    pub fn exec<T: Element, const WAVE: usize>(src: &[T; WAVE]) -> [T; WAVE] {
        let () = Self::CHECKS;
        const { check_group(BLOCK, WAVE) };

        let mut idx = [0u32; WAVE];
        for (block, chunk) in idx.chunks_mut(BLOCK).enumerate() {
            chunk.fill((block * BLOCK + SRC) as u32);
        }
        Gather::exec(src, &idx)
    }

    /// Reference model: keep the high block bits, replace the low bits
    /// with the broadcast source index.
    pub fn expect<T: Element, const WAVE: usize>(lane: usize, src: &[T; WAVE]) -> T {
        let () = Self::CHECKS;
        const { check_group(BLOCK, WAVE) };
        src[(lane & !(BLOCK - 1)) | SRC]
    }
}

/// Rotate the whole wavefront left by `DIST` lanes (toward higher lane
/// indices), wrapping around.
pub struct RotateWaveL<const DIST: usize>;

impl<const DIST: usize> RotateWaveL<DIST> {
    pub fn exec<T: Element, const WAVE: usize>(src: &[T; WAVE]) -> [T; WAVE] {
        let mut out = *src;
        out.rotate_right(DIST % WAVE);
        out
    }

    pub fn expect<T: Element, const WAVE: usize>(lane: usize, src: &[T; WAVE]) -> T {
        const { check_group(WAVE, WAVE) };
        src[(lane + WAVE - DIST % WAVE) & (WAVE - 1)]
    }
}

/// Rotate the whole wavefront right by `DIST` lanes (toward lower lane
/// indices), wrapping around.
pub struct RotateWaveR<const DIST: usize>;

impl<const DIST: usize> RotateWaveR<DIST> {
    pub fn exec<T: Element, const WAVE: usize>(src: &[T; WAVE]) -> [T; WAVE] {
        let mut out = *src;
        out.rotate_left(DIST % WAVE);
        out
    }

    pub fn expect<T: Element, const WAVE: usize>(lane: usize, src: &[T; WAVE]) -> T {
        const { check_group(WAVE, WAVE) };
        src[(lane + DIST) & (WAVE - 1)]
    }
}
