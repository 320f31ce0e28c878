//! Blend operations: selecting between two source register files, per
//! lane or per byte.

/// Per-lane byte select over two 32-bit sources.
///
/// Each selector indexes into the 8-byte little-endian concatenation of a
/// lane's two source registers: 0..=3 pick a byte of the first source,
/// 4..=7 a byte of the second.
pub struct PermByte<const S0: usize, const S1: usize, const S2: usize, const S3: usize>;

impl<const S0: usize, const S1: usize, const S2: usize, const S3: usize>
    PermByte<S0, S1, S2, S3>
{
    const CHECKS: () = assert!(
        S0 < 8 && S1 < 8 && S2 < 8 && S3 < 8,
        "byte selectors index an 8-byte source pair"
    );

    /// Driver path, assembling each output word from source bytes.
    pub fn exec<const WAVE: usize>(src0: &[u32; WAVE], src1: &[u32; WAVE]) -> [u32; WAVE] {
        let () = Self::CHECKS;
        let mut out = [0u32; WAVE];
        for ((slot, &a), &b) in out.iter_mut().zip(src0.iter()).zip(src1.iter()) {
            let mut bytes = [0u8; 8];
            bytes[..4].copy_from_slice(&a.to_le_bytes());
            bytes[4..].copy_from_slice(&b.to_le_bytes());
            *slot = u32::from_le_bytes([bytes[S0], bytes[S1], bytes[S2], bytes[S3]]);
        }
        out
    }

    /// Reference model: the same selection via shifts and masks.
    pub fn expect<const WAVE: usize>(lane: usize, src0: &[u32; WAVE], src1: &[u32; WAVE]) -> u32 {
        let () = Self::CHECKS;
        let pick = |sel: usize| -> u32 {
            if sel < 4 {
                (src0[lane] >> (8 * sel)) & 0xff
            } else {
                (src1[lane] >> (8 * (sel - 4))) & 0xff
            }
        };
        pick(S0) | pick(S1) << 8 | pick(S2) << 16 | pick(S3) << 24
    }
}

/// Alternate between two sources in `GROUP`-lane runs: even-numbered
/// groups take the first source, odd-numbered the second.
pub struct Zip<const GROUP: usize>;

impl<const GROUP: usize> Zip<GROUP> {
    const CHECKS: () = assert!(
        GROUP.is_power_of_two(),
        "zip group size must be a power of two"
    );

    pub fn exec<T: Copy, const WAVE: usize>(src0: &[T; WAVE], src1: &[T; WAVE]) -> [T; WAVE] {
        let () = Self::CHECKS;
        let mut out = *src0;
        let mut take_second = false;
        for (chunk, src_chunk) in out.chunks_mut(GROUP).zip(src1.chunks(GROUP)) {
            if take_second {
                chunk.copy_from_slice(src_chunk);
            }
            take_second = !take_second;
        }
        out
    }

    pub fn expect<T: Copy, const WAVE: usize>(
        lane: usize,
        src0: &[T; WAVE],
        src1: &[T; WAVE],
    ) -> T {
        let () = Self::CHECKS;
        if lane & GROUP == 0 {
            src0[lane]
        } else {
            src1[lane]
        }
    }
}
