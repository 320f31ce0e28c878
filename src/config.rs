//! Runtime mirror of the compile-time tile configuration rules.
//!
//! The core primitives reject bad (shape, type, layout, vector width)
//! combinations at build time. Harness code that enumerates parameter
//! tuples dynamically needs the same rules as values; this module provides
//! them, as the only fallible surface of the crate.

/// Largest number of bytes one vectorized transaction may move.
pub const MAX_TRANSACTION_BYTES: usize = 16;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    F16,
    Bf16,
    F32,
    F64,
    I8,
    U8,
    I32,
    U32,
}

impl DataType {
    pub const fn size(self) -> usize {
        match self {
            DataType::I8 | DataType::U8 => 1,
            DataType::F16 | DataType::Bf16 => 2,
            DataType::F32 | DataType::I32 | DataType::U32 => 4,
            DataType::F64 => 8,
        }
    }

    /// Elements sharing one 32-bit register slot.
    pub const fn pack_ratio(self) -> usize {
        let size = self.size();
        if size < 4 {
            4 / size
        } else {
            1
        }
    }
}

/// Storage order of a tile in linear memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LayoutOrder {
    RowMajor,
    ColMajor,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported wavefront size {0}, expected 32 or 64")]
    UnsupportedWave(usize),
    #[error("vector width {vector_width} does not divide the {axis_len}-element vector axis")]
    VectorWidthMisaligned { vector_width: usize, axis_len: usize },
    #[error(
        "vector width {vector_width} moves {bytes} bytes per transaction, over the {max} byte limit"
    )]
    VectorWidthTooLarge {
        vector_width: usize,
        bytes: usize,
        max: usize,
    },
    #[error(
        "{block_dim}x{block_k} tile does not distribute evenly over \
         {wave} lanes at vector width {vector_width}"
    )]
    UnevenDistribution {
        block_dim: usize,
        block_k: usize,
        wave: usize,
        vector_width: usize,
    },
}

/// One (tile shape, element type, layout, vector width) tuple, as chosen by
/// a parameter-enumeration harness.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileConfig {
    pub block_dim: usize,
    pub block_k: usize,
    pub data_type: DataType,
    pub layout: LayoutOrder,
    pub vector_width: usize,
}

impl TileConfig {
    /// Length of the tile axis the vectorized transaction runs along.
    ///
    /// Transactions must be contiguous in memory, so the axis follows the
    /// storage order: the K axis for row-major tiles, the block dimension
    /// for column-major ones.
    pub fn vector_axis_len(&self) -> usize {
        match self.layout {
            LayoutOrder::RowMajor => self.block_k,
            LayoutOrder::ColMajor => self.block_dim,
        }
    }

    /// Checks the configuration against the same rules the compile-time
    /// assertions enforce.
    pub fn validate(&self, wave: usize) -> Result<(), ConfigError> {
        if wave != 32 && wave != 64 {
            return Err(ConfigError::UnsupportedWave(wave));
        }
        let axis_len = self.vector_axis_len();
        if self.vector_width == 0 || axis_len % self.vector_width != 0 {
            return Err(ConfigError::VectorWidthMisaligned {
                vector_width: self.vector_width,
                axis_len,
            });
        }
        let bytes = self.vector_width * self.data_type.size();
        if bytes > MAX_TRANSACTION_BYTES {
            return Err(ConfigError::VectorWidthTooLarge {
                vector_width: self.vector_width,
                bytes,
                max: MAX_TRANSACTION_BYTES,
            });
        }
        if (self.block_dim * self.block_k) % (wave * self.vector_width) != 0 {
            return Err(ConfigError::UnevenDistribution {
                block_dim: self.block_dim,
                block_k: self.block_k,
                wave,
                vector_width: self.vector_width,
            });
        }
        Ok(())
    }

    /// Largest vector width that passes [`Self::validate`] for this tile,
    /// or 1 if even scalar transactions are the only option.
    pub fn max_vector_width(&self, wave: usize) -> usize {
        let mut candidate = Self { ..*self };
        let mut vw = MAX_TRANSACTION_BYTES / self.data_type.size();
        while vw > 1 {
            candidate.vector_width = vw;
            if candidate.validate(wave).is_ok() {
                return vw;
            }
            vw /= 2;
        }
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config(block_dim: usize, block_k: usize, dtype: DataType, layout: LayoutOrder) -> TileConfig {
        TileConfig {
            block_dim,
            block_k,
            data_type: dtype,
            layout,
            vector_width: 1,
        }
    }

    #[rstest]
    fn wave_must_be_32_or_64(#[values(1, 16, 48, 128)] wave: usize) {
        let c = config(16, 16, DataType::F32, LayoutOrder::ColMajor);
        assert!(matches!(
            c.validate(wave),
            Err(ConfigError::UnsupportedWave(w)) if w == wave
        ));
        assert!(c.validate(32).is_ok());
        assert!(c.validate(64).is_ok());
    }

    #[test]
    fn rejects_uneven_distribution() {
        let mut c = config(16, 6, DataType::F32, LayoutOrder::ColMajor);
        c.vector_width = 2;
        assert!(matches!(
            c.validate(64),
            Err(ConfigError::UnevenDistribution { .. })
        ));
    }

    #[test]
    fn rejects_oversized_transaction() {
        let mut c = config(64, 64, DataType::F64, LayoutOrder::ColMajor);
        c.vector_width = 4;
        assert!(matches!(
            c.validate(64),
            Err(ConfigError::VectorWidthTooLarge { bytes: 32, .. })
        ));
    }

    // 16x16 f16 at wave 64: the byte cap alone would allow 8, but 64
    // lanes * 8 elements would overshoot the 256-element tile.
    #[rstest]
    #[case(config(16, 16, DataType::F16, LayoutOrder::ColMajor), 64, 4)]
    #[case(config(16, 16, DataType::F16, LayoutOrder::ColMajor), 32, 8)]
    #[case(config(64, 64, DataType::F32, LayoutOrder::RowMajor), 64, 4)]
    #[case(config(16, 16, DataType::F64, LayoutOrder::ColMajor), 64, 2)]
    #[case(config(32, 32, DataType::I8, LayoutOrder::ColMajor), 64, 16)]
    fn max_vector_width_cases(
        #[case] config: TileConfig,
        #[case] wave: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(config.max_vector_width(wave), expected);
    }
}
