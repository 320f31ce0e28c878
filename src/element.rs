//! Element types storable in matrix fragments.

use crate::config::DataType;
use bytemuck::Pod;
use half::{bf16, f16};
use std::fmt::Debug;

/// Numeric type that can live in a fragment register.
///
/// `PACK_RATIO` is the number of elements that share one 32-bit register
/// slot: 2 for 16-bit types, 4 for 8-bit types, 1 for everything wider.
/// The `f64`/`f32` conversions exist for the accumulate path and for
/// reference computations in tests; accumulation always happens in `f64`
/// and is rounded into the target type exactly once.
pub trait Element: Pod + PartialEq + Debug + Send + Sync + 'static {
    const PACK_RATIO: usize;
    const DATA_TYPE: DataType;

    fn to_f64(self) -> f64;
    fn from_f64(value: f64) -> Self;
}

macro_rules! element {
    ($ty:ty, $dtype:expr, |$to:ident| $to_expr:expr, |$from:ident| $from_expr:expr) => {
        impl Element for $ty {
            const PACK_RATIO: usize = {
                let size = size_of::<$ty>();
                if size < 4 {
                    4 / size
                } else {
                    1
                }
            };
            const DATA_TYPE: DataType = $dtype;

            fn to_f64(self) -> f64 {
                let $to = self;
                $to_expr
            }

            fn from_f64($from: f64) -> Self {
                $from_expr
            }
        }
    };
}

element!(f16, DataType::F16, |x| x.to_f64(), |v| f16::from_f64(v));
element!(bf16, DataType::Bf16, |x| x.to_f64(), |v| bf16::from_f64(v));
element!(f32, DataType::F32, |x| x as f64, |v| v as f32);
element!(f64, DataType::F64, |x| x, |v| v);
element!(i8, DataType::I8, |x| x as f64, |v| v as i8);
element!(u8, DataType::U8, |x| x as f64, |v| v as u8);
element!(i32, DataType::I32, |x| x as f64, |v| v as i32);
element!(u32, DataType::U32, |x| x as f64, |v| v as u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_ratios() {
        assert_eq!(f16::PACK_RATIO, 2);
        assert_eq!(bf16::PACK_RATIO, 2);
        assert_eq!(f32::PACK_RATIO, 1);
        assert_eq!(f64::PACK_RATIO, 1);
        assert_eq!(i8::PACK_RATIO, 4);
        assert_eq!(u32::PACK_RATIO, 1);
    }

    #[test]
    fn element_sizes_match_data_type() {
        assert_eq!(size_of::<f16>(), f16::DATA_TYPE.size());
        assert_eq!(size_of::<bf16>(), bf16::DATA_TYPE.size());
        assert_eq!(size_of::<f32>(), f32::DATA_TYPE.size());
        assert_eq!(size_of::<f64>(), f64::DATA_TYPE.size());
        assert_eq!(size_of::<i8>(), i8::DATA_TYPE.size());
    }

    #[test]
    fn f16_round_trips_small_integers() {
        for i in -64..=64 {
            let x = f16::from_f64(i as f64);
            assert_eq!(x.to_f64(), i as f64);
        }
    }
}
