//! Sample element types
//!
//! A dataset can hold any primitive numeric element. What matters to the
//! histogram engine is whether the element type is integral (discrete levels,
//! binned so that levels never straddle bins) or continuous.

use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Whether the samples take discrete integer levels or continuous values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    /// Integer-valued samples (bytes, shorts, counts, ...)
    Integral,
    /// Floating-point samples
    Continuous,
}

impl DataKind {
    /// Check if this kind uses the integral binning rule
    pub fn is_integral(self) -> bool {
        matches!(self, DataKind::Integral)
    }
}

/// Element type of a dataset
pub trait Sample: ToPrimitive + Copy + PartialOrd + Debug + Send + Sync {
    /// Kind implied by the element type
    const KIND: DataKind;

    /// Convert to f64 for binning and aggregation
    fn as_f64(self) -> f64;

    /// Check if value is finite (always true for integers)
    fn is_finite(self) -> bool;
}

macro_rules! integral_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                const KIND: DataKind = DataKind::Integral;

                #[inline]
                fn as_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn is_finite(self) -> bool {
                    true
                }
            }
        )*
    };
}

integral_sample!(u8, i8, u16, i16, u32, i32, u64, i64);

impl Sample for f32 {
    const KIND: DataKind = DataKind::Continuous;

    #[inline]
    fn as_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl Sample for f64 {
    const KIND: DataKind = DataKind::Continuous;

    #[inline]
    fn as_f64(self) -> f64 {
        self
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}
