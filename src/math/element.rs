use std::fmt;
use std::str::FromStr;

use num_traits::Float;

/// Floating-point types a [`Tensor`](crate::math::tensor::Tensor) can hold.
///
/// Implemented for `f32` and `f64`. `from_f64` is used for literal constants
/// (learning rates, clamp bounds) so generic code never has to unwrap a
/// `NumCast` conversion.
pub trait Element:
    Float + Default + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
    fn from_f64(v: f64) -> Self;
    fn as_f64(self) -> f64;
}

impl Element for f32 {
    fn from_f64(v: f64) -> Self {
        v as f32
    }

    fn as_f64(self) -> f64 {
        self as f64
    }
}

impl Element for f64 {
    fn from_f64(v: f64) -> Self {
        v
    }

    fn as_f64(self) -> f64 {
        self
    }
}
