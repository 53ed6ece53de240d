use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::math::{Element, Tensor};

/// Parameter initialization scheme for a Dense layer.
///
/// `fan_in` for He/Xavier is the row count of the tensor, i.e. the number
/// of input features of a `[in, out]` weight matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Init {
    Constant { value: f64 },
    Uniform { low: f64, high: f64 },
    /// N(0, sqrt(2 / fan_in)); suited to ReLU stacks.
    He,
    /// N(0, sqrt(1 / fan_in)); suited to Sigmoid/identity outputs.
    Xavier,
}

impl Init {
    /// Fails with `InvalidConfig` for an empty or non-finite uniform range.
    pub fn validate(&self) -> Result<()> {
        if let Init::Uniform { low, high } = *self {
            check_range(low, high)?;
        }
        Ok(())
    }

    pub fn apply<T: Element, R: Rng + ?Sized>(
        &self,
        tensor: &mut Tensor<T, 2>,
        rng: &mut R,
    ) -> Result<()> {
        match *self {
            Init::Constant { value } => tensor.fill(T::from_f64(value)),
            Init::Uniform { low, high } => uniform(tensor, rng, low, high)?,
            Init::He => normal(tensor, rng, (2.0 / fan_in(tensor)).sqrt()),
            Init::Xavier => normal(tensor, rng, (1.0 / fan_in(tensor)).sqrt()),
        }
        Ok(())
    }
}

/// Returns an initializer closure that fills a tensor with `value`.
pub fn constant<T: Element>(value: T) -> impl FnOnce(&mut Tensor<T, 2>) {
    move |tensor| tensor.fill(value)
}

/// Fills `tensor` with samples drawn uniformly from `[low, high)`.
pub fn uniform<T: Element, R: Rng + ?Sized>(
    tensor: &mut Tensor<T, 2>,
    rng: &mut R,
    low: f64,
    high: f64,
) -> Result<()> {
    check_range(low, high)?;
    for v in tensor.iter_mut() {
        *v = T::from_f64(rng.gen_range(low..high));
    }
    Ok(())
}

fn check_range(low: f64, high: f64) -> Result<()> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(Error::InvalidConfig(format!(
            "uniform range [{low}, {high}) is empty or not finite"
        )));
    }
    Ok(())
}

fn normal<T: Element, R: Rng + ?Sized>(tensor: &mut Tensor<T, 2>, rng: &mut R, std_dev: f64) {
    for v in tensor.iter_mut() {
        *v = T::from_f64(sample_standard_normal(rng) * std_dev);
    }
}

fn fan_in<T: Element>(tensor: &Tensor<T, 2>) -> f64 {
    tensor.rows().max(1) as f64
}

/// Box-Muller transform. Both uniforms are drawn from (0, 1] to avoid log(0).
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}
