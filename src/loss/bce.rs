use crate::error::Result;
use crate::loss::loss_fn::{check_same_shape, Loss};
use crate::math::{Element, Tensor};

const EPS: f64 = 1e-12;

/// Binary cross-entropy. Predictions are clamped to `[ε, 1-ε]` before use.
///
/// The upper bound is widened to the type's machine epsilon when `1 - 1e-12`
/// would round to exactly 1 (as it does for `f32`).
#[derive(Debug, Clone)]
pub struct BceLoss<T: Element> {
    predicted: Tensor<T, 2>,
    expected: Tensor<T, 2>,
}

impl<T: Element> BceLoss<T> {
    fn clamped(p: T) -> T {
        let low = T::from_f64(EPS);
        let high = T::one() - low.max(T::epsilon());
        p.max(low).min(high)
    }
}

impl<T: Element> Loss<T> for BceLoss<T> {
    fn new(predicted: &Tensor<T, 2>, expected: &Tensor<T, 2>) -> Result<Self> {
        check_same_shape(predicted, expected)?;
        Ok(BceLoss {
            predicted: predicted.clone(),
            expected: expected.clone(),
        })
    }

    /// -mean(y·ln(p) + (1-y)·ln(1-p))
    fn loss(&self) -> T {
        let n = T::from_f64(self.predicted.size() as f64);
        self.predicted
            .iter()
            .zip(self.expected.iter())
            .map(|(&p, &y)| {
                let p = Self::clamped(p);
                -(y * p.ln() + (T::one() - y) * (T::one() - p).ln())
            })
            .fold(T::zero(), |acc, v| acc + v)
            / n
    }

    /// (p - y) / (p · (1 - p) · N)
    fn loss_gradient(&self) -> Tensor<T, 2> {
        let n = T::from_f64(self.predicted.size() as f64);
        let mut grad = self.predicted.clone();
        for (g, &y) in grad.iter_mut().zip(self.expected.iter()) {
            let p = Self::clamped(*g);
            *g = (p - y) / (p * (T::one() - p) * n);
        }
        grad
    }
}
