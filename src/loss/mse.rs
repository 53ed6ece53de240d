use crate::error::Result;
use crate::loss::loss_fn::{check_same_shape, Loss};
use crate::math::{Element, Tensor};

/// Mean squared error over all N elements of the batch.
#[derive(Debug, Clone)]
pub struct MseLoss<T: Element> {
    predicted: Tensor<T, 2>,
    expected: Tensor<T, 2>,
}

impl<T: Element> Loss<T> for MseLoss<T> {
    fn new(predicted: &Tensor<T, 2>, expected: &Tensor<T, 2>) -> Result<Self> {
        check_same_shape(predicted, expected)?;
        Ok(MseLoss {
            predicted: predicted.clone(),
            expected: expected.clone(),
        })
    }

    /// mean((predicted - expected)²)
    fn loss(&self) -> T {
        let n = T::from_f64(self.predicted.size() as f64);
        self.predicted
            .iter()
            .zip(self.expected.iter())
            .map(|(&p, &y)| (p - y) * (p - y))
            .fold(T::zero(), |acc, v| acc + v)
            / n
    }

    /// (2 / N) · (predicted - expected)
    fn loss_gradient(&self) -> Tensor<T, 2> {
        let scale = T::from_f64(2.0) / T::from_f64(self.predicted.size() as f64);
        let mut grad = self.predicted.clone();
        for (g, &y) in grad.iter_mut().zip(self.expected.iter()) {
            *g = scale * (*g - y);
        }
        grad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_over_every_element() {
        let p = Tensor::from_vec([2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let y = Tensor::from_vec([2, 2], vec![0.0, 2.0, 3.0, 2.0]).unwrap();
        let mse = MseLoss::<f64>::new(&p, &y).unwrap();
        assert_eq!(mse.loss(), 5.0 / 4.0);
        assert_eq!(mse.loss_gradient().as_slice(), &[0.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let p = Tensor::<f32, 2>::zeros([2, 1]);
        let y = Tensor::<f32, 2>::zeros([1, 2]);
        assert!(MseLoss::new(&p, &y).is_err());
    }
}
