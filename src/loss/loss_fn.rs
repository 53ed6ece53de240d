use crate::error::{Error, Result};
use crate::math::{Element, Tensor};

/// A loss strategy built from one (prediction, target) pair.
///
/// The value is immutable once built; `loss` and `loss_gradient` may be
/// read any number of times.
pub trait Loss<T: Element>: Sized {
    fn new(predicted: &Tensor<T, 2>, expected: &Tensor<T, 2>) -> Result<Self>;

    /// Scalar loss averaged over every element.
    fn loss(&self) -> T;

    /// ∂L/∂predicted, same shape as the prediction.
    fn loss_gradient(&self) -> Tensor<T, 2>;
}

pub(crate) fn check_same_shape<T: Element>(
    predicted: &Tensor<T, 2>,
    expected: &Tensor<T, 2>,
) -> Result<()> {
    if predicted.shape() != expected.shape() {
        return Err(Error::ShapeMismatch {
            expected: predicted.shape().to_vec(),
            got: expected.shape().to_vec(),
        });
    }
    Ok(())
}
