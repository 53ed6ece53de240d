use crate::math::{Element, Tensor};

/// Mutates a parameter tensor in place from its gradient.
///
/// `step` marks the end of one batch's round of updates; stateless
/// optimizers ignore it.
pub trait Optimizer<T: Element>: Send {
    fn update(&mut self, param: &mut Tensor<T, 2>, grad: &Tensor<T, 2>);

    fn step(&mut self) {}
}

/// Optimizers that can be built from a learning rate alone, used by
/// [`Network::train`](crate::network::Network::train).
pub trait FromLearningRate<T> {
    fn with_learning_rate(learning_rate: T) -> Self;
}
