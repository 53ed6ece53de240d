use crate::error::Result;
use crate::math::{Element, Tensor};
use crate::optim::optimizer::Optimizer;

/// A composable unit of a [`Network`](crate::network::Network).
///
/// `forward` caches whatever `backward` needs, so `backward` is only
/// meaningful right after a `forward` on the same instance. Layers are
/// therefore single-writer: share them across threads only through the
/// cache-free `infer`.
pub trait Layer<T: Element>: Send + Sync {
    fn name(&self) -> &'static str;

    fn forward(&mut self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>>;

    /// Maps ∂L/∂output to ∂L/∂input, storing parameter gradients on the way.
    fn backward(&mut self, grad_output: &Tensor<T, 2>) -> Result<Tensor<T, 2>>;

    /// Forward pass that leaves the backward cache untouched.
    fn infer(&self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>>;

    fn update_params(&mut self, _optimizer: &mut dyn Optimizer<T>) {}

    /// Trainable tensors in persistence order. Empty for activations.
    fn parameters(&self) -> Vec<&Tensor<T, 2>> {
        Vec::new()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor<T, 2>> {
        Vec::new()
    }

    fn box_clone(&self) -> Box<dyn Layer<T>>;
}

impl<T: Element> Clone for Box<dyn Layer<T>> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}
