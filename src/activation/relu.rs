use crate::error::{Error, Result};
use crate::layers::layer::Layer;
use crate::math::{Element, Tensor};

/// Rectified linear unit. The derivative at exactly zero is taken as 0.
#[derive(Debug, Clone, Default)]
pub struct ReLU<T: Element> {
    input: Option<Tensor<T, 2>>,
}

impl<T: Element> ReLU<T> {
    pub fn new() -> ReLU<T> {
        ReLU { input: None }
    }
}

impl<T: Element> Layer<T> for ReLU<T> {
    fn name(&self) -> &'static str {
        "relu"
    }

    fn forward(&mut self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let out = self.infer(input)?;
        self.input = Some(input.clone());
        Ok(out)
    }

    fn backward(&mut self, grad_output: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let input = self
            .input
            .as_ref()
            .ok_or(Error::BackwardBeforeForward { layer: "relu" })?;
        input.zip_map(grad_output, |x, g| if x > T::zero() { g } else { T::zero() })
    }

    fn infer(&self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        Ok(input.map(|x| if x > T::zero() { x } else { T::zero() }))
    }

    fn box_clone(&self) -> Box<dyn Layer<T>> {
        Box::new(self.clone())
    }
}
