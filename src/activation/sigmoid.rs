use crate::error::{Error, Result};
use crate::layers::layer::Layer;
use crate::math::{Element, Tensor};

/// Logistic activation `1 / (1 + e^-x)`.
///
/// Caches the forward *output*, so the derivative is `out · (1 - out)`.
#[derive(Debug, Clone, Default)]
pub struct Sigmoid<T: Element> {
    output: Option<Tensor<T, 2>>,
}

impl<T: Element> Sigmoid<T> {
    pub fn new() -> Sigmoid<T> {
        Sigmoid { output: None }
    }
}

impl<T: Element> Layer<T> for Sigmoid<T> {
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn forward(&mut self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let out = self.infer(input)?;
        self.output = Some(out.clone());
        Ok(out)
    }

    fn backward(&mut self, grad_output: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let output = self
            .output
            .as_ref()
            .ok_or(Error::BackwardBeforeForward { layer: "sigmoid" })?;
        output.zip_map(grad_output, |s, g| s * (T::one() - s) * g)
    }

    fn infer(&self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        Ok(input.map(|x| T::one() / (T::one() + (-x).exp())))
    }

    fn box_clone(&self) -> Box<dyn Layer<T>> {
        Box::new(self.clone())
    }
}
