use rand::Rng;

use crate::error::{Error, Result};
use crate::layers::init::{self, Init};
use crate::layers::layer::Layer;
use crate::math::{matrix_product, transpose_2d, Element, Tensor};
use crate::optim::optimizer::Optimizer;

/// Fully connected layer: `output = input · W + b`.
///
/// Weights are `[in_features, out_features]`, the bias is a `[1, out_features]`
/// row broadcast over every batch row. The batch is the first axis of the input.
#[derive(Debug, Clone)]
pub struct Dense<T: Element> {
    weights: Tensor<T, 2>,
    biases: Tensor<T, 2>,
    weights_grad: Tensor<T, 2>,
    biases_grad: Tensor<T, 2>,
    input: Option<Tensor<T, 2>>, // input of the last forward, needed for dW
}

impl<T: Element> Dense<T> {
    /// Weights filled with 0.1, biases with 0.
    pub fn new(in_features: usize, out_features: usize) -> Dense<T> {
        Dense::with_init(
            in_features,
            out_features,
            init::constant(T::from_f64(0.1)),
            init::constant(T::zero()),
        )
    }

    /// Builds the layer and runs the two initializers on the fresh weight
    /// and bias tensors.
    pub fn with_init<W, B>(
        in_features: usize,
        out_features: usize,
        weight_init: W,
        bias_init: B,
    ) -> Dense<T>
    where
        W: FnOnce(&mut Tensor<T, 2>),
        B: FnOnce(&mut Tensor<T, 2>),
    {
        let mut weights = Tensor::zeros([in_features, out_features]);
        let mut biases = Tensor::zeros([1, out_features]);
        weight_init(&mut weights);
        bias_init(&mut biases);

        Dense {
            weights,
            biases,
            weights_grad: Tensor::zeros([in_features, out_features]),
            biases_grad: Tensor::zeros([1, out_features]),
            input: None,
        }
    }

    /// Builds the layer from two [`Init`] schemes drawing from `rng`.
    ///
    /// Fails with `InvalidConfig` if either scheme is unusable.
    pub fn initialized<R: Rng + ?Sized>(
        in_features: usize,
        out_features: usize,
        weight_init: &Init,
        bias_init: &Init,
        rng: &mut R,
    ) -> Result<Dense<T>> {
        let mut layer = Dense::with_init(in_features, out_features, |_| {}, |_| {});
        weight_init.apply(&mut layer.weights, rng)?;
        bias_init.apply(&mut layer.biases, rng)?;
        Ok(layer)
    }

    pub fn in_features(&self) -> usize {
        self.weights.rows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.cols()
    }

    pub fn weights(&self) -> &Tensor<T, 2> {
        &self.weights
    }

    pub fn biases(&self) -> &Tensor<T, 2> {
        &self.biases
    }

    pub fn weights_grad(&self) -> &Tensor<T, 2> {
        &self.weights_grad
    }

    pub fn biases_grad(&self) -> &Tensor<T, 2> {
        &self.biases_grad
    }
}

impl<T: Element> Layer<T> for Dense<T> {
    fn name(&self) -> &'static str {
        "dense"
    }

    fn forward(&mut self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let z = self.infer(input)?;
        self.input = Some(input.clone());
        Ok(z)
    }

    fn backward(&mut self, grad_output: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let input = self
            .input
            .as_ref()
            .ok_or(Error::BackwardBeforeForward { layer: "dense" })?;

        self.weights_grad = matrix_product(&transpose_2d(input)?, grad_output)?;

        // Column sums over the batch axis.
        self.biases_grad.fill(T::zero());
        let cols = grad_output.cols();
        for (i, &g) in grad_output.iter().enumerate() {
            let j = i % cols;
            self.biases_grad[[0, j]] = self.biases_grad[[0, j]] + g;
        }

        matrix_product(grad_output, &transpose_2d(&self.weights)?)
    }

    fn infer(&self, input: &Tensor<T, 2>) -> Result<Tensor<T, 2>> {
        let mut z = matrix_product(input, &self.weights)?;
        let bias = self.biases.as_slice();
        for row in z.as_mut_slice().chunks_mut(bias.len().max(1)) {
            for (v, &b) in row.iter_mut().zip(bias) {
                *v = *v + b;
            }
        }
        Ok(z)
    }

    fn update_params(&mut self, optimizer: &mut dyn Optimizer<T>) {
        optimizer.update(&mut self.weights, &self.weights_grad);
        optimizer.update(&mut self.biases, &self.biases_grad);
    }

    fn parameters(&self) -> Vec<&Tensor<T, 2>> {
        vec![&self.weights, &self.biases]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor<T, 2>> {
        vec![&mut self.weights, &mut self.biases]
    }

    fn box_clone(&self) -> Box<dyn Layer<T>> {
        Box::new(self.clone())
    }
}
