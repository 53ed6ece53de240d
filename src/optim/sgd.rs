use crate::math::{Element, Tensor};
use crate::optim::optimizer::{FromLearningRate, Optimizer};

/// Plain gradient descent: `param -= lr · grad`.
#[derive(Debug, Clone, Copy)]
pub struct Sgd<T: Element> {
    pub learning_rate: T,
}

impl<T: Element> Sgd<T> {
    pub fn new(learning_rate: T) -> Sgd<T> {
        Sgd { learning_rate }
    }
}

impl<T: Element> Optimizer<T> for Sgd<T> {
    fn update(&mut self, param: &mut Tensor<T, 2>, grad: &Tensor<T, 2>) {
        debug_assert_eq!(param.size(), grad.size(), "sgd: parameter/gradient size mismatch");
        for (p, &g) in param.iter_mut().zip(grad.iter()) {
            *p = *p - self.learning_rate * g;
        }
    }
}

impl<T: Element> FromLearningRate<T> for Sgd<T> {
    fn with_learning_rate(learning_rate: T) -> Self {
        Sgd::new(learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_is_exact() {
        let mut p = Tensor::from_vec([1, 3], vec![1.0f64, -2.0, 0.5]).unwrap();
        let g = Tensor::from_vec([1, 3], vec![0.25f64, 4.0, -1.0]).unwrap();
        Sgd::new(0.1).update(&mut p, &g);
        assert_eq!(p.as_slice(), &[1.0 - 0.1 * 0.25, -2.0 - 0.1 * 4.0, 0.5 + 0.1]);
    }
}
