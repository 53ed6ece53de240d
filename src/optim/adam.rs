use crate::math::{Element, Tensor};
use crate::optim::optimizer::{FromLearningRate, Optimizer};

/// Adam with bias-corrected first and second moments.
///
/// The moment buffers are sized on the first `update` to that tensor's
/// element count and reused for every later call, and `t` advances once per
/// call. One instance therefore tracks exactly one parameter tensor; wrap it
/// in [`PerParameter`](crate::optim::PerParameter) to drive a whole network.
/// A later tensor larger than the buffers extends them with zeros.
#[derive(Debug, Clone)]
pub struct Adam<T: Element> {
    pub learning_rate: T,
    pub beta1: T,
    pub beta2: T,
    pub epsilon: T,
    m: Vec<T>,
    v: Vec<T>,
    t: i32,
}

impl<T: Element> Adam<T> {
    pub fn new(learning_rate: T) -> Adam<T> {
        Adam::with_hyperparams(
            learning_rate,
            T::from_f64(0.9),
            T::from_f64(0.999),
            T::from_f64(1e-8),
        )
    }

    pub fn with_hyperparams(learning_rate: T, beta1: T, beta2: T, epsilon: T) -> Adam<T> {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    /// Number of `update` calls so far.
    pub fn timestep(&self) -> i32 {
        self.t
    }

    pub fn moments(&self) -> (&[T], &[T]) {
        (&self.m, &self.v)
    }
}

impl<T: Element> Default for Adam<T> {
    fn default() -> Self {
        Adam::new(T::from_f64(0.001))
    }
}

impl<T: Element> Optimizer<T> for Adam<T> {
    fn update(&mut self, param: &mut Tensor<T, 2>, grad: &Tensor<T, 2>) {
        debug_assert_eq!(param.size(), grad.size(), "adam: parameter/gradient size mismatch");
        let n = param.size();
        if self.m.len() < n {
            self.m.resize(n, T::zero());
            self.v.resize(n, T::zero());
        }

        self.t += 1;
        let one = T::one();
        let correction1 = one - self.beta1.powi(self.t);
        let correction2 = one - self.beta2.powi(self.t);

        let moments = self.m.iter_mut().zip(self.v.iter_mut());
        for ((p, &g), (m, v)) in param.iter_mut().zip(grad.iter()).zip(moments) {
            *m = self.beta1 * *m + (one - self.beta1) * g;
            *v = self.beta2 * *v + (one - self.beta2) * g * g;

            let m_hat = *m / correction1;
            let v_hat = *v / correction2;

            *p = *p - self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }
}

impl<T: Element> FromLearningRate<T> for Adam<T> {
    fn with_learning_rate(learning_rate: T) -> Self {
        Adam::new(learning_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_matches_closed_form() {
        let (lr, b1, b2, eps) = (0.01f64, 0.9, 0.999, 1e-8);
        let mut adam = Adam::with_hyperparams(lr, b1, b2, eps);
        let mut p = Tensor::from_vec([1, 3], vec![1.0, 2.0, 3.0]).unwrap();
        let g = Tensor::from_vec([1, 3], vec![0.5, -0.2, 0.0]).unwrap();
        adam.update(&mut p, &g);

        for (i, (&start, &gi)) in [1.0, 2.0, 3.0].iter().zip(g.iter()).enumerate() {
            let m = (1.0 - b1) * gi;
            let v = (1.0 - b2) * gi * gi;
            let m_hat = m / (1.0 - b1);
            let v_hat = v / (1.0 - b2);
            let expected = start - lr * m_hat / (v_hat.sqrt() + eps);
            assert_eq!(p[[0, i]], expected);
        }
        assert_eq!(adam.timestep(), 1);
    }

    #[test]
    fn moments_are_sized_by_the_first_tensor() {
        let mut adam = Adam::<f32>::default();
        let mut w = Tensor::zeros([3, 2]);
        let mut b = Tensor::zeros([1, 2]);
        adam.update(&mut w, &Tensor::full([3, 2], 1.0));
        adam.update(&mut b, &Tensor::full([1, 2], 1.0));
        assert_eq!(adam.moments().0.len(), 6);
        assert_eq!(adam.timestep(), 2);
    }
}
