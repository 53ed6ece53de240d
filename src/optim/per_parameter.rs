use crate::math::{Element, Tensor};
use crate::optim::optimizer::Optimizer;

/// Gives every parameter tensor its own optimizer instance.
///
/// Instances are keyed by call position within a batch: the n-th `update`
/// after a `step` always goes to the n-th instance, so the network must
/// update its parameters in the same order every batch (layers do).
pub struct PerParameter<O, F> {
    factory: F,
    slots: Vec<O>,
    cursor: usize,
}

impl<O, F> PerParameter<O, F>
where
    F: Fn() -> O,
{
    pub fn new(factory: F) -> PerParameter<O, F> {
        PerParameter {
            factory,
            slots: Vec::new(),
            cursor: 0,
        }
    }

    pub fn slots(&self) -> &[O] {
        &self.slots
    }
}

impl<T, O, F> Optimizer<T> for PerParameter<O, F>
where
    T: Element,
    O: Optimizer<T>,
    F: Fn() -> O + Send,
{
    fn update(&mut self, param: &mut Tensor<T, 2>, grad: &Tensor<T, 2>) {
        if self.cursor == self.slots.len() {
            self.slots.push((self.factory)());
        }
        self.slots[self.cursor].update(param, grad);
        self.cursor += 1;
    }

    fn step(&mut self) {
        self.slots.iter_mut().for_each(|slot| slot.step());
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optim::adam::Adam;

    #[test]
    fn one_instance_per_tensor_across_batches() {
        let mut opt = PerParameter::new(|| Adam::<f64>::new(0.01));
        let mut w = Tensor::<f64, 2>::zeros([3, 2]);
        let mut b = Tensor::<f64, 2>::zeros([1, 2]);
        for _ in 0..3 {
            opt.update(&mut w, &Tensor::full([3, 2], 1.0));
            opt.update(&mut b, &Tensor::full([1, 2], 1.0));
            Optimizer::<f64>::step(&mut opt);
        }
        assert_eq!(opt.slots().len(), 2);
        assert_eq!(opt.slots()[0].moments().0.len(), 6);
        assert_eq!(opt.slots()[1].moments().0.len(), 2);
        assert!(opt.slots().iter().all(|a| a.timestep() == 3));
    }
}
