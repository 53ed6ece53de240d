// Loss strategies and optimizer update rules.

use approx::assert_relative_eq;
use paddle_nn::{
    Adam, BceLoss, Loss, MseLoss, Optimizer, OptimizerState, OptimizerType, Sgd, Tensor,
};

fn row(data: &[f64]) -> Tensor<f64, 2> {
    Tensor::from_vec([1, data.len()], data.to_vec()).unwrap()
}

// ============================================================================
// Losses
// ============================================================================

#[test]
fn mse_is_zero_for_identical_tensors() {
    let t = Tensor::from_vec([2, 2], vec![0.3, -1.0, 4.0, 2.5]).unwrap();
    let loss = MseLoss::new(&t, &t).unwrap();
    assert_eq!(loss.loss(), 0.0);
    assert!(loss.loss_gradient().iter().all(|&g| g == 0.0));
}

#[test]
fn mse_value_and_gradient() {
    let p = row(&[1.0, 2.0, 3.0, 4.0]);
    let y = row(&[0.0, 2.0, 5.0, 4.0]);
    let loss = MseLoss::new(&p, &y).unwrap();
    assert_relative_eq!(loss.loss(), (1.0 + 4.0) / 4.0);
    assert_eq!(loss.loss_gradient().as_slice(), &[0.5, 0.0, -1.0, 0.0]);
}

#[test]
fn mse_rejects_mismatched_shapes() {
    let p = Tensor::<f64, 2>::zeros([2, 1]);
    let y = Tensor::<f64, 2>::zeros([1, 2]);
    assert!(MseLoss::new(&p, &y).is_err());
}

#[test]
fn bce_stays_finite_at_saturated_predictions() {
    let p = row(&[0.0, 1.0, 0.0, 1.0]);
    let y = row(&[1.0, 0.0, 0.0, 1.0]);
    let loss = BceLoss::new(&p, &y).unwrap();
    assert!(loss.loss().is_finite());
    assert!(loss.loss_gradient().iter().all(|g| g.is_finite()));

    let p32 = Tensor::<f32, 2>::from_vec([1, 2], vec![0.0, 1.0]).unwrap();
    let y32 = Tensor::<f32, 2>::from_vec([1, 2], vec![1.0, 0.0]).unwrap();
    let loss32 = BceLoss::new(&p32, &y32).unwrap();
    assert!(loss32.loss().is_finite());
    assert!(loss32.loss_gradient().iter().all(|g| g.is_finite()));
}

#[test]
fn bce_matches_closed_form() {
    let p = row(&[0.8, 0.3]);
    let y = row(&[1.0, 0.0]);
    let loss = BceLoss::new(&p, &y).unwrap();
    let expected = -((0.8f64).ln() + (0.7f64).ln()) / 2.0;
    assert_relative_eq!(loss.loss(), expected, max_relative = 1e-12);

    let grad = loss.loss_gradient();
    assert_relative_eq!(grad[[0, 0]], (0.8 - 1.0) / (0.8 * 0.2 * 2.0), max_relative = 1e-12);
    assert_relative_eq!(grad[[0, 1]], 0.3 / (0.3 * 0.7 * 2.0), max_relative = 1e-12);
}

// ============================================================================
// Optimizers
// ============================================================================

#[test]
fn sgd_subtracts_scaled_gradient() {
    let mut sgd = Sgd::new(0.1);
    let mut p = row(&[1.0, -2.0, 0.5]);
    sgd.update(&mut p, &row(&[10.0, -10.0, 0.0]));
    assert_relative_eq!(p[[0, 0]], 0.0);
    assert_relative_eq!(p[[0, 1]], -1.0);
    assert_relative_eq!(p[[0, 2]], 0.5);
}

#[test]
fn adam_first_step_moves_by_learning_rate() {
    // With bias correction the first step is lr · g / (|g| + ε).
    let mut adam = Adam::new(0.01);
    let mut p = row(&[1.0, 1.0]);
    adam.update(&mut p, &row(&[3.0, -0.5]));
    assert_relative_eq!(p[[0, 0]], 0.99, max_relative = 1e-6);
    assert_relative_eq!(p[[0, 1]], 1.01, max_relative = 1e-6);
}

#[test]
fn per_parameter_adam_keeps_tensors_independent() {
    let mut per_param = OptimizerType::adam().build::<f64>(0.01, OptimizerState::PerParameter);
    let mut shared = OptimizerType::adam().build::<f64>(0.01, OptimizerState::Shared);

    let grad_a = row(&[1.0, 1.0]);
    let grad_b = row(&[-1.0, -1.0]);
    let (mut a1, mut b1) = (row(&[0.0, 0.0]), row(&[0.0, 0.0]));
    let (mut a2, mut b2) = (row(&[0.0, 0.0]), row(&[0.0, 0.0]));

    for _ in 0..2 {
        per_param.update(&mut a1, &grad_a);
        per_param.update(&mut b1, &grad_b);
        per_param.step();
        shared.update(&mut a2, &grad_a);
        shared.update(&mut b2, &grad_b);
        shared.step();
    }

    // Independent state: opposite gradients give mirrored trajectories.
    assert_relative_eq!(a1[[0, 0]], -b1[[0, 0]], max_relative = 1e-12);
    // Shared moments mix both tensors' gradients, breaking the symmetry.
    assert!((a2[[0, 0]] + b2[[0, 0]]).abs() > 1e-6);
}

#[test]
fn optimizer_type_reads_from_json_with_defaults() {
    let opt: OptimizerType = serde_json::from_str(r#"{"kind":"adam","beta1":0.8}"#).unwrap();
    assert_eq!(
        opt,
        OptimizerType::Adam {
            beta1: 0.8,
            beta2: 0.999,
            epsilon: 1e-8
        }
    );
    let sgd: OptimizerType = serde_json::from_str(r#"{"kind":"sgd"}"#).unwrap();
    assert_eq!(sgd, OptimizerType::Sgd);
}
