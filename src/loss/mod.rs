pub mod bce;
pub mod loss_fn;
pub mod loss_type;
pub mod mse;

pub use bce::BceLoss;
pub use loss_fn::Loss;
pub use loss_type::LossType;
pub use mse::MseLoss;
