pub mod relu;
pub mod sigmoid;

pub use relu::ReLU;
pub use sigmoid::Sigmoid;
