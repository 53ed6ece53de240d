pub mod dense;
pub mod init;
pub mod layer;

pub use dense::Dense;
pub use init::Init;
pub use layer::Layer;
