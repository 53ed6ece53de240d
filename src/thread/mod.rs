pub mod executor;
pub mod pool;

pub use executor::ParallelExecutor;
pub use pool::{TaskHandle, ThreadPool};
