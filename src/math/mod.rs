pub mod element;
pub mod tensor;

pub use element::Element;
pub use tensor::{matrix_product, transpose_2d, Tensor};
