/// All errors that can occur within paddle-nn.
///
/// Structural violations (wrong extent counts, incompatible shapes, lossy
/// reshape overflow) are reported here and never retried or swallowed
/// inside the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A tensor was constructed or reshaped with the wrong number of extents.
    #[error("dimension mismatch: expected {expected} extents, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Bulk assignment length does not match the tensor's element count.
    #[error("element count mismatch: tensor holds {expected} elements, got {got}")]
    ElementCount { expected: usize, got: usize },

    /// Matrix product with incompatible inner extents.
    #[error("matmul shape mismatch: [{m}x{k1}] @ [{k2}x{n}], inner extents must match")]
    MatmulShape {
        m: usize,
        k1: usize,
        k2: usize,
        n: usize,
    },

    /// Two tensors that must agree in shape do not.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },

    /// Reshape requested more elements than the tensor currently stores.
    #[error("cannot reshape to {requested} elements: only {available} stored")]
    ReshapeExceedsStorage { requested: usize, available: usize },

    /// Transpose on a tensor of rank below 2.
    #[error("transpose requires rank >= 2, got rank {rank}")]
    RankTooLow { rank: usize },

    /// `backward` was called on a layer that has no cached forward pass.
    #[error("{layer}: backward called before forward")]
    BackwardBeforeForward { layer: &'static str },

    /// Training inputs are unusable (empty, mismatched rows, zero batch).
    #[error("invalid training input: {0}")]
    InvalidTraining(String),

    /// A network or session description is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A model file does not match the in-memory architecture.
    #[error("model format error at layer {layer}: expected {expected} values, got {got}")]
    ModelFormat {
        layer: usize,
        expected: usize,
        got: usize,
    },

    /// A model file contains a token that is not a number.
    #[error("cannot parse {token:?} as a number at layer {layer}")]
    ParseValue { layer: usize, token: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A pooled task was dropped before producing a result.
    #[error("worker task failed before producing a result")]
    TaskFailed,
}

pub type Result<T> = std::result::Result<T, Error>;
