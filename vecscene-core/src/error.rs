/// Error type shared by the core modules
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,

    #[error("matrix is not invertible")]
    SingularMatrix,

    #[error("triangle index {index} out of range for mesh with {len} triangles")]
    TriangleOutOfRange { index: usize, len: usize },

    #[error("invalid scene config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
