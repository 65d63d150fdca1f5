use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvoError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dimension mismatch in {op}: {left:?} vs {right:?}")]
    DimensionMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("Genome too short: {required} bits required, {actual} available")]
    InsufficientGenomeLength { required: usize, actual: usize },

    #[error("Index {index:?} out of range for shape {len:?}")]
    OutOfRange { index: (usize, usize), len: (usize, usize) },

    #[error("Invalid gene {found:?} at position {position}")]
    InvalidGene { position: usize, found: char },

    #[error("Backpropagation requires a feedforward pass on the current parameters")]
    NoForwardPass,
}

pub type Result<T> = std::result::Result<T, EvoError>;
