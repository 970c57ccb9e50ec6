use crate::language::errors::DescriptorError;
use crate::runtime::value::Failure;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Unknown symbol `{name}`")]
    UnknownSymbol { name: String },
    #[error("Symbol `{name}` is already registered with signature {signature}")]
    DuplicateSymbol { name: String, signature: String },
    #[error("Type mismatch: {message}")]
    TypeMismatch { message: String },
    #[error("Handle `{name}` expected {expected} arguments but received {received}")]
    ArityMismatch {
        name: String,
        expected: usize,
        received: usize,
    },
    #[error("Null reference: {message}")]
    NullReference { message: String },
    #[error("Spread array has {actual} elements but {expected} are required")]
    SpreadLength { expected: usize, actual: usize },
    #[error("{failure}")]
    Thrown { failure: Failure },
    #[error("Operation not supported: {message}")]
    Unsupported { message: String },
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),
}

impl RuntimeError {
    pub fn thrown(kind: impl Into<String>, message: impl Into<String>) -> Self {
        RuntimeError::Thrown {
            failure: Failure::new(kind, message),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::UnknownSymbol { .. } => "unknown_symbol",
            RuntimeError::DuplicateSymbol { .. } => "duplicate_symbol",
            RuntimeError::TypeMismatch { .. } => "type_mismatch",
            RuntimeError::ArityMismatch { .. } => "arity_mismatch",
            RuntimeError::NullReference { .. } => "null_reference",
            RuntimeError::SpreadLength { .. } => "spread_length",
            RuntimeError::Thrown { .. } => "thrown",
            RuntimeError::Unsupported { .. } => "unsupported",
            RuntimeError::InvalidDescriptor(_) => "invalid_descriptor",
        }
    }

    /// The throwable a `try_finally` cleanup observes for this error.
    pub fn to_failure(&self) -> Failure {
        match self {
            RuntimeError::Thrown { failure } => failure.clone(),
            other => Failure::new(other.code(), other.to_string()),
        }
    }
}
