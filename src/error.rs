//! Error types for ledger operations.

/// All errors that can occur during ledger operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Edit or delete referencing a position outside the observation store.
    #[error("invalid index {index}: store holds {len} observations")]
    InvalidIndex { index: usize, len: usize },

    /// Unparseable or ill-typed field on an input or imported document.
    #[error("invalid field: {0}")]
    InvalidField(String),

    /// Out-of-domain value passed to a configuration operation.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Imported document lacking a required top-level field.
    #[error("missing required key: {0}")]
    MissingKey(&'static str),

    /// I/O failure while saving or loading the persisted document.
    #[error("persistence error: {0}")]
    Persistence(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
