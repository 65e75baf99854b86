use thiserror::Error;

/// Core error type shared across seedfill crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A model descriptor violates internal invariants.
    #[error("invalid model spec: {0}")]
    InvalidSpec(String),
    /// A model name was registered twice.
    #[error("duplicate model '{0}'")]
    DuplicateModel(String),
    /// A referenced model is not present in the registry.
    #[error("unknown model '{0}'")]
    UnknownModel(String),
}

/// Convenience alias for results returned by seedfill crates.
pub type Result<T> = std::result::Result<T, Error>;
