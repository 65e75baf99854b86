use thiserror::Error;

use crate::store::{StoreError, ValidationErrors};
use crate::value::Row;

/// Fatal errors emitted by the seeding engine.
///
/// A dependency without data is not represented here; it is an expected
/// transient state handled by the sweep loop, not an error.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("invalid seed plan: {0}")]
    InvalidPlan(String),
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error(
        "store rejected a row for model '{model}': {detail} (row: {attempted})",
        detail = detail_json(.errors),
        attempted = detail_json(.row)
    )]
    Rejected {
        model: String,
        row: Row,
        errors: ValidationErrors,
    },
    #[error("seeding stalled after {sweeps} sweeps; pending models: {pending:?}")]
    Stalled { sweeps: u32, pending: Vec<String> },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Core(#[from] seedfill_core::Error),
}

fn detail_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unserializable>".to_string())
}
