use std::collections::BTreeMap;

use thiserror::Error;

use seedfill_core::ModelSpec;

use crate::value::{Row, Value};

/// Structured validation detail: field name to rejection messages.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Errors surfaced by a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown model '{0}'")]
    UnknownModel(String),
    #[error("validation rejected the row: {errors:?}")]
    Rejected { errors: ValidationErrors },
}

/// Capability boundary to the persistence layer.
///
/// The engine only ever needs three things from a backend: how many records a
/// model currently holds, the primary-key values of those records, and a way
/// to persist one new row (which assigns and returns the primary key).
pub trait DataStore {
    fn count(&self, model: &str) -> Result<u64, StoreError>;
    fn primary_keys(&self, model: &str) -> Result<Vec<Value>, StoreError>;
    fn insert(&mut self, model: &str, row: Row) -> Result<Value, StoreError>;
}

#[derive(Debug)]
struct StoredModel {
    spec: ModelSpec,
    next_key: i64,
    rows: Vec<(Value, Row)>,
}

/// In-memory store for tests and demos.
///
/// Assigns sequential integer primary keys and rejects rows missing a
/// non-nullable field, standing in for the validators a real backend runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    models: BTreeMap<String, StoredModel>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a model available, starting with no records.
    pub fn register(&mut self, spec: ModelSpec) {
        self.models.entry(spec.name.clone()).or_insert(StoredModel {
            spec,
            next_key: 0,
            rows: Vec::new(),
        });
    }

    /// Records currently held for a model, with their assigned keys.
    pub fn records(&self, model: &str) -> Option<&[(Value, Row)]> {
        self.models.get(model).map(|stored| stored.rows.as_slice())
    }

    fn validate(spec: &ModelSpec, row: &Row) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in &spec.fields {
            if field.name == spec.key || field.field_type.nullable {
                continue;
            }
            if !row.contains_key(&field.name) {
                errors
                    .entry(field.name.clone())
                    .or_default()
                    .push("is required".to_string());
            }
        }
        errors
    }
}

impl DataStore for MemoryStore {
    fn count(&self, model: &str) -> Result<u64, StoreError> {
        let stored = self
            .models
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        Ok(stored.rows.len() as u64)
    }

    fn primary_keys(&self, model: &str) -> Result<Vec<Value>, StoreError> {
        let stored = self
            .models
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        Ok(stored.rows.iter().map(|(key, _)| key.clone()).collect())
    }

    fn insert(&mut self, model: &str, row: Row) -> Result<Value, StoreError> {
        let stored = self
            .models
            .get_mut(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;

        let errors = Self::validate(&stored.spec, &row);
        if !errors.is_empty() {
            return Err(StoreError::Rejected { errors });
        }

        stored.next_key += 1;
        let key = Value::Int(stored.next_key);
        stored.rows.push((key.clone(), row));
        Ok(key)
    }
}
