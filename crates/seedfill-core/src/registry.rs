use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::schema::ModelSpec;

/// Explicit name-to-descriptor registry for the models a run may touch.
///
/// Every model the engine seeds, and every model a belongs-to relationship
/// targets, must be registered here.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    specs: BTreeMap<String, ModelSpec>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a model descriptor.
    pub fn insert(&mut self, spec: ModelSpec) -> Result<()> {
        spec.validate()?;
        if self.specs.contains_key(&spec.name) {
            return Err(Error::DuplicateModel(spec.name));
        }
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ModelSpec> {
        self.specs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelSpec)> {
        self.specs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
