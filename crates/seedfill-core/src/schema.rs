use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Value kind of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Integer,
    Float,
    Text,
    /// Anything the generator has no dedicated kind for; treated as text.
    Other,
}

/// Type descriptor for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldType {
    pub kind: FieldKind,
    pub nullable: bool,
}

/// A named field in a model schema. Declaration order is generation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl Field {
    pub fn new(name: &str, kind: FieldKind, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            field_type: FieldType { kind, nullable },
        }
    }
}

/// Kind of relationship a model declares.
///
/// Only `BelongsTo` participates in dependency resolution; the other kinds
/// are carried in the descriptor and ignored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
}

/// A declared relationship from the owning model to a target model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    pub kind: RelationKind,
    /// Field on the owning model holding the reference.
    pub local_field: String,
    pub target_model: String,
}

impl Relationship {
    pub fn belongs_to(local_field: &str, target_model: &str) -> Self {
        Self {
            kind: RelationKind::BelongsTo,
            local_field: local_field.to_string(),
            target_model: target_model.to_string(),
        }
    }
}

/// Descriptor for a data model: its primary key, ordered fields, and
/// declared relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModelSpec {
    pub name: String,
    /// Primary-key field name. The store assigns it; the engine never does.
    pub key: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl ModelSpec {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Relationships that participate in dependency resolution.
    pub fn belongs_to(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships
            .iter()
            .filter(|rel| rel.kind == RelationKind::BelongsTo)
    }

    /// Check internal invariants of the descriptor.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidSpec("model name is empty".to_string()));
        }

        let mut seen = std::collections::BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSpec(format!(
                    "model '{}' declares field '{}' twice",
                    self.name, field.name
                )));
            }
        }

        if !self.has_field(&self.key) {
            return Err(Error::InvalidSpec(format!(
                "model '{}' key '{}' is not a declared field",
                self.name, self.key
            )));
        }

        for rel in self.belongs_to() {
            if !self.has_field(&rel.local_field) {
                return Err(Error::InvalidSpec(format!(
                    "model '{}' belongs_to '{}' uses undeclared field '{}'",
                    self.name, rel.target_model, rel.local_field
                )));
            }
        }

        Ok(())
    }
}
