//! Core contracts for seedfill.
//!
//! This crate defines the canonical model descriptors consumed by the seeding
//! engine, the explicit model registry, and the belongs-to dependency graph
//! helpers used to order a seeding run.

pub mod error;
pub mod graph;
pub mod registry;
pub mod schema;

pub use error::{Error, Result};
pub use graph::{DependencyReport, DependencySummary, build_dependency_report};
pub use registry::ModelRegistry;
pub use schema::{Field, FieldKind, FieldType, ModelSpec, RelationKind, Relationship};
