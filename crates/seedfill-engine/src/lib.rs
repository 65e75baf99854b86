//! Dependency-aware synthetic record seeding for seedfill.
//!
//! This crate fills registered models with random rows, resolving belongs-to
//! foreign keys against the data already present in the backing store and
//! deferring models whose dependencies have no rows yet.

pub mod engine;
pub mod errors;
pub mod model;
pub mod row;
pub mod store;
pub mod value;

pub use engine::SeedEngine;
pub use errors::SeedError;
pub use model::{CountDefault, ModelReport, SeedConfig, SeedOptions, SeedPlan, SeedReport};
pub use row::{ForeignKeyMap, build_row};
pub use store::{DataStore, MemoryStore, StoreError, ValidationErrors};
pub use value::{Row, Value, field_value};
