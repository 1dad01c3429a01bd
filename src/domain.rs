//! Domain models for record reshaping.
//!
//! This module contains the core types: the dynamically-shaped [`Record`],
//! the [`Value`] union it holds, validated [`FieldName`]s, and the CLI
//! [`Config`].

mod config;
pub use config::Config;

/// Validated field names and the field-name triple used by the tree
/// transforms.
pub mod field;
pub use field::{FieldName, InvalidFieldName, TreeFields};

/// Insertion-ordered records.
pub mod record;
pub use record::Record;

/// The closed value union stored in records.
pub mod value;
pub use value::Value;
