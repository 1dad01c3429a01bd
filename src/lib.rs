//! Reshape hierarchical data between flat and nested representations.
//!
//! Relational queries naturally return flat rows that point at their parent
//! through a reference column, while in-memory traversal and JSON output
//! want the children inlined. This crate converts between the two shapes,
//! and also rebuilds nested records from flat records whose keys encode
//! nesting through a delimiter (`"sub:field"`).
//!
//! Records are dynamically shaped mappings from field name to value, and the
//! names of the identifier, reference and children fields are parameters of
//! every call, so the transforms work against any schema.
//!
//! ```
//! use arbor::{GrowOptions, Record, TreeFields, Value, flatten, grow};
//!
//! let fields = TreeFields::parse("id", "parent", "children")?;
//! let forest = vec![Record::from_iter([
//!     ("id", Value::from(1)),
//!     ("title", Value::from("a root")),
//!     (
//!         "children",
//!         Value::Seq(vec![Value::Record(Record::from_iter([
//!             ("id", Value::from(2)),
//!             ("title", Value::from("a leaf")),
//!         ]))]),
//!     ),
//! ])];
//!
//! let flat = flatten(&forest, &fields);
//! assert_eq!(flat.len(), 2);
//! assert_eq!(flat[1].get("parent"), Some(&Value::from(1)));
//!
//! let regrown = grow(&flat, &fields, &GrowOptions::default())?;
//! assert_eq!(flatten(&regrown, &fields), flat);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod domain;
pub use domain::{Config, FieldName, InvalidFieldName, Record, TreeFields, Value};

/// Transformations between flat and nested record shapes.
pub mod transform;
pub use transform::{GrowError, GrowOptions, NestOptions, flatten, grow, nest, nest_all};
