//! Transformations between flat and nested record shapes.
//!
//! Three independent, stateless transforms share the [`Record`] model:
//! [`flatten`] turns nested trees into parent-linked flat sets, [`grow`]
//! rebuilds the trees from such sets, and [`nest`]/[`nest_all`] reconstruct
//! nested records from delimiter-encoded keys. None of them mutate their
//! input, and none of them depend on each other.
//!
//! [`Record`]: crate::domain::Record

mod flatten;
pub use flatten::flatten;

mod grow;
pub use grow::{GrowError, GrowOptions, grow};

mod nest;
pub use nest::{NestOptions, nest, nest_all};
