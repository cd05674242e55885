//! Fluent builder for field-scoped search criteria.
//!
//! A criteria chain is a flat, ordered list of nodes. Each node targets one field, holds a
//! set of predicate entries, and may be negated or boosted:
//!
//! - **Equality**: `is`, `is_in` - value lists on one field
//! - **Wildcards**: `contains`, `starts_with`, `ends_with` - single tokens only
//! - **Ranges**: `between`, `less_than`, `greater_than_equal`, ... and null checks
//! - **Text**: `fuzzy`, `sloppy`, `expression`
//! - **Geo**: `within`, `near`, `near_box`
//! - **Chaining**: `and` / `or` append nodes; each node reports how it joins its predecessor
//!
//! The chain is consumed by an external renderer that turns it into an engine query string,
//! either through the handles themselves or through a [`ChainSnapshot`].
//!
//! # Example
//!
//! ```
//! use sift_criteria::{Conjunction, Criteria};
//!
//! let title = Criteria::new("title").unwrap().is("rust").unwrap().boost(2.0).unwrap();
//! let tags = title.or("tags").unwrap().is_in(["systems", "cli"]).unwrap();
//! let price = tags.and("price").unwrap().less_than(100).unwrap();
//!
//! let chain = price.criteria_chain();
//! assert_eq!(chain.len(), 3);
//! assert_eq!(chain[1].conjunction(), Conjunction::Or);
//! assert_eq!(title.snapshot().nodes[1].entries.len(), 2);
//! ```

#![warn(missing_docs)]

mod chain;
mod criteria;
mod entry;
mod error;
mod field;
mod geo;
mod node;
mod snapshot;
mod validate;
mod value;

pub use criteria::Criteria;
pub use entry::{CriteriaEntry, OperationKind, Operand};
pub use error::CriteriaError;
pub use field::{Field, IntoField};
pub use geo::{BoundingBox, Distance, DistanceUnit, GeoLocation};
pub use node::{AND_OPERATOR, Conjunction, OR_OPERATOR};
pub use sift_config::CriteriaSettings;
pub use snapshot::{ChainSnapshot, NodeSnapshot};
pub use validate::{VALUE_SEPARATOR, WILDCARD};
pub use value::Value;
