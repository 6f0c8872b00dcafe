//! Typed values flowing through plan fragments.
//!
//! - **Value**: Literal constants carried by filter predicates
//! - **DataType**: Field types declared by scans and projections
//!
//! The planner never evaluates rows; values here exist only so predicates can
//! be rendered into remote search text.

pub mod value;

pub use value::{DataType, Value};
