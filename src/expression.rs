//! Predicate and projection expressions as handed over by the host planner.
//!
//! This module provides:
//! - Expression tree representation (field references, literals, calls)
//! - Operator definitions and their search-language spelling
//! - The enumerable reasons an expression cannot be pushed down

pub mod error;
pub mod expr;
pub mod operator;

pub use error::Unsupported;
pub use expr::Expression;
pub use operator::Operator;
