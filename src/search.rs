//! Rendering of plan fragments into search-language text.
//!
//! - **escape**: literal quoting rules of the search language
//! - **filter**: predicate trees to filter clauses
//! - **query**: final search string and the replacement scan node

pub mod escape;
pub mod filter;
pub mod query;

pub use escape::search_escape;
pub use filter::FilterTranslator;
pub use query::{compose_scan, compose_search, Rename, RENAME_MARKER};
