//! Filter and projection pushdown into remote search scans.
//!
//! A fragment of a relational plan made of a filter and up to two
//! projections over a search-table scan is rewritten into a single scan
//! whose search string already carries the filter and any field renames.
//!
//! ```
//! use searchpush::access::DataType;
//! use searchpush::expression::Expression;
//! use searchpush::planner::{Field, NoopTracer, Optimizer, RelNode, RowType, SearchScan};
//!
//! let scan = SearchScan::new(
//!     "web",
//!     "search index=main",
//!     RowType::new(vec![Field::new("status", DataType::Int32)]),
//! );
//! let plan = RelNode::filter(
//!     RelNode::scan(scan),
//!     Expression::eq(Expression::field(0), Expression::int32(404)),
//! );
//!
//! let optimized = Optimizer::default().optimize(&plan, &NoopTracer).unwrap();
//! match optimized {
//!     RelNode::Scan(scan) => assert_eq!(scan.search, "search index=main status=404"),
//!     _ => unreachable!(),
//! }
//! ```

pub mod access;
pub mod config;
pub mod expression;
pub mod planner;
pub mod search;

pub use config::PushdownConfig;
pub use planner::{Optimizer, PlannerError, PlannerResult, RelNode};
