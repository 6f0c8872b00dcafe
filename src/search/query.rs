//! Composition of the final search string.

use crate::planner::logical::{RowType, SearchScan};
use std::fmt;

/// Marker that starts the rename clause of a search string
pub const RENAME_MARKER: &str = "| rename ";

/// A remote field that must appear under another name in the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for Rename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS {}", self.from, self.to)
    }
}

/// Append a filter clause and a rename clause to a base search.
///
/// The filter is separated from the base by a single space and skipped when
/// empty. Each rename is followed by a space, in the order given.
pub fn compose_search(base: &str, filter: &str, renames: &[Rename]) -> String {
    let mut search = String::from(base);

    if !filter.is_empty() {
        search.push(' ');
        search.push_str(filter);
    }

    if !renames.is_empty() {
        search.push_str(RENAME_MARKER);
        for rename in renames {
            search.push_str(&rename.to_string());
            search.push(' ');
        }
    }

    search
}

/// Build the scan that replaces a pushed-down fragment.
///
/// Table and time range come from `scan`; the search string and output
/// fields are the composed ones.
pub fn compose_scan(
    scan: &SearchScan,
    filter: &str,
    renames: &[Rename],
    fields: RowType,
) -> SearchScan {
    SearchScan {
        table: scan.table.clone(),
        search: compose_search(&scan.search, filter, renames),
        earliest: scan.earliest.clone(),
        latest: scan.latest.clone(),
        fields,
    }
}
