//! Relational fragments handed over by the host planner.
//!
//! Fragments are immutable value trees. Rules read them by reference and
//! build new nodes; nothing here is mutated in place.

use crate::access::DataType;
use crate::expression::Expression;
use crate::planner::error::{PlannerError, PlannerResult};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A named, typed field of a row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}

/// Ordered fields of a row. Positions are significant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowType {
    fields: Vec<Field>,
}

impl RowType {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in row order
    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

impl FromIterator<Field> for RowType {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str("]")
    }
}

/// Scan of a remote search table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchScan {
    pub table: String,
    /// Search string sent to the remote service
    pub search: String,
    #[serde(default)]
    pub earliest: Option<String>,
    #[serde(default)]
    pub latest: Option<String>,
    pub fields: RowType,
}

impl SearchScan {
    pub fn new(table: impl Into<String>, search: impl Into<String>, fields: RowType) -> Self {
        Self {
            table: table.into(),
            search: search.into(),
            earliest: None,
            latest: None,
            fields,
        }
    }

    /// Restrict the scan to a time range
    pub fn with_time_range(mut self, earliest: Option<String>, latest: Option<String>) -> Self {
        self.earliest = earliest;
        self.latest = latest;
        self
    }
}

/// Filter rows of the input on a boolean condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub input: Box<RelNode>,
    pub condition: Expression,
}

/// Compute output fields from the input row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub input: Box<RelNode>,
    pub expressions: Vec<Expression>,
    /// Declared output fields, one per expression
    pub row_type: RowType,
}

impl Projection {
    /// Check that every expression has a declared output field
    pub fn validate(&self) -> PlannerResult<()> {
        if self.expressions.len() != self.row_type.len() {
            return Err(PlannerError::ProjectionWidth {
                expressions: self.expressions.len(),
                declared: self.row_type.len(),
            });
        }
        Ok(())
    }
}

/// Plan node of a fragment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelNode {
    Scan(SearchScan),
    Filter(Filter),
    Projection(Projection),
}

impl RelNode {
    pub fn scan(scan: SearchScan) -> Self {
        RelNode::Scan(scan)
    }

    pub fn filter(input: RelNode, condition: Expression) -> Self {
        RelNode::Filter(Filter {
            input: Box::new(input),
            condition,
        })
    }

    pub fn project(input: RelNode, expressions: Vec<Expression>, row_type: RowType) -> Self {
        RelNode::Projection(Projection {
            input: Box::new(input),
            expressions,
            row_type,
        })
    }

    /// Output row of this node
    pub fn row_type(&self) -> &RowType {
        match self {
            RelNode::Scan(scan) => &scan.fields,
            RelNode::Filter(filter) => filter.input.row_type(),
            RelNode::Projection(projection) => &projection.row_type,
        }
    }

    pub fn input(&self) -> Option<&RelNode> {
        match self {
            RelNode::Scan(_) => None,
            RelNode::Filter(filter) => Some(&filter.input),
            RelNode::Projection(projection) => Some(&projection.input),
        }
    }

    /// Copy of this node reading from a different input
    pub fn with_input(&self, input: RelNode) -> RelNode {
        match self {
            RelNode::Scan(scan) => RelNode::Scan(scan.clone()),
            RelNode::Filter(filter) => RelNode::filter(input, filter.condition.clone()),
            RelNode::Projection(projection) => RelNode::project(
                input,
                projection.expressions.clone(),
                projection.row_type.clone(),
            ),
        }
    }

    /// Load a fragment from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read plan file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse plan file {}", path.display()))
    }

    /// Get a human-readable explanation of this node
    pub fn explain(&self, indent_level: usize) -> String {
        let indent = "  ".repeat(indent_level);

        match self {
            RelNode::Scan(scan) => {
                let mut result = format!(
                    "{}SearchScan: {} search=[{}] fields={}",
                    indent, scan.table, scan.search, scan.fields
                );
                if let Some(earliest) = &scan.earliest {
                    result.push_str(&format!(" earliest={}", earliest));
                }
                if let Some(latest) = &scan.latest {
                    result.push_str(&format!(" latest={}", latest));
                }
                result
            }

            RelNode::Filter(filter) => {
                let mut result = format!("{}Filter: {}\n", indent, filter.condition);
                result.push_str(&filter.input.explain(indent_level + 1));
                result
            }

            RelNode::Projection(projection) => {
                let proj_str = projection
                    .expressions
                    .iter()
                    .zip(projection.row_type.fields())
                    .map(|(expr, field)| format!("{} AS {}", expr, field.name))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut result = format!("{}Projection: {}\n", indent, proj_str);
                result.push_str(&projection.input.explain(indent_level + 1));
                result
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_fields() -> RowType {
        RowType::new(vec![
            Field::new("status", DataType::Int32),
            Field::new("method", DataType::Varchar),
        ])
    }

    #[test]
    fn test_row_type_accessors() {
        let row = web_fields();
        assert_eq!(row.len(), 2);
        assert!(!row.is_empty());
        assert_eq!(row.names(), vec!["status".to_string(), "method".to_string()]);
        assert_eq!(row.field(1).map(|f| f.data_type), Some(DataType::Varchar));
        assert!(row.field(2).is_none());
        assert_eq!(row.to_string(), "[status:INTEGER, method:VARCHAR]");
    }

    #[test]
    fn test_filter_inherits_input_row() {
        let scan = RelNode::scan(SearchScan::new("web", "search index=main", web_fields()));
        let filter = RelNode::filter(
            scan,
            Expression::eq(Expression::field(0), Expression::int32(200)),
        );
        assert_eq!(filter.row_type(), &web_fields());
        assert!(matches!(filter.input(), Some(RelNode::Scan(_))));
    }

    #[test]
    fn test_projection_width_validation() {
        let scan = RelNode::scan(SearchScan::new("web", "search", web_fields()));
        let RelNode::Projection(projection) = RelNode::project(
            scan,
            vec![Expression::field(0), Expression::field(1)],
            RowType::new(vec![Field::new("status", DataType::Int32)]),
        ) else {
            panic!("Expected projection");
        };

        assert_eq!(
            projection.validate(),
            Err(PlannerError::ProjectionWidth {
                expressions: 2,
                declared: 1,
            })
        );
    }

    #[test]
    fn test_with_input_replaces_child() {
        let scan = RelNode::scan(SearchScan::new("web", "search", web_fields()));
        let filter = RelNode::filter(
            scan.clone(),
            Expression::eq(Expression::field(0), Expression::int32(200)),
        );
        let pushed = RelNode::scan(SearchScan::new("web", "search status=200", web_fields()));

        let rebuilt = filter.with_input(pushed.clone());
        assert_eq!(rebuilt.input(), Some(&pushed));
        assert_eq!(scan.with_input(pushed), scan);
    }

    #[test]
    fn test_explain() {
        let scan = SearchScan::new("web", "search index=main", web_fields())
            .with_time_range(Some("-1d".to_string()), None);
        let plan = RelNode::project(
            RelNode::filter(
                RelNode::scan(scan),
                Expression::eq(Expression::field(0), Expression::int32(200)),
            ),
            vec![Expression::field(1)],
            RowType::new(vec![Field::new("verb", DataType::Varchar)]),
        );

        assert_eq!(
            plan.explain(0),
            "Projection: $1 AS verb\n  Filter: =($0, 200)\n    SearchScan: web search=[search index=main] fields=[status:INTEGER, method:VARCHAR] earliest=-1d"
        );
    }

    #[test]
    fn test_plan_from_json() {
        let json = r#"{
            "filter": {
                "input": {
                    "scan": {
                        "table": "web",
                        "search": "search index=main",
                        "fields": [
                            { "name": "status", "data_type": "int32" },
                            { "name": "method", "data_type": "varchar" }
                        ]
                    }
                },
                "condition": {
                    "call": {
                        "op": "eq",
                        "operands": [
                            { "field_ref": 0 },
                            { "literal": { "type": "int32", "value": 200 } }
                        ]
                    }
                }
            }
        }"#;
        let plan: RelNode = serde_json::from_str(json).unwrap();
        let expected = RelNode::filter(
            RelNode::scan(SearchScan::new("web", "search index=main", web_fields())),
            Expression::eq(Expression::field(0), Expression::int32(200)),
        );
        assert_eq!(plan, expected);
    }
}
