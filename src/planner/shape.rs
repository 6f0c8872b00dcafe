//! Recognition of the fragment shapes that can be pushed into a scan.
//!
//! Supported chains, top to bottom:
//!
//! | shape               | chain                                  |
//! |---------------------|----------------------------------------|
//! | `ProjectOnFilter`   | Projection → Filter → Projection → Scan |
//! | `FilterOnProject`   | Filter → Projection → Scan             |
//! | `Filter`            | Filter → Scan                          |
//! | `Project`           | Projection → Scan                      |
//!
//! A projection sitting directly on the scan is always the bottom
//! projection. Only a projection above a filter is a top projection.

use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::logical::{Filter, Projection, RelNode, SearchScan};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fragment shapes a pushdown rule can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleShape {
    ProjectOnFilter,
    FilterOnProject,
    Filter,
    Project,
}

impl RuleShape {
    /// Every shape, longest chain first
    pub const ALL: [RuleShape; 4] = [
        RuleShape::ProjectOnFilter,
        RuleShape::FilterOnProject,
        RuleShape::Filter,
        RuleShape::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleShape::ProjectOnFilter => "project_on_filter",
            RuleShape::FilterOnProject => "filter_on_project",
            RuleShape::Filter => "filter",
            RuleShape::Project => "project",
        }
    }

    /// Short description used in rule names
    pub fn description(&self) -> &'static str {
        match self {
            RuleShape::ProjectOnFilter => "proj on filter on proj",
            RuleShape::FilterOnProject => "filter on proj",
            RuleShape::Filter => "filter",
            RuleShape::Project => "proj",
        }
    }

    /// Number of nodes in the chain, scan included
    pub fn depth(&self) -> usize {
        match self {
            RuleShape::ProjectOnFilter => 4,
            RuleShape::FilterOnProject => 3,
            RuleShape::Filter | RuleShape::Project => 2,
        }
    }

    fn has_filter(&self) -> bool {
        !matches!(self, RuleShape::Project)
    }

    fn has_bottom_projection(&self) -> bool {
        !matches!(self, RuleShape::Filter)
    }

    fn has_top_projection(&self) -> bool {
        matches!(self, RuleShape::ProjectOnFilter)
    }
}

impl fmt::Display for RuleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleShape {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleShape::ALL
            .into_iter()
            .find(|shape| shape.as_str() == s)
            .ok_or_else(|| PlannerError::UnknownShape(s.to_string()))
    }
}

/// Nodes extracted from a matched fragment
#[derive(Debug, Clone, Copy)]
pub struct ShapeMatch<'a> {
    pub shape: RuleShape,
    pub scan: &'a SearchScan,
    pub filter: Option<&'a Filter>,
    pub top_projection: Option<&'a Projection>,
    pub bottom_projection: Option<&'a Projection>,
}

impl<'a> ShapeMatch<'a> {
    /// Check that the match carries exactly the nodes its shape names
    pub fn validate(&self) -> PlannerResult<()> {
        let shape = self.shape.as_str();
        let slots = [
            ("filter", self.shape.has_filter(), self.filter.is_some()),
            (
                "top projection",
                self.shape.has_top_projection(),
                self.top_projection.is_some(),
            ),
            (
                "bottom projection",
                self.shape.has_bottom_projection(),
                self.bottom_projection.is_some(),
            ),
        ];

        for (node, required, present) in slots {
            match (required, present) {
                (true, false) => return Err(PlannerError::MissingNode { shape, node }),
                (false, true) => return Err(PlannerError::UnexpectedNode { shape, node }),
                _ => {}
            }
        }
        Ok(())
    }

    /// All projections in the match, top first
    pub fn projections(&self) -> impl Iterator<Item = &'a Projection> {
        self.top_projection.into_iter().chain(self.bottom_projection)
    }
}

/// Match `node` against one shape
pub fn match_shape(node: &RelNode, shape: RuleShape) -> Option<ShapeMatch<'_>> {
    match shape {
        RuleShape::ProjectOnFilter => {
            let RelNode::Projection(top) = node else {
                return None;
            };
            let RelNode::Filter(filter) = top.input.as_ref() else {
                return None;
            };
            let RelNode::Projection(bottom) = filter.input.as_ref() else {
                return None;
            };
            let RelNode::Scan(scan) = bottom.input.as_ref() else {
                return None;
            };
            Some(ShapeMatch {
                shape,
                scan,
                filter: Some(filter),
                top_projection: Some(top),
                bottom_projection: Some(bottom),
            })
        }
        RuleShape::FilterOnProject => {
            let RelNode::Filter(filter) = node else {
                return None;
            };
            let RelNode::Projection(bottom) = filter.input.as_ref() else {
                return None;
            };
            let RelNode::Scan(scan) = bottom.input.as_ref() else {
                return None;
            };
            Some(ShapeMatch {
                shape,
                scan,
                filter: Some(filter),
                top_projection: None,
                bottom_projection: Some(bottom),
            })
        }
        RuleShape::Filter => {
            let RelNode::Filter(filter) = node else {
                return None;
            };
            let RelNode::Scan(scan) = filter.input.as_ref() else {
                return None;
            };
            Some(ShapeMatch {
                shape,
                scan,
                filter: Some(filter),
                top_projection: None,
                bottom_projection: None,
            })
        }
        RuleShape::Project => {
            let RelNode::Projection(bottom) = node else {
                return None;
            };
            let RelNode::Scan(scan) = bottom.input.as_ref() else {
                return None;
            };
            Some(ShapeMatch {
                shape,
                scan,
                filter: None,
                top_projection: None,
                bottom_projection: Some(bottom),
            })
        }
    }
}

/// Match `node` against the first fitting shape, in the order given
pub fn recognize<'a>(node: &'a RelNode, shapes: &[RuleShape]) -> Option<ShapeMatch<'a>> {
    shapes.iter().find_map(|shape| match_shape(node, *shape))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DataType;
    use crate::expression::Expression;
    use crate::planner::logical::{Field, RowType};

    fn scan() -> RelNode {
        RelNode::scan(SearchScan::new(
            "web",
            "search index=main",
            RowType::new(vec![
                Field::new("host", DataType::Varchar),
                Field::new("status", DataType::Int32),
            ]),
        ))
    }

    fn project(input: RelNode) -> RelNode {
        RelNode::project(
            input,
            vec![Expression::field(1)],
            RowType::new(vec![Field::new("status", DataType::Int32)]),
        )
    }

    fn filter(input: RelNode) -> RelNode {
        RelNode::filter(input, Expression::eq(Expression::field(0), Expression::int32(200)))
    }

    #[test]
    fn test_bare_scan_matches_nothing() {
        let plan = scan();
        for shape in RuleShape::ALL {
            assert!(match_shape(&plan, shape).is_none());
        }
        assert!(recognize(&plan, &RuleShape::ALL).is_none());
    }

    #[test]
    fn test_filter_on_scan() {
        let plan = filter(scan());
        let matched = recognize(&plan, &RuleShape::ALL).unwrap();
        assert_eq!(matched.shape, RuleShape::Filter);
        assert!(matched.filter.is_some());
        assert!(matched.top_projection.is_none());
        assert!(matched.bottom_projection.is_none());
        assert_eq!(matched.scan.table, "web");
        matched.validate().unwrap();
    }

    #[test]
    fn test_projection_on_scan_is_bottom() {
        let plan = project(scan());
        let matched = recognize(&plan, &RuleShape::ALL).unwrap();
        assert_eq!(matched.shape, RuleShape::Project);
        assert!(matched.top_projection.is_none());
        assert!(matched.bottom_projection.is_some());
        matched.validate().unwrap();
    }

    #[test]
    fn test_filter_on_project() {
        let plan = filter(project(scan()));
        let matched = recognize(&plan, &RuleShape::ALL).unwrap();
        assert_eq!(matched.shape, RuleShape::FilterOnProject);
        assert!(matched.filter.is_some());
        assert!(matched.bottom_projection.is_some());
        assert_eq!(matched.projections().count(), 1);
    }

    #[test]
    fn test_project_on_filter_on_project() {
        let plan = project(filter(project(scan())));
        let matched = recognize(&plan, &RuleShape::ALL).unwrap();
        assert_eq!(matched.shape, RuleShape::ProjectOnFilter);
        assert!(matched.top_projection.is_some());
        assert!(matched.bottom_projection.is_some());
        assert_eq!(matched.projections().count(), 2);
        matched.validate().unwrap();
    }

    #[test]
    fn test_project_on_filter_without_bottom_projection() {
        // Projection -> Filter -> Scan: only the filter part is pushable here
        let plan = project(filter(scan()));
        assert!(recognize(&plan, &RuleShape::ALL).is_none());
        assert!(match_shape(plan.input().unwrap(), RuleShape::Filter).is_some());
    }

    #[test]
    fn test_unsupported_chains() {
        assert!(recognize(&filter(filter(scan())), &RuleShape::ALL).is_none());
        assert!(recognize(&project(project(scan())), &RuleShape::ALL).is_none());
    }

    #[test]
    fn test_disabled_shapes_skipped() {
        let plan = filter(scan());
        assert!(recognize(&plan, &[RuleShape::Project, RuleShape::FilterOnProject]).is_none());
    }

    #[test]
    fn test_validate_rejects_inconsistent_match() {
        let plan = filter(scan());
        let mut matched = match_shape(&plan, RuleShape::Filter).unwrap();
        matched.shape = RuleShape::FilterOnProject;
        assert_eq!(
            matched.validate(),
            Err(PlannerError::MissingNode {
                shape: "filter_on_project",
                node: "bottom projection",
            })
        );

        let plan = project(scan());
        let mut matched = match_shape(&plan, RuleShape::Project).unwrap();
        matched.shape = RuleShape::Filter;
        assert!(matches!(
            matched.validate(),
            Err(PlannerError::MissingNode { node: "filter", .. })
        ));
    }

    #[test]
    fn test_shape_names_round_trip() {
        for shape in RuleShape::ALL {
            assert_eq!(shape.as_str().parse::<RuleShape>().unwrap(), shape);
        }
        assert_eq!(
            "join".parse::<RuleShape>(),
            Err(PlannerError::UnknownShape("join".to_string()))
        );
        assert_eq!(RuleShape::ProjectOnFilter.depth(), 4);
        assert_eq!(RuleShape::FilterOnProject.description(), "filter on proj");
    }
}
