//! Pushdown planning over search-scan fragments.
//!
//! The optimizer walks a fragment from the root and offers every node to the
//! configured pushdown rules:
//! 1. Shape matching: find a supported chain ending in a search scan
//! 2. Projection resolution: compute output fields and renames
//! 3. Filter translation: render the predicate as search text
//! 4. Composition: replace the chain with a single scan
//!
//! A node no rule can rewrite is left exactly as it was.

pub mod error;
pub mod logical;
pub mod projection;
pub mod rule;
pub mod shape;
pub mod trace;

use crate::config::PushdownConfig;

pub use error::{PlannerError, PlannerResult};
pub use logical::{Field, Filter, Projection, RelNode, RowType, SearchScan};
pub use projection::{ProjectionResolver, ResolvedFields};
pub use rule::{Decline, OptimizerRule, PushdownRule, RuleOutcome};
pub use shape::{match_shape, recognize, RuleShape, ShapeMatch};
pub use trace::{LogTracer, MemoryTracer, NoopTracer, TraceEvent, Tracer};

/// Applies pushdown rules to a plan until nothing changes
pub struct Optimizer {
    rules: Vec<Box<dyn OptimizerRule>>,
    max_passes: usize,
}

impl Optimizer {
    /// Create an optimizer with the rules enabled in `config`
    pub fn new(config: &PushdownConfig) -> Self {
        let rules = PushdownRule::from_config(config)
            .into_iter()
            .map(|rule| Box::new(rule) as Box<dyn OptimizerRule>)
            .collect();
        Self {
            rules,
            max_passes: config.max_passes.max(1),
        }
    }

    /// Create an optimizer over an explicit rule list, tried in order
    pub fn with_rules(rules: Vec<Box<dyn OptimizerRule>>, max_passes: usize) -> Self {
        Self {
            rules,
            max_passes: max_passes.max(1),
        }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Optimize `plan`, returning a new tree.
    ///
    /// The input is never modified. If no rule fires anywhere the result is
    /// equal to the input.
    pub fn optimize(&self, plan: &RelNode, tracer: &dyn Tracer) -> PlannerResult<RelNode> {
        let mut current = plan.clone();

        for pass in 0..self.max_passes {
            match self.optimize_node(&current, tracer)? {
                Some(rewritten) => current = rewritten,
                None => {
                    log::trace!("pushdown reached a fixed point after {} passes", pass);
                    break;
                }
            }
        }

        Ok(current)
    }

    /// Rewrite `node` or something beneath it. `None` when nothing changed.
    fn optimize_node(&self, node: &RelNode, tracer: &dyn Tracer) -> PlannerResult<Option<RelNode>> {
        if let Some(rewritten) = self.apply_rules(node, tracer)? {
            return Ok(Some(rewritten));
        }

        let Some(input) = node.input() else {
            return Ok(None);
        };

        match self.optimize_node(input, tracer)? {
            Some(new_input) => {
                let rebuilt = node.with_input(new_input);
                // The rewritten input may complete a shape at this node
                match self.apply_rules(&rebuilt, tracer)? {
                    Some(rewritten) => Ok(Some(rewritten)),
                    None => Ok(Some(rebuilt)),
                }
            }
            None => Ok(None),
        }
    }

    fn apply_rules(&self, node: &RelNode, tracer: &dyn Tracer) -> PlannerResult<Option<RelNode>> {
        for rule in &self.rules {
            if let RuleOutcome::Rewritten(rewritten) = rule.rewrite(node, tracer)? {
                return Ok(Some(rewritten));
            }
        }
        Ok(None)
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(&PushdownConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DataType;
    use crate::expression::{Expression, Operator};

    fn web_scan() -> RelNode {
        RelNode::scan(SearchScan::new(
            "web",
            "search index=main",
            RowType::new(vec![
                Field::new("host", DataType::Varchar),
                Field::new("status", DataType::Int32),
            ]),
        ))
    }

    fn status_200() -> Expression {
        Expression::eq(Expression::field(1), Expression::int32(200))
    }

    #[test]
    fn test_rule_names_longest_first() {
        let optimizer = Optimizer::default();
        assert_eq!(
            optimizer.rule_names(),
            vec![
                "SearchPushDownRule: proj on filter on proj",
                "SearchPushDownRule: filter on proj",
                "SearchPushDownRule: filter",
                "SearchPushDownRule: proj",
            ]
        );
    }

    #[test]
    fn test_scan_is_fixed_point() {
        let plan = web_scan();
        let optimized = Optimizer::default().optimize(&plan, &NoopTracer).unwrap();
        assert_eq!(optimized, plan);
    }

    #[test]
    fn test_pushes_beneath_unmatched_root() {
        // Projection -> Filter -> Scan: the filter is pushed first, then the
        // projection lands directly on the new scan
        let plan = RelNode::project(
            RelNode::filter(web_scan(), status_200()),
            vec![Expression::field(0)],
            RowType::new(vec![Field::new("host", DataType::Varchar)]),
        );
        let optimized = Optimizer::default().optimize(&plan, &NoopTracer).unwrap();

        match optimized {
            RelNode::Scan(scan) => {
                assert_eq!(scan.search, "search index=main status=200");
                assert_eq!(scan.fields.names(), vec!["host".to_string()]);
            }
            other => panic!("Expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_filter_left_in_place() {
        let plan = RelNode::filter(
            web_scan(),
            Expression::call(Operator::In, vec![Expression::field(1), Expression::int32(1)]),
        );
        let optimized = Optimizer::default().optimize(&plan, &NoopTracer).unwrap();
        assert_eq!(optimized, plan);
    }

    #[test]
    fn test_rewrite_below_unsupported_filter() {
        // The upper filter cannot be pushed; the lower one can
        let plan = RelNode::filter(
            RelNode::filter(web_scan(), status_200()),
            Expression::call(Operator::IsNull, vec![Expression::field(0)]),
        );
        let optimized = Optimizer::default().optimize(&plan, &NoopTracer).unwrap();

        let RelNode::Filter(top) = &optimized else {
            panic!("Expected filter to remain on top");
        };
        assert_eq!(
            top.condition,
            Expression::call(Operator::IsNull, vec![Expression::field(0)])
        );
        match top.input.as_ref() {
            RelNode::Scan(scan) => assert_eq!(scan.search, "search index=main status=200"),
            other => panic!("Expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_shapes_do_not_fire() {
        let config = PushdownConfig {
            shapes: vec![RuleShape::Project],
            ..PushdownConfig::default()
        };
        let plan = RelNode::filter(web_scan(), status_200());
        let optimized = Optimizer::new(&config).optimize(&plan, &NoopTracer).unwrap();
        assert_eq!(optimized, plan);
    }

    #[test]
    fn test_malformed_fragment_propagates_error() {
        let plan = RelNode::project(
            web_scan(),
            vec![Expression::field(0)],
            RowType::new(vec![]),
        );
        assert!(matches!(
            Optimizer::default().optimize(&plan, &NoopTracer),
            Err(PlannerError::ProjectionWidth { .. })
        ));
    }
}
