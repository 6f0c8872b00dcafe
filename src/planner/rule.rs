//! Pushdown rules for filters and projections over a search scan.

use crate::config::PushdownConfig;
use crate::expression::Unsupported;
use crate::planner::error::PlannerResult;
use crate::planner::logical::{RelNode, SearchScan};
use crate::planner::projection::ProjectionResolver;
use crate::planner::shape::{match_shape, RuleShape, ShapeMatch};
use crate::planner::trace::{TraceEvent, Tracer};
use crate::search::{compose_scan, FilterTranslator};
use std::fmt;

/// Why a rule left its fragment alone
#[derive(Debug, Clone, PartialEq)]
pub enum Decline {
    /// The fragment does not have the rule's shape
    NoMatch,
    /// The fragment has the shape but contains something the search
    /// language cannot express
    Unsupported(Unsupported),
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decline::NoMatch => f.write_str("shape does not match"),
            Decline::Unsupported(reason) => write!(f, "{}", reason),
        }
    }
}

/// Result of one rule invocation
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Rewritten(RelNode),
    Declined(Decline),
}

impl RuleOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, RuleOutcome::Rewritten(_))
    }
}

/// A rewrite the optimizer can attempt on a plan node
pub trait OptimizerRule: Send + Sync {
    fn name(&self) -> &str;

    /// Rewrite `plan`, or decline and leave it as is.
    ///
    /// `Err` is reserved for fragments that break the planner's structural
    /// contract.
    fn rewrite(&self, plan: &RelNode, tracer: &dyn Tracer) -> PlannerResult<RuleOutcome>;
}

/// Pushes a filter and/or projections into the search string of the scan
/// beneath them.
#[derive(Debug, Clone)]
pub struct PushdownRule {
    shape: RuleShape,
    name: String,
    resolver: ProjectionResolver,
}

impl PushdownRule {
    pub fn new(shape: RuleShape, strict_projections: bool) -> Self {
        Self {
            shape,
            name: format!("SearchPushDownRule: {}", shape.description()),
            resolver: ProjectionResolver::new(strict_projections),
        }
    }

    /// One rule per configured shape, longest chain first
    pub fn from_config(config: &PushdownConfig) -> Vec<PushdownRule> {
        config
            .ordered_shapes()
            .into_iter()
            .map(|shape| PushdownRule::new(shape, config.strict_projections))
            .collect()
    }

    pub fn shape(&self) -> RuleShape {
        self.shape
    }

    fn push_down(
        &self,
        matched: &ShapeMatch<'_>,
        tracer: &dyn Tracer,
    ) -> Result<SearchScan, Unsupported> {
        let available =
            self.resolver
                .resolve_bottom(&matched.scan.fields, matched.bottom_projection, tracer)?;

        let filter_text = match matched.filter {
            Some(filter) => {
                let names = available.names();
                tracer.trace(&TraceEvent::FieldNames { names: &names });
                let text = FilterTranslator::new(&names).translate(&filter.condition)?;
                tracer.trace(&TraceEvent::FilterRendered { text: &text });
                text
            }
            None => String::new(),
        };

        let resolved = self.resolver.resolve_top(&available, matched.top_projection)?;
        if !resolved.renames.is_empty() {
            tracer.trace(&TraceEvent::Renames {
                renames: &resolved.renames,
            });
        }

        Ok(compose_scan(
            matched.scan,
            &filter_text,
            &resolved.renames,
            resolved.fields,
        ))
    }

    fn decline(&self, reason: Decline, tracer: &dyn Tracer) -> RuleOutcome {
        tracer.trace(&TraceEvent::Declined {
            rule: &self.name,
            reason: &reason,
        });
        RuleOutcome::Declined(reason)
    }
}

impl OptimizerRule for PushdownRule {
    fn name(&self) -> &str {
        &self.name
    }

    fn rewrite(&self, plan: &RelNode, tracer: &dyn Tracer) -> PlannerResult<RuleOutcome> {
        tracer.trace(&TraceEvent::Attempt { rule: &self.name });

        let Some(matched) = match_shape(plan, self.shape) else {
            return Ok(self.decline(Decline::NoMatch, tracer));
        };
        matched.validate()?;
        for projection in matched.projections() {
            projection.validate()?;
        }
        tracer.trace(&TraceEvent::Matched {
            rule: &self.name,
            shape: matched.shape,
        });

        match self.push_down(&matched, tracer) {
            Ok(scan) => {
                tracer.trace(&TraceEvent::Fired {
                    rule: &self.name,
                    search: &scan.search,
                    fields: &scan.fields.names(),
                });
                Ok(RuleOutcome::Rewritten(RelNode::Scan(scan)))
            }
            Err(reason) => Ok(self.decline(Decline::Unsupported(reason), tracer)),
        }
    }
}
