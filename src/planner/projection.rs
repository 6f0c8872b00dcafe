//! Output field and rename resolution across stacked projections.

use crate::expression::Unsupported;
use crate::planner::logical::{Projection, RowType};
use crate::planner::trace::{TraceEvent, Tracer};
use crate::search::Rename;

/// Final fields of a pushed fragment and the renames that produce them
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFields {
    pub fields: RowType,
    pub renames: Vec<Rename>,
}

/// Resolves which remote fields a fragment exposes and under which names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionResolver {
    strict: bool,
}

impl ProjectionResolver {
    /// With `strict` set, a computed bottom-projection output declines
    /// instead of pushing its declared field.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Row available after the bottom projection.
    ///
    /// A field reference takes the scan's field at that index. Any other
    /// expression takes the projection's declared field at the same
    /// position; the remote service has no field under that name, so the
    /// pushed scan will not reproduce the computed value.
    pub fn resolve_bottom(
        &self,
        scan_fields: &RowType,
        bottom: Option<&Projection>,
        tracer: &dyn Tracer,
    ) -> Result<RowType, Unsupported> {
        let Some(bottom) = bottom else {
            return Ok(scan_fields.clone());
        };

        bottom
            .expressions
            .iter()
            .zip(bottom.row_type.fields())
            .enumerate()
            .map(|(position, (expr, declared))| match expr.as_field_ref() {
                Some(index) => scan_fields.field(index).cloned().ok_or(
                    Unsupported::FieldOutOfRange {
                        index,
                        width: scan_fields.len(),
                    },
                ),
                None if self.strict => Err(Unsupported::ComputedProjection { position }),
                None => {
                    tracer.trace(&TraceEvent::ComputedField {
                        position,
                        name: &declared.name,
                    });
                    Ok(declared.clone())
                }
            })
            .collect()
    }

    /// Final fields after the top projection, with the renames it implies.
    ///
    /// Every output must reference a field of `available`. When the
    /// declared name differs from the referenced field's name, a rename is
    /// recorded and the declared field is used. Renames follow output
    /// order and are not deduplicated.
    pub fn resolve_top(
        &self,
        available: &RowType,
        top: Option<&Projection>,
    ) -> Result<ResolvedFields, Unsupported> {
        let Some(top) = top else {
            return Ok(ResolvedFields {
                fields: available.clone(),
                renames: Vec::new(),
            });
        };

        let mut fields = Vec::with_capacity(top.expressions.len());
        let mut renames = Vec::new();

        for (position, (expr, desired)) in top
            .expressions
            .iter()
            .zip(top.row_type.fields())
            .enumerate()
        {
            let index = expr
                .as_field_ref()
                .ok_or(Unsupported::ComputedProjection { position })?;
            let source = available
                .field(index)
                .ok_or(Unsupported::FieldOutOfRange {
                    index,
                    width: available.len(),
                })?;

            if source.name != desired.name {
                renames.push(Rename::new(source.name.clone(), desired.name.clone()));
                fields.push(desired.clone());
            } else {
                fields.push(source.clone());
            }
        }

        Ok(ResolvedFields {
            fields: RowType::new(fields),
            renames,
        })
    }
}
