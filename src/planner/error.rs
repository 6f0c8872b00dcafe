//! Planner error types.
//!
//! Only malformed input is an error. A fragment the search language cannot
//! express is declined by the rule instead.

use thiserror::Error;

/// Errors raised when a fragment violates the planner's structural contract.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlannerError {
    #[error("Projection has {expressions} expressions but declares {declared} fields")]
    ProjectionWidth { expressions: usize, declared: usize },

    #[error("Shape '{shape}' matched without its {node} node")]
    MissingNode {
        shape: &'static str,
        node: &'static str,
    },

    #[error("Shape '{shape}' matched with an unexpected {node} node")]
    UnexpectedNode {
        shape: &'static str,
        node: &'static str,
    },

    #[error("Unknown rule shape: '{0}'")]
    UnknownShape(String),
}

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlannerError::ProjectionWidth {
            expressions: 3,
            declared: 2,
        };
        assert_eq!(
            err.to_string(),
            "Projection has 3 expressions but declares 2 fields"
        );

        let err = PlannerError::MissingNode {
            shape: "filter_on_project",
            node: "filter",
        };
        assert_eq!(
            err.to_string(),
            "Shape 'filter_on_project' matched without its filter node"
        );

        let err = PlannerError::UnknownShape("join".to_string());
        assert_eq!(err.to_string(), "Unknown rule shape: 'join'");
    }
}
