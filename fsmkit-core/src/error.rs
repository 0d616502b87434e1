//! Core error types.

use thiserror::Error;

/// Errors from automaton construction and boundary validation.
///
/// The algorithmic operations themselves are total over validated input
/// and never return errors; everything here is raised at the boundary,
/// before an [`crate::Automaton`] value exists.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid automaton: {reason}")]
    InvalidAutomaton { reason: String },

    #[error("invalid symbol label: {label:?} (expected a single character or an epsilon form)")]
    InvalidSymbol { label: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
