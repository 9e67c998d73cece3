//! Filter input errors.

/// Errors raised when filter edits arrive from outside the engine.
///
/// Inside the engine edits are typed, so these only occur at the boundary
/// where field names and values are still strings and JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// Field name does not name a filter
    #[error("unknown filter field: {0}")]
    UnknownField(String),

    /// Value has the wrong shape for the field
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
