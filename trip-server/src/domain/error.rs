//! Domain error types.
//!
//! These errors represent validation failures in the trip model. They are
//! distinct from persistence and HTTP errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Trip has no variants
    #[error("trip {0} must have at least one variant")]
    EmptyTrip(String),

    /// Trip identifier is blank
    #[error("trip identifier must not be empty")]
    MissingTripId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyTrip("t-17".into());
        assert_eq!(err.to_string(), "trip t-17 must have at least one variant");

        let err = DomainError::MissingTripId;
        assert_eq!(err.to_string(), "trip identifier must not be empty");
    }
}
