//! Unified error types for the domain layer
//!
//! Every rule check and aggregate transition in this crate reports failures
//! through [`DomainError`], so adapters never have to fall back to strings.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for malformed input.
    ///
    /// Use this when a value can never be accepted, regardless of state:
    /// - Required fields are empty or missing
    /// - Values are outside allowed ranges
    /// - A skill is aimed at a target it cannot take
    ///
    /// # Example
    /// ```ignore
    /// if title.trim().is_empty() {
    ///     return Err(DomainError::validation("Event title cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// ```ignore
    /// impl FromStr for EventType {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "duel" => Ok(Self::Duel),
    ///             _ => Err(DomainError::parse(format!("Unknown event type: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// True for errors caused by the current state rather than the input.
    pub fn is_state_error(&self) -> bool {
        matches!(self, Self::InvalidStateTransition(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("title cannot be empty");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: title cannot be empty");
        assert!(!err.is_state_error());
    }

    #[test]
    fn test_not_found_error() {
        let err = DomainError::not_found("Skill", "123e4567-e89b-12d3-a456-426614174000");
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert!(err.to_string().contains("Skill"));
        assert!(err.to_string().contains("123e4567"));
    }

    #[test]
    fn test_state_errors() {
        let err = DomainError::invalid_state_transition("round is resolved");
        assert_eq!(err.to_string(), "Invalid state transition: round is resolved");
        assert!(err.is_state_error());
        assert!(!DomainError::parse("unknown event type").is_state_error());
    }
}
