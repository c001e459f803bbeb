//! Unified error types for the domain layer
//!
//! Provides a common error type for parsing and validating the command
//! vocabulary, so adapters never have to fall back to `String` errors.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for vocabulary enums and value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for invariant violations.
    ///
    /// # Example
    /// ```ignore
    /// if id.trim().is_empty() {
    ///     return Err(DomainError::validation("Companion id cannot be empty"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Use this in `FromStr` implementations when the input string
    /// doesn't match any known variant.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for Priority {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "low" => Ok(Self::Low),
    ///             _ => Err(DomainError::parse(format!("Unknown priority: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = DomainError::parse("Unknown action type: fly");
        assert_eq!(err.to_string(), "Parse error: Unknown action type: fly");
    }

    #[test]
    fn validation_error_display() {
        let err = DomainError::validation("Companion id cannot be empty");
        assert_eq!(
            err.to_string(),
            "Validation failed: Companion id cannot be empty"
        );
    }
}
