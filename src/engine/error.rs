//! Error types for the step-recording engine
//!
//! Expected misuse of a driver (bad index, missing graph node, full stack) is
//! never an error: those operations report `Ok(false)` / `Ok(None)` and record
//! nothing. [`EngineError`] covers the cases where a run cannot start or cannot
//! finish.

use thiserror::Error;

/// Result alias used throughout the engine and the drivers.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can end a driver run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The run was superseded by `cancel()` or `reset()` while suspended.
    #[error("run {generation} was cancelled before it completed")]
    Cancelled { generation: u64 },

    /// Input the algorithm cannot start on (mismatched lengths, malformed board).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Integer arithmetic exceeded the result type.
    #[error("arithmetic overflow in {operation}")]
    Overflow { operation: String },
}

impl EngineError {
    pub fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidInput(message.into())
    }

    /// Whether this error came from a cancelled run rather than bad input
    pub fn is_cancelled(&self) -> bool {
        matches!(self, EngineError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                EngineError::Cancelled { generation: 3 },
                "run 3 was cancelled before it completed",
            ),
            (
                EngineError::invalid("weights and values differ in length"),
                "invalid input: weights and values differ in length",
            ),
            (
                EngineError::Overflow {
                    operation: "factorial(21)".to_string(),
                },
                "arithmetic overflow in factorial(21)",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_is_cancelled() {
        assert!(EngineError::Cancelled { generation: 1 }.is_cancelled());
        assert!(!EngineError::invalid("x").is_cancelled());
    }
}
