//! Error types for matcheck operations.
//!
//! A numeric mismatch between the generated routine and the reference is
//! *not* an error: it is reported through [`crate::compare::Outcome`]. The
//! variants here cover the cases where no meaningful comparison can happen.

use std::fmt;

/// Errors that can occur while running the validation harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// Buffer allocation failed.
    Allocation {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        cols: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A configuration value could not be parsed or is out of range.
    Config {
        /// The configuration key (environment variable name).
        key: String,
        /// The raw value that was rejected.
        value: String,
        /// Human-readable error message.
        message: String,
    },
    /// Two buffers that must share a shape do not.
    ShapeMismatch {
        /// What was being checked, e.g. a test name or `"reference"`.
        context: String,
        /// `(rows, cols)` of the first operand.
        left: (usize, usize),
        /// `(rows, cols)` of the second operand.
        right: (usize, usize),
    },
    /// The routine under test broke its contract (panicked, indexed out of
    /// bounds, or rejected correctly-shaped operands).
    ContractViolation {
        /// Name of the offending routine.
        routine: String,
        /// Human-readable error message, usually the panic payload.
        message: String,
    },
}

impl HarnessError {
    /// Returns `true` for errors raised before any computation could run.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            HarnessError::Allocation { .. } | HarnessError::Config { .. }
        )
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::Allocation {
                rows,
                cols,
                message,
            } => write!(
                f,
                "Buffer allocation failed: {} (requested {}x{} elements)",
                message, rows, cols
            ),
            HarnessError::Config {
                key,
                value,
                message,
            } => write!(f, "Invalid configuration {}={:?}: {}", key, value, message),
            HarnessError::ShapeMismatch {
                context,
                left,
                right,
            } => write!(
                f,
                "Shape mismatch in {}: {}x{} vs {}x{}",
                context, left.0, left.1, right.0, right.1
            ),
            HarnessError::ContractViolation { routine, message } => {
                write!(f, "Routine `{}` violated its contract: {}", routine, message)
            }
        }
    }
}

impl std::error::Error for HarnessError {}

/// Result type alias for matcheck operations.
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Creates an allocation error.
pub fn allocation_error(rows: usize, cols: usize, message: impl Into<String>) -> HarnessError {
    HarnessError::Allocation {
        rows,
        cols,
        message: message.into(),
    }
}

/// Creates a configuration error.
pub fn config_error(
    key: impl Into<String>,
    value: impl Into<String>,
    message: impl Into<String>,
) -> HarnessError {
    HarnessError::Config {
        key: key.into(),
        value: value.into(),
        message: message.into(),
    }
}

/// Creates a shape mismatch error.
pub fn shape_mismatch(
    context: impl Into<String>,
    left: (usize, usize),
    right: (usize, usize),
) -> HarnessError {
    HarnessError::ShapeMismatch {
        context: context.into(),
        left,
        right,
    }
}

/// Creates a contract violation error.
pub fn contract_violation(routine: impl Into<String>, message: impl Into<String>) -> HarnessError {
    HarnessError::ContractViolation {
        routine: routine.into(),
        message: message.into(),
    }
}
