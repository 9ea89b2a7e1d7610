//! Runtime error types.

use std::fmt;

/// Result type for VM execution.
pub type VmResult<T> = Result<T, RuntimeError>;

/// Classification of a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// A push would exceed the operand stack's capacity.
    StackOverflow,
    /// An operator was applied to operand types it does not support.
    TypeMismatch,
    /// An operator byte that has no meaning for the given operands.
    UnknownOperator,
    /// A slice bound fell outside the target.
    IndexOutOfBounds,
    /// A slice was applied to a value that cannot be sliced.
    UnsupportedTarget,
    /// The instruction stream referenced a missing constant or decoded
    /// to an unregistered opcode.
    BadBytecode,
}

impl RuntimeErrorKind {
    /// Human-readable kind name used as the message prefix.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RuntimeErrorKind::StackOverflow => "stack overflow",
            RuntimeErrorKind::TypeMismatch => "type mismatch",
            RuntimeErrorKind::UnknownOperator => "unknown operator",
            RuntimeErrorKind::IndexOutOfBounds => "index out of bounds",
            RuntimeErrorKind::UnsupportedTarget => "unsupported target",
            RuntimeErrorKind::BadBytecode => "bad bytecode",
        }
    }
}

/// A runtime error. Execution stops at the first one; the stack's
/// contents past that point are unspecified.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    /// Failure classification.
    pub kind: RuntimeErrorKind,
    /// Detail message.
    pub message: String,
}

impl RuntimeError {
    /// Create an error of the given kind.
    #[must_use]
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Operand stack capacity exceeded.
    #[must_use]
    pub fn stack_overflow() -> Self {
        Self::new(RuntimeErrorKind::StackOverflow, "operand stack exhausted")
    }

    /// Operator applied to unsupported operand types.
    #[must_use]
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::TypeMismatch, message)
    }

    /// Operator undefined for the given operands.
    #[must_use]
    pub fn unknown_operator(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::UnknownOperator, message)
    }

    /// Slice bound outside the target.
    #[must_use]
    pub fn index_out_of_bounds(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::IndexOutOfBounds, message)
    }

    /// Slice on an unsliceable value.
    #[must_use]
    pub fn unsupported_target(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::UnsupportedTarget, message)
    }

    /// Malformed instruction stream or constant reference.
    #[must_use]
    pub fn bad_bytecode(message: impl Into<String>) -> Self {
        Self::new(RuntimeErrorKind::BadBytecode, message)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl std::error::Error for RuntimeError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_label() {
        let err = RuntimeError::type_mismatch("NUMBER and STRING");
        assert_eq!(err.to_string(), "type mismatch: NUMBER and STRING");
        assert_eq!(err.kind, RuntimeErrorKind::TypeMismatch);
    }
}
