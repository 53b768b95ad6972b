//! Structured errors for the host runtime
//!
//! Errors never crash the host. They are values scoped to the expression
//! that raised them, carrying a machine-readable code, a plain-language
//! message and, where possible, a corrected example the user can paste.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Standard error codes (machine-readable)
pub mod codes {
    pub const MALFORMED_LITERAL: &str = "MALFORMED_LITERAL";
    pub const UNKNOWN_UNIT_SUFFIX: &str = "UNKNOWN_UNIT_SUFFIX";
    pub const NON_EXACT_FRACTION: &str = "NON_EXACT_FRACTION";
    pub const CROSS_FAMILY_OPERATION: &str = "CROSS_FAMILY_OPERATION";
    pub const UNSUPPORTED_OPERATION: &str = "UNSUPPORTED_OPERATION";
    pub const INVALID_TEMPERATURE_OPERATION: &str = "INVALID_TEMPERATURE_OPERATION";
    pub const SCALAR_PROMOTION_ERROR: &str = "SCALAR_PROMOTION_ERROR";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const OVERFLOW: &str = "OVERFLOW";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const TYPE_ERROR: &str = "TYPE_ERROR";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const UNDEFINED_FUNC: &str = "UNDEFINED_FUNC";
    pub const UNDEFINED_METHOD: &str = "UNDEFINED_METHOD";
    pub const UNDEFINED_FIELD: &str = "UNDEFINED_FIELD";
}

/// Context about where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Source text of the failing expression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured, human-first error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaugeError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Syntactically corrected code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,

    /// Where the error occurred
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

impl GaugeError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            example: None,
            context: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: add corrected example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Builder: record the failing expression
    pub fn in_expression(mut self, expression: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.expression = Some(expression.into());
        self
    }

    /// Builder: add propagation note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(details: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, format!("Could not read number: {}", details.into()))
            .with_example("12, 2.5 or 3/8")
    }

    pub fn div_zero() -> Self {
        Self::new(codes::DIV_ZERO, "Division by zero")
            .with_suggestion("Ensure the divisor is not zero")
            .with_example("#10m / 2")
    }

    pub fn overflow() -> Self {
        Self::new(codes::OVERFLOW, "The result is too large to store")
            .with_suggestion("Use a larger unit or smaller operands")
    }

    pub fn type_error(expected: &str, got: &str) -> Self {
        Self::new(codes::TYPE_ERROR, format!("Expected {}, got {}", expected, got))
    }

    pub fn arg_count(func: &str, expected: &str, got: usize) -> Self {
        Self::new(codes::ARG_COUNT,
            format!("{}() expects {} arguments, got {}", func, expected, got))
    }

    pub fn arg_type(func: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", func, arg, expected, got))
    }

    pub fn undefined_func(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FUNC, format!("Unknown function: {}", name))
    }

    pub fn undefined_method(type_name: &str, name: &str) -> Self {
        Self::new(codes::UNDEFINED_METHOD,
            format!("{} values have no method or property '{}'", type_name, name))
    }

    pub fn undefined_field(name: &str) -> Self {
        Self::new(codes::UNDEFINED_FIELD, format!("Field not found: {}", name))
    }
}

impl std::fmt::Display for GaugeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        if let Some(ref example) = self.example {
            write!(f, " (example: {})", example)?;
        }
        Ok(())
    }
}

impl std::error::Error for GaugeError {}

impl From<NumberError> for GaugeError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(s),
            NumberError::DivisionByZero => Self::div_zero(),
            NumberError::Overflow => Self::overflow(),
        }
    }
}
