//! Unit errors

use thiserror::Error;
use crate::registry::Family;

/// Failures raised while decoding, constructing or combining unit values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("'{literal}' is not a valid unit literal: {reason}")]
    MalformedLiteral { literal: String, reason: &'static str },

    #[error("unknown unit '{suffix}'")]
    UnknownSuffix {
        suffix: String,
        /// Closest known suffixes, best first
        suggestions: Vec<&'static str>,
        /// Family expected at the call site, when known
        expected: Option<Family>,
    },

    #[error("{value}{suffix} cannot be stored exactly as a US Customary {name}")]
    NonExactFraction { value: String, suffix: &'static str, name: &'static str },

    #[error("cannot {op} {left} and {right}")]
    CrossFamily { op: &'static str, left: Family, right: Family },

    #[error("{0}")]
    Unsupported(String),

    #[error("cannot {op} a temperature")]
    InvalidTemperature { op: &'static str },

    #[error("cannot {op} a plain number and a {family} value")]
    ScalarPromotion { op: &'static str, family: Family },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result is too large to store")]
    Overflow,
}

impl UnitError {
    pub(crate) fn malformed(literal: &str, reason: &'static str) -> Self {
        UnitError::MalformedLiteral { literal: literal.to_string(), reason }
    }
}
