//! Gauge Core - Fundamental types
//!
//! This crate provides the core types shared by the Gauge crates:
//! - `Number`: Exact rational numbers
//! - `GaugeError`: Structured errors with corrected examples

mod number;
mod error;

pub use number::{Number, NumberError};
pub use error::{GaugeError, ErrorContext, codes};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, GaugeError};
    pub use crate::error::codes;
}
