//! Evaluation Context

use crate::Value;

/// Evaluation context passed to plugins and methods
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    /// Decimal places for `format()` without an argument; each unit's own
    /// default when None
    pub precision: Option<u32>,
    pub tracing: bool,
    pub trace: Vec<TraceStep>,
}

/// Single step in evaluation trace
#[derive(Debug, Clone)]
pub struct TraceStep {
    pub operation: String,
    pub inputs: Vec<Value>,
    pub result: Value,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.tracing = enabled;
        self
    }

    pub fn record_trace(&mut self, operation: String, inputs: Vec<Value>, result: Value) {
        if self.tracing {
            self.trace.push(TraceStep { operation, inputs, result });
        }
    }
}
