//! Gauge Runtime - Host-facing surface for unit values
//!
//! Provides:
//! - `Value`: dynamic values a host script sees, including unit values
//! - Function plugins and a registry for named constructors
//! - Property, method and operator dispatch

mod value;
mod traits;
mod registry;
mod context;
mod constructors;
pub mod methods;
pub mod ops;

pub use value::Value;
pub use traits::{FunctionPlugin, FunctionMeta, ArgMeta};
pub use registry::FunctionRegistry;
pub use context::{EvalContext, TraceStep};
pub use constructors::{load_units_library, NamedConstructor, UnitFn};
pub use ops::{BinaryOp, UnaryOp};

use gauge_core::GaugeError;
use gauge_units::literal::{classify_sigil, scan_unit_literal, SigilKind};
use gauge_units::UnitValue;
use std::sync::Arc;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{
        FunctionPlugin, FunctionMeta, ArgMeta, FunctionRegistry, EvalContext, TraceStep, Value,
    };
    pub use gauge_core::prelude::*;
    pub use gauge_units::UnitValue;
}

/// Main Gauge runtime
pub struct Runtime {
    registry: Arc<FunctionRegistry>,
    ctx: EvalContext,
}

impl Runtime {
    pub fn new(registry: FunctionRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx: EvalContext::new(),
        }
    }

    pub fn with_standard_library() -> Self {
        Self::new(load_units_library(FunctionRegistry::new()))
    }

    /// Default decimal places for `format()` without an argument
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.ctx = self.ctx.with_precision(precision);
        self
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.ctx = self.ctx.with_tracing(enabled);
        self
    }

    pub fn registry(&self) -> Arc<FunctionRegistry> {
        self.registry.clone()
    }

    /// Evaluate a unit literal such as `#92+5/8in`
    pub fn literal(&mut self, text: &str) -> Value {
        let result: Value = match UnitValue::parse(text) {
            Ok(v) => Value::Unit(v),
            Err(e) => Value::Error(GaugeError::from(e).in_expression(text)),
        };
        self.ctx.record_trace(format!("literal {}", text), vec![], result.clone());
        result
    }

    /// Evaluate every unit literal in a line of host source, in order.
    /// Currency literals (`USD#12.50`) are skipped.
    pub fn scan(&mut self, src: &str) -> Vec<Value> {
        let mut values = Vec::new();
        let mut pos = 0;
        while let Some(offset) = src[pos..].find('#') {
            let start = pos + offset;
            match classify_sigil(src, start) {
                Some(SigilKind::Unit) => {
                    let span = scan_unit_literal(src, start).unwrap_or(start..start + 1);
                    values.push(self.literal(&src[span.clone()]));
                    pos = span.end.max(start + 1);
                }
                _ => pos = start + 1,
            }
        }
        values
    }

    /// Call a registered function, e.g. `metres(5)` or `unit(2.5, "kg")`
    pub fn call(&mut self, name: &str, args: &[Value]) -> Value {
        let result = self.registry.call_function(name, args, &self.ctx);
        self.ctx.record_trace(format!("{}()", name), args.to_vec(), result.clone());
        result
    }

    /// Read a property, e.g. `.value`
    pub fn property(&mut self, target: &Value, name: &str) -> Value {
        let result = match target {
            Value::Unit(u) => methods::property(u, name),
            Value::Object(_) => target.get(name),
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(GaugeError::undefined_method(other.type_name(), name)),
        };
        self.ctx.record_trace(format!(".{}", name), vec![target.clone()], result.clone());
        result
    }

    /// Call a method, e.g. `.to("mm")`
    pub fn method(&mut self, target: &Value, name: &str, args: &[Value]) -> Value {
        let result = match target {
            Value::Unit(u) => methods::call_method(u, name, args, &self.ctx),
            Value::Error(e) => Value::Error(e.clone()),
            other => Value::Error(GaugeError::undefined_method(other.type_name(), name)),
        };
        let mut inputs = vec![target.clone()];
        inputs.extend_from_slice(args);
        self.ctx.record_trace(format!(".{}()", name), inputs, result.clone());
        result
    }

    pub fn binary(&mut self, op: BinaryOp, left: &Value, right: &Value) -> Value {
        let result = ops::binary(op, left, right);
        self.ctx.record_trace(op.symbol().to_string(), vec![left.clone(), right.clone()], result.clone());
        result
    }

    pub fn unary(&mut self, op: UnaryOp, value: &Value) -> Value {
        let result = ops::unary(op, value);
        self.ctx.record_trace("neg".to_string(), vec![value.clone()], result.clone());
        result
    }

    pub fn trace(&self) -> &[TraceStep] {
        &self.ctx.trace
    }

    /// Errors produced so far, when tracing is enabled
    pub fn errors(&self) -> Vec<GaugeError> {
        self.ctx.trace.iter()
            .filter_map(|s| if let Value::Error(e) = &s.result { Some(e.clone()) } else { None })
            .collect()
    }

    pub fn help(&self, name: Option<&str>) -> Value {
        self.registry.help(name)
    }

    pub fn list_functions(&self, category: Option<&str>) -> Value {
        self.registry.list_functions(category)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::with_standard_library()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_core::{codes, Number};

    fn runtime() -> Runtime {
        Runtime::with_standard_library()
    }

    fn repr(v: &Value) -> String {
        match v {
            Value::Unit(u) => u.repr(),
            other => panic!("expected unit, got {:?}", other),
        }
    }

    #[test]
    fn test_literal() {
        let mut rt = runtime();
        assert_eq!(repr(&rt.literal("#92+5/8in")), "#92+5/8in");
        let err = rt.literal("#5kgs");
        let err = err.as_error().unwrap();
        assert_eq!(err.code, codes::UNKNOWN_UNIT_SUFFIX);
        assert_eq!(err.context.as_ref().unwrap().expression.as_deref(), Some("#5kgs"));
    }

    #[test]
    fn test_scan_line() {
        let mut rt = runtime();
        let values = rt.scan("#1m+#2m and USD#12.50 then #92+5/8in; # not a literal");
        let reprs: Vec<String> = values.iter().map(repr).collect();
        assert_eq!(reprs, vec!["#1m", "#2m", "#92+5/8in"]);
    }

    #[test]
    fn test_cabinet_cut_list() {
        // Two side panels and a top, in inches, then the total in cm
        let mut rt = runtime();
        let side = rt.literal("#30+3/8in");
        let top = rt.literal("#23+5/8in");
        let two_sides = rt.binary(BinaryOp::Mul, &Value::from(2), &side);
        let total = rt.binary(BinaryOp::Add, &two_sides, &top);
        assert_eq!(repr(&total), "#84+3/8in");

        let cm = rt.method(&total, "to", &[Value::from("cm")]);
        assert_eq!(rt.method(&cm, "format", &[]), Value::from("214.3125cm"));
    }

    #[test]
    fn test_recipe_scaling() {
        let mut rt = runtime();
        let flour = rt.call("cups", &[Value::Number(Number::from_ratio(3, 4))]);
        let scaled = rt.binary(BinaryOp::Mul, &flour, &Value::Number(Number::from_ratio(2, 3)));
        assert_eq!(repr(&scaled), "#1/2cup");
        let tbsp = rt.method(&scaled, "to", &[Value::from("tbsp")]);
        assert_eq!(repr(&tbsp), "#8tbsp");
    }

    #[test]
    fn test_temperature_session() {
        let mut rt = runtime();
        let freezing = rt.literal("#0C");
        let drop = rt.literal("#6C");
        assert_eq!(repr(&rt.binary(BinaryOp::Sub, &freezing, &drop)), "#-6C");
        let bad = rt.binary(BinaryOp::Sub, &Value::from(0), &drop);
        assert_eq!(bad.as_error().unwrap().code, codes::SCALAR_PROMOTION_ERROR);
        let fahrenheit = rt.literal("#32F");
        assert_eq!(rt.binary(BinaryOp::Eq, &freezing, &fahrenheit), Value::Bool(true));
    }

    #[test]
    fn test_property_dispatch() {
        let mut rt = runtime();
        let v = rt.literal("#2+1/2lb");
        assert_eq!(rt.property(&v, "value"), Value::Number(Number::from_ratio(5, 2)));
        let dict = rt.method(&v, "toDict", &[]);
        assert_eq!(rt.property(&dict, "system"), Value::from("US"));
        let err = rt.property(&Value::from(1), "value");
        assert_eq!(err.as_error().unwrap().code, codes::UNDEFINED_METHOD);
    }

    #[test]
    fn test_errors_propagate_through_methods() {
        let mut rt = runtime();
        let bad = rt.literal("#1/11in");
        let converted = rt.method(&bad, "to", &[Value::from("mm")]);
        assert_eq!(converted.as_error().unwrap().code, codes::NON_EXACT_FRACTION);
    }

    #[test]
    fn test_tracing_records_steps() {
        let mut rt = runtime().with_tracing(true);
        let a = rt.literal("#1m");
        rt.unary(UnaryOp::Neg, &a);
        rt.call("kilograms", &[a.clone()]);
        assert_eq!(rt.trace().len(), 3);
        assert_eq!(rt.trace()[1].operation, "neg");
        let errors = rt.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, codes::CROSS_FAMILY_OPERATION);
    }

    #[test]
    fn test_tracing_off_by_default() {
        let mut rt = runtime();
        rt.literal("#1m");
        assert!(rt.trace().is_empty());
    }

    #[test]
    fn test_context_precision() {
        let mut rt = runtime().with_precision(1);
        let v = rt.literal("#12.34m");
        assert_eq!(rt.method(&v, "format", &[]), Value::from("12.3m"));
    }

    #[test]
    fn test_help_lists_constructors() {
        let rt = runtime();
        let help = rt.help(Some("unit"));
        assert_eq!(help.get("usage"), Value::from("unit(value, suffix)"));
        match rt.list_functions(Some("temperature")) {
            Value::List(items) => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
    }
}
