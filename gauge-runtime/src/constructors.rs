//! Unit constructors
//!
//! One function per named constructor (`metres(5)`, `inches(3/8)`) plus the
//! generic `unit(value, suffix)`. Called with a number they create a value;
//! called with a unit value they convert it.

use crate::{ArgMeta, EvalContext, FunctionMeta, FunctionPlugin, FunctionRegistry, Value};
use gauge_core::GaugeError;
use gauge_units::{resolve, UnitDescriptor, UnitValue, REGISTRY};
use tracing::trace;

/// Create `value` in `unit`, or convert a unit value to it
fn create_or_convert(func: &str, value: &Value, unit: &'static UnitDescriptor) -> Value {
    match value {
        Value::Number(n) => UnitValue::from_number(n, unit).into(),
        Value::Unit(u) => u.convert_to(unit).into(),
        Value::Error(e) => Value::Error(e.clone()),
        other => Value::Error(
            GaugeError::arg_type(func, "value", "Number or Unit", other.type_name())
                .with_example(format!("{}(3)", func)),
        ),
    }
}

// ============ named constructors ============

/// Constructor bound to one unit, e.g. `feet`
pub struct NamedConstructor {
    name: &'static str,
    unit: &'static UnitDescriptor,
}

impl NamedConstructor {
    pub fn new(name: &'static str, unit: &'static UnitDescriptor) -> Self {
        Self { name, unit }
    }

    pub fn unit(&self) -> &'static UnitDescriptor {
        self.unit
    }
}

static NAMED_ARGS: [ArgMeta; 1] = [
    ArgMeta::required("value", "Number | Unit", "Amount to create, or a unit value to convert"),
];

static NAMED_EXAMPLES: [&str; 3] = [
    "metres(5) → 5m",
    "inches(3/8) → 3/8in",
    "feet(#1m) → 3.2808ft",
];

static NAMED_RELATED: [&str; 1] = ["unit"];

impl FunctionPlugin for NamedConstructor {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: self.name,
            description: "Create a value in this unit from a number, or convert a unit value to it",
            usage: "<unit>(value)",
            args: &NAMED_ARGS,
            returns: "Unit",
            examples: &NAMED_EXAMPLES,
            category: self.unit.family.name(),
            related: &NAMED_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        if args.len() != 1 {
            return Value::Error(GaugeError::arg_count(self.name, "1", args.len()));
        }
        trace!(constructor = self.name, suffix = self.unit.suffix, "named constructor");
        create_or_convert(self.name, &args[0], self.unit)
    }
}

// ============ unit ============

pub struct UnitFn;

static UNIT_ARGS: [ArgMeta; 2] = [
    ArgMeta::required("value", "Number | Unit", "Amount to create, or a unit value to convert"),
    ArgMeta::optional("suffix", "Text", "Target unit suffix (e.g., \"mm\")"),
];

static UNIT_EXAMPLES: [&str; 4] = [
    "unit(2.5, \"kg\") → 2.5kg",
    "unit(92+5/8, \"in\") → 92+5/8in",
    "unit(#1in, \"mm\") → 25.4mm",
    "unit(#1in) → 1in",
];

static UNIT_RELATED: [&str; 3] = ["metres", "inches", "celsius"];

impl FunctionPlugin for UnitFn {
    fn meta(&self) -> FunctionMeta {
        FunctionMeta {
            name: "unit",
            description: "Create a unit value from a number and suffix, or convert one",
            usage: "unit(value, suffix)",
            args: &UNIT_ARGS,
            returns: "Unit",
            examples: &UNIT_EXAMPLES,
            category: "units",
            related: &UNIT_RELATED,
        }
    }

    fn call(&self, args: &[Value], _ctx: &EvalContext) -> Value {
        match args {
            [Value::Error(e), ..] => Value::Error(e.clone()),
            [Value::Unit(u)] => Value::Unit(*u),
            [value, suffix] => {
                let suffix = match suffix {
                    Value::Text(s) => s,
                    Value::Error(e) => return Value::Error(e.clone()),
                    other => {
                        return Value::Error(
                            GaugeError::arg_type("unit", "suffix", "Text", other.type_name())
                                .with_example("unit(2.5, \"kg\")"),
                        )
                    }
                };
                let target = match value {
                    Value::Unit(u) => gauge_units::resolve_expecting(suffix, Some(u.family())),
                    _ => resolve(suffix),
                };
                match target {
                    Ok(unit) => create_or_convert("unit", value, unit),
                    Err(e) => Value::Error(e.into()),
                }
            }
            [other] => Value::Error(
                GaugeError::arg_type("unit", "value", "Unit", other.type_name())
                    .with_suggestion("Pass a suffix to create a unit value from a number")
                    .with_example("unit(2.5, \"kg\")"),
            ),
            _ => Value::Error(GaugeError::arg_count("unit", "1 or 2", args.len())),
        }
    }
}

/// Load unit constructors into registry
pub fn load_units_library(registry: FunctionRegistry) -> FunctionRegistry {
    REGISTRY
        .constructors()
        .fold(registry, |registry, (name, unit)| {
            registry.with_function(NamedConstructor::new(name, unit))
        })
        .with_function(UnitFn)
}
