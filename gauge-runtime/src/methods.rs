//! Properties and methods on unit values
//!
//! `#12m.value`, `#1in.to("mm")`, `#2.5lb.format(2)` and friends.

use crate::{EvalContext, Value};
use gauge_core::{GaugeError, Number};
use gauge_units::diagnostics::edit_distance;
use gauge_units::{FormatOptions, UnitValue, MAX_PRECISION};

/// Readable without parentheses
pub const PROPERTIES: [&str; 4] = ["value", "unit", "family", "system"];

/// Callable with parentheses
pub const METHODS: [&str; 7] = ["to", "abs", "format", "repr", "toDict", "inspect", "toFraction"];

/// Read a property such as `value` or `family`
pub fn property(value: &UnitValue, name: &str) -> Value {
    match name {
        "value" => Value::Number(value.value()),
        "unit" => Value::from(value.display_hint()),
        "family" => Value::from(value.family().name()),
        "system" => Value::from(value.system().name()),
        _ if METHODS.contains(&name) => Value::Error(
            GaugeError::undefined_method("Unit", name)
                .with_suggestion(format!("{} is a method, call it with parentheses", name))
                .with_example(format!("#12m.{}()", name)),
        ),
        _ => Value::Error(unknown_member(name)),
    }
}

/// Call a method such as `to("mm")` or `format(2)`
pub fn call_method(value: &UnitValue, name: &str, args: &[Value], ctx: &EvalContext) -> Value {
    if let Some(e) = args.iter().find_map(|a| a.as_error()) {
        return Value::Error(e.clone().with_note(format!("from argument to {}()", name)));
    }

    match name {
        "to" => match args {
            [Value::Text(suffix)] => value.to(suffix).into(),
            [other] => Value::Error(
                GaugeError::arg_type("to", "suffix", "Text", other.type_name())
                    .with_example("#1in.to(\"mm\")"),
            ),
            _ => Value::Error(GaugeError::arg_count("to", "1", args.len())),
        },
        "abs" => no_args(name, args).unwrap_or_else(|| value.abs().into()),
        "format" => match args {
            [] => Value::Text(value.format(&FormatOptions {
                precision: ctx.precision,
                pad: false,
            })),
            [Value::Number(n)] => match precision_arg(n) {
                Some(places) => Value::Text(value.format(&FormatOptions::with_precision(places))),
                None => Value::Error(
                    GaugeError::arg_type(
                        "format",
                        "precision",
                        &format!("integer from 0 to {}", MAX_PRECISION),
                        &n.to_string(),
                    )
                        .with_example("#12.3m.format(2)"),
                ),
            },
            [other] => Value::Error(
                GaugeError::arg_type("format", "precision", "Number", other.type_name())
                    .with_example("#12.3m.format(2)"),
            ),
            _ => Value::Error(GaugeError::arg_count("format", "0 or 1", args.len())),
        },
        "repr" => no_args(name, args).unwrap_or_else(|| Value::Text(value.repr())),
        "toDict" => no_args(name, args).unwrap_or_else(|| to_dict(value)),
        "inspect" => no_args(name, args).unwrap_or_else(|| inspect(value)),
        "toFraction" => no_args(name, args).unwrap_or_else(|| value.to_fraction().into()),
        _ if PROPERTIES.contains(&name) => Value::Error(
            GaugeError::undefined_method("Unit", name)
                .with_suggestion(format!("{} is a property, read it without parentheses", name))
                .with_example(format!("#12m.{}", name)),
        ),
        _ => Value::Error(unknown_member(name)),
    }
}

fn no_args(name: &str, args: &[Value]) -> Option<Value> {
    if args.is_empty() {
        None
    } else {
        Some(Value::Error(GaugeError::arg_count(name, "0", args.len())))
    }
}

/// Decimal places in `0..=MAX_PRECISION`
fn precision_arg(n: &Number) -> Option<u32> {
    if n.is_negative() {
        return None;
    }
    n.to_i64()
        .and_then(|p| u32::try_from(p).ok())
        .filter(|p| *p <= MAX_PRECISION)
}

/// `{value, unit, family, system}`
pub fn to_dict(value: &UnitValue) -> Value {
    Value::object([
        ("value", Value::Number(value.value())),
        ("unit", Value::from(value.display_hint())),
        ("family", Value::from(value.family().name())),
        ("system", Value::from(value.system().name())),
    ])
}

/// `toDict()` plus the stored amount, for debugging
pub fn inspect(value: &UnitValue) -> Value {
    Value::object([
        ("__type", Value::from("unit")),
        ("value", Value::Number(value.value())),
        ("unit", Value::from(value.display_hint())),
        ("family", Value::from(value.family().name())),
        ("system", Value::from(value.system().name())),
        ("amount", Value::from(value.amount())),
        ("displayHint", Value::from(value.display_hint())),
    ])
}

fn unknown_member(name: &str) -> GaugeError {
    let mut close: Vec<(usize, &str)> = PROPERTIES.iter()
        .chain(METHODS.iter())
        .map(|m| (edit_distance(&name.to_lowercase(), &m.to_lowercase()), *m))
        .filter(|(d, _)| *d <= 2)
        .collect();
    close.sort();

    let err = GaugeError::undefined_method("Unit", name);
    match close.first() {
        Some((_, best)) if PROPERTIES.contains(best) => err
            .with_suggestion(format!("Did you mean .{}?", best))
            .with_example(format!("#12m.{}", best)),
        Some((_, best)) => err
            .with_suggestion(format!("Did you mean .{}()?", best))
            .with_example(format!("#12m.{}()", best)),
        None => err.with_suggestion(format!(
            "Unit values have {} and {}()",
            PROPERTIES.join(", "),
            METHODS.join("(), ")
        )),
    }
}
