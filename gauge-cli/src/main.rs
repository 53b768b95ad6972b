//! Gauge line tool
//!
//! Reads one expression per line from stdin and writes one JSON object per
//! line to stdout:
//!
//! - `#92+5/8in` describes the literal
//! - `#1in -> mm` converts it first
//!
//! Logs go to stderr; set `GAUGE_LOG` (error, warn, info, debug, trace) to
//! change the level.

use gauge_runtime::{Runtime, Value};
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, BufRead, Write};
use tracing::{debug, info, warn, Level};

const CONVERSION_ARROW: &str = "->";

fn init_logging() {
    let level = env::var("GAUGE_LOG")
        .ok()
        .and_then(|s| s.trim().parse::<Level>().ok())
        .unwrap_or(Level::WARN);
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn value_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::String(n.to_exact_string()),
        Value::Text(s) => JsonValue::String(s.clone()),
        Value::Unit(u) => JsonValue::String(u.repr()),
        Value::List(l) => JsonValue::Array(l.iter().map(value_to_json).collect()),
        Value::Object(o) => JsonValue::Object(o.iter().map(|(k, v)| (k.clone(), value_to_json(v))).collect()),
        Value::Error(e) => serde_json::to_value(e)
            .unwrap_or_else(|_| json!({"code": e.code, "message": e.message})),
    }
}

/// Describe one input line as JSON
fn describe(rt: &mut Runtime, line: &str) -> JsonValue {
    let (literal, target) = match line.split_once(CONVERSION_ARROW) {
        Some((literal, suffix)) => (literal.trim(), Some(suffix.trim())),
        None => (line.trim(), None),
    };

    let mut value = rt.literal(literal);
    if let Some(suffix) = target {
        value = rt.method(&value, "to", &[Value::from(suffix)]);
    }

    if let Value::Error(e) = &value {
        debug!(input = line, code = %e.code, "input rejected");
        return json!({ "input": line, "error": value_to_json(&value) });
    }

    json!({
        "input": line,
        "repr": value_to_json(&rt.method(&value, "repr", &[])),
        "format": value_to_json(&rt.method(&value, "format", &[])),
        "toDict": value_to_json(&rt.method(&value, "toDict", &[])),
    })
}

fn main() {
    init_logging();

    let mut rt = Runtime::with_standard_library();
    info!(version = env!("CARGO_PKG_VERSION"), "gauge started");

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let output = describe(&mut rt, line);
                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", output) {
                    warn!(error = %e, "error writing output");
                    break;
                }
                if let Err(e) = stdout.flush() {
                    warn!(error = %e, "error flushing stdout");
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("gauge finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_literal() {
        let mut rt = Runtime::with_standard_library();
        let out = describe(&mut rt, "#92+5/8in");
        assert_eq!(out["repr"], "#92+5/8in");
        assert_eq!(out["format"], "92+5/8in");
        assert_eq!(out["toDict"]["value"], "92.625");
        assert_eq!(out["toDict"]["system"], "US");
    }

    #[test]
    fn test_describe_repeating_value() {
        let mut rt = Runtime::with_standard_library();
        let out = describe(&mut rt, "#1/3cup");
        assert_eq!(out["repr"], "#1/3cup");
        assert_eq!(out["toDict"]["value"], "1/3");
    }

    #[test]
    fn test_describe_conversion() {
        let mut rt = Runtime::with_standard_library();
        let out = describe(&mut rt, "#1in -> mm");
        assert_eq!(out["repr"], "#25.4mm");
        assert_eq!(out["toDict"]["unit"], "mm");
    }

    #[test]
    fn test_describe_error() {
        let mut rt = Runtime::with_standard_library();
        let out = describe(&mut rt, "#1m -> kg");
        assert_eq!(out["error"]["code"], "CROSS_FAMILY_OPERATION");
        assert_eq!(out["error"]["example"], "#1m.to(\"ft\")");

        let out = describe(&mut rt, "#5kgs");
        assert_eq!(out["error"]["code"], "UNKNOWN_UNIT_SUFFIX");
        assert!(out.get("repr").is_none());
    }
}
