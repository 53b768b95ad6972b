//! Human-first error reports
//!
//! Turns `UnitError` into `GaugeError` with a plain-language message, a
//! suggestion and, where one exists, a corrected example. Messages talk
//! about units and families, never about sub-units or encodings.

use gauge_core::{codes, GaugeError};
use crate::registry::{self, Family, REGISTRY};
use crate::UnitError;

/// Largest edit distance still offered as a suggestion
const MAX_DISTANCE: usize = 2;

const MAX_SUGGESTIONS: usize = 3;

/// Levenshtein distance over chars
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == *cb { 0 } else { 1 };
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Known suffixes close to `input`, best first.
///
/// Spelled-out names (`meters`, `inches`) map straight to their suffix.
/// Otherwise candidates within the edit distance bound are ranked by
/// family match, then distance, then alphabetically.
pub fn suggest_suffixes(input: &str, family: Option<Family>) -> Vec<&'static str> {
    let named = [input.to_string(), format!("{}s", input), format!("{}es", input)]
        .iter()
        .find_map(|name| registry::constructor(name))
        .map(|d| d.suffix);

    let mut matches: Vec<(bool, usize, &'static str)> = REGISTRY.suffixes()
        .filter(|s| Some(*s) != named)
        .filter_map(|suffix| {
            let distance = edit_distance(input, suffix);
            if distance > MAX_DISTANCE {
                return None;
            }
            let other_family = match (family, registry::lookup(suffix)) {
                (Some(f), Some(d)) => d.family != f,
                _ => false,
            };
            Some((other_family, distance, suffix))
        })
        .collect();
    matches.sort();

    named.into_iter()
        .chain(matches.into_iter().map(|(_, _, s)| s))
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suffix used in corrected examples for a family
fn example_suffix(family: Family) -> &'static str {
    match family {
        Family::Length => "m",
        Family::Mass => "kg",
        Family::Volume => "L",
        Family::Data => "MB",
        Family::Temperature => "C",
    }
}

fn combine_example(family: Family) -> &'static str {
    match family {
        Family::Length => "#2m + #50cm",
        Family::Mass => "#2kg + #500g",
        Family::Volume => "#2L + #250mL",
        Family::Data => "#2MB + #512kB",
        Family::Temperature => "#20C + #5C",
    }
}

fn conversion_example(family: Family) -> &'static str {
    match family {
        Family::Length => "#1m.to(\"ft\")",
        Family::Mass => "#1kg.to(\"lb\")",
        Family::Volume => "#1L.to(\"qt\")",
        Family::Data => "#1MB.to(\"KiB\")",
        Family::Temperature => "#20C.to(\"F\")",
    }
}

fn or_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

impl From<UnitError> for GaugeError {
    fn from(err: UnitError) -> Self {
        match err {
            UnitError::MalformedLiteral { literal, reason } => GaugeError::new(
                codes::MALFORMED_LITERAL,
                format!("'{}' is not a valid unit literal: {}", literal, reason),
            )
            .with_suggestion("Write a number directly followed by a unit, like 12m, 2.5kg, 3/8in or 92+5/8in")
            .with_example("#92+5/8in"),

            UnitError::UnknownSuffix { suffix, suggestions, expected } => {
                let message = match expected {
                    Some(family) => format!("'{}' is not a known {} unit", suffix, family),
                    None => format!("'{}' is not a known unit", suffix),
                };
                let err = GaugeError::new(codes::UNKNOWN_UNIT_SUFFIX, message);
                match suggestions.first() {
                    Some(best) => err
                        .with_suggestion(format!("Did you mean {}?", or_list(&suggestions)))
                        .with_example(format!("#1{}", best)),
                    None => {
                        let known: Vec<&str> = match expected {
                            Some(family) => REGISTRY.suffixes_in(family).collect(),
                            None => REGISTRY.suffixes().collect(),
                        };
                        err.with_suggestion(format!("Known units: {}", known.join(", ")))
                    }
                }
            }

            UnitError::NonExactFraction { value, suffix, name } => GaugeError::new(
                codes::NON_EXACT_FRACTION,
                format!("{}{} cannot be stored exactly as a US Customary {}", value, suffix, name),
            )
            .with_suggestion(
                "Use halves through sixty-fourths, thirds, fifths, sevenths or ninths, or an SI unit",
            )
            .with_example(format!("#3/8{}", suffix)),

            UnitError::CrossFamily { op: "convert", left, right } => GaugeError::new(
                codes::CROSS_FAMILY_OPERATION,
                format!("Cannot convert a {} value to a {} unit", left, right),
            )
            .with_suggestion(format!(
                "Pick a {} unit such as {}",
                left,
                REGISTRY.suffixes_in(left).collect::<Vec<_>>().join(", ")
            ))
            .with_example(conversion_example(left)),

            UnitError::CrossFamily { op, left, right } => GaugeError::new(
                codes::CROSS_FAMILY_OPERATION,
                format!("Cannot {} {} and {} values", op, left, right),
            )
            .with_suggestion("Units only combine with units of the same family")
            .with_example(combine_example(left)),

            UnitError::Unsupported(message) => {
                GaugeError::new(codes::UNSUPPORTED_OPERATION, message)
            }

            UnitError::InvalidTemperature { op } => GaugeError::new(
                codes::INVALID_TEMPERATURE_OPERATION,
                format!("Cannot {} a temperature", op),
            )
            .with_suggestion("Temperatures can be added, subtracted, negated, compared and converted; \
                              use .value to work with the plain number")
            .with_example("#20C.value * 2"),

            UnitError::ScalarPromotion { op, family } => {
                let s = example_suffix(family);
                GaugeError::new(
                    codes::SCALAR_PROMOTION_ERROR,
                    format!("Cannot {} a plain number and a {} value", op, family),
                )
                .with_suggestion("Give the number a unit")
                .with_example(format!("#0{} - #6{}", s, s))
            }

            UnitError::DivisionByZero => GaugeError::div_zero(),
            UnitError::Overflow => GaugeError::overflow(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitValue;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kg", "kg"), 0);
        assert_eq!(edit_distance("kgs", "kg"), 1);
        assert_eq!(edit_distance("mtr", "m"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("flz", "floz"), 1);
    }

    #[test]
    fn test_suggestions_ranked() {
        assert_eq!(suggest_suffixes("kgs", None).first(), Some(&"kg"));
        assert_eq!(suggest_suffixes("flz", None).first(), Some(&"floz"));
        assert!(suggest_suffixes("kgs", None).len() <= MAX_SUGGESTIONS);
        assert!(suggest_suffixes("zzzzzz", None).is_empty());
    }

    #[test]
    fn test_suggestions_prefer_family() {
        // "mb" is close to units in several families
        let length = suggest_suffixes("mb", Some(Family::Length));
        assert_eq!(length.first(), Some(&"m"));
        let data = suggest_suffixes("mb", Some(Family::Data));
        assert_eq!(data.first(), Some(&"B"));
    }

    #[test]
    fn test_suggestions_from_spelled_names() {
        assert_eq!(suggest_suffixes("meters", None).first(), Some(&"m"));
        assert_eq!(suggest_suffixes("inch", None).first(), Some(&"in"));
        assert_eq!(suggest_suffixes("gram", None).first(), Some(&"g"));
    }

    #[test]
    fn test_unknown_suffix_report() {
        let err: GaugeError = UnitValue::parse("#5kgs").unwrap_err().into();
        assert_eq!(err.code, codes::UNKNOWN_UNIT_SUFFIX);
        assert!(err.message.contains("kgs"));
        assert!(err.suggestion.unwrap().contains("kg"));
        assert_eq!(err.example.as_deref(), Some("#1kg"));
    }

    #[test]
    fn test_unknown_suffix_without_suggestions_lists_units() {
        let err: GaugeError = UnitValue::parse("#5zzzzzz").unwrap_err().into();
        assert!(err.suggestion.unwrap().starts_with("Known units: mm, cm"));
        assert!(err.example.is_none());
    }

    #[test]
    fn test_non_exact_report() {
        let err: GaugeError = UnitValue::parse("#1/11in").unwrap_err().into();
        assert_eq!(err.code, codes::NON_EXACT_FRACTION);
        assert_eq!(err.message, "1/11in cannot be stored exactly as a US Customary inch");
        assert_eq!(err.example.as_deref(), Some("#3/8in"));
    }

    #[test]
    fn test_cross_family_reports() {
        let m = UnitValue::parse("#1m").unwrap();
        let kg = UnitValue::parse("#1kg").unwrap();

        let err: GaugeError = m.add(&kg).unwrap_err().into();
        assert_eq!(err.code, codes::CROSS_FAMILY_OPERATION);
        assert_eq!(err.message, "Cannot add length and mass values");

        let err: GaugeError = m.to("kg").unwrap_err().into();
        assert_eq!(err.message, "Cannot convert a length value to a mass unit");
        assert_eq!(err.example.as_deref(), Some("#1m.to(\"ft\")"));
    }

    #[test]
    fn test_temperature_report() {
        let c = UnitValue::parse("#20C").unwrap();
        let err: GaugeError = c.mul_scalar(&gauge_core::Number::from_i64(2)).unwrap_err().into();
        assert_eq!(err.code, codes::INVALID_TEMPERATURE_OPERATION);
        assert_eq!(err.example.as_deref(), Some("#20C.value * 2"));
    }

    #[test]
    fn test_scalar_promotion_report() {
        let err: GaugeError = UnitError::ScalarPromotion { op: "subtract", family: Family::Temperature }.into();
        assert_eq!(err.code, codes::SCALAR_PROMOTION_ERROR);
        assert_eq!(err.example.as_deref(), Some("#0C - #6C"));
    }

    #[test]
    fn test_messages_do_not_leak_encodings() {
        let errors = [
            UnitValue::parse("#1/11in").unwrap_err(),
            UnitValue::parse("#9000000000000km").unwrap_err(),
            UnitValue::parse("#1m").unwrap().to("C").unwrap_err(),
        ];
        for err in errors {
            let report: GaugeError = err.into();
            let text = report.to_string().to_lowercase();
            assert!(!text.contains("sub-unit") && !text.contains("725760"), "{}", text);
        }
    }
}
