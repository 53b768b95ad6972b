//! Immutable unit values

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::registry::{self, Family, System, UnitDescriptor};
use crate::UnitError;

/// A quantity stored as an integer count of its system's sub-unit.
///
/// Each variant carries the descriptor of its display unit. The display
/// unit never takes part in equality, ordering or hashing.
#[derive(Clone, Copy)]
pub enum UnitValue {
    /// Micrometres, milligrams, microlitres or bytes
    Si { amount: i64, unit: &'static UnitDescriptor },
    /// 1/725760 of a yard, ounce or quart
    Us { amount: i64, unit: &'static UnitDescriptor },
    /// 1/900 of a kelvin
    Temperature { amount: i64, unit: &'static UnitDescriptor },
}

impl UnitValue {
    /// Wrap a raw sub-unit amount, choosing the encoding from the unit's system
    pub fn from_amount(amount: i64, unit: &'static UnitDescriptor) -> Self {
        match unit.system {
            System::Si => UnitValue::Si { amount, unit },
            System::Us => UnitValue::Us { amount, unit },
            System::Temperature => UnitValue::Temperature { amount, unit },
        }
    }

    pub fn amount(&self) -> i64 {
        match self {
            UnitValue::Si { amount, .. }
            | UnitValue::Us { amount, .. }
            | UnitValue::Temperature { amount, .. } => *amount,
        }
    }

    /// Descriptor of the display unit
    pub fn unit(&self) -> &'static UnitDescriptor {
        match self {
            UnitValue::Si { unit, .. }
            | UnitValue::Us { unit, .. }
            | UnitValue::Temperature { unit, .. } => unit,
        }
    }

    pub fn family(&self) -> Family {
        self.unit().family
    }

    pub fn system(&self) -> System {
        self.unit().system
    }

    pub fn display_hint(&self) -> &'static str {
        self.unit().suffix
    }

    pub fn is_temperature(&self) -> bool {
        matches!(self, UnitValue::Temperature { .. })
    }

    /// Same encoding and display unit, different amount
    pub(crate) fn with_amount(&self, amount: i64) -> Self {
        Self::from_amount(amount, self.unit())
    }

    /// Exact value in the family's SI sub-unit as (numerator, positive denominator)
    pub(crate) fn si_ratio(&self) -> (i128, i128) {
        let amount = self.amount() as i128;
        match (self, registry::bridge(self.family())) {
            (UnitValue::Us { .. }, Some(bridge)) => {
                (amount * bridge.numerator, bridge.denominator)
            }
            _ => (amount, 1),
        }
    }

    /// Compare exact magnitudes of two same-family values
    fn exact_cmp(&self, other: &Self) -> Ordering {
        let (an, ad) = self.si_ratio();
        let (bn, bd) = other.si_ratio();
        (an * bd).cmp(&(bn * ad))
    }
}

impl PartialEq for UnitValue {
    fn eq(&self, other: &Self) -> bool {
        self.family() == other.family() && self.exact_cmp(other) == Ordering::Equal
    }
}

impl Eq for UnitValue {}

impl PartialOrd for UnitValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.family() == other.family()).then(|| self.exact_cmp(other))
    }
}

impl Hash for UnitValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let (num, den) = self.si_ratio();
        let g = crate::convert::gcd(num, den);
        self.family().hash(state);
        (num / g).hash(state);
        (den / g).hash(state);
    }
}

impl fmt::Debug for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self {
            UnitValue::Si { .. } => "Si",
            UnitValue::Us { .. } => "Us",
            UnitValue::Temperature { .. } => "Temperature",
        };
        f.debug_struct(variant)
            .field("amount", &self.amount())
            .field("unit", &self.display_hint())
            .finish()
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&crate::FormatOptions::default()))
    }
}

impl std::str::FromStr for UnitValue {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for UnitValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.repr())
    }
}

impl<'de> Deserialize<'de> for UnitValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn u(text: &str) -> UnitValue {
        UnitValue::parse(text).unwrap()
    }

    #[test]
    fn test_encoding_follows_system() {
        assert!(matches!(u("#1m"), UnitValue::Si { amount: 1_000_000, .. }));
        assert!(matches!(u("#1in"), UnitValue::Us { amount: 20_160, .. }));
        assert!(matches!(u("#0K"), UnitValue::Temperature { amount: 0, .. }));
    }

    #[test]
    fn test_accessors() {
        let v = u("#2.5kg");
        assert_eq!(v.amount(), 2_500_000);
        assert_eq!(v.family(), Family::Mass);
        assert_eq!(v.system(), System::Si);
        assert_eq!(v.display_hint(), "kg");
    }

    #[test]
    fn test_equality_ignores_display_hint() {
        assert_eq!(u("#254cm"), u("#2.54m"));
        assert_eq!(u("#1in"), u("#25.4mm"));
        assert_eq!(u("#1024B"), u("#1KiB"));
        assert_eq!(u("#0C"), u("#32F"));
        assert_eq!(u("#1lb"), u("#16oz"));
    }

    #[test]
    fn test_equality_is_symmetric_across_systems() {
        let a = u("#1ft");
        let b = u("#304.8mm");
        assert_eq!(a, b);
        assert_eq!(b, a);
    }

    #[test]
    fn test_different_families_never_equal() {
        assert_ne!(u("#1m"), u("#1g"));
        assert_eq!(u("#1m").partial_cmp(&u("#1g")), None);
    }

    #[test]
    fn test_kilobyte_kinds_differ() {
        assert_ne!(u("#64KB"), u("#64KiB"));
        assert!(u("#64KB") < u("#64KiB"));
        assert_eq!(u("#64KB"), u("#64kB"));
        assert_eq!(u("#64KB").display_hint(), "KB");
        assert_eq!(u("#64KB").format(&crate::FormatOptions::default()), "64KB");
    }

    #[test]
    fn test_ordering() {
        assert!(u("#1m") > u("#1ft"));
        assert!(u("#1mi") > u("#1km"));
        assert!(u("#-1C") < u("#0C"));
    }

    #[test]
    fn test_hash_consistent_with_eq() {
        let set: HashSet<UnitValue> = [u("#1in"), u("#25.4mm"), u("#2.54cm"), u("#2in")]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_serde_as_repr() {
        let v = u("#92+5/8in");
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"#92+5/8in\"");
        let back: UnitValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back.amount(), v.amount());
        assert_eq!(back.display_hint(), "in");
    }

    #[test]
    fn test_from_str() {
        let v: UnitValue = "#3L".parse().unwrap();
        assert_eq!(v.amount(), 3_000_000);
        assert!("#3xyz".parse::<UnitValue>().is_err());
    }

    #[test]
    fn test_debug_hides_descriptor() {
        assert_eq!(format!("{:?}", u("#5mm")), "Si { amount: 5000, unit: \"mm\" }");
    }
}
