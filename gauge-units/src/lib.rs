//! Gauge Units - Exact measurement values
//!
//! Quantities are stored as integer counts of a fixed sub-unit, so sums of
//! common fractions and round trips through text never drift.
//!
//! Families:
//! - Length (mm, cm, m, km, in, ft, yd, mi)
//! - Mass (mg, g, kg, t, oz, lb)
//! - Volume (mL, L, tsp, tbsp, floz, cup, pt, qt, gal)
//! - Data (B, kB, MB, GB, TB, KiB, MiB, GiB, TiB)
//! - Temperature (C, F, K)

mod error;
mod measure;
mod convert;
mod arith;
mod format;
pub mod registry;
pub mod literal;
pub mod diagnostics;

pub use error::UnitError;
pub use measure::UnitValue;
pub use format::{FormatOptions, CANONICAL_DENOMINATORS, MAX_PRECISION};
pub use convert::{resolve, resolve_expecting};
pub use registry::{Family, System, UnitDescriptor, REGISTRY};
pub use literal::{decode, decode_literal, DecodedLiteral, LiteralForm};

#[cfg(test)]
mod tests {
    use super::*;
    use gauge_core::Number;

    fn u(text: &str) -> UnitValue {
        UnitValue::parse(text).unwrap()
    }

    #[test]
    fn test_canonical_literals_round_trip() {
        for lit in ["#1in", "#3/8in", "#92+5/8in", "#1+1/2ft", "#2+1/2lb", "#3/4cup", "#1gal",
                    "#12m", "#12.3m", "#0.001mm", "#1.5kg", "#250mL", "#64kB", "#64KiB",
                    "#20C", "#-40F", "#300K", "#-2.5m"] {
            assert_eq!(u(lit).repr(), lit);
        }
    }

    #[test]
    fn test_fraction_sums_are_exact() {
        let sum = u("#3/8in").add(&u("#5/8in")).unwrap();
        assert_eq!(sum.amount(), u("#1in").amount());
        assert_eq!(sum.repr(), "#1in");
    }

    #[test]
    fn test_mixed_literal_amount() {
        assert_eq!(u("#92+5/8in").amount(), 1_867_320);
    }

    #[test]
    fn test_cross_system_identities() {
        assert!(u("#1in").equals(&u("#25.4mm")));
        assert!(u("#0C").equals(&u("#32F")));
        assert!(u("#1024B").equals(&u("#1KiB")));
        assert!(u("#254cm").equals(&u("#2.54m")));
    }

    #[test]
    fn test_kilobyte_alias() {
        assert_eq!(u("#64KB").value().mul(&Number::from_i64(1000)), Number::from_i64(64_000));
        assert_eq!(u("#64KB").amount(), 64_000);
        assert_eq!(u("#64KiB").amount(), 65_536);
        assert!(!u("#64KB").equals(&u("#64KiB")));
    }

    #[test]
    fn test_to_own_unit_keeps_amount() {
        for lit in ["#1m", "#92+5/8in", "#37C", "#5GiB", "#1/3cup"] {
            let v = u(lit);
            assert_eq!(v.to(v.display_hint()).unwrap().amount(), v.amount());
        }
    }

    #[test]
    fn test_repr_survives_conversion_chains() {
        let v = u("#1mi").to("km").unwrap().to("ft").unwrap();
        let back = UnitValue::parse(&v.repr()).unwrap();
        assert_eq!(back.amount(), v.amount());
        assert_eq!(back.system(), System::Us);
    }
}
