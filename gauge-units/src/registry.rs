//! Unit families, suffixes and system bridges
//!
//! Every supported suffix is listed once in `DESCRIPTORS`; spelling
//! variants live in `ALIASES`. The lookup maps are built on first use and
//! never change afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use serde::Serialize;

/// Fixed denominator of the US Customary encoding: 2^8 · 3^4 · 5 · 7.
///
/// Halves through sixty-fourths, thirds, fifths, sevenths and ninths of the
/// family base all land on whole sub-units.
pub const HCN: i64 = 725_760;

/// Sub-kelvin units per kelvin
pub const SUB_KELVIN: i64 = 900;

/// Quantity family. Values only combine within one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Length,
    Mass,
    Volume,
    Data,
    Temperature,
}

impl Family {
    pub fn name(&self) -> &'static str {
        match self {
            Family::Length => "length",
            Family::Mass => "mass",
            Family::Volume => "volume",
            Family::Data => "data",
            Family::Temperature => "temperature",
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Measurement system, which also selects the internal encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum System {
    #[serde(rename = "SI")]
    Si,
    #[serde(rename = "US")]
    Us,
    #[serde(rename = "temperature")]
    Temperature,
}

impl System {
    pub fn name(&self) -> &'static str {
        match self {
            System::Si => "SI",
            System::Us => "US",
            System::Temperature => "temperature",
        }
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Affine scale of a temperature suffix, in sub-kelvins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureScale {
    /// Sub-kelvins per degree
    pub scale: i64,
    /// Sub-kelvin amount of this scale's zero
    pub zero_offset: i64,
}

/// Registry entry for one suffix
#[derive(Debug, PartialEq, Eq)]
pub struct UnitDescriptor {
    pub suffix: &'static str,
    /// Singular long name used in messages
    pub name: &'static str,
    pub family: Family,
    pub system: System,
    /// Sub-units per one unit of this suffix
    pub multiplier: i64,
    /// Decimal places used by `format()` without an explicit precision
    pub default_places: u32,
    pub temperature: Option<TemperatureScale>,
    /// Named constructors, primary spelling first
    pub constructors: &'static [&'static str],
}

impl UnitDescriptor {
    pub fn is_temperature(&self) -> bool {
        self.system == System::Temperature
    }
}

/// Exact SI sub-units per US sub-unit of one family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeRatio {
    pub numerator: i128,
    pub denominator: i128,
}

const fn si(
    suffix: &'static str,
    name: &'static str,
    family: Family,
    multiplier: i64,
    default_places: u32,
    constructors: &'static [&'static str],
) -> UnitDescriptor {
    UnitDescriptor {
        suffix, name, family, system: System::Si, multiplier, default_places,
        temperature: None, constructors,
    }
}

const fn us(
    suffix: &'static str,
    name: &'static str,
    family: Family,
    multiplier: i64,
    constructors: &'static [&'static str],
) -> UnitDescriptor {
    UnitDescriptor {
        suffix, name, family, system: System::Us, multiplier, default_places: 4,
        temperature: None, constructors,
    }
}

const fn temp(
    suffix: &'static str,
    name: &'static str,
    scale: i64,
    zero_offset: i64,
    constructors: &'static [&'static str],
) -> UnitDescriptor {
    UnitDescriptor {
        suffix, name, family: Family::Temperature, system: System::Temperature,
        multiplier: scale, default_places: 1,
        temperature: Some(TemperatureScale { scale, zero_offset }),
        constructors,
    }
}

static DESCRIPTORS: [UnitDescriptor; 35] = [
    // Length: SI in micrometres, US in 1/HCN yard
    si("mm", "millimetre", Family::Length, 1_000, 3, &["millimetres", "millimeters"]),
    si("cm", "centimetre", Family::Length, 10_000, 4, &["centimetres", "centimeters"]),
    si("m", "metre", Family::Length, 1_000_000, 6, &["metres", "meters"]),
    si("km", "kilometre", Family::Length, 1_000_000_000, 9, &["kilometres", "kilometers"]),
    us("in", "inch", Family::Length, HCN / 36, &["inches"]),
    us("ft", "foot", Family::Length, HCN / 3, &["feet"]),
    us("yd", "yard", Family::Length, HCN, &["yards"]),
    us("mi", "mile", Family::Length, HCN * 1_760, &["miles"]),

    // Mass: SI in milligrams, US in 1/HCN ounce
    si("mg", "milligram", Family::Mass, 1, 0, &["milligrams"]),
    si("g", "gram", Family::Mass, 1_000, 3, &["grams"]),
    si("kg", "kilogram", Family::Mass, 1_000_000, 6, &["kilograms"]),
    si("t", "tonne", Family::Mass, 1_000_000_000, 9, &["tonnes", "metric_tons"]),
    us("oz", "ounce", Family::Mass, HCN, &["ounces"]),
    us("lb", "pound", Family::Mass, HCN * 16, &["pounds"]),

    // Volume: SI in microlitres, US in 1/HCN quart
    si("mL", "millilitre", Family::Volume, 1_000, 3, &["millilitres", "milliliters"]),
    si("L", "litre", Family::Volume, 1_000_000, 6, &["litres", "liters"]),
    us("tsp", "teaspoon", Family::Volume, HCN / 192, &["teaspoons"]),
    us("tbsp", "tablespoon", Family::Volume, HCN / 64, &["tablespoons"]),
    us("floz", "fluid ounce", Family::Volume, HCN / 32, &["fluid_ounces"]),
    us("cup", "cup", Family::Volume, HCN / 4, &["cups"]),
    us("pt", "pint", Family::Volume, HCN / 2, &["pints"]),
    us("qt", "quart", Family::Volume, HCN, &["quarts"]),
    us("gal", "gallon", Family::Volume, HCN * 4, &["gallons"]),

    // Digital storage in bytes
    si("B", "byte", Family::Data, 1, 0, &["bytes"]),
    si("kB", "kilobyte", Family::Data, 1_000, 3, &["kilobytes"]),
    si("MB", "megabyte", Family::Data, 1_000_000, 6, &["megabytes"]),
    si("GB", "gigabyte", Family::Data, 1_000_000_000, 9, &["gigabytes"]),
    si("TB", "terabyte", Family::Data, 1_000_000_000_000, 12, &["terabytes"]),
    si("KiB", "kibibyte", Family::Data, 1 << 10, 2, &["kibibytes"]),
    si("MiB", "mebibyte", Family::Data, 1 << 20, 2, &["mebibytes"]),
    si("GiB", "gibibyte", Family::Data, 1 << 30, 2, &["gibibytes"]),
    si("TiB", "tebibyte", Family::Data, 1 << 40, 2, &["tebibytes"]),

    // Temperature in sub-kelvins (1 K = 900)
    temp("C", "degree Celsius", 900, 245_835, &["celsius"]),
    temp("F", "degree Fahrenheit", 500, 229_835, &["fahrenheit"]),
    temp("K", "kelvin", 900, 0, &["kelvin"]),
];

/// Alternate spellings. Each keeps its own suffix so values display the
/// way they were written, with the same multiplier as its canonical unit.
static ALIASES: [UnitDescriptor; 1] = [
    si("KB", "kilobyte", Family::Data, 1_000, 3, &[]),
];

/// Global family registry
pub static REGISTRY: LazyLock<FamilyRegistry> = LazyLock::new(FamilyRegistry::new);

/// Suffix and constructor lookup over the static descriptor table
pub struct FamilyRegistry {
    units: HashMap<&'static str, &'static UnitDescriptor>,
    constructors: HashMap<&'static str, &'static UnitDescriptor>,
}

impl FamilyRegistry {
    fn new() -> Self {
        let mut registry = FamilyRegistry {
            units: HashMap::new(),
            constructors: HashMap::new(),
        };
        for descriptor in DESCRIPTORS.iter().chain(ALIASES.iter()) {
            registry.register(descriptor);
        }
        registry
    }

    fn register(&mut self, descriptor: &'static UnitDescriptor) {
        self.units.insert(descriptor.suffix, descriptor);
        for name in descriptor.constructors {
            self.constructors.insert(*name, descriptor);
        }
    }

    /// Get a descriptor by suffix or alias. Suffixes are case-sensitive.
    pub fn get(&self, suffix: &str) -> Option<&'static UnitDescriptor> {
        self.units.get(suffix).copied()
    }

    pub fn constructor(&self, name: &str) -> Option<&'static UnitDescriptor> {
        self.constructors.get(name).copied()
    }

    /// Canonical suffixes, in table order
    pub fn suffixes(&self) -> impl Iterator<Item = &'static str> {
        DESCRIPTORS.iter().map(|d| d.suffix)
    }

    pub fn suffixes_in(&self, family: Family) -> impl Iterator<Item = &'static str> {
        DESCRIPTORS.iter().filter(move |d| d.family == family).map(|d| d.suffix)
    }

    /// Named constructors with their descriptors, in table order
    pub fn constructors(&self) -> impl Iterator<Item = (&'static str, &'static UnitDescriptor)> {
        DESCRIPTORS.iter()
            .flat_map(|d| d.constructors.iter().map(move |name| (*name, d)))
    }

    pub fn bridge(&self, family: Family) -> Option<BridgeRatio> {
        match family {
            // 1 in = 25.4 mm exactly
            Family::Length => Some(BridgeRatio { numerator: 635, denominator: 504 }),
            // 1 lb = 453.59237 g exactly
            Family::Mass => Some(BridgeRatio { numerator: 45_359_237, denominator: 1_161_216_000 }),
            // 1 qt = 0.946352946 L exactly
            Family::Volume => Some(BridgeRatio { numerator: 946_352_946, denominator: 725_760_000 }),
            Family::Data | Family::Temperature => None,
        }
    }
}

/// Look up a suffix in the global registry
pub fn lookup(suffix: &str) -> Option<&'static UnitDescriptor> {
    REGISTRY.get(suffix)
}

/// Resolve a named constructor such as `metres` or `liters`
pub fn constructor(name: &str) -> Option<&'static UnitDescriptor> {
    REGISTRY.constructor(name)
}

pub fn bridge(family: Family) -> Option<BridgeRatio> {
    REGISTRY.bridge(family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_suffixes() {
        assert_eq!(lookup("m").unwrap().family, Family::Length);
        assert_eq!(lookup("lb").unwrap().system, System::Us);
        assert_eq!(lookup("L").unwrap().family, Family::Volume);
        assert_eq!(lookup("C").unwrap().system, System::Temperature);
        assert!(lookup("xyz").is_none());
    }

    #[test]
    fn test_suffixes_are_case_sensitive() {
        assert!(lookup("M").is_none());
        assert_eq!(lookup("mL").unwrap().suffix, "mL");
        assert!(lookup("ml").is_none());
    }

    #[test]
    fn test_kb_alias() {
        let kb = lookup("KB").unwrap();
        assert_eq!(kb.suffix, "KB");
        assert_eq!(kb.multiplier, lookup("kB").unwrap().multiplier);
        assert_eq!(kb.family, Family::Data);
        assert!(!REGISTRY.suffixes().any(|s| s == "KB"));
        assert_eq!(lookup("KiB").unwrap().multiplier, 1_024);
    }

    #[test]
    fn test_us_multipliers() {
        assert_eq!(lookup("in").unwrap().multiplier, 20_160);
        assert_eq!(lookup("ft").unwrap().multiplier, 241_920);
        assert_eq!(lookup("mi").unwrap().multiplier, 1_277_337_600);
        assert_eq!(lookup("lb").unwrap().multiplier, 11_612_160);
        assert_eq!(lookup("tsp").unwrap().multiplier, 3_780);
        assert_eq!(lookup("tbsp").unwrap().multiplier, 11_340);
        assert_eq!(lookup("floz").unwrap().multiplier, 22_680);
        assert_eq!(lookup("gal").unwrap().multiplier, 2_903_040);
    }

    #[test]
    fn test_hcn_divides_common_denominators() {
        for den in [2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 16, 32, 64] {
            assert_eq!(HCN % den, 0, "denominator {}", den);
        }
    }

    #[test]
    fn test_temperature_scales() {
        let c = lookup("C").unwrap().temperature.unwrap();
        let f = lookup("F").unwrap().temperature.unwrap();
        // 0 C and 32 F are the same sub-kelvin amount
        assert_eq!(c.zero_offset, 32 * f.scale + f.zero_offset);
        assert_eq!(c.scale, SUB_KELVIN);
    }

    #[test]
    fn test_constructors() {
        assert_eq!(constructor("metres").unwrap().suffix, "m");
        assert_eq!(constructor("meters").unwrap().suffix, "m");
        assert_eq!(constructor("liters").unwrap().suffix, "L");
        assert_eq!(constructor("fluid_ounces").unwrap().suffix, "floz");
        assert_eq!(constructor("kibibytes").unwrap().suffix, "KiB");
        assert!(constructor("furlongs").is_none());
    }

    #[test]
    fn test_constructor_names_are_unique() {
        let names: Vec<_> = REGISTRY.constructors().map(|(n, _)| n).collect();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
    }

    #[test]
    fn test_suffixes_in_family() {
        let data: Vec<_> = REGISTRY.suffixes_in(Family::Data).collect();
        assert!(data.contains(&"KiB"));
        assert!(!data.contains(&"m"));
    }

    #[test]
    fn test_bridges() {
        let length = bridge(Family::Length).unwrap();
        // 1 in: 20160 sub-yards -> 25400 um
        assert_eq!(20_160 * length.numerator / length.denominator, 25_400);
        assert!(bridge(Family::Data).is_none());
        assert!(bridge(Family::Temperature).is_none());
    }
}
