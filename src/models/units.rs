use serde::{Deserialize, Serialize};

/// Measurement unit recognised on a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mmHg")]
    MmHg,
    #[serde(rename = "bpm")]
    Bpm,
    #[serde(rename = "mg/dL")]
    MgPerDl,
    #[serde(rename = "mmol/L")]
    MmolPerL,
    #[serde(rename = "%")]
    Percent,
    #[serde(rename = "°C")]
    Celsius,
    #[serde(rename = "°F")]
    Fahrenheit,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "kg/m²")]
    KgPerSquareMeter,
}

/// Pounds to kilograms.
const KG_PER_LB: f64 = 0.453_592_37;

/// Glucose mmol/L to mg/dL.
const MG_DL_PER_MMOL_L: f64 = 18.0;

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::MmHg => "mmHg",
            Unit::Bpm => "bpm",
            Unit::MgPerDl => "mg/dL",
            Unit::MmolPerL => "mmol/L",
            Unit::Percent => "%",
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
            Unit::Kilogram => "kg",
            Unit::Pound => "lb",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::KgPerSquareMeter => "kg/m²",
        }
    }

    /// Parse a unit token as it appears in normalized (lower-cased) text.
    pub fn from_token(token: &str) -> Option<Self> {
        let compact: String = token
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "mmhg" => Some(Unit::MmHg),
            "bpm" | "b/min" | "battiti/min" => Some(Unit::Bpm),
            "mg/dl" => Some(Unit::MgPerDl),
            "mmol/l" => Some(Unit::MmolPerL),
            "%" => Some(Unit::Percent),
            "°c" | "°" => Some(Unit::Celsius),
            "°f" => Some(Unit::Fahrenheit),
            "kg" => Some(Unit::Kilogram),
            "lb" | "lbs" => Some(Unit::Pound),
            "cm" => Some(Unit::Centimeter),
            "m" => Some(Unit::Meter),
            "kg/m²" | "kg/m2" => Some(Unit::KgPerSquareMeter),
            _ => None,
        }
    }

    /// Unit that reference ranges are expressed in.
    pub fn canonical(self) -> Unit {
        match self {
            Unit::MmolPerL => Unit::MgPerDl,
            Unit::Fahrenheit => Unit::Celsius,
            Unit::Pound => Unit::Kilogram,
            Unit::Meter => Unit::Centimeter,
            other => other,
        }
    }

    /// Convert a value in this unit to the canonical unit (unrounded).
    pub fn to_canonical(self, value: f64) -> f64 {
        match self {
            Unit::MmolPerL => value * MG_DL_PER_MMOL_L,
            Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
            Unit::Pound => value * KG_PER_LB,
            Unit::Meter => value * 100.0,
            _ => value,
        }
    }

    /// Symbols written directly after the number ("96%", "36.7°C").
    fn is_attached(self) -> bool {
        matches!(self, Unit::Percent | Unit::Celsius | Unit::Fahrenheit)
    }

    /// Render `number` followed by this unit.
    pub fn display(self, number: &str) -> String {
        if self.is_attached() {
            format!("{number}{}", self.as_str())
        } else {
            format!("{number} {}", self.as_str())
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a measurement: integers without decimals, everything else with one.
pub fn format_number(value: f64) -> String {
    let rounded = round1(value);
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
