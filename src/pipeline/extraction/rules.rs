use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::models::{Unit, VitalKind, VitalValue};

/// Separator tolerated between a label and its value. Never matches a newline.
const GAP: &str = r"[ :=.,;\-]*(?:\([^)\n]*\)[ :=.,;\-]*)?";

/// Capture groups a rule pattern may define.
const VALUE_GROUPS: [&str; 4] = ["v", "sys", "dia", "unit"];

/// Shape of the value a rule produces, with its plausibility window in the canonical unit.
#[derive(Debug, Clone)]
pub enum ValueShape {
    Scalar {
        window: RangeInclusive<f64>,
        /// Unit assumed when the text carries none.
        default_unit: fn(f64) -> Unit,
    },
    Pressure {
        systolic: RangeInclusive<u16>,
        diastolic: RangeInclusive<u16>,
    },
}

/// How one parameter kind is found and parsed.
pub struct ExtractionRule {
    pub kind: VitalKind,
    /// Label-anchored patterns. An earlier pattern wins ties at the same text offset.
    pub patterns: Vec<Regex>,
    /// Unit-anchored patterns without a label, only consulted when no labelled
    /// pattern yields a valid reading.
    pub fallbacks: Vec<Regex>,
    pub accepted_units: &'static [Unit],
    pub shape: ValueShape,
}

/// A parsed value before validation, still in the unit found on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub value: VitalValue,
    pub unit: Unit,
    pub unit_explicit: bool,
}

/// Why a pattern match was discarded.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchRejection {
    #[error("value is not a number: {0:?}")]
    Unparseable(String),

    #[error("unit not accepted: {0:?}")]
    UnitNotAccepted(String),

    #[error("implausible value {value} {unit}")]
    Implausible { value: f64, unit: Unit },

    #[error("diastolic {diastolic} not below systolic {systolic}")]
    InvertedPressure { systolic: u16, diastolic: u16 },
}

impl ExtractionRule {
    /// Parse one match of any of this rule's patterns.
    pub fn parse(&self, caps: &Captures<'_>) -> Result<Reading, MatchRejection> {
        match &self.shape {
            ValueShape::Scalar {
                window,
                default_unit,
            } => {
                let raw = capture(caps, "v");
                let value: f64 = raw
                    .parse()
                    .map_err(|_| MatchRejection::Unparseable(raw.to_string()))?;
                let (unit, unit_explicit) = match caps.name("unit") {
                    Some(m) => (self.accept_unit(m.as_str())?, true),
                    None => (default_unit(value), false),
                };
                let canonical = unit.to_canonical(value);
                if !window.contains(&canonical) {
                    return Err(MatchRejection::Implausible {
                        value: canonical,
                        unit: unit.canonical(),
                    });
                }
                Ok(Reading {
                    value: VitalValue::Scalar(value),
                    unit,
                    unit_explicit,
                })
            }
            ValueShape::Pressure {
                systolic,
                diastolic,
            } => {
                let sys = parse_pressure(capture(caps, "sys"))?;
                let dia = parse_pressure(capture(caps, "dia"))?;
                if dia >= sys {
                    return Err(MatchRejection::InvertedPressure {
                        systolic: sys,
                        diastolic: dia,
                    });
                }
                for (component, window) in [(sys, systolic), (dia, diastolic)] {
                    if !window.contains(&component) {
                        return Err(MatchRejection::Implausible {
                            value: f64::from(component),
                            unit: Unit::MmHg,
                        });
                    }
                }
                let unit_explicit = caps.name("unit").is_some();
                Ok(Reading {
                    value: VitalValue::Pressure {
                        systolic: sys,
                        diastolic: dia,
                    },
                    unit: Unit::MmHg,
                    unit_explicit,
                })
            }
        }
    }

    fn accept_unit(&self, token: &str) -> Result<Unit, MatchRejection> {
        Unit::from_token(token)
            .filter(|unit| self.accepted_units.contains(unit))
            .ok_or_else(|| MatchRejection::UnitNotAccepted(token.to_string()))
    }
}

fn capture<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map(|m| m.as_str()).unwrap_or_default()
}

fn parse_pressure(raw: &str) -> Result<u16, MatchRejection> {
    raw.parse()
        .map_err(|_| MatchRejection::Unparseable(raw.to_string()))
}

/// End of the last value or unit group, so trailing delimiters are not part of the match text.
pub fn value_end(caps: &Captures<'_>) -> Option<usize> {
    VALUE_GROUPS
        .iter()
        .filter_map(|name| caps.name(name))
        .map(|m| m.end())
        .max()
}

fn labelled(labels: &str, value: &str, unit: Option<&str>) -> Regex {
    let unit = unit
        .map(|u| format!("(?: ?(?P<unit>{u}))?"))
        .unwrap_or_default();
    Regex::new(&format!(r"\b(?:{labels}){GAP}{value}{unit}")).unwrap()
}

const SCALAR: &str = r"(?P<v>\d+(?:\.\d+)?)";

/// One rule per base kind, in report order.
pub static EXTRACTION_RULES: LazyLock<Vec<ExtractionRule>> = LazyLock::new(|| {
    vec![
        ExtractionRule {
            kind: VitalKind::BloodPressure,
            patterns: vec![
                labelled(
                    r"pressione arteriosa|pressione|press\. ?art\.?|p\.?a\.?|blood pressure|bp",
                    r"(?P<sys>\d+) ?/ ?(?P<dia>\d+)",
                    Some(r"mm ?hg"),
                ),
                Regex::new(&format!(
                    r"\b(?:sistolica|systolic)(?: pressure)?{GAP}(?P<sys>\d+)[^\n]*?\b(?:diastolica|diastolic)(?: pressure)?{GAP}(?P<dia>\d+)(?: ?(?P<unit>mm ?hg))?"
                ))
                .unwrap(),
            ],
            fallbacks: vec![
                Regex::new(r"\b(?P<sys>\d+) ?/ ?(?P<dia>\d+) ?(?P<unit>mm ?hg)").unwrap(),
            ],
            accepted_units: &[Unit::MmHg],
            shape: ValueShape::Pressure {
                systolic: 70..=250,
                diastolic: 40..=150,
            },
        },
        ExtractionRule {
            kind: VitalKind::HeartRate,
            patterns: vec![
                labelled(
                    r"frequenza cardiaca|frequenza|freq\.? ?card\.?|fc|polso|battiti cardiaci|battiti|heart rate|pulse rate|pulse",
                    SCALAR,
                    Some(r"bpm|b/min|battiti/min"),
                ),
            ],
            fallbacks: vec![Regex::new(r"\b(?P<v>\d+) ?(?P<unit>bpm)\b").unwrap()],
            accepted_units: &[Unit::Bpm],
            shape: ValueShape::Scalar {
                window: 40.0..=200.0,
                default_unit: |_| Unit::Bpm,
            },
        },
        ExtractionRule {
            kind: VitalKind::Glucose,
            patterns: vec![
                labelled(
                    r"glucosio nel sangue|glicemia|glucosio|blood glucose|glucose|gluc|bg",
                    SCALAR,
                    Some(r"mg ?/ ?dl|mmol ?/ ?l"),
                ),
            ],
            fallbacks: vec![Regex::new(r"\b(?P<v>\d+(?:\.\d+)?) ?(?P<unit>mg/dl)").unwrap()],
            accepted_units: &[Unit::MgPerDl, Unit::MmolPerL],
            shape: ValueShape::Scalar {
                window: 50.0..=500.0,
                default_unit: |_| Unit::MgPerDl,
            },
        },
        ExtractionRule {
            kind: VitalKind::OxygenSaturation,
            patterns: vec![
                labelled(
                    r"saturazione (?:di |dell'?)?(?:ossigeno|o2)|saturazione|sat\.? ?o2|sp[o0]2|ossigenazione|oxygen saturation|o2 sat",
                    SCALAR,
                    Some("%"),
                ),
                Regex::new(&format!(r"\bo2{GAP}{SCALAR} ?(?P<unit>%)")).unwrap(),
            ],
            fallbacks: Vec::new(),
            accepted_units: &[Unit::Percent],
            shape: ValueShape::Scalar {
                window: 70.0..=100.0,
                default_unit: |_| Unit::Percent,
            },
        },
        ExtractionRule {
            kind: VitalKind::BodyTemperature,
            patterns: vec![
                labelled(
                    r"temperatura corporea|temperatura|body temperature|temperature|temp\.?|febbre|fever",
                    SCALAR,
                    Some(r"°[cf]|°"),
                ),
            ],
            fallbacks: vec![Regex::new(r"\b(?P<v>\d+\.\d) ?(?P<unit>°[cf])").unwrap()],
            accepted_units: &[Unit::Celsius, Unit::Fahrenheit],
            shape: ValueShape::Scalar {
                window: 35.0..=42.0,
                // Unit-less readings in the nineties are Fahrenheit.
                default_unit: |v| {
                    if v >= 90.0 {
                        Unit::Fahrenheit
                    } else {
                        Unit::Celsius
                    }
                },
            },
        },
        ExtractionRule {
            kind: VitalKind::Weight,
            patterns: vec![
                labelled(
                    r"peso corporeo|peso|body weight|weight|wt",
                    SCALAR,
                    Some(r"kg|lbs?"),
                ),
            ],
            fallbacks: vec![
                // "kg/m²" belongs to BMI
                Regex::new(r"\b(?P<v>\d+(?:\.\d+)?) ?(?P<unit>kg|lbs?)(?:$|[^/\w])").unwrap(),
            ],
            accepted_units: &[Unit::Kilogram, Unit::Pound],
            shape: ValueShape::Scalar {
                window: 20.0..=300.0,
                default_unit: |_| Unit::Kilogram,
            },
        },
        ExtractionRule {
            kind: VitalKind::Height,
            patterns: vec![
                labelled(
                    r"altezza|statura|height|ht|tall",
                    SCALAR,
                    Some(r"cm|m\b"),
                ),
            ],
            fallbacks: vec![
                Regex::new(r"\b(?P<v>\d{3}) ?(?P<unit>cm)\b").unwrap(),
                Regex::new(r"\b(?P<v>\d\.\d{2}) ?(?P<unit>m)\b").unwrap(),
            ],
            accepted_units: &[Unit::Centimeter, Unit::Meter],
            shape: ValueShape::Scalar {
                window: 100.0..=250.0,
                default_unit: |v| {
                    if v < 3.0 {
                        Unit::Meter
                    } else {
                        Unit::Centimeter
                    }
                },
            },
        },
    ]
});
