use serde::{Deserialize, Serialize};

use super::enums::{EnumParseError, ParameterStatus, Severity};
use super::units::{format_number, Unit};

/// Type of vital parameter a report can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    BloodPressure,
    HeartRate,
    Glucose,
    OxygenSaturation,
    BodyTemperature,
    Weight,
    Height,
    Bmi,
}

impl VitalKind {
    /// Kinds read directly from document text, in report order.
    pub const EXTRACTED: [VitalKind; 7] = [
        VitalKind::BloodPressure,
        VitalKind::HeartRate,
        VitalKind::Glucose,
        VitalKind::OxygenSaturation,
        VitalKind::BodyTemperature,
        VitalKind::Weight,
        VitalKind::Height,
    ];

    /// Every kind a report accounts for, derived metrics included.
    pub const ALL: [VitalKind; 8] = [
        VitalKind::BloodPressure,
        VitalKind::HeartRate,
        VitalKind::Glucose,
        VitalKind::OxygenSaturation,
        VitalKind::BodyTemperature,
        VitalKind::Weight,
        VitalKind::Height,
        VitalKind::Bmi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            VitalKind::BloodPressure => "blood_pressure",
            VitalKind::HeartRate => "heart_rate",
            VitalKind::Glucose => "glucose",
            VitalKind::OxygenSaturation => "oxygen_saturation",
            VitalKind::BodyTemperature => "body_temperature",
            VitalKind::Weight => "weight",
            VitalKind::Height => "height",
            VitalKind::Bmi => "bmi",
        }
    }

    /// Computed from other parameters rather than read from text.
    pub fn is_derived(self) -> bool {
        matches!(self, VitalKind::Bmi)
    }
}

impl std::str::FromStr for VitalKind {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VitalKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EnumParseError {
                field: "VitalKind".into(),
                value: s.into(),
            })
    }
}

/// Numeric payload of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VitalValue {
    Scalar(f64),
    Pressure { systolic: u16, diastolic: u16 },
}

impl VitalValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            VitalValue::Scalar(v) => Some(*v),
            VitalValue::Pressure { .. } => None,
        }
    }

    /// Number(s) without unit ("135/85", "36.7").
    pub fn display_number(&self) -> String {
        match self {
            VitalValue::Scalar(v) => format_number(*v),
            VitalValue::Pressure {
                systolic,
                diastolic,
            } => format!("{systolic}/{diastolic}"),
        }
    }
}

/// Status label plus the severity tier it was drawn from.
///
/// Field order matters: derived `Ord` compares severity first, then the label,
/// which is the tie-break used for composite values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Classification {
    pub severity: Severity,
    pub status: ParameterStatus,
}

impl Classification {
    pub const UNKNOWN: Classification = Classification {
        severity: Severity::Normal,
        status: ParameterStatus::Unknown,
    };

    pub const fn new(status: ParameterStatus, severity: Severity) -> Self {
        Self { severity, status }
    }

    /// The more severe of two classifications.
    pub fn more_severe(self, other: Classification) -> Classification {
        self.max(other)
    }
}

/// Byte range of a match inside the normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

/// A parameter located in document text.
///
/// Created by the extractor with the value in the unit found on the page; the
/// validator rewrites `value`/`unit` into the canonical unit and sets `classification`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParameter {
    pub kind: VitalKind,
    /// Matched slice of the normalized text.
    pub raw_text: String,
    pub value: VitalValue,
    pub unit: Unit,
    /// Unit as written in the document (or defaulted by the rule).
    pub source_unit: Unit,
    /// False when the unit was not written and the rule's default was applied.
    pub unit_explicit: bool,
    pub span: TextSpan,
    pub classification: Option<Classification>,
}

impl ExtractedParameter {
    pub fn status(&self) -> ParameterStatus {
        self.classification
            .map(|c| c.status)
            .unwrap_or(ParameterStatus::Unknown)
    }

    pub fn is_validated(&self) -> bool {
        self.classification.is_some()
    }

    /// Value with unit for display ("135/85 mmHg", "96%").
    pub fn display_value(&self) -> String {
        self.unit.display(&self.value.display_number())
    }
}

/// A parameter computed from other validated parameters (BMI).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedParameter {
    pub kind: VitalKind,
    pub value: f64,
    pub unit: Unit,
    pub classification: Classification,
}

impl DerivedParameter {
    pub fn display_value(&self) -> String {
        self.unit.display(&format_number(self.value))
    }
}
