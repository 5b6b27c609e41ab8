use crate::models::{Classification, ParameterStatus as S, Severity, VitalKind, VitalValue};

// ---------------------------------------------------------------------------
// Bands
// ---------------------------------------------------------------------------

/// One interval of a reference table: values below `upper` (and at or above the
/// previous band's `upper`) get `classification`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub classification: Classification,
}

const fn band(upper: f64, status: S, severity: Severity) -> Band {
    Band {
        upper,
        classification: Classification::new(status, severity),
    }
}

/// Classify `value` against contiguous, ascending bands. The last band is open-ended.
pub fn classify_bands(bands: &[Band], value: f64) -> Classification {
    if !value.is_finite() {
        return Classification::UNKNOWN;
    }
    bands
        .iter()
        .find(|b| value < b.upper)
        .map(|b| b.classification)
        .unwrap_or(Classification::UNKNOWN)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeBands {
    Scalar(&'static [Band]),
    /// Each component is classified on its own; the more severe result wins.
    Pressure {
        systolic: &'static [Band],
        diastolic: &'static [Band],
    },
    /// No population-level range applies (depends on age, sex, build).
    Unavailable,
}

/// Reference table entry for one kind, in its canonical unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRange {
    pub kind: VitalKind,
    /// Human-readable normal range for reports.
    pub normal_range: &'static str,
    pub bands: RangeBands,
}

impl ReferenceRange {
    /// Pure function of the table and the value. A value whose shape does not match
    /// the table (a scalar blood pressure) is `unknown`.
    pub fn classify(&self, value: &VitalValue) -> Classification {
        match (&self.bands, value) {
            (RangeBands::Scalar(bands), VitalValue::Scalar(v)) => classify_bands(bands, *v),
            (
                RangeBands::Pressure {
                    systolic,
                    diastolic,
                },
                VitalValue::Pressure {
                    systolic: sys,
                    diastolic: dia,
                },
            ) => classify_bands(systolic, f64::from(*sys))
                .more_severe(classify_bands(diastolic, f64::from(*dia))),
            _ => Classification::UNKNOWN,
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

const SYSTOLIC: &[Band] = &[
    band(90.0, S::Low, Severity::Borderline),
    band(121.0, S::Normal, Severity::Normal),
    band(130.0, S::Elevated, Severity::Borderline),
    band(140.0, S::HighStage1, Severity::Stage1),
    band(f64::INFINITY, S::HighStage2, Severity::Stage2),
];

const DIASTOLIC: &[Band] = &[
    band(60.0, S::Low, Severity::Borderline),
    band(81.0, S::Normal, Severity::Normal),
    band(90.0, S::HighStage1, Severity::Stage1),
    band(f64::INFINITY, S::HighStage2, Severity::Stage2),
];

const HEART_RATE: &[Band] = &[
    band(60.0, S::Low, Severity::Borderline),
    band(101.0, S::Normal, Severity::Normal),
    band(f64::INFINITY, S::High, Severity::Borderline),
];

// fasting values, mg/dL
const GLUCOSE: &[Band] = &[
    band(70.0, S::Low, Severity::Stage1),
    band(101.0, S::Normal, Severity::Normal),
    band(126.0, S::Prediabetes, Severity::Borderline),
    band(f64::INFINITY, S::Diabetes, Severity::Stage1),
];

const OXYGEN_SATURATION: &[Band] = &[
    band(90.0, S::Critical, Severity::Stage2),
    band(95.0, S::Low, Severity::Stage1),
    band(f64::INFINITY, S::Normal, Severity::Normal),
];

const BODY_TEMPERATURE: &[Band] = &[
    band(36.1, S::Low, Severity::Borderline),
    band(37.3, S::Normal, Severity::Normal),
    band(38.1, S::MildFever, Severity::Borderline),
    band(f64::INFINITY, S::HighFever, Severity::Stage1),
];

const BMI: &[Band] = &[
    band(18.5, S::Underweight, Severity::Borderline),
    band(25.0, S::Normal, Severity::Normal),
    band(30.0, S::Overweight, Severity::Borderline),
    band(f64::INFINITY, S::Obese, Severity::Stage1),
];

/// Static reference table, one entry per kind in report order.
pub static REFERENCE_RANGES: [ReferenceRange; 8] = [
    ReferenceRange {
        kind: VitalKind::BloodPressure,
        normal_range: "90-120/60-80 mmHg",
        bands: RangeBands::Pressure {
            systolic: SYSTOLIC,
            diastolic: DIASTOLIC,
        },
    },
    ReferenceRange {
        kind: VitalKind::HeartRate,
        normal_range: "60-100 bpm",
        bands: RangeBands::Scalar(HEART_RATE),
    },
    ReferenceRange {
        kind: VitalKind::Glucose,
        normal_range: "70-100 mg/dL (fasting)",
        bands: RangeBands::Scalar(GLUCOSE),
    },
    ReferenceRange {
        kind: VitalKind::OxygenSaturation,
        normal_range: "95-100%",
        bands: RangeBands::Scalar(OXYGEN_SATURATION),
    },
    ReferenceRange {
        kind: VitalKind::BodyTemperature,
        normal_range: "36.1-37.2°C",
        bands: RangeBands::Scalar(BODY_TEMPERATURE),
    },
    ReferenceRange {
        kind: VitalKind::Weight,
        normal_range: "varies by height/age",
        bands: RangeBands::Unavailable,
    },
    ReferenceRange {
        kind: VitalKind::Height,
        normal_range: "varies by age/gender",
        bands: RangeBands::Unavailable,
    },
    ReferenceRange {
        kind: VitalKind::Bmi,
        normal_range: "18.5-24.9 kg/m²",
        bands: RangeBands::Scalar(BMI),
    },
];

/// Reference entry for `kind`.
pub fn reference_for(kind: VitalKind) -> &'static ReferenceRange {
    // Table order matches VitalKind declaration order.
    &REFERENCE_RANGES[kind as usize]
}
