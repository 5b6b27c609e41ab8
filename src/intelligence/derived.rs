use crate::models::{round1, DerivedParameter, ExtractedParameter, Unit, VitalKind, VitalValue};

use super::reference::reference_for;

/// BMI from validated weight (kg) and height (cm). Absent unless both inputs
/// are present, validated and scalar in their canonical unit.
pub fn compute_bmi(params: &[ExtractedParameter]) -> Option<DerivedParameter> {
    let weight = canonical_scalar(params, VitalKind::Weight, Unit::Kilogram)?;
    let height_cm = canonical_scalar(params, VitalKind::Height, Unit::Centimeter)?;
    if weight <= 0.0 || height_cm <= 0.0 {
        return None;
    }

    let height_m = height_cm / 100.0;
    let bmi = round1(weight / (height_m * height_m));
    let classification = reference_for(VitalKind::Bmi).classify(&VitalValue::Scalar(bmi));

    Some(DerivedParameter {
        kind: VitalKind::Bmi,
        value: bmi,
        unit: Unit::KgPerSquareMeter,
        classification,
    })
}

fn canonical_scalar(params: &[ExtractedParameter], kind: VitalKind, unit: Unit) -> Option<f64> {
    params
        .iter()
        .find(|p| p.kind == kind && p.is_validated() && p.unit == unit)
        .and_then(|p| p.value.as_scalar())
}

/// Every derived metric computable from `params`.
pub fn derive_all(params: &[ExtractedParameter]) -> Vec<DerivedParameter> {
    compute_bmi(params).into_iter().collect()
}
