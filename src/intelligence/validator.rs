use crate::models::{round1, ExtractedParameter, VitalValue};

use super::reference::reference_for;

/// Moves extracted values into their canonical unit and labels them against
/// the reference table. Never rejects a parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueValidator;

impl ValueValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, mut param: ExtractedParameter) -> ExtractedParameter {
        if let VitalValue::Scalar(value) = param.value {
            let canonical = param.unit.canonical();
            if canonical != param.unit {
                let converted = round1(param.unit.to_canonical(value));
                tracing::debug!(
                    kind = param.kind.as_str(),
                    from = %param.unit,
                    to = %canonical,
                    value,
                    converted,
                    "Converted to canonical unit"
                );
                param.value = VitalValue::Scalar(converted);
                param.unit = canonical;
            }
        }

        param.classification = Some(reference_for(param.kind).classify(&param.value));
        param
    }

    pub fn validate_all(&self, params: Vec<ExtractedParameter>) -> Vec<ExtractedParameter> {
        params.into_iter().map(|p| self.validate(p)).collect()
    }
}
