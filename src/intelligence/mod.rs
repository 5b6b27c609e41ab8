//! Clinical judgement over extracted parameters: reference ranges, validation,
//! derived metrics and risk aggregation.

pub mod derived;
pub mod reference;
pub mod risk;
pub mod validator;

pub use derived::{compute_bmi, derive_all};
pub use reference::{reference_for, ReferenceRange, REFERENCE_RANGES};
pub use risk::{Finding, RiskAssessment, RiskAssessor, RiskFactor, RiskPolicy};
pub use validator::ValueValidator;
