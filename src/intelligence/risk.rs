//! Risk aggregation over classified parameters.
//!
//! Each clinically significant status maps to exactly one risk factor through a fixed
//! rule table. The table order is the output order of factors and recommendations
//! (cardiovascular, metabolic, respiratory, systemic), independent of extraction order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{
    BodySystem, Classification, DerivedParameter, ExtractedParameter, ParameterStatus as S,
    RiskLevel, Severity, VitalKind,
};

/// Recommendation when factors exist but none carries advice, or nothing is abnormal.
pub const ROUTINE_RECOMMENDATION: &str = "Continue regular check-ups";

/// Recommendation when the document yielded no parameters at all.
pub const NO_DATA_RECOMMENDATION: &str =
    "No vital parameters could be read; review the source document manually";

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Thresholds that turn risk factors into an overall level and an attention flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Factor count at which the overall level becomes high.
    pub high_risk_factor_count: usize,
    /// Distinct abnormal body systems that require attention.
    pub attention_min_systems: usize,
    /// Minimum factor severity for a body system to count as abnormal.
    pub attention_min_severity: Severity,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            high_risk_factor_count: 3,
            attention_min_systems: 2,
            attention_min_severity: Severity::Stage1,
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs and outputs
// ---------------------------------------------------------------------------

/// A classified parameter as seen by the assessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    pub kind: VitalKind,
    pub classification: Classification,
}

impl From<&ExtractedParameter> for Finding {
    fn from(param: &ExtractedParameter) -> Self {
        Self {
            kind: param.kind,
            classification: param.classification.unwrap_or(Classification::UNKNOWN),
        }
    }
}

impl From<&DerivedParameter> for Finding {
    fn from(param: &DerivedParameter) -> Self {
        Self {
            kind: param.kind,
            classification: param.classification,
        }
    }
}

/// One contributing condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskFactor {
    pub description: &'static str,
    pub kind: VitalKind,
    pub system: BodySystem,
    pub classification: Classification,
    pub recommendations: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall_risk_level: RiskLevel,
    pub risk_factors: Vec<String>,
    pub risk_factor_count: usize,
    pub recommendations: Vec<String>,
    pub requires_medical_attention: bool,
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

struct RiskRule {
    kind: VitalKind,
    statuses: &'static [S],
    description: &'static str,
    system: BodySystem,
    recommendations: &'static [&'static str],
}

/// Fixed priority order.
const RISK_RULES: &[RiskRule] = &[
    RiskRule {
        kind: VitalKind::BloodPressure,
        statuses: &[S::HighStage1, S::HighStage2],
        description: "Hypertension",
        system: BodySystem::Cardiovascular,
        recommendations: &[
            "Consult a physician about elevated blood pressure",
            "Reduce dietary salt intake",
        ],
    },
    RiskRule {
        kind: VitalKind::HeartRate,
        statuses: &[S::Low, S::High],
        description: "Abnormal heart rate",
        system: BodySystem::Cardiovascular,
        recommendations: &[],
    },
    RiskRule {
        kind: VitalKind::Glucose,
        statuses: &[S::Prediabetes, S::Diabetes],
        description: "Elevated blood glucose",
        system: BodySystem::Metabolic,
        recommendations: &[
            "Diabetology check-up",
            "Regular blood glucose monitoring",
        ],
    },
    RiskRule {
        kind: VitalKind::Glucose,
        statuses: &[S::Low],
        description: "Low blood glucose",
        system: BodySystem::Metabolic,
        recommendations: &["Repeat glucose measurement and review diet"],
    },
    RiskRule {
        kind: VitalKind::Bmi,
        statuses: &[S::Underweight, S::Obese],
        description: "Abnormal BMI",
        system: BodySystem::Metabolic,
        recommendations: &["Nutritional counselling"],
    },
    RiskRule {
        kind: VitalKind::OxygenSaturation,
        statuses: &[S::Low, S::Critical],
        description: "Low oxygen saturation",
        system: BodySystem::Respiratory,
        recommendations: &["Urgent medical consultation"],
    },
    RiskRule {
        kind: VitalKind::BodyTemperature,
        statuses: &[S::MildFever, S::HighFever],
        description: "Fever",
        system: BodySystem::Systemic,
        recommendations: &["Monitor body temperature", "Ensure adequate hydration"],
    },
];

// ---------------------------------------------------------------------------
// Assessor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct RiskAssessor {
    policy: RiskPolicy,
}

impl RiskAssessor {
    pub fn new(policy: RiskPolicy) -> Self {
        Self { policy }
    }

    /// Contributing factors in rule-table order.
    pub fn risk_factors(&self, findings: &[Finding]) -> Vec<RiskFactor> {
        RISK_RULES
            .iter()
            .filter_map(|rule| {
                findings
                    .iter()
                    .find(|f| f.kind == rule.kind && rule.statuses.contains(&f.classification.status))
                    .map(|f| RiskFactor {
                        description: rule.description,
                        kind: rule.kind,
                        system: rule.system,
                        classification: f.classification,
                        recommendations: rule.recommendations,
                    })
            })
            .collect()
    }

    pub fn assess(&self, findings: &[Finding]) -> RiskAssessment {
        if findings.is_empty() {
            return RiskAssessment {
                overall_risk_level: RiskLevel::Low,
                risk_factors: Vec::new(),
                risk_factor_count: 0,
                recommendations: vec![NO_DATA_RECOMMENDATION.to_string()],
                requires_medical_attention: false,
            };
        }

        let factors = self.risk_factors(findings);
        let level = self.overall_level(&factors);
        let requires_medical_attention = self.requires_attention(level, &factors);

        let mut recommendations: Vec<String> = factors
            .iter()
            .flat_map(|f| f.recommendations.iter().map(|r| r.to_string()))
            .collect();
        if recommendations.is_empty() {
            recommendations.push(ROUTINE_RECOMMENDATION.to_string());
        }

        RiskAssessment {
            overall_risk_level: level,
            risk_factor_count: factors.len(),
            risk_factors: factors.iter().map(|f| f.description.to_string()).collect(),
            recommendations,
            requires_medical_attention,
        }
    }

    fn overall_level(&self, factors: &[RiskFactor]) -> RiskLevel {
        let severe = factors
            .iter()
            .any(|f| f.classification.severity >= Severity::Stage2);
        if severe || factors.len() >= self.policy.high_risk_factor_count {
            RiskLevel::High
        } else if factors.is_empty() {
            RiskLevel::Low
        } else {
            RiskLevel::Moderate
        }
    }

    fn requires_attention(&self, level: RiskLevel, factors: &[RiskFactor]) -> bool {
        if level == RiskLevel::High {
            return true;
        }
        let abnormal_systems: BTreeSet<BodySystem> = factors
            .iter()
            .filter(|f| f.system.counts_toward_attention())
            .filter(|f| f.classification.severity >= self.policy.attention_min_severity)
            .map(|f| f.system)
            .collect();
        abnormal_systems.len() >= self.policy.attention_min_systems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(kind: VitalKind, status: S, severity: Severity) -> Finding {
        Finding {
            kind,
            classification: Classification::new(status, severity),
        }
    }

    fn normal(kind: VitalKind) -> Finding {
        finding(kind, S::Normal, Severity::Normal)
    }

    fn assess(findings: &[Finding]) -> RiskAssessment {
        RiskAssessor::default().assess(findings)
    }

    #[test]
    fn all_normal_is_low_risk() {
        let a = assess(&[normal(VitalKind::HeartRate), normal(VitalKind::Glucose)]);
        assert_eq!(a.overall_risk_level, RiskLevel::Low);
        assert_eq!(a.risk_factor_count, 0);
        assert_eq!(a.recommendations, vec![ROUTINE_RECOMMENDATION]);
        assert!(!a.requires_medical_attention);
    }

    #[test]
    fn no_findings_is_neutral() {
        let a = assess(&[]);
        assert_eq!(a.overall_risk_level, RiskLevel::Low);
        assert!(a.risk_factors.is_empty());
        assert_eq!(a.recommendations, vec![NO_DATA_RECOMMENDATION]);
        assert!(!a.requires_medical_attention);
    }

    #[test]
    fn hypertension_and_prediabetes_is_moderate() {
        let a = assess(&[
            finding(VitalKind::BloodPressure, S::HighStage1, Severity::Stage1),
            normal(VitalKind::HeartRate),
            finding(VitalKind::Glucose, S::Prediabetes, Severity::Borderline),
            finding(VitalKind::Weight, S::Unknown, Severity::Normal),
        ]);
        assert_eq!(a.overall_risk_level, RiskLevel::Moderate);
        assert_eq!(a.risk_factors, vec!["Hypertension", "Elevated blood glucose"]);
        assert_eq!(a.risk_factor_count, 2);
        assert_eq!(a.recommendations.len(), 4);
        assert!(!a.requires_medical_attention);
    }

    #[test]
    fn stage2_alone_is_high() {
        let a = assess(&[finding(
            VitalKind::OxygenSaturation,
            S::Critical,
            Severity::Stage2,
        )]);
        assert_eq!(a.overall_risk_level, RiskLevel::High);
        assert!(a.requires_medical_attention);
        assert_eq!(a.recommendations, vec!["Urgent medical consultation"]);
    }

    #[test]
    fn three_factors_is_high() {
        let a = assess(&[
            finding(VitalKind::HeartRate, S::High, Severity::Borderline),
            finding(VitalKind::Glucose, S::Prediabetes, Severity::Borderline),
            finding(VitalKind::BodyTemperature, S::MildFever, Severity::Borderline),
        ]);
        assert_eq!(a.overall_risk_level, RiskLevel::High);
    }

    #[test]
    fn two_systems_at_stage1_require_attention() {
        let a = assess(&[
            finding(VitalKind::BloodPressure, S::HighStage1, Severity::Stage1),
            finding(VitalKind::Glucose, S::Diabetes, Severity::Stage1),
        ]);
        assert_eq!(a.overall_risk_level, RiskLevel::Moderate);
        assert!(a.requires_medical_attention);
    }

    #[test]
    fn fever_does_not_count_as_a_system() {
        let a = assess(&[
            finding(VitalKind::BloodPressure, S::HighStage1, Severity::Stage1),
            finding(VitalKind::BodyTemperature, S::HighFever, Severity::Stage1),
        ]);
        assert!(!a.requires_medical_attention);
    }

    #[test]
    fn attention_policy_is_configurable() {
        let strict = RiskAssessor::new(RiskPolicy {
            attention_min_systems: 1,
            ..RiskPolicy::default()
        });
        let a = strict.assess(&[finding(
            VitalKind::BloodPressure,
            S::HighStage1,
            Severity::Stage1,
        )]);
        assert!(a.requires_medical_attention);
    }

    #[test]
    fn factors_follow_priority_not_input_order() {
        let a = assess(&[
            finding(VitalKind::BodyTemperature, S::MildFever, Severity::Borderline),
            finding(VitalKind::Glucose, S::Prediabetes, Severity::Borderline),
        ]);
        assert_eq!(a.risk_factors, vec!["Elevated blood glucose", "Fever"]);
        assert_eq!(
            a.recommendations,
            vec![
                "Diabetology check-up",
                "Regular blood glucose monitoring",
                "Monitor body temperature",
                "Ensure adequate hydration",
            ]
        );
    }

    #[test]
    fn factor_without_advice_gets_routine_recommendation() {
        let a = assess(&[finding(VitalKind::HeartRate, S::Low, Severity::Borderline)]);
        assert_eq!(a.risk_factors, vec!["Abnormal heart rate"]);
        assert_eq!(a.recommendations, vec![ROUTINE_RECOMMENDATION]);
    }

    #[test]
    fn non_significant_statuses_are_ignored() {
        let a = assess(&[
            finding(VitalKind::Weight, S::Unknown, Severity::Normal),
            finding(VitalKind::BloodPressure, S::Elevated, Severity::Borderline),
            finding(VitalKind::Bmi, S::Overweight, Severity::Borderline),
        ]);
        assert_eq!(a.risk_factor_count, 0);
    }

    #[test]
    fn adding_a_factor_never_lowers_the_level() {
        let pool = [
            finding(VitalKind::BloodPressure, S::HighStage1, Severity::Stage1),
            finding(VitalKind::HeartRate, S::High, Severity::Borderline),
            finding(VitalKind::Glucose, S::Diabetes, Severity::Stage1),
            finding(VitalKind::Bmi, S::Obese, Severity::Stage1),
            finding(VitalKind::OxygenSaturation, S::Critical, Severity::Stage2),
            finding(VitalKind::BodyTemperature, S::MildFever, Severity::Borderline),
        ];
        for n in 0..pool.len() {
            let before = assess(&pool[..n]);
            let after = assess(&pool[..=n]);
            assert!(after.overall_risk_level >= before.overall_risk_level);
            assert!(after.requires_medical_attention >= before.requires_medical_attention);
        }
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: RiskPolicy = serde_json::from_str(r#"{"high_risk_factor_count": 4}"#).unwrap();
        assert_eq!(policy.high_risk_factor_count, 4);
        assert_eq!(policy.attention_min_systems, 2);
        assert_eq!(policy.attention_min_severity, Severity::Stage1);
    }

    #[test]
    fn assessment_wire_shape() {
        let a = assess(&[finding(
            VitalKind::BloodPressure,
            S::HighStage1,
            Severity::Stage1,
        )]);
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["overall_risk_level"], "moderate");
        assert_eq!(json["risk_factor_count"], 1);
        assert_eq!(json["requires_medical_attention"], false);
    }
}
