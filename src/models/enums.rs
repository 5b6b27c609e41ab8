use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field} value: {value}")]
pub struct EnumParseError {
    pub field: String,
    pub value: String,
}

/// Macro to generate an ordinal enum with as_str + std::str::FromStr + Display.
/// Variant declaration order is the ordering used by comparisons.
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EnumParseError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(
    /// Clinical label attached to a parameter by the validator.
    ///
    /// Within one severity tier the later variant is the more severe label; this only
    /// matters when blood pressure components land in different bands of equal severity.
    ParameterStatus {
        Unknown => "unknown",
        Normal => "normal",
        Low => "low",
        Elevated => "elevated",
        Prediabetes => "prediabetes",
        Overweight => "overweight",
        Underweight => "underweight",
        MildFever => "mild_fever",
        High => "high",
        HighStage1 => "high_stage1",
        Diabetes => "diabetes",
        HighFever => "high_fever",
        Obese => "obese",
        HighStage2 => "high_stage2",
        Critical => "critical",
    }
);

str_enum!(
    /// Ordinal severity tier of a classification.
    Severity {
        Normal => "normal",
        Borderline => "borderline",
        Stage1 => "stage1",
        Stage2 => "stage2",
    }
);

str_enum!(
    /// Overall risk level of an assessment (ordinal).
    RiskLevel {
        Low => "low",
        Moderate => "moderate",
        High => "high",
    }
);

str_enum!(
    /// Completeness of a processed document.
    ProcessingStatus {
        Success => "success",
        Partial => "partial",
        Failed => "failed",
    }
);

str_enum!(
    /// Physiological system a risk factor belongs to.
    BodySystem {
        Cardiovascular => "cardiovascular",
        Metabolic => "metabolic",
        Respiratory => "respiratory",
        Systemic => "systemic",
    }
);

impl BodySystem {
    /// Systems considered when deciding whether several organ systems are abnormal at once.
    pub fn counts_toward_attention(&self) -> bool {
        !matches!(self, Self::Systemic)
    }
}
