use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intelligence::RiskAssessment;
use crate::models::{DocumentMetadata, ParameterStatus, ProcessingStatus, Unit, VitalKind};

/// Document identity plus processing provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub document_id: Uuid,
    #[serde(flatten)]
    pub document: DocumentMetadata,
    pub processed_at: DateTime<Utc>,
    pub processor_version: String,
}

/// Coverage and text statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionInfo {
    pub total_parameters: usize,
    pub extracted_parameters: usize,
    pub extraction_rate_percent: f64,
    pub text_length_raw: usize,
    pub text_length_cleaned: usize,
    pub processing_status: ProcessingStatus,
}

/// One parameter as presented in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalParameterEntry {
    /// Display string with unit ("135/85 mmHg").
    pub value: String,
    pub unit: Unit,
    pub normal_range: String,
    pub status: ParameterStatus,
}

/// Final record for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub metadata: ReportMetadata,
    pub extraction_info: ExtractionInfo,
    /// Only kinds that were found (or derived); absent kinds have no entry.
    pub vital_parameters: BTreeMap<VitalKind, VitalParameterEntry>,
    pub risk_assessment: RiskAssessment,
    pub raw_text_sample: String,
    pub cleaned_text_sample: String,
}

impl ExtractionReport {
    pub fn parameter(&self, kind: VitalKind) -> Option<&VitalParameterEntry> {
        self.vital_parameters.get(&kind)
    }

    pub fn status_of(&self, kind: VitalKind) -> Option<ParameterStatus> {
        self.parameter(kind).map(|p| p.status)
    }
}
