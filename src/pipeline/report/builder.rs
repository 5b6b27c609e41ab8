use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::PROCESSOR_VERSION;
use crate::intelligence::{reference_for, RiskAssessment};
use crate::models::{
    round1, DerivedParameter, ExtractedParameter, ProcessingStatus, RawDocument, VitalKind,
};
use crate::pipeline::extraction::NormalizedText;

use super::types::{ExtractionInfo, ExtractionReport, ReportMetadata, VitalParameterEntry};

/// Appended to truncated text samples.
const ELLIPSIS: &str = "...";

/// Everything a report is assembled from.
pub struct ReportInputs<'a> {
    pub document: &'a RawDocument,
    pub normalized: &'a NormalizedText,
    pub parameters: &'a [ExtractedParameter],
    pub derived: &'a [DerivedParameter],
    pub assessment: RiskAssessment,
    pub processed_at: DateTime<Utc>,
}

/// Pure aggregation; no decision logic beyond counting.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    text_sample_chars: usize,
}

impl ReportBuilder {
    pub fn new(text_sample_chars: usize) -> Self {
        Self { text_sample_chars }
    }

    pub fn build(&self, inputs: ReportInputs<'_>) -> ExtractionReport {
        let total = VitalKind::ALL.len();
        let extracted = inputs
            .parameters
            .iter()
            .filter(|p| !p.kind.is_derived())
            .count()
            .min(total);

        let mut vital_parameters = BTreeMap::new();
        for param in inputs.parameters {
            vital_parameters
                .entry(param.kind)
                .or_insert_with(|| VitalParameterEntry {
                    value: param.display_value(),
                    unit: param.unit,
                    normal_range: reference_for(param.kind).normal_range.to_string(),
                    status: param.status(),
                });
        }
        for derived in inputs.derived {
            vital_parameters
                .entry(derived.kind)
                .or_insert_with(|| VitalParameterEntry {
                    value: derived.display_value(),
                    unit: derived.unit,
                    normal_range: reference_for(derived.kind).normal_range.to_string(),
                    status: derived.classification.status,
                });
        }

        ExtractionReport {
            metadata: ReportMetadata {
                document_id: inputs.document.id(),
                document: inputs.document.metadata().clone(),
                processed_at: inputs.processed_at,
                processor_version: PROCESSOR_VERSION.to_string(),
            },
            extraction_info: ExtractionInfo {
                total_parameters: total,
                extracted_parameters: extracted,
                extraction_rate_percent: extraction_rate(extracted, total),
                text_length_raw: inputs.normalized.raw_chars,
                text_length_cleaned: inputs.normalized.cleaned_chars,
                processing_status: processing_status(extracted),
            },
            vital_parameters,
            risk_assessment: inputs.assessment,
            raw_text_sample: text_sample(inputs.document.text(), self.text_sample_chars),
            cleaned_text_sample: text_sample(&inputs.normalized.text, self.text_sample_chars),
        }
    }
}

/// `extracted / total * 100`, one decimal. Zero when `total` is zero.
pub fn extraction_rate(extracted: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(extracted as f64 / total as f64 * 100.0)
}

pub fn processing_status(extracted: usize) -> ProcessingStatus {
    match extracted {
        0 => ProcessingStatus::Failed,
        n if n >= VitalKind::EXTRACTED.len() => ProcessingStatus::Success,
        _ => ProcessingStatus::Partial,
    }
}

/// First `max_chars` characters, with an ellipsis when truncated.
pub fn text_sample(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}
