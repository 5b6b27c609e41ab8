//! Document processing orchestrator.
//!
//! Drives one document through the pipeline:
//! normalize → extract → validate → derive → assess → report.
//!
//! The clinical core is infallible: misses and malformed matches become absence and
//! an unreadable document still yields a well-formed report. Only intake (files,
//! config, serialization) can fail. OCR is injected as a trait object so the
//! orchestrator stays testable with mock engines.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::intelligence::{derive_all, Finding, RiskAssessor, ValueValidator};
use crate::models::RawDocument;
use crate::pipeline::extraction::{normalize_text, ParameterExtractor};
use crate::pipeline::import::{list_documents, read_document, ImportError, OcrEngine};
use crate::pipeline::report::{ExtractionReport, ReportBuilder, ReportInputs};
use crate::pipeline_config::{ConfigError, PipelineConfig};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot write output {}: {}", .0.display(), .1)]
    Output(PathBuf, #[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// A document that could not be read. Batch runs record it and move on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedDocument {
    pub file_path: String,
    pub timestamp: DateTime<Utc>,
    /// Always "error".
    pub status: String,
    pub error: String,
}

impl FailedDocument {
    fn new(path: &Path, error: &ProcessingError) -> Self {
        Self {
            file_path: path.display().to_string(),
            timestamp: Utc::now(),
            status: "error".to_string(),
            error: error.to_string(),
        }
    }
}

/// One element of a batch output array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Processed(Box<ExtractionReport>),
    Failed(FailedDocument),
}

impl BatchEntry {
    pub fn is_processed(&self) -> bool {
        matches!(self, Self::Processed(_))
    }
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct VitalsProcessor {
    config: PipelineConfig,
    extractor: ParameterExtractor,
    validator: ValueValidator,
    assessor: RiskAssessor,
    reports: ReportBuilder,
    ocr: Option<Box<dyn OcrEngine + Send + Sync>>,
}

impl Default for VitalsProcessor {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl VitalsProcessor {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            extractor: ParameterExtractor::new(),
            validator: ValueValidator::new(),
            assessor: RiskAssessor::new(config.risk.clone()),
            reports: ReportBuilder::new(config.text_sample_chars),
            ocr: None,
            config,
        }
    }

    /// Attach an OCR engine so images and PDFs can be processed.
    pub fn with_ocr(mut self, engine: Box<dyn OcrEngine + Send + Sync>) -> Self {
        self.ocr = Some(engine);
        self
    }

    /// Run the full pipeline over one document, stamped with the current time.
    pub fn process_document(&self, document: &RawDocument) -> ExtractionReport {
        self.process_document_at(document, Utc::now())
    }

    pub fn process_document_at(
        &self,
        document: &RawDocument,
        processed_at: DateTime<Utc>,
    ) -> ExtractionReport {
        if document.text().trim().is_empty() {
            tracing::warn!(doc_id = %document.id(), source = %document.metadata().source, "Document has no text");
        }

        let normalized = normalize_text(document.text());
        let extracted = self.extractor.extract_all(&normalized.text);
        let parameters = self.validator.validate_all(extracted);

        // Derived metrics and risk run strictly after every base parameter is validated.
        let derived = derive_all(&parameters);
        let findings: Vec<Finding> = parameters
            .iter()
            .map(Finding::from)
            .chain(derived.iter().map(Finding::from))
            .collect();
        let assessment = self.assessor.assess(&findings);

        let report = self.reports.build(ReportInputs {
            document,
            normalized: &normalized,
            parameters: &parameters,
            derived: &derived,
            assessment,
            processed_at,
        });

        tracing::info!(
            doc_id = %document.id(),
            source = %document.metadata().source,
            extracted = report.extraction_info.extracted_parameters,
            rate = report.extraction_info.extraction_rate_percent,
            risk = %report.risk_assessment.overall_risk_level,
            "Document processed"
        );

        report
    }

    /// Convenience entry for text already in memory.
    pub fn process_text(&self, source: &str, text: &str) -> ExtractionReport {
        self.process_document(&RawDocument::from_text(source, text))
    }

    pub fn process_file(&self, path: &Path) -> Result<ExtractionReport, ProcessingError> {
        let document = read_document(path, self.ocr.as_deref())?;
        Ok(self.process_document(&document))
    }

    /// Process files in parallel. Output order follows `paths`; a file that fails
    /// becomes a `Failed` entry.
    pub fn process_paths(&self, paths: &[PathBuf]) -> Vec<BatchEntry> {
        paths
            .par_iter()
            .map(|path| match self.process_file(path) {
                Ok(report) => BatchEntry::Processed(Box::new(report)),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Document failed");
                    BatchEntry::Failed(FailedDocument::new(path, &e))
                }
            })
            .collect()
    }

    /// Every supported file in `dir`, sorted by name.
    pub fn process_directory(&self, dir: &Path) -> Result<Vec<BatchEntry>, ProcessingError> {
        let include_scans = self.config.include_scans && self.ocr.is_some();
        let paths = list_documents(dir, include_scans)?;
        tracing::info!(dir = %dir.display(), files = paths.len(), "Processing directory");

        let entries = self.process_paths(&paths);
        let processed = entries.iter().filter(|e| e.is_processed()).count();
        tracing::info!(processed, total = entries.len(), "Batch complete");
        Ok(entries)
    }

    /// A single file or every supported file of a directory.
    pub fn process_input(&self, input: &Path) -> Result<Vec<BatchEntry>, ProcessingError> {
        if input.is_dir() {
            self.process_directory(input)
        } else {
            Ok(self.process_paths(&[input.to_path_buf()]))
        }
    }
}

/// Write batch entries as a pretty-printed UTF-8 JSON array.
pub fn write_reports(path: &Path, entries: &[BatchEntry]) -> Result<(), ProcessingError> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json).map_err(|e| ProcessingError::Output(path.to_path_buf(), e))
}
