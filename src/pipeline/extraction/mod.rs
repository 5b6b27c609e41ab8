//! Text stage of the pipeline: normalization of OCR output and rule-based
//! parameter extraction.

pub mod extractor;
pub mod label_correction;
pub mod normalize;
pub mod rules;
pub mod sanitize;

pub use extractor::ParameterExtractor;
pub use normalize::{normalize_text, NormalizedText};
pub use rules::{ExtractionRule, MatchRejection, ValueShape, EXTRACTION_RULES};
