pub mod builder;
pub mod types;

pub use builder::{extraction_rate, processing_status, text_sample, ReportBuilder, ReportInputs};
pub use types::*;
