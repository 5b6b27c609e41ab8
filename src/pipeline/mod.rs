pub mod extraction;
pub mod import;
pub mod processor;
pub mod report;

pub use processor::{write_reports, BatchEntry, FailedDocument, ProcessingError, VitalsProcessor};
