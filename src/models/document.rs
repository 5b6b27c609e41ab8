use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provenance of a document, passed through unmodified into the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Source identifier (usually the file path as given by the caller).
    pub source: String,
    pub file_name: String,
    pub size_bytes: u64,
    /// Lower-cased extension including the dot (".txt"), or "unknown".
    pub extension: String,
    /// Base64 SHA-256 of the source bytes, when read from disk.
    pub content_hash: Option<String>,
}

impl DocumentMetadata {
    /// Metadata for text handed over in memory (no file behind it).
    pub fn in_memory(source: &str, text: &str) -> Self {
        Self {
            source: source.to_string(),
            file_name: source.to_string(),
            size_bytes: text.len() as u64,
            extension: "unknown".to_string(),
            content_hash: None,
        }
    }
}

/// OCR text of one document. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    id: Uuid,
    text: String,
    metadata: DocumentMetadata,
}

impl RawDocument {
    /// The id is derived from source and text, so re-processing the same
    /// input yields the same document id.
    pub fn new(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        let text = text.into();
        let mut seed = Vec::with_capacity(metadata.source.len() + text.len() + 1);
        seed.extend_from_slice(metadata.source.as_bytes());
        seed.push(0);
        seed.extend_from_slice(text.as_bytes());
        Self {
            id: Uuid::new_v5(&Uuid::NAMESPACE_OID, &seed),
            text,
            metadata,
        }
    }

    pub fn from_text(source: &str, text: impl Into<String>) -> Self {
        let text = text.into();
        let metadata = DocumentMetadata::in_memory(source, &text);
        Self::new(text, metadata)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_input_same_id() {
        let a = RawDocument::from_text("report.txt", "PA 120/80 mmHg");
        let b = RawDocument::from_text("report.txt", "PA 120/80 mmHg");
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn different_source_different_id() {
        let a = RawDocument::from_text("a.txt", "PA 120/80 mmHg");
        let b = RawDocument::from_text("b.txt", "PA 120/80 mmHg");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn in_memory_metadata() {
        let doc = RawDocument::from_text("scan-17", "Peso 74 kg");
        assert_eq!(doc.metadata().file_name, "scan-17");
        assert_eq!(doc.metadata().size_bytes, 10);
        assert_eq!(doc.metadata().extension, "unknown");
        assert!(doc.metadata().content_hash.is_none());
        assert_eq!(doc.text(), "Peso 74 kg");
    }
}
