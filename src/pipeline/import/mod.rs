//! Document intake: turns a file on disk into a `RawDocument`.
//!
//! Plain-text OCR output is read directly. Images and PDFs need an external
//! `OcrEngine`; without one they are rejected as unsupported.

pub mod format;
pub mod hash;

pub use format::*;
pub use hash::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{DocumentMetadata, RawDocument};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {size_mb:.1}MB exceeds {max_mb}MB limit")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// External OCR collaborator. Implementations turn scanned bytes into text.
pub trait OcrEngine {
    fn recognize(&self, bytes: &[u8], format: &FormatDetection) -> Result<String, ImportError>;
}

/// Read one document from disk.
pub fn read_document(
    path: &Path,
    ocr: Option<&(dyn OcrEngine + Send + Sync)>,
) -> Result<RawDocument, ImportError> {
    let format = detect_format(path)?;
    let bytes = std::fs::read(path)?;

    let text = match (format.category, ocr) {
        (FileCategory::PlainText, _) => decode_text(path, &bytes),
        (category, Some(engine)) if category.needs_ocr() => engine.recognize(&bytes, &format)?,
        _ => return Err(ImportError::UnsupportedFormat(format.mime_type)),
    };

    let source = path.display().to_string();
    let metadata = DocumentMetadata {
        file_name: sanitize_filename(&source),
        source,
        size_bytes: format.file_size_bytes,
        extension: normalized_extension(path),
        content_hash: Some(compute_content_hash(&bytes)),
    };

    tracing::debug!(
        path = %path.display(),
        mime = %format.mime_type,
        chars = text.chars().count(),
        "Document read"
    );

    Ok(RawDocument::new(text, metadata))
}

fn decode_text(path: &Path, bytes: &[u8]) -> String {
    match String::from_utf8(bytes.to_vec()) {
        Ok(text) => text,
        Err(_) => {
            tracing::warn!(path = %path.display(), "Invalid UTF-8 in OCR text, decoding lossily");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

/// Files in `dir` a batch run should process, sorted by file name.
pub fn list_documents(dir: &Path, include_scans: bool) -> Result<Vec<PathBuf>, ImportError> {
    if !dir.is_dir() {
        return Err(ImportError::NotADirectory(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_supported_extension(&path, include_scans) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOcr(&'static str);

    impl OcrEngine for FixedOcr {
        fn recognize(&self, _bytes: &[u8], _format: &FormatDetection) -> Result<String, ImportError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn reads_text_document_with_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Referto.TXT");
        std::fs::write(&path, "Peso: 74 kg").unwrap();

        let doc = read_document(&path, None).unwrap();
        assert_eq!(doc.text(), "Peso: 74 kg");
        let meta = doc.metadata();
        assert_eq!(meta.file_name, "Referto.TXT");
        assert_eq!(meta.extension, ".txt");
        assert_eq!(meta.size_bytes, 11);
        assert_eq!(meta.content_hash.as_deref(), Some(compute_content_hash(b"Peso: 74 kg").as_str()));
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.ocr");
        let mut bytes = b"FC: 76 bpm ".to_vec();
        bytes.push(0xFE);
        std::fs::write(&path, &bytes).unwrap();

        let doc = read_document(&path, None).unwrap();
        assert!(doc.text().starts_with("FC: 76 bpm "));
        assert!(doc.text().contains(char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn image_without_ocr_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]).unwrap();

        let err = read_document(&path, None).unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(ref mime) if mime == "image/png"));
    }

    #[test]
    fn image_with_ocr_engine_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]).unwrap();

        let engine = FixedOcr("SpO2: 97%");
        let doc = read_document(&path, Some(&engine)).unwrap();
        assert_eq!(doc.text(), "SpO2: 97%");
        assert_eq!(doc.metadata().extension, ".png");
    }

    #[test]
    fn lists_supported_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.ocr", "c.png", "notes.md"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let names = |paths: Vec<PathBuf>| -> Vec<String> {
            paths
                .iter()
                .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
                .collect()
        };
        assert_eq!(names(list_documents(dir.path(), false).unwrap()), ["a.ocr", "b.txt"]);
        assert_eq!(
            names(list_documents(dir.path(), true).unwrap()),
            ["a.ocr", "b.txt", "c.png"]
        );
    }

    #[test]
    fn listing_a_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "x").unwrap();
        assert!(matches!(
            list_documents(&path, false),
            Err(ImportError::NotADirectory(_))
        ));
    }
}
