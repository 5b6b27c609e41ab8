use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ImportError;

/// Broad input categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    /// OCR output already in text form.
    PlainText,
    Pdf,
    Image,
    Unsupported,
}

impl FileCategory {
    /// Needs an OCR engine before the text pipeline can run.
    pub fn needs_ocr(&self) -> bool {
        matches!(self, Self::Pdf | Self::Image)
    }
}

/// Result of format detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatDetection {
    pub mime_type: String,
    pub category: FileCategory,
    pub file_size_bytes: u64,
}

pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Extensions picked up when scanning a directory for OCR text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "ocr"];

/// Extensions picked up in addition when an OCR engine is available.
pub const SCAN_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg", "tif", "tiff"];

/// Detect the file format from magic bytes; the extension is not trusted.
pub fn detect_format(path: &Path) -> Result<FormatDetection, ImportError> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size > MAX_FILE_SIZE {
        return Err(ImportError::FileTooLarge {
            size_mb: file_size as f64 / (1024.0 * 1024.0),
            max_mb: MAX_FILE_SIZE / (1024 * 1024),
        });
    }

    let mut file = std::fs::File::open(path)?;
    let mut header = [0u8; 8];
    let bytes_read = file.read(&mut header)?;

    let (mime_type, category) = match &header[..bytes_read] {
        // %PDF
        [0x25, 0x50, 0x44, 0x46, ..] => ("application/pdf", FileCategory::Pdf),
        [0xFF, 0xD8, 0xFF, ..] => ("image/jpeg", FileCategory::Image),
        [0x89, 0x50, 0x4E, 0x47, ..] => ("image/png", FileCategory::Image),
        [0x49, 0x49, 0x2A, 0x00, ..] | [0x4D, 0x4D, 0x00, 0x2A, ..] => {
            ("image/tiff", FileCategory::Image)
        }
        _ => {
            if is_likely_text(path)? {
                ("text/plain", FileCategory::PlainText)
            } else {
                ("application/octet-stream", FileCategory::Unsupported)
            }
        }
    };

    Ok(FormatDetection {
        mime_type: mime_type.to_string(),
        category,
        file_size_bytes: file_size,
    })
}

/// Mostly printable after lossy decoding. OCR output often carries a few invalid
/// bytes, so strict UTF-8 is not required. An empty file counts as text.
fn is_likely_text(path: &Path) -> Result<bool, ImportError> {
    let mut file = std::fs::File::open(path)?;
    let mut buffer = vec![0u8; 4096];
    let n = file.read(&mut buffer)?;
    buffer.truncate(n);

    if n == 0 {
        return Ok(true);
    }

    let text = String::from_utf8_lossy(&buffer);
    let total = text.chars().count().max(1);
    let printable = text
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .filter(|c| !c.is_control() || c.is_whitespace())
        .count();
    Ok(printable as f64 / total as f64 > 0.80)
}

/// Lower-cased extension with its dot (".txt"), or "unknown".
pub fn normalized_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_else(|| "unknown".to_string())
}

/// Whether a directory scan should pick up this path.
pub fn has_supported_extension(path: &Path, include_scans: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let ext = ext.to_lowercase();
    TEXT_EXTENSIONS.contains(&ext.as_str())
        || (include_scans && SCAN_EXTENSIONS.contains(&ext.as_str()))
}

/// File name without path components, limited in length.
pub fn sanitize_filename(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document");

    let clean: String = name
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | '\0'))
        .take(255)
        .collect();

    if clean.is_empty() {
        "document".to_string()
    } else {
        clean
    }
}
