//! Text normalizer: turns raw OCR output into the canonical form the extraction
//! rules match against.
//!
//! Lines survive as match boundaries; everything else is flattened (case, whitespace,
//! symbol variants, digit lookalikes, decimal commas, damaged labels). The transform is
//! idempotent: every step leaves already-normalized text untouched.

use serde::{Deserialize, Serialize};

use super::label_correction::correct_vital_labels;
use super::sanitize::{fold_symbol_variants, is_section_header, is_structural_noise, sanitize_line};

/// Cleaned text plus the length statistics the report carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedText {
    pub text: String,
    /// Character count of the raw input.
    pub raw_chars: usize,
    /// Character count of `text`.
    pub cleaned_chars: usize,
}

/// Normalize raw OCR text.
pub fn normalize_text(raw: &str) -> NormalizedText {
    let folded = fold_symbol_variants(raw);

    let lines: Vec<String> = folded
        .lines()
        .map(sanitize_line)
        .filter(|line| !is_structural_noise(line) && !is_section_header(line))
        .map(|line| normalize_line(&line))
        .collect();

    let text = lines.join("\n");
    NormalizedText {
        raw_chars: raw.chars().count(),
        cleaned_chars: text.chars().count(),
        text,
    }
}

fn normalize_line(line: &str) -> String {
    // Lowercasing can emit combining marks ("İ" -> "i̇"); sanitize again so a second pass is a no-op.
    let lower = sanitize_line(&line.to_lowercase());
    let repaired = repair_digit_lookalikes(&lower);
    let decimals = normalize_decimal_commas(&repaired);
    correct_vital_labels(&decimals)
}

/// OCR reads `0` as `o` and `1` as `l`; only repaired when both neighbours are digits
/// ("1o2" -> "102"), so words are never affected.
pub fn repair_digit_lookalikes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_digits = i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit();
            match c {
                'o' if between_digits => '0',
                'l' if between_digits => '1',
                other => other,
            }
        })
        .collect()
}

/// Decimal comma between digits becomes a point ("36,7" -> "36.7").
/// A comma followed by a space is a list separator and is kept.
pub fn normalize_decimal_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let between_digits = i > 0
                && i + 1 < chars.len()
                && chars[i - 1].is_ascii_digit()
                && chars[i + 1].is_ascii_digit();
            if c == ',' && between_digits {
                '.'
            } else {
                c
            }
        })
        .collect()
}
