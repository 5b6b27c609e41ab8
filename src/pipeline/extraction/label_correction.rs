//! Post-OCR correction of vital-sign labels.
//!
//! Scanned reports lose letters in exactly the words the extraction rules anchor on
//! ("glicernia", "pressiome", "satunazione"). Words are matched against a small label
//! dictionary and replaced only when the match is close and unambiguous. Words that
//! contain digits are never touched.

/// Label vocabulary (Italian and English). Sorted and lowercase for binary search.
const LABEL_TERMS: &[&str] = &[
    "altezza", "arteriosa", "blood", "cardiaca", "corporea", "corporeo", "diastolic",
    "diastolica", "frequenza", "glicemia", "glucose", "glucosio", "height", "ossigenazione",
    "ossigeno", "oxygen", "pressione", "pressure", "pulse", "saturation", "saturazione",
    "sistolica", "statura", "systolic", "temperatura", "temperature", "weight",
];

/// Shortest word considered for correction.
const MIN_WORD_CHARS: usize = 5;

/// Words at least this long may be corrected at edit distance 2; shorter ones only at 1.
const LONG_WORD_CHARS: usize = 8;

/// Correct OCR-damaged label words in lower-cased text.
pub fn correct_vital_labels(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut word_buf = String::new();

    for ch in text.chars() {
        if ch.is_alphabetic() {
            word_buf.push(ch);
            continue;
        }
        if !word_buf.is_empty() {
            // A word glued to digits ("glicemia102") is left alone.
            if ch.is_numeric() {
                result.push_str(&word_buf);
            } else {
                result.push_str(&try_correct_word(&word_buf));
            }
            word_buf.clear();
        }
        result.push(ch);
    }

    if !word_buf.is_empty() {
        result.push_str(&try_correct_word(&word_buf));
    }

    result
}

fn max_distance(word_chars: usize) -> u32 {
    if word_chars >= LONG_WORD_CHARS {
        2
    } else {
        1
    }
}

/// Correct a single word against the label dictionary, if unambiguous.
fn try_correct_word(word: &str) -> String {
    let word_chars = word.chars().count();
    if word_chars < MIN_WORD_CHARS {
        return word.to_string();
    }

    if LABEL_TERMS.binary_search(&word).is_ok() {
        return word.to_string();
    }

    let limit = max_distance(word_chars);
    let mut best_term: Option<&str> = None;
    let mut best_distance = limit + 1;
    let mut ambiguous = false;

    for &term in LABEL_TERMS {
        let len_diff = (word_chars as i64 - term.chars().count() as i64).unsigned_abs();
        if len_diff > limit as u64 {
            continue;
        }

        let dist = edit_distance(word, term);
        if dist < best_distance {
            best_distance = dist;
            best_term = Some(term);
            ambiguous = false;
        } else if dist == best_distance && best_term.is_some() {
            ambiguous = true;
        }
    }

    match best_term {
        Some(term) if !ambiguous => {
            tracing::debug!(from = %word, to = %term, "Corrected OCR label");
            term.to_string()
        }
        _ => word.to_string(),
    }
}

/// Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n as u32;
    }
    if n == 0 {
        return m as u32;
    }

    let mut prev: Vec<u32> = (0..=n as u32).collect();
    let mut curr = vec![0u32; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = (i + 1) as u32;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = u32::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
