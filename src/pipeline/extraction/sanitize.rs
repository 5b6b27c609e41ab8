/// Fold unicode variants of unit symbols to the forms the extraction rules expect.
/// Degree lookalikes become `°`, the combined Celsius/Fahrenheit signs are spelled out.
pub fn fold_symbol_variants(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\u{2103}' => out.push_str("°C"), // ℃
            '\u{2109}' => out.push_str("°F"), // ℉
            'º' | '˚' | '\u{030A}' => out.push('°'),
            '\u{FF05}' | '\u{066A}' => out.push('%'), // fullwidth / arabic percent
            '\u{00A0}' | '\u{2007}' | '\u{202F}' => out.push(' '),
            '\u{2044}' | '\u{2215}' => out.push('/'), // fraction slash, division slash
            '\u{2013}' | '\u{2014}' => out.push('-'),
            _ => out.push(c),
        }
    }
    out
}

/// Keep alphanumerics, whitespace and the punctuation that carries meaning in vital signs.
fn is_kept(c: char) -> bool {
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ','
                | ';'
                | ':'
                | '-'
                | '/'
                | '('
                | ')'
                | '['
                | ']'
                | '+'
                | '='
                | '%'
                | '<'
                | '>'
                | '°'
                | '²'
                | '\''
        )
}

/// Sanitize one line of OCR output: drop stray symbols, collapse whitespace runs, trim.
pub fn sanitize_line(line: &str) -> String {
    let kept: String = line.chars().filter(|c| is_kept(*c)).collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decorative or empty line: nothing alphanumeric survives sanitizing
/// (`-----`, `=====`, `* * *`, a lone `:`).
pub fn is_structural_noise(line: &str) -> bool {
    !line.chars().any(|c| c.is_alphanumeric())
}

/// Upper-case section header without numeric content (`ESAME OBIETTIVO:`, `VITAL SIGNS`).
pub fn is_section_header(line: &str) -> bool {
    let mut letters = 0usize;
    for c in line.chars() {
        if c.is_numeric() {
            return false;
        }
        if c.is_alphabetic() {
            if !c.is_uppercase() {
                return false;
            }
            letters += 1;
        }
    }
    letters >= 2
}
