use regex::Regex;

use crate::models::{ExtractedParameter, TextSpan};

use super::rules::{value_end, ExtractionRule, EXTRACTION_RULES};

/// Applies the static rule table to normalized text.
///
/// Stateless: rules are shared read-only, so one extractor can serve any number of
/// documents (and threads).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterExtractor;

impl ParameterExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract every base kind found in `text`, in report order.
    /// Kinds without a valid match are absent from the result.
    pub fn extract_all(&self, text: &str) -> Vec<ExtractedParameter> {
        EXTRACTION_RULES
            .iter()
            .filter_map(|rule| self.extract(rule, text))
            .collect()
    }

    /// First valid labelled match of `rule` in document order, else the first valid
    /// unit-only match. Within a tier, ties at the same offset go to the earlier pattern.
    pub fn extract(&self, rule: &ExtractionRule, text: &str) -> Option<ExtractedParameter> {
        first_valid(rule, &rule.patterns, text).or_else(|| first_valid(rule, &rule.fallbacks, text))
    }
}

fn first_valid(rule: &ExtractionRule, patterns: &[Regex], text: &str) -> Option<ExtractedParameter> {
    let mut best: Option<((usize, usize), ExtractedParameter)> = None;

    for (index, pattern) in patterns.iter().enumerate() {
        for caps in pattern.captures_iter(text) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            let key = (whole.start(), index);
            if best.as_ref().is_some_and(|(best_key, _)| *best_key <= key) {
                break;
            }

            match rule.parse(&caps) {
                Ok(reading) => {
                    let end = value_end(&caps).unwrap_or(whole.end());
                    let param = ExtractedParameter {
                        kind: rule.kind,
                        raw_text: text[whole.start()..end].to_string(),
                        value: reading.value,
                        unit: reading.unit,
                        source_unit: reading.unit,
                        unit_explicit: reading.unit_explicit,
                        span: TextSpan {
                            start: whole.start(),
                            end,
                        },
                        classification: None,
                    };
                    best = Some((key, param));
                    break;
                }
                Err(reason) => {
                    tracing::debug!(
                        kind = rule.kind.as_str(),
                        matched = whole.as_str(),
                        %reason,
                        "Discarded candidate match"
                    );
                }
            }
        }
    }

    best.map(|(_, param)| param)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Unit, VitalKind, VitalValue};
    use crate::pipeline::extraction::normalize::normalize_text;

    const ITALIAN_REPORT: &str = "\
REFERTO VISITA
Pressione arteriosa: 135/85 mmHg
Frequenza cardiaca: 76 bpm
Glicemia: 102 mg/dL
Saturazione ossigeno: 96%
Temperatura corporea: 36.7°C
Peso: 74 kg
Altezza: 179 cm
";

    fn extract(raw: &str) -> Vec<ExtractedParameter> {
        let normalized = normalize_text(raw);
        ParameterExtractor::new().extract_all(&normalized.text)
    }

    fn find(params: &[ExtractedParameter], kind: VitalKind) -> Option<&ExtractedParameter> {
        params.iter().find(|p| p.kind == kind)
    }

    #[test]
    fn extracts_all_seven_base_kinds() {
        let params = extract(ITALIAN_REPORT);
        let kinds: Vec<VitalKind> = params.iter().map(|p| p.kind).collect();
        assert_eq!(kinds, VitalKind::EXTRACTED.to_vec());

        let bp = find(&params, VitalKind::BloodPressure).unwrap();
        assert_eq!(
            bp.value,
            VitalValue::Pressure {
                systolic: 135,
                diastolic: 85
            }
        );
        assert_eq!(bp.raw_text, "pressione arteriosa: 135/85 mmhg");

        let temp = find(&params, VitalKind::BodyTemperature).unwrap();
        assert_eq!(temp.value, VitalValue::Scalar(36.7));
        assert_eq!(temp.unit, Unit::Celsius);

        let height = find(&params, VitalKind::Height).unwrap();
        assert_eq!(height.value, VitalValue::Scalar(179.0));
        assert_eq!(height.unit, Unit::Centimeter);
    }

    #[test]
    fn extracted_parameters_are_unvalidated() {
        assert!(extract(ITALIAN_REPORT).iter().all(|p| p.classification.is_none()));
    }

    #[test]
    fn span_points_into_normalized_text() {
        let normalized = normalize_text(ITALIAN_REPORT);
        let params = ParameterExtractor::new().extract_all(&normalized.text);
        for p in &params {
            assert_eq!(&normalized.text[p.span.start..p.span.end], p.raw_text);
        }
    }

    #[test]
    fn first_occurrence_wins() {
        let params = extract("FC: 76 bpm\nControllo: FC 90 bpm");
        let hr = find(&params, VitalKind::HeartRate).unwrap();
        assert_eq!(hr.value, VitalValue::Scalar(76.0));
    }

    #[test]
    fn labelled_glucose_beats_earlier_cholesterol() {
        let params = extract("Colesterolo totale: 210 mg/dL\nGlicemia: 92 mg/dL");
        let glucose = find(&params, VitalKind::Glucose).unwrap();
        assert_eq!(glucose.value, VitalValue::Scalar(92.0));
        assert_eq!(glucose.raw_text, "glicemia: 92 mg/dl");
    }

    #[test]
    fn labelled_height_beats_earlier_waist() {
        let params = extract("Circonferenza vita: 102 cm\nPeso: 74 kg\nAltezza: 179 cm");
        let height = find(&params, VitalKind::Height).unwrap();
        assert_eq!(height.value, VitalValue::Scalar(179.0));
    }

    #[test]
    fn unit_only_match_used_when_no_label() {
        let params = extract("Valori: 82 bpm a riposo");
        let hr = find(&params, VitalKind::HeartRate).unwrap();
        assert_eq!(hr.value, VitalValue::Scalar(82.0));
        assert_eq!(hr.raw_text, "82 bpm");
    }

    #[test]
    fn invalid_label_falls_back_to_unit_only_match() {
        let params = extract("FC: 7\nA riposo 64 bpm");
        let hr = find(&params, VitalKind::HeartRate).unwrap();
        assert_eq!(hr.value, VitalValue::Scalar(64.0));
    }

    #[test]
    fn reversed_pressure_is_absent() {
        let params = extract("Pressione arteriosa: 85/135 mmHg");
        assert!(find(&params, VitalKind::BloodPressure).is_none());
    }

    #[test]
    fn malformed_candidate_falls_through_to_next_valid() {
        let params = extract("PA: 85/135 mmHg\nPA: 128/82 mmHg");
        let bp = find(&params, VitalKind::BloodPressure).unwrap();
        assert_eq!(
            bp.value,
            VitalValue::Pressure {
                systolic: 128,
                diastolic: 82
            }
        );
    }

    #[test]
    fn no_numbers_no_parameters() {
        assert!(extract("Paziente collaborante, nessun parametro rilevato.").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn english_labels() {
        let params = extract(
            "Blood pressure: 118/76 mmHg\nHeart rate: 64\nGlucose: 5.5 mmol/L\nSpO2 98%\n\
             Temperature: 98.6 °F\nWeight: 165 lbs\nHeight: 1.79 m",
        );
        assert_eq!(params.len(), 7);
        let glucose = find(&params, VitalKind::Glucose).unwrap();
        assert_eq!(glucose.unit, Unit::MmolPerL);
        let weight = find(&params, VitalKind::Weight).unwrap();
        assert_eq!(weight.unit, Unit::Pound);
        let height = find(&params, VitalKind::Height).unwrap();
        assert_eq!(height.unit, Unit::Meter);
    }

    #[test]
    fn ocr_damage_is_repaired_before_matching() {
        let params = extract("Glicernia: 1O2 mg/dL\nTemperatura: 36,7 ºC");
        let glucose = find(&params, VitalKind::Glucose).unwrap();
        assert_eq!(glucose.value, VitalValue::Scalar(102.0));
        let temp = find(&params, VitalKind::BodyTemperature).unwrap();
        assert_eq!(temp.value, VitalValue::Scalar(36.7));
    }

    #[test]
    fn implausible_values_are_absent() {
        let params = extract("FC: 7 bpm\nTemperatura: 57 °C\nPeso: 900 kg");
        assert!(params.is_empty());
    }

    #[test]
    fn bmi_line_does_not_supply_weight() {
        let params = extract("BMI: 23.1 kg/m²");
        assert!(find(&params, VitalKind::Weight).is_none());
    }

    #[test]
    fn punctuation_between_label_and_value() {
        let params = extract("Frequenza cardiaca, 76\nGlicemia; 102\nPeso, 74");
        assert_eq!(find(&params, VitalKind::HeartRate).unwrap().value, VitalValue::Scalar(76.0));
        assert_eq!(find(&params, VitalKind::Glucose).unwrap().value, VitalValue::Scalar(102.0));
        assert_eq!(find(&params, VitalKind::Weight).unwrap().value, VitalValue::Scalar(74.0));
    }

    #[test]
    fn colloquial_alto_is_not_height() {
        let params = extract("Colesterolo alto 240\nPeso: 74 kg");
        assert!(find(&params, VitalKind::Height).is_none());
        assert!(find(&params, VitalKind::Weight).is_some());
    }
}
