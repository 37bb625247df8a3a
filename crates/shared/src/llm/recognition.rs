use serde::Serialize;
use serde_json::Value;

const DEFAULT_PORTION: &str = "1 porsi";
const MAX_EXCERPT_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionResult {
    Recognized(RecognizedFood),
    Unrecognized { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognizedFood {
    pub name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub portion: String,
}

/// Turns raw provider output into a structured recognition result. The
/// provider is instructed to emit bare JSON but routinely wraps it in prose
/// or code fences; everything outside the outermost braces is discarded.
/// Never panics: unparsable output becomes the failure variant with a
/// bounded excerpt of the raw text.
pub fn parse_recognition(raw: &str) -> RecognitionResult {
    let candidate = extract_json_object(raw);

    let parsed = match serde_json::from_str::<Value>(&candidate) {
        Ok(value) => value,
        Err(_) => {
            return RecognitionResult::Unrecognized {
                reason: format!(
                    "analysis output was not valid JSON: {}",
                    bounded_excerpt(raw)
                ),
            };
        }
    };

    let Some(object) = parsed.as_object() else {
        return RecognitionResult::Unrecognized {
            reason: format!(
                "analysis output was not a JSON object: {}",
                bounded_excerpt(raw)
            ),
        };
    };

    if object.contains_key("error") || object.contains_key("unrecognized") {
        return RecognitionResult::Unrecognized {
            reason: failure_reason(object),
        };
    }

    let name = object
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let Some(name) = name else {
        return RecognitionResult::Unrecognized {
            reason: format!(
                "analysis result did not name a food: {}",
                bounded_excerpt(raw)
            ),
        };
    };

    RecognitionResult::Recognized(RecognizedFood {
        name: name.to_string(),
        calories: coerce_number(object.get("calories")),
        protein_g: coerce_number(object.get("protein")),
        carbs_g: coerce_number(object.get("carbs")),
        fat_g: coerce_number(object.get("fat")),
        portion: object
            .get("portion")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|portion| !portion.is_empty())
            .unwrap_or(DEFAULT_PORTION)
            .to_string(),
    })
}

/// The substring between the first `{` and the last `}`, or the input with
/// fence markers stripped when no brace pair exists.
fn extract_json_object(raw: &str) -> String {
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}'))
        && start < end
    {
        return raw[start..=end].to_string();
    }

    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn failure_reason(object: &serde_json::Map<String, Value>) -> String {
    for key in ["message", "reason"] {
        if let Some(reason) = object.get(key).and_then(Value::as_str)
            && !reason.trim().is_empty()
        {
            return reason.trim().to_string();
        }
    }

    if let Some(reason) = object.get("error").and_then(Value::as_str)
        && !reason.trim().is_empty()
    {
        return reason.trim().to_string();
    }

    "makanan tidak dikenali".to_string()
}

fn coerce_number(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
        Some(Value::String(raw)) => raw.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn bounded_excerpt(raw: &str) -> String {
    let compact = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() <= MAX_EXCERPT_CHARS {
        return compact;
    }

    compact.chars().take(MAX_EXCERPT_CHARS).collect::<String>() + "…"
}

#[cfg(test)]
mod tests {
    use super::{RecognitionResult, parse_recognition};

    #[test]
    fn parses_fenced_json_wrapped_in_prose() {
        let raw = "Here you go:\n```json\n{\"name\":\"Nasi Goreng\",\"calories\":450}\n```";
        let RecognitionResult::Recognized(food) = parse_recognition(raw) else {
            panic!("expected recognized food");
        };

        assert_eq!(food.name, "Nasi Goreng");
        assert_eq!(food.calories, 450.0);
        assert_eq!(food.protein_g, 0.0);
        assert_eq!(food.portion, "1 porsi");
    }

    #[test]
    fn explicit_failure_marker_surfaces_provider_reason() {
        let raw = "{\"error\":\"unrecognized\",\"message\":\"blurry\"}";
        assert_eq!(
            parse_recognition(raw),
            RecognitionResult::Unrecognized {
                reason: "blurry".to_string()
            }
        );
    }

    #[test]
    fn failure_marker_without_message_falls_back_to_error_text() {
        let raw = "{\"error\":\"not a food photo\"}";
        assert_eq!(
            parse_recognition(raw),
            RecognitionResult::Unrecognized {
                reason: "not a food photo".to_string()
            }
        );
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let raw = "{\"name\":\"Sate Ayam\",\"calories\":\"320\",\"protein\":\"25.5\",\"portion\":\"10 tusuk\"}";
        let RecognitionResult::Recognized(food) = parse_recognition(raw) else {
            panic!("expected recognized food");
        };

        assert_eq!(food.calories, 320.0);
        assert_eq!(food.protein_g, 25.5);
        assert_eq!(food.portion, "10 tusuk");
    }

    #[test]
    fn invalid_json_keeps_a_bounded_excerpt_of_the_raw_text() {
        let raw = "x".repeat(5000);
        let RecognitionResult::Unrecognized { reason } = parse_recognition(&raw) else {
            panic!("expected failure variant");
        };

        assert!(reason.starts_with("analysis output was not valid JSON:"));
        assert!(reason.chars().count() < 300);
    }

    #[test]
    fn missing_name_is_a_failure_not_a_panic() {
        let result = parse_recognition("{\"calories\": 100}");
        assert!(matches!(result, RecognitionResult::Unrecognized { .. }));
        assert!(matches!(
            parse_recognition(""),
            RecognitionResult::Unrecognized { .. }
        ));
    }

    #[test]
    fn braces_inside_prose_take_priority_over_fence_stripping() {
        let raw = "The result { \"name\": \"Gado-Gado\", \"calories\": 280 } as requested.";
        let RecognitionResult::Recognized(food) = parse_recognition(raw) else {
            panic!("expected recognized food");
        };
        assert_eq!(food.name, "Gado-Gado");
    }
}
