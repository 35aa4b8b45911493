use serde::{Deserialize, Serialize};

// =============================================================================
// Request
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TextGenerationRequest {
    pub inputs: String,
    pub parameters: GenerationParameters,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 200,
            temperature: 0.7,
            do_sample: true,
        }
    }
}

impl TextGenerationRequest {
    pub fn new(inputs: impl Into<String>, parameters: GenerationParameters) -> Self {
        Self {
            inputs: inputs.into(),
            parameters,
        }
    }
}

// =============================================================================
// Response
// =============================================================================

/// Pull the generated text out of an inference response.
///
/// The endpoint normally answers with `[{"generated_text": "..."}]`. Anything
/// else is coerced to its string form so the caller always gets text back.
pub(crate) fn generated_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::Array(items) if !items.is_empty() => items[0]
            .get("generated_text")
            .and_then(|t| t.as_str())
            .unwrap_or_default()
            .to_string(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_wire_shape() {
        let request = TextGenerationRequest::new(
            "Write a segment",
            GenerationParameters {
                max_new_tokens: 200,
                temperature: 0.9,
                do_sample: true,
            },
        );
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["inputs"], "Write a segment");
        assert_eq!(value["parameters"]["max_new_tokens"], 200);
        assert_eq!(value["parameters"]["do_sample"], true);
        let temperature = value["parameters"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.9).abs() < 1e-6);
    }

    #[test]
    fn extracts_first_generated_text() {
        let value = json!([{"generated_text": "hello"}, {"generated_text": "ignored"}]);
        assert_eq!(generated_text(value), "hello");
    }

    #[test]
    fn missing_field_yields_empty_text() {
        let value = json!([{"score": 0.3}]);
        assert_eq!(generated_text(value), "");
    }

    #[test]
    fn opaque_payload_is_stringified() {
        let value = json!({"error": "Model is loading"});
        assert_eq!(generated_text(value), r#"{"error":"Model is loading"}"#);
        assert_eq!(generated_text(json!([])), "[]");
        assert_eq!(generated_text(json!("plain")), "plain");
    }
}
