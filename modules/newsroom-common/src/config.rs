use std::env;
use std::str::FromStr;

use crate::error::NewsroomError;
use crate::primitives::PrimitiveWeights;

pub const DEFAULT_HF_MODEL: &str = "meta-llama/Llama-3.2-3B-Instruct";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_GATE_THRESHOLD: f64 = 0.70;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Text generation
    pub hf_api_key: Option<String>,
    pub hf_model: String,
    pub hf_base_url: String,
    pub hf_timeout_secs: u64,
    pub hf_max_new_tokens: u32,

    // Evaluation
    pub gate_threshold: f64,
    pub check_specificity: bool,
    pub default_primitives: PrimitiveWeights,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_api_key: None,
            hf_model: DEFAULT_HF_MODEL.to_string(),
            hf_base_url: DEFAULT_HF_BASE_URL.to_string(),
            hf_timeout_secs: 30,
            hf_max_new_tokens: 200,
            gate_threshold: DEFAULT_GATE_THRESHOLD,
            check_specificity: true,
            default_primitives: PrimitiveWeights::default(),
            web_host: "0.0.0.0".to_string(),
            web_port: 5199,
        }
    }
}

impl Config {
    /// Load configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, NewsroomError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults;
    /// set-but-malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NewsroomError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gate_threshold = parse_or(&get, "GATE_THRESHOLD", defaults.gate_threshold)?;
        if !(0.0..=1.0).contains(&gate_threshold) {
            return Err(NewsroomError::Config(format!(
                "GATE_THRESHOLD must be within [0, 1], got {gate_threshold}"
            )));
        }

        let default_primitives = match get("DEFAULT_PRIMITIVES") {
            Some(raw) => serde_json::from_str::<PrimitiveWeights>(&raw)
                .map_err(|e| NewsroomError::Config(format!("DEFAULT_PRIMITIVES: {e}")))?
                .clamped(),
            None => defaults.default_primitives,
        };

        Ok(Self {
            hf_api_key: get("HF_API_KEY"),
            hf_model: get("HF_MODEL").unwrap_or(defaults.hf_model),
            hf_base_url: get("HF_BASE_URL").unwrap_or(defaults.hf_base_url),
            hf_timeout_secs: parse_or(&get, "HF_TIMEOUT_SECS", defaults.hf_timeout_secs)?,
            hf_max_new_tokens: parse_or(&get, "HF_MAX_NEW_TOKENS", defaults.hf_max_new_tokens)?,
            gate_threshold,
            check_specificity: parse_or(&get, "CHECK_SPECIFICITY", defaults.check_specificity)?,
            default_primitives,
            web_host: get("WEB_HOST").unwrap_or(defaults.web_host),
            web_port: parse_or(&get, "WEB_PORT", defaults.web_port)?,
        })
    }

    /// Log configuration with secrets redacted.
    pub fn log_redacted(&self) {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) => {
                    let n = v.chars().take(5).map(char::len_utf8).sum::<usize>();
                    format!("{}...({} chars)", &v[..n], v.len())
                }
                None => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  HF_API_KEY: {}", preview_opt(&self.hf_api_key));
        tracing::info!("  HF_MODEL: {}", self.hf_model);
        tracing::info!("  HF_BASE_URL: {}", self.hf_base_url);
        tracing::info!("  GATE_THRESHOLD: {}", self.gate_threshold);
        tracing::info!("  CHECK_SPECIFICITY: {}", self.check_specificity);
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, NewsroomError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| NewsroomError::Config(format!("{key}={raw:?}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.hf_api_key.is_none());
        assert_eq!(config.hf_model, DEFAULT_HF_MODEL);
        assert_eq!(config.gate_threshold, 0.70);
        assert!(config.check_specificity);
        assert_eq!(config.web_port, 5199);
        assert_eq!(config.default_primitives, PrimitiveWeights::default());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup(&[
            ("HF_API_KEY", "hf_secret"),
            ("GATE_THRESHOLD", "0.72"),
            ("CHECK_SPECIFICITY", "false"),
            ("DEFAULT_PRIMITIVES", r#"{"anti_hyperbole": 0.9}"#),
            ("WEB_PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.hf_api_key.as_deref(), Some("hf_secret"));
        assert_eq!(config.gate_threshold, 0.72);
        assert!(!config.check_specificity);
        assert_eq!(config.default_primitives.anti_hyperbole, 0.9);
        assert_eq!(config.default_primitives.brevity, 0.40);
        assert_eq!(config.web_port, 8080);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("HF_API_KEY", "  ")])).unwrap();
        assert!(config.hf_api_key.is_none());
    }

    #[test]
    fn malformed_values_are_errors() {
        assert!(Config::from_lookup(lookup(&[("WEB_PORT", "eighty")])).is_err());
        assert!(Config::from_lookup(lookup(&[("GATE_THRESHOLD", "1.5")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DEFAULT_PRIMITIVES", "[1,2]")])).is_err());
    }
}
