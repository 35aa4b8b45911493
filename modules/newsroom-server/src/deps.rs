use std::sync::Arc;
use std::time::Duration;

use ai_client::HuggingFace;
use newsroom_common::Config;
use newsroom_core::{
    EpisodeRunner, EvaluatorConfig, HuggingFaceGenerator, OfflineGenerator, TextGenerator,
};
use tracing::warn;

/// Generator for the configured model. Without an API key every call is
/// served by the fallback script.
pub fn build_generator(config: &Config) -> Arc<dyn TextGenerator> {
    match config.hf_api_key.as_deref() {
        Some(key) => {
            let hf = HuggingFace::new(key, &config.hf_model)
                .with_base_url(&config.hf_base_url)
                .with_timeout(Duration::from_secs(config.hf_timeout_secs));
            Arc::new(HuggingFaceGenerator::new(hf).with_max_new_tokens(config.hf_max_new_tokens))
        }
        None => {
            warn!("HF_API_KEY not set, generation will use fallback scripts");
            Arc::new(OfflineGenerator::new(&config.hf_model))
        }
    }
}

pub fn build_runner(config: &Config) -> EpisodeRunner {
    EpisodeRunner::new(build_generator(config), EvaluatorConfig::from_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_builds_offline_generator() {
        let config = Config::default();
        let generator = build_generator(&config);
        assert_eq!(generator.model(), config.hf_model);
    }

    #[test]
    fn runner_takes_gate_from_config() {
        let config = Config {
            gate_threshold: 0.72,
            check_specificity: false,
            ..Default::default()
        };
        let runner = build_runner(&config);
        assert_eq!(runner.evaluator().gate_threshold, 0.72);
        assert!(!runner.evaluator().check_specificity);
    }
}
