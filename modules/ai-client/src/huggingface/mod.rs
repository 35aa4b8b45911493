mod client;
pub(crate) mod types;

pub use types::{GenerationParameters, TextGenerationRequest};

use std::time::Duration;

use anyhow::Result;

use client::HuggingFaceClient;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// =============================================================================
// HuggingFace inference client
// =============================================================================

#[derive(Clone)]
pub struct HuggingFace {
    api_key: String,
    model: String,
    base_url: Option<String>,
    timeout: Duration,
}

impl HuggingFace {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> HuggingFaceClient {
        let client = HuggingFaceClient::new(&self.api_key, self.timeout);
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Single text-generation call. No retries.
    pub async fn text_generation(
        &self,
        prompt: impl Into<String>,
        parameters: GenerationParameters,
    ) -> Result<String> {
        let request = TextGenerationRequest::new(prompt, parameters);
        self.client().generate(&self.model, &request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huggingface_new() {
        let hf = HuggingFace::new("hf_test", "meta-llama/Llama-3.2-3B-Instruct");
        assert_eq!(hf.model(), "meta-llama/Llama-3.2-3B-Instruct");
        assert_eq!(hf.api_key, "hf_test");
        assert_eq!(hf.timeout, DEFAULT_TIMEOUT);
        assert!(hf.base_url.is_none());
    }

    #[test]
    fn test_huggingface_builders() {
        let hf = HuggingFace::new("hf_test", "m")
            .with_base_url("http://localhost:8080/")
            .with_timeout(Duration::from_secs(2));
        assert_eq!(hf.base_url.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(hf.timeout, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let hf = HuggingFace::new("hf_test", "m")
            .with_base_url("http://127.0.0.1:1")
            .with_timeout(Duration::from_secs(2));
        let result = hf
            .text_generation("prompt", GenerationParameters::default())
            .await;
        assert!(result.is_err());
    }
}
