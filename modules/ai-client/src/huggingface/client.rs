use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::types::*;
use crate::util::truncate_to_char_boundary;

const HUGGINGFACE_API_URL: &str = "https://api-inference.huggingface.co";

/// Error bodies can be whole HTML pages; keep log lines bounded.
const MAX_ERROR_BODY_BYTES: usize = 500;

pub(crate) struct HuggingFaceClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HuggingFaceClient {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            base_url: HUGGINGFACE_API_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn generate(&self, model: &str, request: &TextGenerationRequest) -> Result<String> {
        let url = format!("{}/models/{}", self.base_url, model);

        debug!(
            model,
            temperature = request.parameters.temperature,
            prompt_chars = request.inputs.len(),
            "Hugging Face text generation request"
        );

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Hugging Face API error ({}): {}",
                status,
                truncate_to_char_boundary(&error_text, MAX_ERROR_BODY_BYTES)
            ));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Malformed Hugging Face response: {}", e))?;

        Ok(generated_text(body))
    }
}
