//! Gemini `generateContent` over HTTPS.

use std::time::Instant;

use tracing::{debug, trace};

use super::{ModelClient, ModelError, ModelFuture};
use crate::config::ClientConfig;
use crate::request::ModelRequest;
use crate::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Async HTTP client for the Gemini REST API.
pub struct GeminiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("visuanary/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| ModelError::ClientBuild(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send one request and return the first candidate's text.
    pub async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let body = GenerateContentRequest::from_request(request, &self.config.generation);
        debug!(
            "Gemini request: model={}, mode={}, parts={}, image={}",
            self.config.model,
            request.mode(),
            request.parts().len(),
            request.has_image(),
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(&body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ModelError::RequestFailed(format!("failed to read response: {e}")))?;

        debug!(
            "Gemini response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|env| env.error.message)
                .unwrap_or(text);
            return Err(ModelError::Api {
                status: status.as_u16(),
                message,
            });
        }

        parse_response(&text)
    }
}

impl ModelClient for GeminiClient {
    fn invoke<'a>(&'a self, request: &'a ModelRequest) -> ModelFuture<'a> {
        Box::pin(self.generate(request))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Extract the answer text from a successful response body.
fn parse_response(body: &str) -> Result<String, ModelError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))?;

    if let Some(err) = &parsed.error {
        return Err(ModelError::Api {
            status: err.code.unwrap_or(0),
            message: err.message.clone(),
        });
    }

    if let Some(usage) = &parsed.usage_metadata {
        debug!(
            "Token usage: prompt={}, candidates={}, total={}",
            usage.prompt_token_count.unwrap_or(0),
            usage.candidates_token_count.unwrap_or(0),
            usage.total_token_count.unwrap_or(0),
        );
    }

    if let Some(text) = parsed.text() {
        return Ok(text);
    }
    if let Some(reason) = parsed.block_reason() {
        return Err(ModelError::Blocked(reason.to_string()));
    }
    Err(ModelError::EmptyResponse(
        parsed.finish_reason().map(str::to_string),
    ))
}
