//! Gemini API client for image recognition.
//!
//! Wraps the `generateContent` endpoint for single-turn multimodal prompts.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::models::ScanImage;

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API client.
///
/// Sends a text prompt plus inline images and returns the model's text
/// output. Vision-specific prompting lives with the caller.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be constructed.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(GeminiClientInner {
                client,
                api_key: config.api_key.clone(),
                model: config.model.clone(),
            }),
        }
    }

    /// Send a prompt with inline images and return the response text.
    ///
    /// Each image is submitted under its own content type.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns an error response,
    /// or produces no text candidate.
    #[instrument(skip(self, prompt, images), fields(model = %self.inner.model, images = images.len()))]
    pub async fn generate_from_images(
        &self,
        prompt: &str,
        images: &[ScanImage],
    ) -> Result<String, GeminiError> {
        let mut parts = Vec::with_capacity(images.len() + 1);
        parts.push(Part::Text(prompt.to_string()));
        for image in images {
            parts.push(Part::InlineData {
                mime_type: image.mime_type.clone(),
                data: BASE64.encode(&image.bytes),
            });
        }

        let request = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let url = format!(
            "{GEMINI_API_BASE}/{}:generateContent?key={}",
            self.inner.model,
            self.inner.api_key.expose_secret()
        );

        let response = self.inner.client.post(&url).json(&request).send().await?;

        self.handle_response(response).await
    }

    /// Handle a response, extracting the first candidate's text.
    async fn handle_response(&self, response: reqwest::Response) -> Result<String, GeminiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            let parsed: GenerateContentResponse = serde_json::from_str(&body)
                .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

            parsed.first_candidate_text().ok_or_else(|| {
                let finish_reason = parsed
                    .candidates
                    .first()
                    .and_then(|c| c.finish_reason.clone())
                    .unwrap_or_else(|| "no candidates".to_string());
                GeminiError::EmptyResponse(finish_reason)
            })
        } else {
            Err(self.handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GeminiError::RateLimited(retry_after);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    GeminiError::Api {
                        code: api_error.error.code,
                        message: api_error.error.message,
                    }
                } else {
                    GeminiError::Api {
                        code: status.as_u16(),
                        message: body,
                    }
                }
            }
            Err(e) => GeminiError::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GeminiClient>();
    }

    #[test]
    fn test_gemini_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GeminiClient>();
    }
}
