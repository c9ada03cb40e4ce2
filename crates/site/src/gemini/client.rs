//! Gemini API client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GeminiConfig;
use crate::services::topics::{TopicIdeas, TopicModel, TopicModelError};

use super::error::{ApiErrorResponse, GeminiError};
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API client.
///
/// Provides structured-output generation against the Google Generative
/// Language API.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini API configuration containing API key and model
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &GeminiConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(GeminiClientInner {
                client,
                model: config.model.clone(),
            }),
        }
    }

    /// Run a prompt and return the raw JSON text the model produced.
    ///
    /// The response schema constrains the model to structured output; the
    /// returned string is the JSON document from the first candidate.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns an error
    /// response, or produces no candidates.
    #[instrument(skip(self, prompt, response_schema), fields(model = %self.inner.model))]
    pub async fn generate_json(
        &self,
        prompt: &str,
        response_schema: serde_json::Value,
    ) -> Result<String, GeminiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_owned(),
                parts: vec![Part {
                    text: prompt.to_owned(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_owned(),
                response_schema,
            },
        };

        let url = format!(
            "{GEMINI_API_BASE}/models/{}:generateContent",
            self.inner.model
        );

        let response = self.inner.client.post(url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Parse(format!("Failed to parse response: {e}")))?;

        parsed.first_text().ok_or(GeminiError::EmptyResponse)
    }

    /// Handle an error status code.
    async fn handle_error_status(
        &self,
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> GeminiError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return GeminiError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return GeminiError::Unauthorized("Invalid API key".to_string());
        }

        // Try to parse API error response
        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    GeminiError::Api {
                        status: api_error.error.status,
                        message: api_error.error.message,
                    }
                } else {
                    GeminiError::Api {
                        status: status.to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => GeminiError::Http(e),
        }
    }
}

#[async_trait]
impl TopicModel for GeminiClient {
    async fn suggest_topics(&self, prompt: &str) -> Result<TopicIdeas, TopicModelError> {
        let schema = topics_response_schema();

        let raw = self
            .generate_json(prompt, schema)
            .await
            .map_err(|e| match e {
                GeminiError::Parse(detail) => TopicModelError::Malformed(detail),
                GeminiError::EmptyResponse => {
                    TopicModelError::Malformed("empty response".to_owned())
                }
                other => TopicModelError::Transport(other.to_string()),
            })?;

        serde_json::from_str::<TopicIdeas>(&raw)
            .map_err(|e| TopicModelError::Malformed(format!("Failed to parse topic list: {e}")))
    }
}

/// JSON schema for the `{"topics": [...]}` structured output.
fn topics_response_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "topics": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 5-10 blog topic ideas."
            }
        },
        "required": ["topics"]
    })
}
