//! Blog topic suggestion flow.
//!
//! Formats a fixed prompt template with the store-focus text, invokes the
//! generative-text capability, and shape-validates the structured response.
//! Raw provider errors never reach the caller: everything is folded into
//! one of two user-facing [`TopicError`] messages.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use terry_store_core::TopicRequest;

/// Structured output expected from the model: a list of topic ideas.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicIdeas {
    pub topics: Vec<String>,
}

/// Errors a topic-model backend can report.
#[derive(Debug, Error)]
pub enum TopicModelError {
    /// The backend could not be reached or rejected the call.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with something that isn't a topic list.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Generative-text capability for topic suggestions.
#[async_trait]
pub trait TopicModel: Send + Sync {
    /// Run the prompt and return the structured topic list.
    async fn suggest_topics(&self, prompt: &str) -> Result<TopicIdeas, TopicModelError>;
}

/// User-facing errors from the topic-suggestion flow.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TopicError {
    /// The model replied, but not with a usable topic list.
    #[error("The AI returned an unexpected response format.")]
    UnexpectedFormat,

    /// The model call itself failed.
    #[error(
        "Failed to generate topic suggestions due to an internal error. Please try again later."
    )]
    Unavailable,
}

/// Blog topic suggestion service.
pub struct TopicService {
    model: Arc<dyn TopicModel>,
}

impl TopicService {
    /// Create a new topic service.
    #[must_use]
    pub fn new(model: Arc<dyn TopicModel>) -> Self {
        Self { model }
    }

    /// Suggest blog topics for a validated store-focus description.
    ///
    /// # Errors
    ///
    /// Returns a [`TopicError`] carrying a user-facing message; provider
    /// details are logged here and go no further.
    pub async fn suggest(&self, request: &TopicRequest) -> Result<Vec<String>, TopicError> {
        let prompt = build_prompt(request);

        match self.model.suggest_topics(&prompt).await {
            Ok(ideas) => {
                let topics: Vec<String> = ideas
                    .topics
                    .into_iter()
                    .map(|topic| topic.trim().to_owned())
                    .filter(|topic| !topic.is_empty())
                    .collect();

                if topics.is_empty() {
                    tracing::warn!("Topic model returned no usable topics");
                    return Err(TopicError::UnexpectedFormat);
                }

                Ok(topics)
            }
            Err(TopicModelError::Malformed(detail)) => {
                tracing::error!("Topic model response malformed: {detail}");
                Err(TopicError::UnexpectedFormat)
            }
            Err(TopicModelError::Transport(detail)) => {
                tracing::error!("Topic model call failed: {detail}");
                Err(TopicError::Unavailable)
            }
        }
    }
}

/// Render the fixed prompt template for a store-focus description.
fn build_prompt(request: &TopicRequest) -> String {
    format!(
        "You are an expert content strategist for e-commerce stores.\n\
         Generate a list of 5 to 10 engaging blog topic ideas for a store that focuses on: {}.\n\
         The topics should be creative, relevant to the store's focus, and appealing to potential customers.\n",
        request.store_focus()
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct ScriptedModel {
        response: Result<Vec<String>, TopicModelError>,
    }

    #[async_trait]
    impl TopicModel for ScriptedModel {
        async fn suggest_topics(&self, _prompt: &str) -> Result<TopicIdeas, TopicModelError> {
            match &self.response {
                Ok(topics) => Ok(TopicIdeas {
                    topics: topics.clone(),
                }),
                Err(TopicModelError::Transport(e)) => Err(TopicModelError::Transport(e.clone())),
                Err(TopicModelError::Malformed(e)) => Err(TopicModelError::Malformed(e.clone())),
            }
        }
    }

    fn request() -> TopicRequest {
        TopicRequest::parse("selling handmade artisanal pottery and ceramics").unwrap()
    }

    #[tokio::test]
    async fn test_suggest_returns_topics() {
        let service = TopicService::new(Arc::new(ScriptedModel {
            response: Ok(vec![
                "Glazing 101".to_owned(),
                "Studio tour".to_owned(),
                "Care for ceramics".to_owned(),
                "Gift guide".to_owned(),
                "Meet the potter".to_owned(),
                "Wheel vs hand-building".to_owned(),
            ]),
        }));

        let topics = service.suggest(&request()).await.unwrap();
        assert_eq!(topics.len(), 6);
        assert!(topics.iter().all(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn test_suggest_blank_topics_is_unexpected_format() {
        let service = TopicService::new(Arc::new(ScriptedModel {
            response: Ok(vec![" ".to_owned(), String::new()]),
        }));

        let err = service.suggest(&request()).await.unwrap_err();
        assert_eq!(err, TopicError::UnexpectedFormat);
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn test_suggest_malformed_response_is_unexpected_format() {
        let service = TopicService::new(Arc::new(ScriptedModel {
            response: Err(TopicModelError::Malformed("missing field `topics`".to_owned())),
        }));

        assert_eq!(
            service.suggest(&request()).await.unwrap_err(),
            TopicError::UnexpectedFormat
        );
    }

    #[tokio::test]
    async fn test_suggest_transport_failure_is_unavailable() {
        let service = TopicService::new(Arc::new(ScriptedModel {
            response: Err(TopicModelError::Transport("connection refused".to_owned())),
        }));

        let err = service.suggest(&request()).await.unwrap_err();
        assert_eq!(err, TopicError::Unavailable);
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_build_prompt_embeds_focus() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("handmade artisanal pottery"));
        assert!(prompt.contains("5 to 10"));
    }
}
