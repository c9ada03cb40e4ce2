//! Topic-suggestion flow properties: shape validation on both sides and
//! error folding to user-facing messages.

use std::sync::Arc;

use async_trait::async_trait;

use terry_store_core::{TopicRequest, TopicValidationError};
use terry_store_site::services::topics::{TopicIdeas, TopicModel, TopicModelError};
use terry_store_site::services::{TopicError, TopicService};

/// Scripted model: answers every prompt the same way.
enum Script {
    Topics(Vec<&'static str>),
    Malformed,
    Down,
}

struct ScriptedModel(Script);

#[async_trait]
impl TopicModel for ScriptedModel {
    async fn suggest_topics(&self, prompt: &str) -> Result<TopicIdeas, TopicModelError> {
        assert!(prompt.contains("content strategist"), "prompt template lost");
        match &self.0 {
            Script::Topics(topics) => Ok(TopicIdeas {
                topics: topics.iter().map(|t| (*t).to_owned()).collect(),
            }),
            Script::Malformed => Err(TopicModelError::Malformed(
                "expected `topics` array".to_owned(),
            )),
            Script::Down => Err(TopicModelError::Transport("connection refused".to_owned())),
        }
    }
}

fn service(script: Script) -> TopicService {
    TopicService::new(Arc::new(ScriptedModel(script)))
}

fn pottery_request() -> TopicRequest {
    TopicRequest::parse("selling handmade artisanal pottery and ceramics")
        .expect("valid request")
}

#[tokio::test]
async fn test_suggest_returns_five_to_ten_nonempty_topics() {
    let topics = service(Script::Topics(vec![
        "The story behind our glazes",
        "Five ways to style ceramics at home",
        "From wheel to kiln: how a mug is born",
        "Caring for handmade pottery",
        "Meet the makers",
        "Why small-batch beats mass production",
        "Gift guide for pottery lovers",
    ]))
    .suggest(&pottery_request())
    .await
    .expect("suggestion failed");

    assert!((5..=10).contains(&topics.len()));
    assert!(topics.iter().all(|topic| !topic.is_empty()));
}

#[tokio::test]
async fn test_malformed_upstream_response_yields_error_value() {
    let err = service(Script::Malformed)
        .suggest(&pottery_request())
        .await
        .expect_err("malformed response must fail");

    assert_eq!(err, TopicError::UnexpectedFormat);
    assert!(!err.to_string().is_empty());
}

#[tokio::test]
async fn test_transport_failure_yields_generic_error_value() {
    let err = service(Script::Down)
        .suggest(&pottery_request())
        .await
        .expect_err("transport failure must fail");

    assert_eq!(err, TopicError::Unavailable);
    assert!(!err.to_string().is_empty());
    // The raw provider detail stays out of the user-facing message.
    assert!(!err.to_string().contains("connection refused"));
}

#[tokio::test]
async fn test_blank_topic_list_is_rejected() {
    let err = service(Script::Topics(vec!["", "  "]))
        .suggest(&pottery_request())
        .await
        .expect_err("blank topics must fail");
    assert_eq!(err, TopicError::UnexpectedFormat);
}

#[test]
fn test_short_store_focus_is_rejected_before_any_call() {
    assert_eq!(
        TopicRequest::parse("pottery").expect_err("short focus must fail"),
        TopicValidationError::FocusTooShort
    );
}
