//! Topic-suggestion route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use serde::Deserialize;

use terry_store_core::TopicRequest;

use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Topic suggestion form data.
#[derive(Debug, Deserialize)]
pub struct TopicForm {
    pub store_focus: String,
}

/// Topic suggestion page template.
#[derive(Template, WebTemplate)]
#[template(path = "topics.html")]
pub struct TopicsTemplate {
    pub user: Option<CurrentUser>,
    pub focus: String,
    pub topics: Vec<String>,
    pub error: Option<String>,
}

/// Display the topic suggestion form.
pub async fn page(RequireAdmin(admin): RequireAdmin) -> TopicsTemplate {
    TopicsTemplate {
        user: Some(admin),
        focus: String::new(),
        topics: Vec::new(),
        error: None,
    }
}

/// Run the topic-suggestion flow and render the results inline.
pub async fn suggest(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<TopicForm>,
) -> TopicsTemplate {
    let request = match TopicRequest::parse(&form.store_focus) {
        Ok(request) => request,
        Err(e) => {
            return TopicsTemplate {
                user: Some(admin),
                focus: form.store_focus,
                topics: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    match state.topics().suggest(&request).await {
        Ok(topics) => TopicsTemplate {
            user: Some(admin),
            focus: form.store_focus,
            topics,
            error: None,
        },
        Err(e) => TopicsTemplate {
            user: Some(admin),
            focus: form.store_focus,
            topics: Vec::new(),
            error: Some(e.to_string()),
        },
    }
}
