//! Blog submission route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;

use terry_store_core::{ArticleValidationError, NewArticle};

use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::CurrentUser;
use crate::services::{AuthContext, BlogError};
use crate::state::AppState;

use super::MessageQuery;

/// Article submission form data.
#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    pub title: String,
    pub author: String,
    pub date: String,
    pub short_description: String,
    pub link: String,
}

/// Blog submission page template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/submit.html")]
pub struct SubmitBlogTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<String>,
    pub success: Option<String>,
}

fn submit_error_message(code: &str) -> String {
    match code {
        "title_too_short" => "Title must be at least 5 characters.".to_owned(),
        "author_too_short" => "Author must be at least 2 characters.".to_owned(),
        "description_too_short" => {
            "Short description must be at least 20 characters.".to_owned()
        }
        "invalid_link" => "Please enter a valid URL for the article.".to_owned(),
        "invalid_date" => "Please enter a valid publication date.".to_owned(),
        _ => "Submission failed. Please try again.".to_owned(),
    }
}

const fn validation_code(error: &ArticleValidationError) -> &'static str {
    match error {
        ArticleValidationError::TitleTooShort => "title_too_short",
        ArticleValidationError::AuthorTooShort => "author_too_short",
        ArticleValidationError::DescriptionTooShort => "description_too_short",
        ArticleValidationError::InvalidLink => "invalid_link",
    }
}

/// Display the article submission form.
pub async fn submit_page(
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> SubmitBlogTemplate {
    SubmitBlogTemplate {
        user: Some(admin),
        error: query.error.as_deref().map(submit_error_message),
        success: query
            .success
            .map(|_| "Submission successful! Your blog post has been sent for review.".to_owned()),
    }
}

/// Handle article submission.
pub async fn submit(
    State(state): State<AppState>,
    ctx: AuthContext,
    RequireAdmin(_): RequireAdmin,
    Form(form): Form<SubmitForm>,
) -> Result<Response, AppError> {
    let Ok(published_on) = NaiveDate::parse_from_str(&form.date, "%Y-%m-%d") else {
        return Ok(Redirect::to("/submit-blog?error=invalid_date").into_response());
    };

    let new = match NewArticle::parse(
        &form.title,
        &form.author,
        &form.short_description,
        &form.link,
        published_on,
    ) {
        Ok(new) => new,
        Err(e) => {
            let code = validation_code(&e);
            return Ok(Redirect::to(&format!("/submit-blog?error={code}")).into_response());
        }
    };

    match state.blog().submit_article(&ctx, &new).await {
        Ok(_) => Ok(Redirect::to("/submit-blog?success=submitted").into_response()),
        Err(BlogError::Access(e)) => Err(AppError::Access(e)),
        Err(e) => {
            tracing::error!("Article submission failed: {e}");
            Ok(Redirect::to("/submit-blog?error=failed").into_response())
        }
    }
}
