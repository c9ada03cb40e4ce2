//! Dashboard route handlers.
//!
//! The landing page is open to any signed-in user; product upload and
//! article moderation are admin-only. Guards redirect, and the services
//! re-check the capability on every mutation.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

use terry_store_core::{
    Article, ArticleId, ArticleStatus, NewProduct, Product, ProductLabel, ProductValidationError,
};

use crate::db::RepositoryError;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::CurrentUser;
use crate::services::{AuthContext, BlogError, CatalogError};
use crate::state::AppState;

use super::MessageQuery;

// =============================================================================
// View Types
// =============================================================================

/// A select option (used for labels and statuses).
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: &'static str,
    pub name: &'static str,
}

/// Product row in the dashboard table.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub link: String,
    pub label: &'static str,
    pub created: String,
}

impl From<Product> for ProductRow {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title,
            link: product.link,
            label: product.label.display_name(),
            created: product.created_at.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Article row in the moderation table.
#[derive(Debug, Clone)]
pub struct ArticleRow {
    pub id: String,
    pub title: String,
    pub link: String,
    pub short_description: String,
    pub author: String,
    pub date: String,
    pub status: &'static str,
    /// Reachable statuses; the current one is omitted (no-op transition).
    pub transitions: Vec<SelectOption>,
}

impl From<Article> for ArticleRow {
    fn from(article: Article) -> Self {
        let transitions = ArticleStatus::ALL
            .into_iter()
            .filter(|status| *status != article.status)
            .map(status_option)
            .collect();

        Self {
            id: article.id.to_string(),
            title: article.title,
            link: article.link,
            short_description: article.short_description,
            author: article.author,
            date: article.published_on.format("%Y-%m-%d").to_string(),
            status: status_name(article.status),
            transitions,
        }
    }
}

const fn status_name(status: ArticleStatus) -> &'static str {
    match status {
        ArticleStatus::Review => "Review",
        ArticleStatus::Accepted => "Accepted",
        ArticleStatus::Archived => "Archived",
        ArticleStatus::Deleted => "Deleted",
    }
}

const fn status_token(status: ArticleStatus) -> &'static str {
    match status {
        ArticleStatus::Review => "review",
        ArticleStatus::Accepted => "accepted",
        ArticleStatus::Archived => "archived",
        ArticleStatus::Deleted => "deleted",
    }
}

const fn status_option(status: ArticleStatus) -> SelectOption {
    SelectOption {
        value: status_token(status),
        name: status_name(status),
    }
}

fn label_options() -> Vec<SelectOption> {
    ProductLabel::ALL
        .into_iter()
        .map(|label| SelectOption {
            value: label_token(label),
            name: label.display_name(),
        })
        .collect()
}

const fn label_token(label: ProductLabel) -> &'static str {
    match label {
        ProductLabel::Sticker => "sticker",
        ProductLabel::BumperSticker => "bumper_sticker",
        ProductLabel::Button => "button",
        ProductLabel::Magnet => "magnet",
        ProductLabel::TShirt => "t_shirt",
        ProductLabel::EconomyStickers => "economy_stickers",
        ProductLabel::StickersSheets => "stickers_sheets",
        ProductLabel::CustomHats => "custom_hats",
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Dashboard landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct DashboardTemplate {
    pub user: Option<CurrentUser>,
    pub is_admin: bool,
    pub email_verified: bool,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Dashboard products page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/products.html")]
pub struct DashboardProductsTemplate {
    pub user: Option<CurrentUser>,
    pub labels: Vec<SelectOption>,
    pub products: Vec<ProductRow>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

/// Dashboard articles page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/articles.html")]
pub struct DashboardArticlesTemplate {
    pub user: Option<CurrentUser>,
    pub articles: Vec<ArticleRow>,
    pub statuses: Vec<SelectOption>,
    pub filter: Option<String>,
    pub notice: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Notice code mapping
// =============================================================================

fn dashboard_notice(code: &str) -> String {
    match code {
        "registered" => {
            "Welcome! We sent you a verification email - check your inbox.".to_owned()
        }
        "verified" => "Your email address is verified.".to_owned(),
        "verification_sent" => "Verification email sent - check your inbox.".to_owned(),
        _ => "Done.".to_owned(),
    }
}

fn dashboard_error(code: &str) -> String {
    match code {
        "verification_failed" => "Could not send the verification email. Try again later.".to_owned(),
        _ => "Something went wrong. Please try again.".to_owned(),
    }
}

fn upload_error_message(code: &str) -> String {
    match code {
        "title_too_short" => "Title must be at least 3 characters long.".to_owned(),
        "invalid_link" => "Please enter a valid URL for the store link.".to_owned(),
        "invalid_image_url" => "Please enter a valid image URL.".to_owned(),
        "unknown_label" => "Please choose one of the listed label types.".to_owned(),
        "too_many_bullets" => "A product can have at most 5 bullet points.".to_owned(),
        "empty_bullet" => "Bullet points cannot be empty.".to_owned(),
        _ => "Upload failed. Please try again.".to_owned(),
    }
}

const fn upload_validation_code(error: &ProductValidationError) -> &'static str {
    match error {
        ProductValidationError::TitleTooShort => "title_too_short",
        ProductValidationError::InvalidLink => "invalid_link",
        ProductValidationError::InvalidImageUrl => "invalid_image_url",
        ProductValidationError::UnknownLabel(_) => "unknown_label",
        ProductValidationError::TooManyBullets => "too_many_bullets",
        ProductValidationError::EmptyBullet => "empty_bullet",
    }
}

fn articles_error_message(code: &str) -> String {
    match code {
        "invalid_status" => "Unknown status.".to_owned(),
        "not_found" => "That article no longer exists.".to_owned(),
        _ => "Failed to update status. Please try again.".to_owned(),
    }
}

// =============================================================================
// Landing Page
// =============================================================================

/// Display the dashboard landing page.
pub async fn index(
    RequireAuth(user): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> DashboardTemplate {
    DashboardTemplate {
        is_admin: user.is_admin(),
        email_verified: user.email_verified,
        notice: query.success.as_deref().map(dashboard_notice),
        error: query.error.as_deref().map(dashboard_error),
        user: Some(user),
    }
}

// =============================================================================
// Product Upload
// =============================================================================

/// Product upload form data.
#[derive(Debug, Deserialize)]
pub struct UploadForm {
    pub title: String,
    pub link: String,
    pub image_url: String,
    pub label: String,
    /// One bullet per line.
    #[serde(default)]
    pub bullets: String,
}

/// Display the product upload page with the current catalog.
pub async fn products_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<MessageQuery>,
) -> DashboardProductsTemplate {
    let products = state
        .catalog()
        .list_products(None)
        .await
        .into_iter()
        .map(ProductRow::from)
        .collect();

    DashboardProductsTemplate {
        user: Some(admin),
        labels: label_options(),
        products,
        notice: query
            .success
            .map(|_| "Product uploaded! Your new product has been added successfully.".to_owned()),
        error: query.error.as_deref().map(upload_error_message),
    }
}

/// Handle product upload.
pub async fn upload_product(
    State(state): State<AppState>,
    ctx: AuthContext,
    RequireAdmin(_): RequireAdmin,
    Form(form): Form<UploadForm>,
) -> Result<Response, AppError> {
    // One bullet per textarea line; blank lines are not bullets.
    let bullets: Vec<String> = form
        .bullets
        .lines()
        .map(|line| line.trim().to_owned())
        .filter(|line| !line.is_empty())
        .collect();

    let new = match NewProduct::parse(
        &form.title,
        &form.link,
        &form.image_url,
        &form.label,
        &bullets,
    ) {
        Ok(new) => new,
        Err(e) => {
            let code = upload_validation_code(&e);
            return Ok(
                Redirect::to(&format!("/dashboard/products?error={code}")).into_response()
            );
        }
    };

    match state.catalog().create_product(&ctx, &new).await {
        Ok(_) => Ok(Redirect::to("/dashboard/products?success=uploaded").into_response()),
        // Capability failures surface as 403, not a notice redirect.
        Err(CatalogError::Access(e)) => Err(AppError::Access(e)),
        Err(e) => {
            tracing::error!("Product upload failed: {e}");
            Ok(Redirect::to("/dashboard/products?error=failed").into_response())
        }
    }
}

// =============================================================================
// Article Moderation
// =============================================================================

/// Query parameters for the moderation table.
#[derive(Debug, Deserialize)]
pub struct ArticlesQuery {
    pub status: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Status update form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Display the article moderation table.
pub async fn articles_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Query(query): Query<ArticlesQuery>,
) -> DashboardArticlesTemplate {
    // Unknown filter values mean "all", same as no filter.
    let filter = query
        .status
        .as_deref()
        .and_then(|status| status.parse::<ArticleStatus>().ok());

    let articles = state
        .blog()
        .list_articles(filter)
        .await
        .into_iter()
        .map(ArticleRow::from)
        .collect();

    DashboardArticlesTemplate {
        user: Some(admin),
        articles,
        statuses: ArticleStatus::ALL.into_iter().map(status_option).collect(),
        filter: filter.map(|status| status_token(status).to_owned()),
        notice: query
            .success
            .map(|_| "Article status updated.".to_owned()),
        error: query.error.as_deref().map(articles_error_message),
    }
}

/// Overwrite an article's status.
pub async fn update_article_status(
    State(state): State<AppState>,
    ctx: AuthContext,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<Uuid>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    let Ok(status) = form.status.parse::<ArticleStatus>() else {
        return Ok(Redirect::to("/dashboard/articles?error=invalid_status").into_response());
    };

    match state
        .blog()
        .set_status(&ctx, ArticleId::from(id), status)
        .await
    {
        Ok(()) => Ok(Redirect::to("/dashboard/articles?success=updated").into_response()),
        Err(BlogError::Repository(RepositoryError::NotFound)) => {
            Ok(Redirect::to("/dashboard/articles?error=not_found").into_response())
        }
        Err(BlogError::Access(e)) => Err(AppError::Access(e)),
        Err(e) => {
            tracing::error!("Status update failed: {e}");
            Ok(Redirect::to("/dashboard/articles?error=failed").into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use terry_store_core::ArticleId;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_article_row_omits_current_status_transition() {
        let article = Article {
            id: ArticleId::generate(),
            title: "Sticker care".to_owned(),
            author: "Terry".to_owned(),
            short_description: "How to keep vinyl stickers alive outdoors.".to_owned(),
            link: "https://blog.example.com/care".to_owned(),
            published_on: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            status: ArticleStatus::Review,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let row = ArticleRow::from(article);
        assert_eq!(row.transitions.len(), 3);
        assert!(row.transitions.iter().all(|t| t.value != "review"));
    }

    #[test]
    fn test_label_options_cover_all_labels() {
        assert_eq!(label_options().len(), ProductLabel::ALL.len());
    }

    #[test]
    fn test_upload_codes_map_to_specific_messages() {
        for error in [
            ProductValidationError::TitleTooShort,
            ProductValidationError::InvalidLink,
            ProductValidationError::InvalidImageUrl,
            ProductValidationError::UnknownLabel("poster".to_owned()),
            ProductValidationError::TooManyBullets,
            ProductValidationError::EmptyBullet,
        ] {
            let message = upload_error_message(upload_validation_code(&error));
            assert!(!message.contains("try again"), "unmapped: {error}");
        }
    }
}
