//! Home page: store profile and featured showcase.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::filters;
use crate::models::CurrentUser;
use crate::routes::products::ProductView;
use crate::services::AuthContext;
use crate::state::AppState;

/// Number of products in the featured showcase.
const FEATURED_COUNT: usize = 5;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub user: Option<CurrentUser>,
    pub featured: Vec<ProductView>,
}

/// Display the store profile with the newest products.
#[instrument(skip(state, ctx))]
pub async fn home(State(state): State<AppState>, ctx: AuthContext) -> HomeTemplate {
    let featured = state
        .catalog()
        .list_products(Some(FEATURED_COUNT))
        .await
        .into_iter()
        .map(ProductView::from)
        .collect();

    HomeTemplate {
        user: ctx.user().cloned(),
        featured,
    }
}
