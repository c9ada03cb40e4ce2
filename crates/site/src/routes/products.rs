//! Product catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use terry_store_core::Product;

use crate::filters;
use crate::models::CurrentUser;
use crate::services::AuthContext;
use crate::state::AppState;

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub title: String,
    pub link: String,
    pub image_url: String,
    pub label: &'static str,
    pub bullets: Vec<String>,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            title: product.title,
            link: product.link,
            image_url: product.image_url,
            label: product.label.display_name(),
            bullets: product.bullets,
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products.html")]
pub struct ProductsTemplate {
    pub user: Option<CurrentUser>,
    pub products: Vec<ProductView>,
}

/// Display the full product catalog, newest first.
#[instrument(skip(state, ctx))]
pub async fn index(State(state): State<AppState>, ctx: AuthContext) -> ProductsTemplate {
    let products = state
        .catalog()
        .list_products(None)
        .await
        .into_iter()
        .map(ProductView::from)
        .collect();

    ProductsTemplate {
        user: ctx.user().cloned(),
        products,
    }
}
