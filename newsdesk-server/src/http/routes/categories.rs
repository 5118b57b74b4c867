//! Category listing endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::CategoryPageParams;
use crate::http::server::AppState;
use crate::models::CategoryPage;

/// GET /category/{category}/{page} - one page of a category, newest first
async fn category_page(
    State(state): State<Arc<AppState>>,
    CategoryPageParams { category, page }: CategoryPageParams,
) -> Result<Json<CategoryPage>, ApiError> {
    let result = state.articles.category_page(category, page).await?;
    Ok(Json(result))
}

/// Category routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/category/{category}/{page}", get(category_page))
}
