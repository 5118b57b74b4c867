//! Article endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::ValidArticle;
use crate::http::server::AppState;
use crate::models::Article;

/// Acknowledgement for a stored article
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// GET /top-stories - newest article of each category
async fn top_stories(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = state.articles.top_articles().await?;
    Ok(Json(articles))
}

/// POST /article - submit a new article
async fn create_article(
    State(state): State<Arc<AppState>>,
    ValidArticle(article): ValidArticle,
) -> Result<Json<MessageResponse>, ApiError> {
    state.articles.insert(&article).await?;
    tracing::info!(category = %article.category, "article submitted");

    Ok(Json(MessageResponse {
        message: "Article added successfully",
    }))
}

/// Article routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/top-stories", get(top_stories))
        .route("/article", post(create_article))
}
