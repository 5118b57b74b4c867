//! Custom Axum extractors
//!
//! Validation happens here, before a handler runs, so nothing invalid
//! reaches the store.

use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::{Article, ArticlePayload, Category, Page, ValidationError};

/// Extract and validate `/{category}/{page}` path parameters
#[derive(Debug)]
pub struct CategoryPageParams {
    pub category: Category,
    pub page: Page,
}

impl<S> FromRequestParts<S> for CategoryPageParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((category, page)): Path<(String, String)> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|e| ValidationError::Malformed {
                    field: "path",
                    reason: e.body_text(),
                })?;

        Ok(Self {
            category: category.parse()?,
            page: Page::parse(&page)?,
        })
    }
}

/// Extract a JSON article body and validate every field
pub struct ValidArticle(pub Article);

impl<S> FromRequest<S> for ValidArticle
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload): Json<ArticlePayload> = Json::from_request(req, state)
            .await
            .map_err(|e| ValidationError::Malformed {
                field: "body",
                reason: e.body_text(),
            })?;

        Ok(Self(Article::try_from(payload)?))
    }
}
