//! Content API endpoints.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiResponse, ApiResult};
use crate::auth::AdminEmail;
use crate::errors::AppError;
use crate::models::ContentBlock;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ContentQuery {
    pub slug: Option<String>,
}

/// Body of `PUT /api/content`.
#[derive(Debug, Deserialize)]
pub struct PutContentRequest {
    pub slug: String,
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct BlockPayload {
    pub block: Option<ContentBlock>,
}

#[derive(Debug, Serialize)]
pub struct BlocksPayload {
    pub blocks: Vec<ContentBlock>,
}

/// Either one block (`?slug=`) or all of them.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ContentPayload {
    One(BlockPayload),
    All(BlocksPayload),
}

/// GET /api/content - Public read of one block or all blocks.
///
/// Reads degrade: a storage failure looks like missing content.
pub async fn get_content(
    State(state): State<AppState>,
    Query(query): Query<ContentQuery>,
) -> ApiResponse<ContentPayload> {
    let payload = match query.slug {
        Some(slug) => ContentPayload::One(BlockPayload {
            block: state.store.fetch_content_block(&slug).await,
        }),
        None => ContentPayload::All(BlocksPayload {
            blocks: state.store.fetch_all_content_blocks().await,
        }),
    };

    ApiResponse::new(payload).cached(state.config.content_cache_control())
}

/// PUT /api/content - Validate and store one block. Runs behind the admin gate.
pub async fn put_content(
    State(state): State<AppState>,
    Extension(AdminEmail(email)): Extension<AdminEmail>,
    body: Result<Json<PutContentRequest>, JsonRejection>,
) -> ApiResult<BlockPayload> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let block = state
        .store
        .upsert_content_block(&request.slug, &request.data)
        .await?;

    tracing::info!("Content block {} updated by {}", block.slug, email);
    Ok(ApiResponse::new(BlockPayload { block: Some(block) }))
}
