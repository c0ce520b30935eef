//! Engagement counter endpoints: per-user upsert-by-increment tallies.

use axum::{Extension, Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;

use crate::{
    engagement,
    entity::{content, prelude::*},
    error::ApiError,
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CounterPayload {
    pub slug: Option<String>,
}

#[tracing::instrument(name = "POST /web/auth/video-views-count-add", skip(state, auth, payload))]
pub async fn video_views_count_add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CounterPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    let user = auth.require()?;

    let slug = payload
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Slug is required"))?;

    let video = Content::find()
        .filter(content::Column::Slug.eq(slug))
        .filter(content::Column::FileType.ne("pdf"))
        .filter(content::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found or is a PDF"))?;

    engagement::record_view(&state.db, video.id, user.id).await?;

    Ok(ApiResponse::message("Video view recorded successfully"))
}

#[tracing::instrument(name = "POST /web/auth/pdf-download-count-add", skip(state, auth, payload))]
pub async fn pdf_download_count_add(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<CounterPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    let user = auth.require()?;

    let slug = payload
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::bad_request("Slug is required"))?;

    let pdf = Content::find()
        .filter(content::Column::Slug.eq(slug))
        .filter(content::Column::FileType.eq("pdf"))
        .filter(content::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("pdf not found"))?;

    engagement::record_download(&state.db, pdf.id, user.id).await?;

    Ok(ApiResponse::message("pdf download recorded successfully"))
}
