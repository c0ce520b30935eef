//! Landing-page banner management and the file-upload endpoint.

use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    entity::{landing_page, prelude::*},
    error::ApiError,
    i18n::RequestLang,
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
    upload,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/landing-details", get(list_banners))
        .route("/landing-store", post(store_banner))
        .route("/landing-update/{id}", patch(update_banner))
        .route("/landing-delete/{id}", delete(destroy_banner))
        .route(
            "/upload-image",
            post(upload_file).layer(DefaultBodyLimit::max(upload::MAX_UPLOAD_BYTES)),
        )
}

#[tracing::instrument(name = "GET /landing/landing-details", skip(state, auth))]
pub async fn list_banners(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<landing_page::Model>>, ApiError> {
    auth.require()?;

    let banners = LandingPage::find()
        .filter(landing_page::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    Ok(ApiResponse::ok(banners, "List of landing page resources"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct BannerPayload {
    #[validate(length(min = 1, message = "Banner image is required"))]
    pub banner_image: String,
}

/// Single-banner upsert: update the existing row when there is one,
/// otherwise create the first.
#[tracing::instrument(name = "POST /landing/landing-store", skip(state, auth, payload))]
pub async fn store_banner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(payload): Json<BannerPayload>,
) -> Result<ApiResponse<landing_page::Model>, ApiError> {
    auth.require()?;
    payload.validate()?;

    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let existing = LandingPage::find()
        .filter(landing_page::Column::DeletedAt.is_null())
        .one(&txn)
        .await?;

    let (banner, message) = match existing {
        Some(existing) => {
            let mut active: landing_page::ActiveModel = existing.into();
            active.banner_image = Set(payload.banner_image.clone());
            active.updated_at = Set(now);
            (
                active.update(&txn).await?,
                "Banner image updated successfully",
            )
        }
        None => {
            let active = landing_page::ActiveModel {
                banner_image: Set(payload.banner_image.clone()),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            };
            (
                active.insert(&txn).await?,
                "Banner image created successfully",
            )
        }
    };

    txn.commit().await?;

    Ok(ApiResponse::ok(banner, message))
}

#[tracing::instrument(name = "PATCH /landing/landing-update/{id}", skip(state, auth, payload))]
pub async fn update_banner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<BannerPayload>,
) -> Result<ApiResponse<landing_page::Model>, ApiError> {
    auth.require()?;
    payload.validate()?;

    let banner = LandingPage::find_by_id(id)
        .filter(landing_page::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Landing page resource not found"))?;

    let mut active: landing_page::ActiveModel = banner.into();
    active.banner_image = Set(payload.banner_image.clone());
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&state.db).await?;

    Ok(ApiResponse::ok(
        updated,
        "Landing page resource updated successfully",
    ))
}

#[tracing::instrument(name = "DELETE /landing/landing-delete/{id}", skip(state, auth))]
pub async fn destroy_banner(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    auth.require()?;

    let banner = LandingPage::find_by_id(id)
        .filter(landing_page::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Landing page resource not found"))?;

    let mut active: landing_page::ActiveModel = banner.into();
    active.deleted_at = Set(Some(Utc::now().naive_utc()));
    active.update(&state.db).await?;

    Ok(ApiResponse::message(
        "Landing page resource deleted successfully",
    ))
}

#[derive(Debug, Serialize)]
pub struct UploadData {
    pub file_url: String,
    pub file_type: String,
}

#[tracing::instrument(name = "POST /landing/upload-image", skip(state, _lang, multipart))]
pub async fn upload_file(
    State(state): State<AppState>,
    RequestLang(_lang): RequestLang,
    multipart: Multipart,
) -> Result<ApiResponse<UploadData>, ApiError> {
    let stored = upload::store_multipart(&state, multipart).await?;

    Ok(ApiResponse::ok(
        UploadData {
            file_url: stored.file_url,
            file_type: stored.file_type,
        },
        "File uploaded successfully",
    ))
}
