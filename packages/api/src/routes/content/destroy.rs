use axum::{
    Extension,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

use crate::{
    entity::content,
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

use super::find_by_slug;

/// Soft-deletes the content row; translation and counter rows follow the
/// association-level cascade in the schema.
#[tracing::instrument(name = "DELETE /content/content-delete/{slug}", skip(state, auth))]
pub async fn destroy_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    auth.require_admin(lang)?;

    let content = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "content.notFound")))?;

    let mut active: content::ActiveModel = content.into();
    active.deleted_at = Set(Some(Utc::now().naive_utc()));
    active.update(&state.db).await?;

    Ok(ApiResponse::message(
        "Deleted content and its translations successfully",
    ))
}
