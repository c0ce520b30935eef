use axum::{
    Extension, Json,
    extract::{Path, State},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

use crate::{
    entity::{content, sea_orm_active_enums::ContentStatus},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::StatusPayload,
    state::AppState,
};

use super::find_by_slug;

fn parse_status(raw: &str) -> Option<ContentStatus> {
    match raw {
        "active" => Some(ContentStatus::Active),
        "inactive" => Some(ContentStatus::Inactive),
        _ => None,
    }
}

#[tracing::instrument(
    name = "PATCH /content/change-content-status/{slug}",
    skip(state, auth, payload)
)]
pub async fn change_content_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<ApiResponse<content::Model>, ApiError> {
    auth.require_admin(lang)?;

    let status = parse_status(&payload.status)
        .ok_or_else(|| ApiError::bad_request(t(lang, "auth.invalidStatus")))?;

    let content = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "content.notFound")))?;

    let mut active: content::ActiveModel = content.into();
    active.status = Set(status);
    let updated = active.update(&state.db).await?;

    Ok(ApiResponse::ok(
        updated,
        format!("Content status updated to {}", payload.status),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_cannot_be_set_through_status_change() {
        assert_eq!(parse_status("active"), Some(ContentStatus::Active));
        assert_eq!(parse_status("inactive"), Some(ContentStatus::Inactive));
        assert_eq!(parse_status("deleted"), None);
    }
}
