use axum::{
    Extension, Json,
    extract::{Path, State},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};

use crate::{
    entity::{category, sea_orm_active_enums::CategoryStatus},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::StatusPayload,
    state::AppState,
};

use super::find_by_slug;

pub(crate) fn parse_status(raw: &str) -> Option<CategoryStatus> {
    match raw {
        "active" => Some(CategoryStatus::Active),
        "inactive" => Some(CategoryStatus::Inactive),
        _ => None,
    }
}

#[tracing::instrument(
    name = "PATCH /category/change-category-status/{slug}",
    skip(state, auth, payload)
)]
pub async fn change_category_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<ApiResponse<category::Model>, ApiError> {
    auth.require_admin(lang)?;

    let status = parse_status(&payload.status)
        .ok_or_else(|| ApiError::bad_request(t(lang, "auth.invalidStatus")))?;

    let category = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "category.notFound")))?;

    let mut active: category::ActiveModel = category.into();
    active.status = Set(status);
    let updated = active.update(&state.db).await?;

    Ok(ApiResponse::ok(
        updated,
        format!("Category status updated to {}", payload.status),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_and_inactive_are_accepted() {
        assert_eq!(parse_status("active"), Some(CategoryStatus::Active));
        assert_eq!(parse_status("inactive"), Some(CategoryStatus::Inactive));
        assert_eq!(parse_status("deleted"), None);
        assert_eq!(parse_status("Active"), None);
    }
}
