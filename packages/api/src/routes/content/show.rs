use axum::{
    Extension,
    extract::{Path, State},
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::Serialize;

use crate::{
    engagement,
    entity::{content, content_translation, prelude::*, sea_orm_active_enums::Lang},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

use super::{ContentTranslationView, find_by_slug};

#[derive(Debug, Serialize)]
pub struct ContentDetails {
    #[serde(flatten)]
    pub content: content::Model,
    pub content_translations: Vec<ContentTranslationView>,
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
    pub total_video_views: i64,
    pub total_pdf_downloads: i64,
}

#[tracing::instrument(name = "GET /content/content-show/{slug}", skip(state, auth))]
pub async fn show_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
) -> Result<ApiResponse<ContentDetails>, ApiError> {
    auth.require_admin(lang)?;

    let content = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "content.notFound")))?;

    let translations = ContentTranslation::find()
        .filter(content_translation::Column::ContentId.eq(content.id))
        .filter(content_translation::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    let category_names =
        super::list::category_name_map(&state, std::slice::from_ref(&content), Lang::En).await?;

    let total_video_views = engagement::total_views(&state.db, content.id).await?;
    let total_pdf_downloads = engagement::total_downloads(&state.db, content.id).await?;

    let details = ContentDetails {
        content_translations: translations.into_iter().map(Into::into).collect(),
        category_name: category_names.get(&content.category_id).cloned(),
        subcategory_name: content
            .subcategory_id
            .and_then(|id| category_names.get(&id).cloned()),
        total_video_views,
        total_pdf_downloads,
        content,
    };

    Ok(ApiResponse::ok(
        details,
        "Content details fetched successfully",
    ))
}
