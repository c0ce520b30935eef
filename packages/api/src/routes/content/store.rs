use axum::{Extension, Json, extract::State};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, EntityTrait, TransactionTrait,
};
use validator::Validate;

use crate::{
    entity::{
        content, content_translation,
        prelude::*,
        sea_orm_active_enums::{ContentStatus, Lang},
    },
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    slugify::random_token,
    state::AppState,
};

use super::{StoreContentPayload, title_in_use};

/// Creates the content row plus both translation rows atomically. The
/// duplicate-title pre-check runs before the transaction opens; the slug
/// is a server-generated random token, never derived from the title.
#[tracing::instrument(name = "POST /content/content-store", skip(state, auth, payload))]
pub async fn store_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<StoreContentPayload>,
) -> Result<ApiResponse<content::Model>, ApiError> {
    auth.require_admin(lang)?;
    payload.validate()?;

    let title_en = payload.title_en.trim().to_string();
    let title_ar = payload.title_ar.trim().to_string();

    if title_in_use(&state.db, &[&title_en, &title_ar], None).await? {
        return Err(ApiError::bad_request(t(lang, "content.titleAlreadyExist")));
    }

    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    let created = content::ActiveModel {
        slug: Set(random_token(20)),
        category_id: Set(payload.category_id),
        subcategory_id: Set(payload.subcategory_id),
        cover_image: Set(payload.cover_image.clone()),
        file_url: Set(payload.file_url.clone()),
        file_type: Set(payload.file_type.clone()),
        upload_method: Set(Some(payload.upload_method.clone())),
        video_length: Set(payload.video_length.clone()),
        status: Set(payload.status.unwrap_or(ContentStatus::Active)),
        number_of_pages: Set(payload.number_of_pages),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    ContentTranslation::insert_many([
        content_translation::ActiveModel {
            content_id: Set(created.id),
            category_id: Set(payload.category_id),
            subcategory_id: Set(payload.subcategory_id),
            lang: Set(Lang::En),
            title: Set(title_en),
            coach_name: Set(payload.coach_name_en.clone()),
            description: Set(payload.description_en.clone()),
            ..Default::default()
        },
        content_translation::ActiveModel {
            content_id: Set(created.id),
            category_id: Set(payload.category_id),
            subcategory_id: Set(payload.subcategory_id),
            lang: Set(Lang::Ar),
            title: Set(title_ar),
            coach_name: Set(payload.coach_name_ar.clone()),
            description: Set(payload.description_ar.clone()),
            ..Default::default()
        },
    ])
    .exec(&txn)
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::ok(created, "Content created successfully"))
}
