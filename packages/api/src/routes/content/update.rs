use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use validator::Validate;

use crate::{
    entity::{content, content_translation, prelude::*, sea_orm_active_enums::Lang},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

use super::{UpdateContentPayload, featured_slot_victim, find_by_slug, title_in_use};

/// Partial update of the content row and both translation rows. When the
/// payload features this item the featured set is read under row locks and
/// the oldest entry gives up its slot in the same transaction, keeping the
/// 4-item cap intact under concurrent writers.
#[tracing::instrument(name = "PATCH /content/content-update/{slug}", skip(state, auth, payload))]
pub async fn update_content(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateContentPayload>,
) -> Result<ApiResponse<content::Model>, ApiError> {
    auth.require_admin(lang)?;
    payload.validate()?;

    let existing = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::bad_request(t(lang, "content.notFound")))?;

    let title_en = payload.title_en.as_deref().map(str::trim);
    let title_ar = payload.title_ar.as_deref().map(str::trim);

    let titles: Vec<&str> = [title_en, title_ar].into_iter().flatten().collect();
    if title_in_use(&state.db, &titles, Some(existing.id)).await? {
        return Err(ApiError::bad_request(t(lang, "content.titleAlreadyExist")));
    }

    let featured_at = payload.is_featured.map(|ts| ts.naive_utc());

    let txn = state.db.begin().await?;

    if featured_at.is_some() {
        let others = Content::find()
            .filter(content::Column::IsFeatured.is_not_null())
            .filter(content::Column::Id.ne(existing.id))
            .filter(content::Column::DeletedAt.is_null())
            .order_by_asc(content::Column::IsFeatured)
            .lock_exclusive()
            .all(&txn)
            .await?;

        if let Some(victim) = featured_slot_victim(&others) {
            let mut active: content::ActiveModel = victim.clone().into();
            active.is_featured = Set(None);
            active.update(&txn).await?;
        }
    }

    let mut active: content::ActiveModel = existing.clone().into();
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if payload.subcategory_id.is_some() {
        active.subcategory_id = Set(payload.subcategory_id);
    }
    if let Some(cover_image) = &payload.cover_image {
        active.cover_image = Set(cover_image.clone());
    }
    if let Some(file_url) = &payload.file_url {
        active.file_url = Set(file_url.clone());
    }
    if let Some(file_type) = &payload.file_type {
        active.file_type = Set(file_type.clone());
    }
    if payload.upload_method.is_some() {
        active.upload_method = Set(payload.upload_method.clone());
    }
    if payload.video_length.is_some() {
        active.video_length = Set(payload.video_length.clone());
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if payload.number_of_pages.is_some() {
        active.number_of_pages = Set(payload.number_of_pages);
    }
    // Absent means un-feature, matching the admin panel contract
    active.is_featured = Set(featured_at);
    active.updated_at = Set(Utc::now().naive_utc());
    let updated = active.update(&txn).await?;

    update_translation(
        &txn,
        existing.id,
        Lang::En,
        title_en,
        payload.description_en.as_deref(),
        payload.coach_name_en.as_deref(),
        payload.category_id,
        payload.subcategory_id,
    )
    .await?;
    update_translation(
        &txn,
        existing.id,
        Lang::Ar,
        title_ar,
        payload.description_ar.as_deref(),
        payload.coach_name_ar.as_deref(),
        payload.category_id,
        payload.subcategory_id,
    )
    .await?;

    txn.commit().await?;

    Ok(ApiResponse::ok(updated, "Content updated successfully"))
}

#[allow(clippy::too_many_arguments)]
async fn update_translation<C: ConnectionTrait>(
    conn: &C,
    content_id: i32,
    lang: Lang,
    title: Option<&str>,
    description: Option<&str>,
    coach_name: Option<&str>,
    category_id: Option<i32>,
    subcategory_id: Option<i32>,
) -> Result<(), ApiError> {
    let mut update = ContentTranslation::update_many();
    let mut touched = false;
    if let Some(title) = title {
        update = update.col_expr(content_translation::Column::Title, Expr::value(title));
        touched = true;
    }
    if let Some(description) = description {
        update = update.col_expr(
            content_translation::Column::Description,
            Expr::value(description),
        );
        touched = true;
    }
    if let Some(coach_name) = coach_name {
        update = update.col_expr(
            content_translation::Column::CoachName,
            Expr::value(coach_name),
        );
        touched = true;
    }
    if let Some(category_id) = category_id {
        update = update.col_expr(
            content_translation::Column::CategoryId,
            Expr::value(category_id),
        );
        touched = true;
    }
    if let Some(subcategory_id) = subcategory_id {
        update = update.col_expr(
            content_translation::Column::SubcategoryId,
            Expr::value(subcategory_id),
        );
        touched = true;
    }
    if !touched {
        return Ok(());
    }

    update
        .filter(content_translation::Column::ContentId.eq(content_id))
        .filter(content_translation::Column::Lang.eq(lang))
        .filter(content_translation::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    Ok(())
}
