use axum::{Extension, Json, extract::State};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    TransactionTrait,
};
use validator::Validate;

use crate::{
    entity::{
        category, category_translation,
        prelude::*,
        sea_orm_active_enums::{CategoryStatus, Lang},
    },
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    slugify::generate_slug,
    state::AppState,
};

use super::{CategoryPayload, duplicate_name_key, find_by_slug, translation_name_in_use};

/// Creates the category and both translation rows as one atomic unit.
/// The duplicate checks run inside the transaction; any failure rolls the
/// whole attempt back so no partial category can persist.
#[tracing::instrument(name = "POST /category/category-store", skip(state, auth, payload))]
pub async fn store_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<CategoryPayload>,
) -> Result<ApiResponse<category::Model>, ApiError> {
    auth.require_admin(lang)?;
    payload.validate()?;

    let name_en = payload.name_en.trim().to_string();
    let name_ar = payload.name_ar.trim().to_string();
    let slug = generate_slug(&name_en);

    let txn = state.db.begin().await?;

    if translation_name_in_use(&txn, Lang::Ar, &name_ar, None).await? {
        return Err(ApiError::bad_request(t(
            lang,
            duplicate_name_key(payload.parent_id, Lang::Ar),
        )));
    }

    if translation_name_in_use(&txn, Lang::En, &name_en, None).await? {
        return Err(ApiError::bad_request(t(
            lang,
            duplicate_name_key(payload.parent_id, Lang::En),
        )));
    }

    if find_by_slug(&txn, &slug).await?.is_some() {
        let message = if payload.parent_id.is_some() {
            "subcategory already exist"
        } else {
            "category already exist"
        };
        return Err(ApiError::bad_request(message));
    }

    let category = category::ActiveModel {
        slug: Set(slug),
        parent_id: Set(payload.parent_id),
        status: Set(payload.status.unwrap_or(CategoryStatus::Active)),
        cover_image: Set(payload.cover_image.clone()),
        banner_image: Set(payload.banner_image.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let now = Utc::now().naive_utc();
    CategoryTranslation::insert_many([
        category_translation::ActiveModel {
            category_id: Set(category.id),
            lang: Set(Lang::En),
            name: Set(name_en),
            description: Set(payload.description_en.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        },
        category_translation::ActiveModel {
            category_id: Set(category.id),
            lang: Set(Lang::Ar),
            name: Set(name_ar),
            description: Set(payload.description_ar.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        },
    ])
    .exec(&txn)
    .await?;

    // Both rows or none
    let created = CategoryTranslation::find()
        .filter(category_translation::Column::CategoryId.eq(category.id))
        .filter(category_translation::Column::DeletedAt.is_null())
        .count(&txn)
        .await?;
    if created != 2 {
        return Err(ApiError::internal("Failed to create category translations"));
    }

    txn.commit().await?;

    Ok(ApiResponse::ok(category, "Category created successfully"))
}
