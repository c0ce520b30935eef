use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, TransactionTrait, sea_query::Expr,
};
use validator::Validate;

use crate::{
    entity::{category, category_translation, prelude::*, sea_orm_active_enums::Lang},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    slugify::generate_slug,
    state::AppState,
};

use super::{CategoryPayload, duplicate_name_key, find_by_slug, translation_name_in_use};

/// Partial update of the category row plus both translation rows. The slug
/// follows the English name; all four writes commit or roll back together.
#[tracing::instrument(name = "PATCH /category/category-update/{slug}", skip(state, auth, payload))]
pub async fn update_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryPayload>,
) -> Result<ApiResponse<category::Model>, ApiError> {
    auth.require_admin(lang)?;

    let category = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "category.notFound")))?;

    payload.validate()?;

    let name_en = payload.name_en.trim().to_string();
    let name_ar = payload.name_ar.trim().to_string();

    let new_slug = generate_slug(&name_en);
    if new_slug != category.slug {
        let taken = Category::find()
            .filter(category::Column::Slug.eq(&new_slug))
            .filter(category::Column::Id.ne(category.id))
            .filter(category::Column::DeletedAt.is_null())
            .count(&state.db)
            .await?
            > 0;
        if taken {
            return Err(ApiError::bad_request(
                "Slug already exists for another category",
            ));
        }
    }

    if translation_name_in_use(&state.db, Lang::En, &name_en, Some(category.id)).await? {
        return Err(ApiError::bad_request(t(
            lang,
            duplicate_name_key(payload.parent_id, Lang::En),
        )));
    }

    if translation_name_in_use(&state.db, Lang::Ar, &name_ar, Some(category.id)).await? {
        return Err(ApiError::bad_request(t(
            lang,
            duplicate_name_key(payload.parent_id, Lang::Ar),
        )));
    }

    let txn = state.db.begin().await?;

    let mut active: category::ActiveModel = category.clone().into();
    active.slug = Set(new_slug);
    if payload.parent_id.is_some() {
        active.parent_id = Set(payload.parent_id);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if payload.cover_image.is_some() {
        active.cover_image = Set(payload.cover_image.clone());
    }
    if payload.banner_image.is_some() {
        active.banner_image = Set(payload.banner_image.clone());
    }
    let updated = active.update(&txn).await?;

    update_translation(&txn, category.id, Lang::En, &name_en, payload.description_en.clone())
        .await?;
    update_translation(&txn, category.id, Lang::Ar, &name_ar, payload.description_ar.clone())
        .await?;

    txn.commit().await?;

    Ok(ApiResponse::ok(updated, "Category updated successfully"))
}

async fn update_translation<C: ConnectionTrait>(
    conn: &C,
    category_id: i32,
    lang: Lang,
    name: &str,
    description: Option<String>,
) -> Result<(), ApiError> {
    CategoryTranslation::update_many()
        .col_expr(category_translation::Column::Name, Expr::value(name))
        .col_expr(
            category_translation::Column::Description,
            Expr::value(description),
        )
        .col_expr(
            category_translation::Column::UpdatedAt,
            Expr::value(Utc::now().naive_utc()),
        )
        .filter(category_translation::Column::CategoryId.eq(category_id))
        .filter(category_translation::Column::Lang.eq(lang))
        .filter(category_translation::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    Ok(())
}
