use axum::{
    Extension,
    extract::{Path, State},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait,
    sea_query::Expr,
};

use crate::{
    entity::{category, category_translation, prelude::*},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::ApiResponse,
    state::AppState,
};

use super::find_by_slug;

/// Soft-deletes the translations first, then the category, in one
/// transaction.
#[tracing::instrument(name = "DELETE /category/category-delete/{slug}", skip(state, auth))]
pub async fn destroy_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(slug): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    auth.require_admin(lang)?;

    let category = find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "category.notFound")))?;

    let now = Utc::now().naive_utc();
    let txn = state.db.begin().await?;

    CategoryTranslation::update_many()
        .col_expr(
            category_translation::Column::DeletedAt,
            Expr::value(Some(now)),
        )
        .filter(category_translation::Column::CategoryId.eq(category.id))
        .filter(category_translation::Column::DeletedAt.is_null())
        .exec(&txn)
        .await?;

    let mut active: category::ActiveModel = category.into();
    active.deleted_at = Set(Some(now));
    active.update(&txn).await?;

    txn.commit().await?;

    Ok(ApiResponse::message("Category deleted successfully"))
}
