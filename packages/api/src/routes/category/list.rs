use std::collections::HashMap;

use axum::{
    Extension,
    extract::{Query, State},
};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
    sea_query::{Expr, Func},
};
use serde::{Deserialize, Serialize};

use crate::{
    entity::{category, category_translation, prelude::*, sea_orm_active_enums::Lang},
    error::ApiError,
    i18n::RequestLang,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::PaginationParams,
    state::AppState,
};

use super::{ParentFilter, TranslationView, parse_parent_id};

#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub parent_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CategoryRow {
    #[serde(flatten)]
    pub category: category::Model,
    pub translations: Vec<TranslationView>,
}

/// Admin listing: categories joined with their en/ar translations, with an
/// optional case-insensitive name search. The total is distinct-counted
/// over the same predicate so the join cannot inflate it.
#[tracing::instrument(name = "GET /category/categories", skip(state, auth))]
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<ApiResponse<Vec<CategoryRow>>, ApiError> {
    auth.require_admin(lang)?;

    let pagination = PaginationParams {
        page: query.page,
        limit: query.limit,
    };

    let mut find = Category::find().filter(category::Column::DeletedAt.is_null());
    match parse_parent_id(query.parent_id.as_deref())? {
        ParentFilter::TopLevel => {
            find = find.filter(category::Column::ParentId.is_null());
        }
        ParentFilter::Children(parent_id) => {
            find = find.filter(category::Column::ParentId.eq(parent_id));
        }
    }

    let mut find = find
        .join(JoinType::InnerJoin, category::Relation::Translations.def())
        .filter(category_translation::Column::Lang.is_in([Lang::En, Lang::Ar]))
        .filter(category_translation::Column::DeletedAt.is_null());

    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        find = find.filter(
            Expr::expr(Func::lower(Expr::col((
                category_translation::Entity,
                category_translation::Column::Name,
            ))))
            .like(format!("%{}%", search.to_lowercase())),
        );
    }

    let find = find.distinct();
    let total = find.clone().count(&state.db).await?;

    let categories = find
        .order_by_desc(category::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&state.db)
        .await?;

    let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();
    let translations = if ids.is_empty() {
        Vec::new()
    } else {
        CategoryTranslation::find()
            .filter(category_translation::Column::CategoryId.is_in(ids))
            .filter(category_translation::Column::Lang.is_in([Lang::En, Lang::Ar]))
            .filter(category_translation::Column::DeletedAt.is_null())
            .all(&state.db)
            .await?
    };

    let mut by_category: HashMap<i32, Vec<TranslationView>> = HashMap::new();
    for translation in translations {
        by_category
            .entry(translation.category_id)
            .or_default()
            .push(translation.into());
    }

    let rows = categories
        .into_iter()
        .map(|category| CategoryRow {
            translations: by_category.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect();

    Ok(ApiResponse::with_meta(
        rows,
        Meta::paged(total, pagination.page(), pagination.limit()),
        "Category list fetched successfully",
    ))
}
