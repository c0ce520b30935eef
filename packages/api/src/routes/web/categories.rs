//! Public category listing with per-category content/subcategory counts.

use std::collections::HashMap;

use axum::extract::{Query, State};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::{Expr, Func},
};
use serde::{Deserialize, Serialize};

use crate::{
    entity::{
        category, category_translation, content,
        prelude::*,
        sea_orm_active_enums::{CategoryStatus, ContentStatus, Lang},
    },
    error::ApiError,
    i18n::RequestLang,
    response::{ApiResponse, Meta},
    routes::category::{ParentFilter, TranslationView, parse_parent_id},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    pub parent_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebCategoryRow {
    #[serde(flatten)]
    pub category: category::Model,
    pub translations: Vec<TranslationView>,
    pub video_count: i64,
    pub pdf_count: i64,
    pub subcategory_count: i64,
    pub parent_cat_banner_image: Option<String>,
    pub parent_cat_name_en: Option<String>,
    pub parent_cat_name_ar: Option<String>,
}

/// Active categories with translations, video/PDF/subcategory counts, and
/// the parent's banner and names when listing a subcategory level. Counts
/// key on category_id at the top level and subcategory_id below it,
/// computed with grouped queries over the page's id set.
#[tracing::instrument(name = "GET /web/auth/category-list", skip(state))]
pub async fn category_list(
    State(state): State<AppState>,
    RequestLang(_lang): RequestLang,
    Query(query): Query<CategoryListQuery>,
) -> Result<ApiResponse<Vec<WebCategoryRow>>, ApiError> {
    let parent = parse_parent_id(query.parent_id.as_deref())?;

    let mut find = Category::find()
        .filter(category::Column::Status.eq(CategoryStatus::Active))
        .filter(category::Column::DeletedAt.is_null());
    let top_level = match &parent {
        ParentFilter::TopLevel => {
            find = find.filter(category::Column::ParentId.is_null());
            true
        }
        ParentFilter::Children(parent_id) => {
            find = find.filter(category::Column::ParentId.eq(*parent_id));
            false
        }
    };

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

    let categories = find
        .distinct()
        .order_by_asc(category::Column::Id)
        .all(&state.db)
        .await?;

    let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();

    let translations = if ids.is_empty() {
        Vec::new()
    } else {
        CategoryTranslation::find()
            .filter(category_translation::Column::CategoryId.is_in(ids.clone()))
            .filter(category_translation::Column::Lang.is_in([Lang::En, Lang::Ar]))
            .filter(category_translation::Column::DeletedAt.is_null())
            .all(&state.db)
            .await?
    };
    let mut translations_by_category: HashMap<i32, Vec<category_translation::Model>> =
        HashMap::new();
    for translation in translations {
        translations_by_category
            .entry(translation.category_id)
            .or_default()
            .push(translation);
    }

    let video_counts = content_counts(&state, &ids, top_level, false).await?;
    let pdf_counts = content_counts(&state, &ids, top_level, true).await?;
    let sub_counts = subcategory_counts(&state, &ids).await?;
    let parents = parent_info(&state, &categories).await?;

    let rows = categories
        .into_iter()
        .map(|category| {
            let parent = category.parent_id.and_then(|id| parents.get(&id));
            WebCategoryRow {
                translations: translations_by_category
                    .remove(&category.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(Into::into)
                    .collect(),
                video_count: video_counts.get(&category.id).copied().unwrap_or(0),
                pdf_count: pdf_counts.get(&category.id).copied().unwrap_or(0),
                subcategory_count: sub_counts.get(&category.id).copied().unwrap_or(0),
                parent_cat_banner_image: parent
                    .and_then(|(model, _, _)| model.banner_image.clone()),
                parent_cat_name_en: parent.and_then(|(_, en, _)| en.clone()),
                parent_cat_name_ar: parent.and_then(|(_, _, ar)| ar.clone()),
                category,
            }
        })
        .collect::<Vec<_>>();

    let total = rows.len() as u64;

    Ok(ApiResponse::with_meta(
        rows,
        Meta::total_only(total),
        "Category list fetched successfully",
    ))
}

/// Active-content counts keyed by category_id (top level) or
/// subcategory_id (one level down).
async fn content_counts(
    state: &AppState,
    category_ids: &[i32],
    top_level: bool,
    pdf: bool,
) -> Result<HashMap<i32, i64>, ApiError> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let key_column = if top_level {
        content::Column::CategoryId
    } else {
        content::Column::SubcategoryId
    };

    let mut find = Content::find()
        .select_only()
        .column(key_column)
        .column_as(content::Column::Id.count(), "count")
        .filter(content::Column::Status.eq(ContentStatus::Active))
        .filter(content::Column::DeletedAt.is_null())
        .filter(key_column.is_in(category_ids.iter().copied()));

    if pdf {
        find = find.filter(content::Column::FileType.eq("pdf"));
    } else {
        find = find.filter(content::Column::FileType.ne("pdf"));
    }

    let rows: Vec<(Option<i32>, i64)> = find.group_by(key_column).into_tuple().all(&state.db).await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect())
}

async fn subcategory_counts(
    state: &AppState,
    category_ids: &[i32],
) -> Result<HashMap<i32, i64>, ApiError> {
    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(Option<i32>, i64)> = Category::find()
        .select_only()
        .column(category::Column::ParentId)
        .column_as(category::Column::Id.count(), "count")
        .filter(category::Column::ParentId.is_in(category_ids.iter().copied()))
        .filter(category::Column::Status.eq(CategoryStatus::Active))
        .filter(category::Column::DeletedAt.is_null())
        .group_by(category::Column::ParentId)
        .into_tuple()
        .all(&state.db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect())
}

/// Parent category model plus its en/ar names, for subcategory listings.
async fn parent_info(
    state: &AppState,
    categories: &[category::Model],
) -> Result<HashMap<i32, (category::Model, Option<String>, Option<String>)>, ApiError> {
    let mut parent_ids: Vec<i32> = categories.iter().filter_map(|c| c.parent_id).collect();
    parent_ids.sort_unstable();
    parent_ids.dedup();

    if parent_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let parents = Category::find()
        .filter(category::Column::Id.is_in(parent_ids.clone()))
        .filter(category::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    let translations = CategoryTranslation::find()
        .filter(category_translation::Column::CategoryId.is_in(parent_ids))
        .filter(category_translation::Column::Lang.is_in([Lang::En, Lang::Ar]))
        .filter(category_translation::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    let mut map: HashMap<i32, (category::Model, Option<String>, Option<String>)> = parents
        .into_iter()
        .map(|parent| (parent.id, (parent, None, None)))
        .collect();
    for translation in translations {
        if let Some(entry) = map.get_mut(&translation.category_id) {
            match translation.lang {
                Lang::En => entry.1 = Some(translation.name),
                Lang::Ar => entry.2 = Some(translation.name),
            }
        }
    }
    Ok(map)
}
