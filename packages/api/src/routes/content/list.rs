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
    engagement,
    entity::{
        category_translation, content, content_translation,
        prelude::*,
        sea_orm_active_enums::Lang,
    },
    error::ApiError,
    i18n::RequestLang,
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::PaginationParams,
    state::AppState,
};

use super::ContentTranslationView;

#[derive(Debug, Deserialize)]
pub struct ListContentsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub lang: Option<Lang>,
    pub search: Option<String>,
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentRow {
    #[serde(flatten)]
    pub content: content::Model,
    pub content_translations: Vec<ContentTranslationView>,
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
    pub total_video_views: i64,
    pub total_pdf_downloads: i64,
}

/// Admin listing: content joined with the requested language's translation
/// (required, so untranslated rows drop out), category/subcategory names,
/// and per-row engagement sums computed with one grouped query per counter
/// table over the page's id set.
#[tracing::instrument(name = "GET /content/contents", skip(state, auth))]
pub async fn list_contents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(request_lang): RequestLang,
    Query(query): Query<ListContentsQuery>,
) -> Result<ApiResponse<Vec<ContentRow>>, ApiError> {
    auth.require_admin(request_lang)?;

    let pagination = PaginationParams {
        page: query.page,
        limit: query.limit,
    };
    let lang = query.lang.unwrap_or(Lang::En);

    let mut find = Content::find()
        .filter(content::Column::DeletedAt.is_null())
        .join(JoinType::InnerJoin, content::Relation::Translations.def())
        .filter(content_translation::Column::Lang.eq(lang))
        .filter(content_translation::Column::DeletedAt.is_null());

    if let Some(file_type) = query
        .file_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        find = find.filter(content::Column::FileType.eq(file_type));
    }

    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        find = find.filter(
            Expr::expr(Func::lower(Expr::col((
                content_translation::Entity,
                content_translation::Column::Title,
            ))))
            .like(format!("%{}%", search.to_lowercase())),
        );
    }

    let find = find.distinct();
    let total = find.clone().count(&state.db).await?;

    let contents = find
        .order_by_desc(content::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&state.db)
        .await?;

    let content_ids: Vec<i32> = contents.iter().map(|c| c.id).collect();

    let translations = if content_ids.is_empty() {
        Vec::new()
    } else {
        ContentTranslation::find()
            .filter(content_translation::Column::ContentId.is_in(content_ids.clone()))
            .filter(content_translation::Column::Lang.eq(lang))
            .filter(content_translation::Column::DeletedAt.is_null())
            .all(&state.db)
            .await?
    };
    let mut translations_by_content: HashMap<i32, Vec<ContentTranslationView>> = HashMap::new();
    for translation in translations {
        translations_by_content
            .entry(translation.content_id)
            .or_default()
            .push(translation.into());
    }

    let category_names = category_name_map(&state, &contents, lang).await?;
    let view_totals = engagement::view_totals(&state.db, &content_ids).await?;
    let download_totals = engagement::download_totals(&state.db, &content_ids).await?;

    let rows = contents
        .into_iter()
        .map(|content| ContentRow {
            content_translations: translations_by_content
                .remove(&content.id)
                .unwrap_or_default(),
            category_name: category_names.get(&content.category_id).cloned(),
            subcategory_name: content
                .subcategory_id
                .and_then(|id| category_names.get(&id).cloned()),
            total_video_views: view_totals.get(&content.id).copied().unwrap_or(0),
            total_pdf_downloads: download_totals.get(&content.id).copied().unwrap_or(0),
            content,
        })
        .collect();

    Ok(ApiResponse::with_meta(
        rows,
        Meta::paged(total, pagination.page(), pagination.limit()),
        "Content list fetched successfully",
    ))
}

/// Localized names for every category/subcategory id the page references.
pub(crate) async fn category_name_map(
    state: &AppState,
    contents: &[content::Model],
    lang: Lang,
) -> Result<HashMap<i32, String>, ApiError> {
    let mut category_ids: Vec<i32> = contents
        .iter()
        .flat_map(|c| [Some(c.category_id), c.subcategory_id])
        .flatten()
        .collect();
    category_ids.sort_unstable();
    category_ids.dedup();

    if category_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let names: Vec<(i32, String)> = CategoryTranslation::find()
        .select_only()
        .column(category_translation::Column::CategoryId)
        .column(category_translation::Column::Name)
        .filter(category_translation::Column::CategoryId.is_in(category_ids))
        .filter(category_translation::Column::Lang.eq(lang))
        .filter(category_translation::Column::DeletedAt.is_null())
        .into_tuple()
        .all(&state.db)
        .await?;

    Ok(names.into_iter().collect())
}
