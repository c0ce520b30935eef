//! Public content listing and detail views, localized per Accept-Language.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::{
    ColumnTrait, EntityTrait, JoinType, Order, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    sea_query::NullOrdering,
};
use serde::{Deserialize, Serialize};

use crate::{
    engagement,
    entity::{
        category, category_translation, content, content_translation,
        prelude::*,
        sea_orm_active_enums::{CategoryStatus, ContentStatus, Lang},
    },
    error::ApiError,
    i18n::{RequestLang, t},
    response::ApiResponse,
    state::AppState,
};

use super::{localize_content, localize_name};

#[derive(Debug, Deserialize)]
pub struct WebContentsQuery {
    /// One file type or several, comma separated
    pub file_type: Option<String>,
    pub is_featured: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebContentItem {
    #[serde(flatten)]
    pub content: content::Model,
    pub title: Option<String>,
    pub description: Option<String>,
    pub coach_name: Option<String>,
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
    pub subcategory_banner_image: Option<String>,
    pub total_video_views: i64,
    pub total_pdf_downloads: i64,
}

/// The public listing also surfaces display metadata for the requested
/// subcategory at the top level, even when no content matched.
#[derive(Debug, Serialize)]
pub struct WebContentListResponse {
    pub ack: bool,
    pub data: Vec<WebContentItem>,
    pub category_name: Option<String>,
    pub subcategory_name: Option<String>,
    pub subcategory_banner_image: Option<String>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub message: String,
}

#[tracing::instrument(name = "GET /web/auth/contents", skip(state))]
pub async fn list_all(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Query(query): Query<WebContentsQuery>,
) -> Result<Json<WebContentListResponse>, ApiError> {
    list_contents(state, lang, None, query).await
}

#[tracing::instrument(name = "GET /web/auth/contents/{id}", skip(state))]
pub async fn list_by_subcategory(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Path(id): Path<String>,
    Query(query): Query<WebContentsQuery>,
) -> Result<Json<WebContentListResponse>, ApiError> {
    let subcategory_id = match id.as_str() {
        "null" | "" => None,
        value => Some(
            value
                .parse::<i32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid subcategory id: {}", value)))?,
        ),
    };
    list_contents(state, lang, subcategory_id, query).await
}

pub(crate) fn parse_file_types(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

async fn list_contents(
    state: AppState,
    lang: Lang,
    subcategory_id: Option<i32>,
    query: WebContentsQuery,
) -> Result<Json<WebContentListResponse>, ApiError> {
    let mut find = Content::find()
        .filter(content::Column::Status.eq(ContentStatus::Active))
        .filter(content::Column::DeletedAt.is_null())
        .join(JoinType::InnerJoin, content::Relation::Category.def())
        .filter(category::Column::Status.eq(CategoryStatus::Active))
        .filter(category::Column::DeletedAt.is_null());

    if let Some(id) = subcategory_id {
        find = find.filter(content::Column::SubcategoryId.eq(id));
    }

    let file_types = parse_file_types(query.file_type.as_deref());
    if !file_types.is_empty() {
        find = find.filter(content::Column::FileType.is_in(file_types));
    }

    if query.is_featured.as_deref() == Some("true") {
        find = find.filter(content::Column::IsFeatured.is_not_null());
    }

    // Featured first (newest featured leading), then newest by id
    let contents = find
        .order_by_with_nulls(content::Column::IsFeatured, Order::Desc, NullOrdering::Last)
        .order_by_desc(content::Column::Id)
        .all(&state.db)
        .await?;

    let content_ids: Vec<i32> = contents.iter().map(|c| c.id).collect();

    let translations = if content_ids.is_empty() {
        Vec::new()
    } else {
        ContentTranslation::find()
            .filter(content_translation::Column::ContentId.is_in(content_ids.clone()))
            .filter(content_translation::Column::DeletedAt.is_null())
            .all(&state.db)
            .await?
    };
    let mut translations_by_content: HashMap<i32, Vec<content_translation::Model>> = HashMap::new();
    for translation in translations {
        translations_by_content
            .entry(translation.content_id)
            .or_default()
            .push(translation);
    }

    let category_ids: Vec<i32> = {
        let mut ids: Vec<i32> = contents
            .iter()
            .flat_map(|c| [Some(c.category_id), c.subcategory_id])
            .flatten()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let categories = load_categories(&state, category_ids).await?;

    let view_totals = engagement::view_totals(&state.db, &content_ids).await?;
    let download_totals = engagement::download_totals(&state.db, &content_ids).await?;

    let items: Vec<WebContentItem> = contents
        .into_iter()
        .map(|item| {
            let localized = localize_content(
                lang,
                translations_by_content
                    .get(&item.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default(),
            );
            let category_name = categories
                .get(&item.category_id)
                .and_then(|(_, translations)| localize_name(lang, translations));
            let subcategory = item.subcategory_id.and_then(|id| categories.get(&id));
            WebContentItem {
                title: localized.title,
                description: localized.description,
                coach_name: localized.coach_name,
                category_name,
                subcategory_name: subcategory
                    .and_then(|(_, translations)| localize_name(lang, translations)),
                subcategory_banner_image: subcategory
                    .and_then(|(model, _)| model.banner_image.clone()),
                total_video_views: view_totals.get(&item.id).copied().unwrap_or(0),
                total_pdf_downloads: download_totals.get(&item.id).copied().unwrap_or(0),
                content: item,
            }
        })
        .collect();

    // Top-level display metadata: from the first row, or from the
    // requested subcategory when nothing matched
    let mut category_name = None;
    let mut subcategory_name = None;
    let mut subcategory_banner_image = None;
    let mut category_id = None;
    let mut subcategory_id_out = None;

    if let Some(first) = items.first() {
        category_name = first.category_name.clone();
        subcategory_name = first.subcategory_name.clone();
        subcategory_banner_image = first.subcategory_banner_image.clone();
        category_id = Some(first.content.category_id);
        subcategory_id_out = first.content.subcategory_id;
    } else if let Some(requested) = subcategory_id {
        let fallback = load_categories(&state, vec![requested]).await?;
        if let Some((subcategory, translations)) = fallback.get(&requested) {
            subcategory_name = localize_name(lang, translations);
            subcategory_banner_image = subcategory.banner_image.clone();
            subcategory_id_out = Some(subcategory.id);
            if let Some(parent_id) = subcategory.parent_id {
                let parents = load_categories(&state, vec![parent_id]).await?;
                if let Some((parent, parent_translations)) = parents.get(&parent_id) {
                    category_name = localize_name(lang, parent_translations);
                    category_id = Some(parent.id);
                }
            }
        }
    }

    Ok(Json(WebContentListResponse {
        ack: true,
        data: items,
        category_name,
        subcategory_name,
        subcategory_banner_image,
        category_id,
        subcategory_id: subcategory_id_out,
        message: "List of resources".to_string(),
    }))
}

pub(crate) async fn load_categories(
    state: &AppState,
    ids: Vec<i32>,
) -> Result<HashMap<i32, (category::Model, Vec<category_translation::Model>)>, ApiError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let categories = Category::find()
        .filter(category::Column::Id.is_in(ids.clone()))
        .filter(category::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    let translations = CategoryTranslation::find()
        .filter(category_translation::Column::CategoryId.is_in(ids))
        .filter(category_translation::Column::Lang.is_in([Lang::En, Lang::Ar]))
        .filter(category_translation::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    let mut map: HashMap<i32, (category::Model, Vec<category_translation::Model>)> = categories
        .into_iter()
        .map(|category| (category.id, (category, Vec::new())))
        .collect();
    for translation in translations {
        if let Some((_, list)) = map.get_mut(&translation.category_id) {
            list.push(translation);
        }
    }
    Ok(map)
}

#[derive(Debug, Serialize)]
pub struct WebContentShow {
    pub item: WebContentItem,
    pub total_video_views: i64,
    pub total_pdf_downloads: i64,
}

#[tracing::instrument(name = "GET /web/auth/video-pdf-show/{id}", skip(state))]
pub async fn show_content(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Path(id): Path<i32>,
) -> Result<ApiResponse<WebContentShow>, ApiError> {
    let content = Content::find_by_id(id)
        .filter(content::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found(t(lang, "content.notFound")))?;

    let translations = ContentTranslation::find()
        .filter(content_translation::Column::ContentId.eq(content.id))
        .filter(content_translation::Column::DeletedAt.is_null())
        .all(&state.db)
        .await?;

    let mut ids = vec![content.category_id];
    ids.extend(content.subcategory_id);
    let categories = load_categories(&state, ids).await?;

    let total_video_views = engagement::total_views(&state.db, content.id).await?;
    let total_pdf_downloads = engagement::total_downloads(&state.db, content.id).await?;

    let localized = localize_content(lang, &translations);
    let subcategory = content.subcategory_id.and_then(|id| categories.get(&id));

    let item = WebContentItem {
        title: localized.title,
        description: localized.description,
        coach_name: localized.coach_name,
        category_name: categories
            .get(&content.category_id)
            .and_then(|(_, translations)| localize_name(lang, translations)),
        subcategory_name: subcategory
            .and_then(|(_, translations)| localize_name(lang, translations)),
        subcategory_banner_image: subcategory.and_then(|(model, _)| model.banner_image.clone()),
        total_video_views,
        total_pdf_downloads,
        content,
    };

    Ok(ApiResponse::ok(
        WebContentShow {
            item,
            total_video_views,
            total_pdf_downloads,
        },
        "Content details fetched successfully",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_types_split_on_commas() {
        assert_eq!(parse_file_types(None), Vec::<String>::new());
        assert_eq!(parse_file_types(Some("pdf")), vec!["pdf"]);
        assert_eq!(
            parse_file_types(Some("video, pdf")),
            vec!["video", "pdf"]
        );
        assert_eq!(parse_file_types(Some(" , ")), Vec::<String>::new());
    }
}
