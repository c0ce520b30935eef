//! Category CRUD: paired en/ar translation rows kept consistent with the
//! category row inside one transaction per operation.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{
    category, category_translation,
    prelude::*,
    sea_orm_active_enums::{CategoryStatus, Lang},
};
use crate::error::ApiError;
use crate::state::AppState;

pub mod change_status;
pub mod destroy;
pub mod list;
pub mod store;
pub mod update;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list::list_categories))
        .route("/category-store", post(store::store_category))
        .route("/category-update/{slug}", patch(update::update_category))
        .route("/category-delete/{slug}", delete(destroy::destroy_category))
        .route(
            "/change-category-status/{slug}",
            patch(change_status::change_category_status),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name_en: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name_ar: String,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub parent_id: Option<i32>,
    pub status: Option<CategoryStatus>,
    pub cover_image: Option<String>,
    pub banner_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranslationView {
    pub lang: Lang,
    pub name: String,
    pub description: Option<String>,
}

impl From<category_translation::Model> for TranslationView {
    fn from(model: category_translation::Model) -> Self {
        Self {
            lang: model.lang,
            name: model.name,
            description: model.description,
        }
    }
}

/// parent_id query semantics: absent, empty, or the literal "null" selects
/// top-level categories; anything else must parse as a category id.
pub(crate) enum ParentFilter {
    TopLevel,
    Children(i32),
}

pub(crate) fn parse_parent_id(raw: Option<&str>) -> Result<ParentFilter, ApiError> {
    match raw {
        None | Some("null") | Some("") => Ok(ParentFilter::TopLevel),
        Some(value) => value
            .parse::<i32>()
            .map(ParentFilter::Children)
            .map_err(|_| ApiError::bad_request(format!("Invalid parent_id: {}", value))),
    }
}

/// Message key for a duplicate translation name, worded for category vs
/// subcategory depending on whether the payload carries a parent.
pub(crate) fn duplicate_name_key(parent_id: Option<i32>, lang: Lang) -> &'static str {
    match (parent_id.is_some(), lang) {
        (true, Lang::En) => "auth.subcategoryEnglishNameExist",
        (true, Lang::Ar) => "auth.subcategoryArabicNameExist",
        (false, Lang::En) => "auth.categoryEnglishNameExist",
        (false, Lang::Ar) => "auth.categoryArabicNameExist",
    }
}

pub(crate) async fn translation_name_in_use<C: ConnectionTrait>(
    conn: &C,
    lang: Lang,
    name: &str,
    exclude_category: Option<i32>,
) -> Result<bool, ApiError> {
    let mut query = CategoryTranslation::find()
        .filter(category_translation::Column::Lang.eq(lang))
        .filter(category_translation::Column::Name.eq(name))
        .filter(category_translation::Column::DeletedAt.is_null());
    if let Some(category_id) = exclude_category {
        query = query.filter(category_translation::Column::CategoryId.ne(category_id));
    }
    Ok(query.count(conn).await? > 0)
}

pub(crate) async fn find_by_slug<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
) -> Result<Option<category::Model>, ApiError> {
    Ok(Category::find()
        .filter(category::Column::Slug.eq(slug))
        .filter(category::Column::DeletedAt.is_null())
        .one(conn)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_wording_follows_parent_and_language() {
        assert_eq!(
            duplicate_name_key(None, Lang::En),
            "auth.categoryEnglishNameExist"
        );
        assert_eq!(
            duplicate_name_key(None, Lang::Ar),
            "auth.categoryArabicNameExist"
        );
        assert_eq!(
            duplicate_name_key(Some(3), Lang::En),
            "auth.subcategoryEnglishNameExist"
        );
        assert_eq!(
            duplicate_name_key(Some(3), Lang::Ar),
            "auth.subcategoryArabicNameExist"
        );
    }

    #[test]
    fn parent_id_parsing() {
        assert!(matches!(parse_parent_id(None), Ok(ParentFilter::TopLevel)));
        assert!(matches!(
            parse_parent_id(Some("null")),
            Ok(ParentFilter::TopLevel)
        ));
        assert!(matches!(
            parse_parent_id(Some("7")),
            Ok(ParentFilter::Children(7))
        ));
        assert!(parse_parent_id(Some("abc")).is_err());
    }
}
