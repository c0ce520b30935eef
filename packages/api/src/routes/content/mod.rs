//! Content CRUD: en/ar translation rows written with the content row in
//! one transaction, and the 4-slot featured carousel maintained under row
//! locks.

use axum::{
    Router,
    routing::{delete, get, patch, post},
};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entity::{
    content, content_translation,
    prelude::*,
    sea_orm_active_enums::{ContentStatus, Lang},
};
use crate::error::ApiError;
use crate::state::AppState;

pub mod change_status;
pub mod destroy;
pub mod list;
pub mod show;
pub mod store;
pub mod update;

/// At most this many items carry a non-null is_featured timestamp.
pub(crate) const FEATURED_CAP: usize = 4;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contents", get(list::list_contents))
        .route("/content-store", post(store::store_content))
        .route("/content-show/{slug}", get(show::show_content))
        .route("/content-update/{slug}", patch(update::update_content))
        .route("/content-delete/{slug}", delete(destroy::destroy_content))
        .route(
            "/change-content-status/{slug}",
            patch(change_status::change_content_status),
        )
}

pub(crate) fn validate_video_length(value: &str) -> Result<(), ValidationError> {
    let valid = match value.split_once(':') {
        Some((minutes, seconds)) => {
            (1..=2).contains(&minutes.len())
                && (1..=2).contains(&seconds.len())
                && minutes.chars().all(|c| c.is_ascii_digit())
                && seconds.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        let mut err = ValidationError::new("video_length");
        err.message = Some("Video length must be in mm:ss format".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct StoreContentPayload {
    #[validate(length(min = 1, message = "English Title is required"))]
    pub title_en: String,
    #[validate(length(min = 1, message = "Arabic Title is required"))]
    pub title_ar: String,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub coach_name_en: Option<String>,
    pub coach_name_ar: Option<String>,
    pub category_id: i32,
    pub subcategory_id: Option<i32>,
    #[validate(length(min = 1, message = "Cover Image is required"))]
    pub cover_image: String,
    #[validate(length(min = 1, message = "File URL is required"))]
    pub file_url: String,
    #[validate(length(min = 1, message = "File Type is required"))]
    pub file_type: String,
    #[validate(length(min = 1, message = "Upload Method is required"))]
    pub upload_method: String,
    #[validate(custom(function = validate_video_length))]
    pub video_length: Option<String>,
    pub status: Option<ContentStatus>,
    pub number_of_pages: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContentPayload {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub description_en: Option<String>,
    pub description_ar: Option<String>,
    pub coach_name_en: Option<String>,
    pub coach_name_ar: Option<String>,
    pub category_id: Option<i32>,
    pub subcategory_id: Option<i32>,
    pub cover_image: Option<String>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub upload_method: Option<String>,
    #[validate(custom(function = validate_video_length))]
    pub video_length: Option<String>,
    pub status: Option<ContentStatus>,
    pub number_of_pages: Option<i32>,
    pub is_featured: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Serialize)]
pub struct ContentTranslationView {
    pub lang: Lang,
    pub title: String,
    pub description: Option<String>,
    pub coach_name: Option<String>,
}

impl From<content_translation::Model> for ContentTranslationView {
    fn from(model: content_translation::Model) -> Self {
        Self {
            lang: model.lang,
            title: model.title,
            description: model.description,
            coach_name: model.coach_name,
        }
    }
}

pub(crate) async fn find_by_slug<C: ConnectionTrait>(
    conn: &C,
    slug: &str,
) -> Result<Option<content::Model>, ApiError> {
    Ok(Content::find()
        .filter(content::Column::Slug.eq(slug))
        .filter(content::Column::DeletedAt.is_null())
        .one(conn)
        .await?)
}

/// A title may not collide with any live translation in either language.
pub(crate) async fn title_in_use<C: ConnectionTrait>(
    conn: &C,
    titles: &[&str],
    exclude_content: Option<i32>,
) -> Result<bool, ApiError> {
    if titles.is_empty() {
        return Ok(false);
    }
    let mut query = ContentTranslation::find()
        .filter(content_translation::Column::Title.is_in(titles.iter().copied()))
        .filter(content_translation::Column::DeletedAt.is_null());
    if let Some(content_id) = exclude_content {
        query = query.filter(content_translation::Column::ContentId.ne(content_id));
    }
    Ok(query.count(conn).await? > 0)
}

/// Given the *other* currently-featured rows, picks the one to un-feature
/// so the cap holds after this item takes a slot: the oldest timestamp,
/// only when the cap is already reached.
pub(crate) fn featured_slot_victim(others: &[content::Model]) -> Option<&content::Model> {
    if others.len() < FEATURED_CAP {
        return None;
    }
    others.iter().min_by_key(|model| model.is_featured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn featured(id: i32, ts: &str) -> content::Model {
        content::Model {
            id,
            slug: format!("slug-{}", id),
            category_id: 1,
            subcategory_id: None,
            cover_image: "cover.png".into(),
            file_url: "file.mp4".into(),
            file_type: "video".into(),
            upload_method: None,
            video_length: None,
            status: ContentStatus::Active,
            number_of_pages: None,
            is_featured: Some(
                NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            ),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
            deleted_at: None,
        }
    }

    #[test]
    fn no_victim_below_the_cap() {
        let others = vec![
            featured(1, "2024-01-01 00:00:00"),
            featured(2, "2024-01-02 00:00:00"),
            featured(3, "2024-01-03 00:00:00"),
        ];
        assert!(featured_slot_victim(&others).is_none());
    }

    #[test]
    fn oldest_timestamp_loses_its_slot() {
        let others = vec![
            featured(3, "2024-01-03 00:00:00"),
            featured(1, "2024-01-01 00:00:00"),
            featured(4, "2024-01-04 00:00:00"),
            featured(2, "2024-01-02 00:00:00"),
        ];
        assert_eq!(featured_slot_victim(&others).unwrap().id, 1);
    }

    #[test]
    fn video_length_format() {
        assert!(validate_video_length("12:34").is_ok());
        assert!(validate_video_length("5:07").is_ok());
        assert!(validate_video_length("123:45").is_err());
        assert!(validate_video_length("12m").is_err());
        assert!(validate_video_length("ab:cd").is_err());
    }
}
