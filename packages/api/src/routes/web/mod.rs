//! Public (web client) surface: localized listings, engagement counters,
//! login, landing banner and the contact form.

use axum::{
    Router,
    routing::{get, post},
};

use crate::entity::{category_translation, content_translation, sea_orm_active_enums::Lang};
use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod contents;
pub mod customer;
pub mod engagement;
pub mod landing;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/contents", get(contents::list_all))
        .route("/contents/{id}", get(contents::list_by_subcategory))
        .route("/video-pdf-show/{id}", get(contents::show_content))
        .route(
            "/video-views-count-add",
            post(engagement::video_views_count_add),
        )
        .route(
            "/pdf-download-count-add",
            post(engagement::pdf_download_count_add),
        )
        .route("/category-list", get(categories::category_list))
        .route("/landing-banner", get(landing::landing_banner))
        .route("/store", post(customer::store_customer))
        .route("/customer-details", get(customer::customer_list))
}

#[derive(Debug, Default)]
pub(crate) struct LocalizedContent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub coach_name: Option<String>,
}

/// Field-by-field localization: an Arabic request prefers the Arabic row
/// but falls back to English per field, so a missing Arabic description
/// still renders.
pub(crate) fn localize_content(
    lang: Lang,
    translations: &[content_translation::Model],
) -> LocalizedContent {
    let en = translations.iter().find(|t| t.lang == Lang::En);
    let ar = translations.iter().find(|t| t.lang == Lang::Ar);

    let (first, second) = match lang {
        Lang::Ar => (ar, en),
        Lang::En => (en, None),
    };

    LocalizedContent {
        title: first
            .map(|t| t.title.clone())
            .or_else(|| second.map(|t| t.title.clone())),
        description: first
            .and_then(|t| t.description.clone())
            .or_else(|| second.and_then(|t| t.description.clone())),
        coach_name: first
            .and_then(|t| t.coach_name.clone())
            .or_else(|| second.and_then(|t| t.coach_name.clone())),
    }
}

pub(crate) fn localize_name(
    lang: Lang,
    translations: &[category_translation::Model],
) -> Option<String> {
    let en = translations.iter().find(|t| t.lang == Lang::En);
    let ar = translations.iter().find(|t| t.lang == Lang::Ar);

    match lang {
        Lang::Ar => ar.or(en).map(|t| t.name.clone()),
        Lang::En => en.map(|t| t.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translation(
        lang: Lang,
        title: &str,
        description: Option<&str>,
        coach: Option<&str>,
    ) -> content_translation::Model {
        content_translation::Model {
            id: 0,
            content_id: 1,
            category_id: 1,
            subcategory_id: None,
            lang,
            title: title.to_string(),
            coach_name: coach.map(str::to_string),
            description: description.map(str::to_string),
            deleted_at: None,
        }
    }

    #[test]
    fn arabic_request_prefers_arabic_fields() {
        let translations = vec![
            translation(Lang::En, "Intro", Some("English body"), Some("Coach A")),
            translation(Lang::Ar, "مقدمة", Some("نص عربي"), None),
        ];
        let localized = localize_content(Lang::Ar, &translations);
        assert_eq!(localized.title.as_deref(), Some("مقدمة"));
        assert_eq!(localized.description.as_deref(), Some("نص عربي"));
        // Missing Arabic coach name falls back to the English one
        assert_eq!(localized.coach_name.as_deref(), Some("Coach A"));
    }

    #[test]
    fn missing_arabic_row_falls_back_to_english() {
        let translations = vec![translation(Lang::En, "Intro", Some("English body"), None)];
        let localized = localize_content(Lang::Ar, &translations);
        assert_eq!(localized.title.as_deref(), Some("Intro"));
        assert_eq!(localized.description.as_deref(), Some("English body"));
    }

    #[test]
    fn english_request_uses_english_only() {
        let translations = vec![
            translation(Lang::En, "Intro", None, None),
            translation(Lang::Ar, "مقدمة", Some("نص"), None),
        ];
        let localized = localize_content(Lang::En, &translations);
        assert_eq!(localized.title.as_deref(), Some("Intro"));
        assert_eq!(localized.description, None);
    }

    #[test]
    fn category_name_localization() {
        let translations = vec![
            category_translation::Model {
                id: 0,
                category_id: 1,
                lang: Lang::En,
                name: "Fitness".into(),
                description: None,
                created_at: chrono::NaiveDateTime::default(),
                updated_at: chrono::NaiveDateTime::default(),
                deleted_at: None,
            },
            category_translation::Model {
                id: 1,
                category_id: 1,
                lang: Lang::Ar,
                name: "اللياقة".into(),
                description: None,
                created_at: chrono::NaiveDateTime::default(),
                updated_at: chrono::NaiveDateTime::default(),
                deleted_at: None,
            },
        ];
        assert_eq!(
            localize_name(Lang::Ar, &translations).as_deref(),
            Some("اللياقة")
        );
        assert_eq!(
            localize_name(Lang::En, &translations).as_deref(),
            Some("Fitness")
        );
        assert_eq!(localize_name(Lang::Ar, &translations[..1]).as_deref(), Some("Fitness"));
    }
}
