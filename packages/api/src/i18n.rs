//! Localized response messages.
//!
//! The catalogs are compiled in; lookup is by dotted key with English as
//! the fallback chain, and an unknown key falls through to the key itself
//! so a missing entry never turns into a 500.

use crate::entity::sea_orm_active_enums::Lang;
use axum::{extract::FromRequestParts, http::header::ACCEPT_LANGUAGE, http::request::Parts};
use serde_json::Value;
use std::sync::LazyLock;

static EN: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../lang/en.json")).expect("invalid en message catalog")
});

static AR: LazyLock<Value> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../lang/ar.json")).expect("invalid ar message catalog")
});

/// Resolve a message key ("auth.userNotFound") for the request language.
pub fn t(lang: Lang, key: &str) -> String {
    let catalog = match lang {
        Lang::En => &*EN,
        Lang::Ar => &*AR,
    };
    lookup(catalog, key)
        .or_else(|| lookup(&EN, key))
        .unwrap_or(key)
        .to_string()
}

fn lookup<'a>(catalog: &'a Value, key: &str) -> Option<&'a str> {
    let mut node = catalog;
    for part in key.split('.') {
        node = node.get(part)?;
    }
    node.as_str()
}

/// Language detection mirrors the client contract: any Accept-Language
/// value containing "ar" selects Arabic, everything else is English.
pub fn detect_lang(header: Option<&str>) -> Lang {
    match header {
        Some(value) if value.to_ascii_lowercase().contains("ar") => Lang::Ar,
        _ => Lang::En,
    }
}

/// Extractor giving handlers the request language from `Accept-Language`.
#[derive(Debug, Clone, Copy)]
pub struct RequestLang(pub Lang);

impl<S> FromRequestParts<S> for RequestLang
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok());
        Ok(RequestLang(detect_lang(header)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_lookup() {
        assert_eq!(t(Lang::En, "auth.userNotFound"), "User not found");
    }

    #[test]
    fn arabic_lookup() {
        let message = t(Lang::Ar, "auth.userNotFound");
        assert_ne!(message, "auth.userNotFound");
        assert_ne!(message, t(Lang::En, "auth.userNotFound"));
    }

    #[test]
    fn unknown_key_falls_back_to_english_then_key() {
        assert_eq!(t(Lang::Ar, "auth.noSuchKey"), "auth.noSuchKey");
    }

    #[test]
    fn header_detection() {
        assert_eq!(detect_lang(Some("ar")), Lang::Ar);
        assert_eq!(detect_lang(Some("ar-AE,ar;q=0.9")), Lang::Ar);
        assert_eq!(detect_lang(Some("en-US,en;q=0.9")), Lang::En);
        assert_eq!(detect_lang(None), Lang::En);
    }
}
