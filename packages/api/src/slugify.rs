//! Slug and opaque-token generation.

use rand::{Rng, distr::Alphanumeric};

/// Derive a URL slug from an English display name: lowercase ASCII
/// alphanumerics, runs of anything else collapse to a single dash.
pub fn generate_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

/// Random alphanumeric token; used for content slugs, reset codes and
/// email verification codes.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_from_simple_name() {
        assert_eq!(generate_slug("Fitness"), "fitness");
    }

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(
            generate_slug("Strength  &  Conditioning"),
            "strength-conditioning"
        );
        assert_eq!(generate_slug("  Yoga Basics "), "yoga-basics");
    }

    #[test]
    fn slug_drops_non_ascii() {
        assert_eq!(generate_slug("Café Workout"), "caf-workout");
    }

    #[test]
    fn random_tokens_are_alphanumeric_and_unique() {
        let a = random_token(20);
        let b = random_token(20);
        assert_eq!(a.len(), 20);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
