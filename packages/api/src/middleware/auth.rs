//! Bearer-token authentication.
//!
//! Tokens are opaque server-issued values: the middleware resolves the
//! presented token against the user_tokens table (through a short-lived
//! cache) and attaches the owning user to the request. Only active users
//! authenticate; everyone else proceeds as a guest and is rejected by the
//! handlers that require an identity.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use crate::{
    entity::{
        prelude::*,
        sea_orm_active_enums::{Lang, UserStatus},
        user, user_token,
    },
    error::ApiError,
    i18n::t,
    state::{AppState, State as ApiState},
};

#[derive(Debug, Clone)]
pub enum AuthUser {
    User(user::Model),
    Guest,
}

impl AuthUser {
    pub fn require(&self) -> Result<&user::Model, ApiError> {
        match self {
            AuthUser::User(user) => Ok(user),
            AuthUser::Guest => Err(ApiError::unauthorized("Unauthorized")),
        }
    }

    pub fn require_admin(&self, lang: Lang) -> Result<&user::Model, ApiError> {
        let user = self.require()?;
        if user.role != "admin" {
            return Err(ApiError::forbidden(t(lang, "auth.notAuthorized")));
        }
        Ok(user)
    }
}

pub async fn token_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response<Body>, ApiError> {
    let user = match bearer_token(request.headers()) {
        Some(token) => resolve_token(&state, token).await?,
        None => None,
    };

    let auth_user = match user {
        Some(user) => AuthUser::User(user),
        None => AuthUser::Guest,
    };
    request.extensions_mut().insert::<AuthUser>(auth_user);

    Ok(next.run(request).await)
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() { None } else { Some(token) }
}

async fn resolve_token(state: &AppState, token: &str) -> Result<Option<user::Model>, ApiError> {
    let cache_key = ApiState::hash_token(token);

    let user_id = match state.auth_cache.get(&cache_key) {
        Some(user_id) => user_id,
        None => {
            let row = UserToken::find()
                .filter(user_token::Column::Token.eq(token))
                .one(&state.db)
                .await?;
            let Some(row) = row else {
                return Ok(None);
            };
            state.auth_cache.insert(cache_key, row.user_id);
            row.user_id
        }
    };

    let user = User::find_by_id(user_id)
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?;

    match user {
        Some(user) if user.status == UserStatus::Active => Ok(Some(user)),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_prefix_is_stripped() {
        assert_eq!(bearer_token(&headers("Bearer abc123")), Some("abc123"));
    }

    #[test]
    fn raw_token_is_accepted() {
        assert_eq!(bearer_token(&headers("abc123")), Some("abc123"));
    }

    #[test]
    fn missing_or_empty_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
    }
}
