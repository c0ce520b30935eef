//! Web-client login: accepts email or username.

use axum::{Json, extract::State};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use serde::Deserialize;
use validator::Validate;

use crate::{
    entity::{prelude::*, sea_orm_active_enums::UserStatus, user, user_token},
    error::ApiError,
    i18n::{RequestLang, t},
    response::ApiResponse,
    routes::auth::{TokenData, touch_login_state, verify_password},
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct WebLoginPayload {
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    pub username: Option<String>,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

#[tracing::instrument(name = "POST /web/auth/login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<WebLoginPayload>,
) -> Result<ApiResponse<TokenData>, ApiError> {
    payload.validate()?;

    let mut find = User::find()
        .filter(user::Column::Role.eq(&payload.role))
        .filter(user::Column::DeletedAt.is_null());

    if let Some(email) = payload
        .email
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        find = find.filter(user::Column::Email.eq(email.to_lowercase()));
    } else if let Some(username) = payload
        .username
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        find = find.filter(user::Column::Username.eq(username));
    } else {
        return Err(ApiError::bad_request("Email or username is required"));
    }

    let user = find
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::forbidden(t(lang, "auth.userNotFound")))?;

    if user.status != UserStatus::Active {
        return Err(ApiError::forbidden(t(lang, "auth.accountInactive")));
    }

    if !verify_password(payload.password, user.password.clone()).await? {
        return Err(ApiError::forbidden(t(lang, "auth.invalidPassword")));
    }

    let user = touch_login_state(&state, user).await?;

    let token = state.sign_token(&user)?;
    user_token::ActiveModel {
        user_id: Set(user.id),
        token: Set(token.clone()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok(ApiResponse::ok(
        TokenData { token },
        t(lang, "auth.userLoggedIn"),
    ))
}
