//! Registration, login and password lifecycle for panel users.

use axum::{
    Extension, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    entity::{
        prelude::*,
        sea_orm_active_enums::{Gender, UserStatus},
        user, user_token,
    },
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::{AuthUser, bearer_token},
    response::ApiResponse,
    slugify::random_token,
    state::{AppState, State as ApiState},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/forget-password", post(forgot_password))
        .route("/check-reset-token", post(check_reset_token))
        .route("/reset-password", post(reset_password))
        .route("/change-password", post(change_password))
        .route("/refresh-token", post(refresh_token))
        .route("/logout", post(logout))
}

#[derive(Serialize)]
pub struct TokenData {
    pub token: String,
}

pub(crate) fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| "@$!%*?&".contains(c));

    if has_lower && has_upper && has_digit && has_special {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_strength");
        err.message =
            Some("Password must include uppercase, lowercase, number, and special character".into());
        Err(err)
    }
}

pub(crate) async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

pub(crate) async fn verify_password(password: String, hash: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::internal(format!("Hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(
        length(min = 8, max = 32, message = "Password must be at least 8 characters long"),
        custom(function = validate_password_strength)
    )]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub role: Option<String>,
}

#[tracing::instrument(name = "POST /auth/register", skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    let existing = User::find()
        .filter(user::Column::Email.eq(&email))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::bad_request(t(lang, "auth.emailAlreadyExist")));
    }

    let password = hash_password(payload.password).await?;
    let now = Utc::now().naive_utc();

    let created = user::ActiveModel {
        first_name: Set(Some(payload.first_name.trim().to_string())),
        last_name: Set(Some(payload.last_name.trim().to_string())),
        email: Set(email),
        password: Set(password),
        gender: Set(Gender::Unspecified),
        role: Set(payload.role.unwrap_or_else(|| "user".to_string())),
        status: Set(UserStatus::Active),
        email_verify_code: Set(Some(random_token(32))),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    state
        .notifier
        .user_registered(&created.email, created.first_name.as_deref());

    Ok((
        StatusCode::CREATED,
        ApiResponse::message(t(lang, "auth.userCreated")),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

#[tracing::instrument(name = "POST /auth/login", skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<LoginPayload>,
) -> Result<ApiResponse<TokenData>, ApiError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    let user = User::find()
        .filter(user::Column::Email.eq(&email))
        .filter(user::Column::Role.eq(&payload.role))
        .filter(user::Column::Status.eq(UserStatus::Active))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::forbidden(t(lang, "auth.userNotFound")))?;

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

/// Stamp first_login_at on the first successful login and clear any stale
/// reset code.
pub(crate) async fn touch_login_state(
    state: &AppState,
    user: user::Model,
) -> Result<user::Model, ApiError> {
    if user.first_login_at.is_some() && user.forgot_password_code.is_none() {
        return Ok(user);
    }

    let first_login_missing = user.first_login_at.is_none();
    let stale_code = user.forgot_password_code.is_some();

    let mut active: user::ActiveModel = user.into();
    if first_login_missing {
        active.first_login_at = Set(Some(Utc::now().naive_utc()));
    }
    if stale_code {
        active.forgot_password_code = Set(None);
    }
    Ok(active.update(&state.db).await?)
}

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

#[tracing::instrument(name = "POST /auth/forget-password", skip(state, payload))]
pub async fn forgot_password(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    payload.validate()?;

    let email = payload.email.trim().to_lowercase();

    let user = User::find()
        .filter(user::Column::Email.eq(&email))
        .filter(user::Column::Role.eq(&payload.role))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::forbidden(t(lang, "auth.userNotFound")))?;

    let code = random_token(32);

    let mut active: user::ActiveModel = user.clone().into();
    active.forgot_password_code = Set(Some(code.clone()));
    active.update(&state.db).await?;

    state
        .notifier
        .password_reset_requested(&user.email, user.first_name.as_deref(), &code);

    Ok(ApiResponse::message(t(lang, "auth.resetPasswordLinkSent")))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckResetTokenPayload {
    #[validate(length(min = 1, message = "Forgot password code is required"))]
    pub forgot_password_code: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}

#[tracing::instrument(name = "POST /auth/check-reset-token", skip(state, payload))]
pub async fn check_reset_token(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<CheckResetTokenPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    payload.validate()?;

    find_by_reset_code(&state, &payload.forgot_password_code, &payload.role, lang).await?;

    Ok(ApiResponse::message(t(lang, "auth.validCode")))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordPayload {
    #[validate(length(min = 1, message = "Forgot password code is required"))]
    pub forgot_password_code: String,
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
    #[validate(
        length(min = 8, max = 32, message = "Password must be at least 8 characters long"),
        custom(function = validate_password_strength)
    )]
    pub password: String,
}

#[tracing::instrument(name = "POST /auth/reset-password", skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    payload.validate()?;

    let user =
        find_by_reset_code(&state, &payload.forgot_password_code, &payload.role, lang).await?;

    let password = hash_password(payload.password).await?;

    let mut active: user::ActiveModel = user.into();
    active.password = Set(password);
    active.forgot_password_code = Set(None);
    active.update(&state.db).await?;

    Ok(ApiResponse::message(t(lang, "auth.passwordReset")))
}

async fn find_by_reset_code(
    state: &AppState,
    code: &str,
    role: &str,
    lang: crate::entity::sea_orm_active_enums::Lang,
) -> Result<user::Model, ApiError> {
    User::find()
        .filter(user::Column::ForgotPasswordCode.eq(code))
        .filter(user::Column::Role.eq(role))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::forbidden(t(lang, "auth.userNotFound")))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Old password is required"))]
    pub old_password: String,
    #[validate(
        length(min = 8, max = 32, message = "Password must be at least 8 characters long"),
        custom(function = validate_password_strength)
    )]
    pub password: String,
}

#[tracing::instrument(name = "POST /auth/change-password", skip(state, auth, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    let current = auth.require()?;
    payload.validate()?;

    let user = User::find()
        .filter(user::Column::Email.eq(&current.email))
        .filter(user::Column::Role.eq(&current.role))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::forbidden(t(lang, "auth.userNotFound")))?;

    if !verify_password(payload.old_password, user.password.clone()).await? {
        return Err(ApiError::forbidden(t(lang, "auth.invalidPassword")));
    }

    let password = hash_password(payload.password).await?;

    let mut active: user::ActiveModel = user.into();
    active.password = Set(password);
    active.update(&state.db).await?;

    Ok(ApiResponse::message(t(lang, "auth.passwordChanged")))
}

#[tracing::instrument(name = "POST /auth/refresh-token", skip(state, auth))]
pub async fn refresh_token(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
) -> Result<ApiResponse<TokenData>, ApiError> {
    let user = auth.require()?;

    let token = state.sign_token(user)?;

    UserToken::update_many()
        .col_expr(user_token::Column::Token, Expr::value(token.clone()))
        .filter(user_token::Column::UserId.eq(user.id))
        .exec(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        TokenData { token },
        t(lang, "auth.userLoggedIn"),
    ))
}

#[tracing::instrument(name = "POST /auth/logout", skip(state, headers))]
pub async fn logout(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    headers: HeaderMap,
) -> Result<ApiResponse<()>, ApiError> {
    let token =
        bearer_token(&headers).ok_or_else(|| ApiError::bad_request(t(lang, "auth.tokenRequired")))?;

    let result = UserToken::delete_many()
        .filter(user_token::Column::Token.eq(token))
        .exec(&state.db)
        .await?;

    state.auth_cache.invalidate(&ApiState::hash_token(token));

    if result.rows_affected == 0 {
        return Err(ApiError::not_found(t(lang, "auth.tokenNotFound")));
    }

    Ok(ApiResponse::message(t(lang, "auth.userLoggedOut")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_passwords_pass() {
        assert!(validate_password_strength("Str0ng@pass").is_ok());
    }

    #[test]
    fn weak_passwords_fail() {
        assert!(validate_password_strength("alllowercase1@").is_err());
        assert!(validate_password_strength("NOLOWERCASE1@").is_err());
        assert!(validate_password_strength("NoDigits@here").is_err());
        assert!(validate_password_strength("NoSpecial123").is_err());
    }

    #[test]
    fn register_payload_collects_field_errors() {
        let payload = RegisterPayload {
            email: "nope".into(),
            password: "short".into(),
            first_name: String::new(),
            last_name: "Doe".into(),
            role: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("first_name"));
        assert!(!fields.contains_key("last_name"));
    }
}
