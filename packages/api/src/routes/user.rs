//! Admin user management: listing, creation with username, status changes,
//! password override and deletion.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::{Expr, Func},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    entity::{
        prelude::*,
        sea_orm_active_enums::{Gender, UserStatus},
        user,
    },
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::{PaginationParams, StatusPayload},
    slugify::random_token,
    state::AppState,
};

use super::auth::{hash_password, validate_password_strength};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/user-store", post(store_user))
        .route("/change-status/{username}", patch(change_user_status))
        .route("/change-password/{username}", patch(change_user_password))
        .route("/user-delete/{id}", delete(destroy_user))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

#[tracing::instrument(name = "GET /user/users", skip(state, auth))]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Query(query): Query<ListUsersQuery>,
) -> Result<ApiResponse<Vec<user::Model>>, ApiError> {
    auth.require_admin(lang)?;

    let pagination = PaginationParams {
        page: query.page,
        limit: query.limit,
    };

    let mut find = User::find()
        .filter(user::Column::Role.ne("admin"))
        .filter(user::Column::DeletedAt.is_null());

    if let Some(status) = query.status {
        find = find.filter(user::Column::Status.eq(status));
    }

    if let Some(search) = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        find = find.filter(
            Expr::expr(Func::lower(Expr::col((user::Entity, user::Column::Username))))
                .like(format!("%{}%", search.to_lowercase())),
        );
    }

    let total = find.clone().count(&state.db).await?;
    let users = find
        .order_by_desc(user::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&state.db)
        .await?;

    Ok(ApiResponse::with_meta(
        users,
        Meta::paged(total, pagination.page(), pagination.limit()),
        t(lang, "auth.usersListed"),
    ))
}

#[derive(Debug, Deserialize, Validate)]
pub struct StoreUserPayload {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(
        length(min = 8, max = 32, message = "Password must be at least 8 characters long"),
        custom(function = validate_password_strength)
    )]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
}

#[tracing::instrument(name = "POST /user/user-store", skip(state, auth, payload))]
pub async fn store_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<StoreUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin(lang)?;
    payload.validate()?;

    let username = payload.username.trim().to_string();

    let existing = User::find()
        .filter(user::Column::Username.eq(&username))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::bad_request(t(lang, "auth.usernameAlreadyExist")));
    }

    let password = hash_password(payload.password).await?;

    let created = user::ActiveModel {
        username: Set(Some(username)),
        email: Set(payload.email.trim().to_lowercase()),
        password: Set(password),
        first_name: Set(payload.first_name.clone()),
        last_name: Set(payload.last_name.clone()),
        gender: Set(Gender::Unspecified),
        role: Set(payload.role.clone().unwrap_or_else(|| "user".to_string())),
        status: Set(UserStatus::Active),
        email_verify_code: Set(Some(random_token(32))),
        created_at: Set(Utc::now().naive_utc()),
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

#[tracing::instrument(name = "PATCH /user/change-status/{username}", skip(state, auth, payload))]
pub async fn change_user_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(username): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> Result<ApiResponse<user::Model>, ApiError> {
    auth.require_admin(lang)?;

    let status = match payload.status.as_str() {
        "active" => UserStatus::Active,
        "inactive" => UserStatus::Inactive,
        _ => return Err(ApiError::bad_request(t(lang, "auth.invalidStatus"))),
    };

    let user = User::find()
        .filter(user::Column::Username.eq(&username))
        .filter(user::Column::Role.ne("admin"))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::bad_request(t(lang, "auth.userNotFound")))?;

    let mut active: user::ActiveModel = user.into();
    active.status = Set(status);
    let updated = active.update(&state.db).await?;

    Ok(ApiResponse::ok(updated, t(lang, "auth.statusChanged")))
}

#[derive(Debug, Deserialize, Validate)]
pub struct OverridePasswordPayload {
    #[validate(
        length(min = 8, max = 32, message = "Password must be at least 8 characters long"),
        custom(function = validate_password_strength)
    )]
    pub password: String,
}

#[tracing::instrument(name = "PATCH /user/change-password/{username}", skip(state, auth, payload))]
pub async fn change_user_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(username): Path<String>,
    Json(payload): Json<OverridePasswordPayload>,
) -> Result<ApiResponse<()>, ApiError> {
    auth.require_admin(lang)?;
    payload.validate()?;

    let user = User::find()
        .filter(user::Column::Username.eq(&username))
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::forbidden(t(lang, "auth.userNotFound")))?;

    let password = hash_password(payload.password).await?;

    let mut active: user::ActiveModel = user.into();
    active.password = Set(password);
    active.update(&state.db).await?;

    Ok(ApiResponse::message(t(lang, "auth.passwordChanged")))
}

#[tracing::instrument(name = "DELETE /user/user-delete/{id}", skip(state, auth))]
pub async fn destroy_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Path(id): Path<i32>,
) -> Result<ApiResponse<()>, ApiError> {
    auth.require_admin(lang)?;

    let user = User::find_by_id(id)
        .filter(user::Column::DeletedAt.is_null())
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("user not found"))?;

    let mut active: user::ActiveModel = user.into();
    active.deleted_at = Set(Some(Utc::now().naive_utc()));
    active.update(&state.db).await?;

    Ok(ApiResponse::message("user deleted successfully"))
}
