//! Contact-form submissions: public store, admin listing.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    entity::{customer_detail, prelude::*},
    error::ApiError,
    i18n::{RequestLang, t},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::PaginationParams,
    state::AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[tracing::instrument(name = "POST /web/auth/store", skip(state, payload))]
pub async fn store_customer(
    State(state): State<AppState>,
    RequestLang(lang): RequestLang,
    Json(payload): Json<CustomerPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    let now = Utc::now().naive_utc();
    let created = customer_detail::ActiveModel {
        email: Set(payload.email.trim().to_lowercase()),
        phone: Set(payload.phone.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(created, t(lang, "customer.stored")),
    ))
}

#[tracing::instrument(name = "GET /web/auth/customer-details", skip(state, auth))]
pub async fn customer_list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
    Query(pagination): Query<PaginationParams>,
) -> Result<ApiResponse<Vec<customer_detail::Model>>, ApiError> {
    auth.require_admin(lang)?;

    let find = CustomerDetail::find().filter(customer_detail::Column::DeletedAt.is_null());

    let total = find.clone().count(&state.db).await?;
    let customers = find
        .order_by_desc(customer_detail::Column::Id)
        .limit(pagination.limit())
        .offset(pagination.offset())
        .all(&state.db)
        .await?;

    Ok(ApiResponse::with_meta(
        customers,
        Meta::paged(total, pagination.page(), pagination.limit()),
        "list of resources",
    ))
}
