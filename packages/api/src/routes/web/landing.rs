use axum::extract::State;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    entity::{landing_page, prelude::*},
    error::ApiError,
    response::ApiResponse,
    state::AppState,
};

#[tracing::instrument(name = "GET /web/auth/landing-banner", skip(state))]
pub async fn landing_banner(
    State(state): State<AppState>,
) -> Result<ApiResponse<Option<landing_page::Model>>, ApiError> {
    let banner = LandingPage::find()
        .filter(landing_page::Column::DeletedAt.is_null())
        .order_by_desc(landing_page::Column::CreatedAt)
        .one(&state.db)
        .await?;

    Ok(ApiResponse::ok(
        banner,
        "Latest landing page banner fetched successfully",
    ))
}
