use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, decompression::RequestDecompressionLayer,
    services::ServeDir,
};

use middleware::auth::token_auth;
use state::State;

pub mod entity;
mod middleware;
mod routes;

pub mod engagement;
pub mod error;
pub mod i18n;
pub mod mail;
pub mod response;
pub mod slugify;
pub mod state;
pub mod upload;

pub use axum;
pub use sea_orm;

pub mod auth {
    pub use crate::middleware::auth::AuthUser;
}

pub fn construct_router(state: Arc<State>) -> Router {
    let upload_service = ServeDir::new(&state.upload_dir);

    let router = Router::new()
        .route("/", get(welcome))
        .nest("/health", routes::health::routes())
        .nest("/auth", routes::auth::routes())
        .nest("/user", routes::user::routes())
        .nest("/category", routes::category::routes())
        .nest("/content", routes::content::routes())
        .nest("/landing", routes::landing::routes());

    #[cfg(feature = "aws")]
    let router = router.nest("/aws", routes::aws::routes());

    let router = router
        .nest("/web/auth", routes::web::routes())
        .with_state(state.clone())
        .layer(from_fn_with_state(state.clone(), token_auth))
        .layer(CorsLayer::permissive())
        .layer(
            ServiceBuilder::new()
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new()),
        );

    Router::new()
        .nest("/api/v1", router)
        .nest_service("/upload", upload_service)
}

#[tracing::instrument(name = "GET /")]
async fn welcome(
    i18n::RequestLang(lang): i18n::RequestLang,
) -> response::ApiResponse<()> {
    response::ApiResponse::message(i18n::t(lang, "welcome"))
}
