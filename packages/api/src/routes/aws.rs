//! Temporary AWS credential vending for the admin panel's direct-to-S3
//! uploads: assumes the configured role via STS and hands back short-lived
//! credentials.

use axum::{Extension, Router, routing::get};
use serde::Serialize;

use crate::{
    error::ApiError, i18n::RequestLang, middleware::auth::AuthUser, response::ApiResponse,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/aws-details", get(aws_details))
}

#[derive(Debug, Serialize)]
pub struct TemporaryCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<String>,
}

#[tracing::instrument(name = "GET /aws/aws-details", skip(auth))]
pub async fn aws_details(
    Extension(auth): Extension<AuthUser>,
    RequestLang(lang): RequestLang,
) -> Result<ApiResponse<TemporaryCredentials>, ApiError> {
    auth.require_admin(lang)?;

    let role_arn =
        std::env::var("AWS_ROLE_ARN").map_err(|_| ApiError::internal("AWS_ROLE_ARN not set"))?;

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_sts::Client::new(&config);

    let output = client
        .assume_role()
        .role_arn(role_arn)
        .role_session_name("AssumeRoleSession")
        .duration_seconds(900)
        .send()
        .await
        .map_err(|e| ApiError::internal(format!("STS assume role failed: {}", e)))?;

    let credentials = output
        .credentials()
        .ok_or_else(|| ApiError::internal("STS returned no credentials"))?;

    Ok(ApiResponse::ok(
        TemporaryCredentials {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            expiration: Some(credentials.expiration().to_string()),
        },
        "AWS credentials retrieved successfully",
    ))
}
