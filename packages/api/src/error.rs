use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Error carried through every handler. Renders the uniform envelope
/// `{ "ack": false, "message": ... }` where `message` is either a plain
/// string or, for validation failures, a field -> message map.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    message: ErrorMessage,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Text(String),
    Fields(BTreeMap<String, String>),
}

impl ApiError {
    fn new(status: StatusCode, message: ErrorMessage) -> Self {
        Self { status, message }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::error!("Internal error: {}", msg);
        // Never leak internals to the client
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorMessage::Text("Internal Server Error".to_string()),
        )
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Bad request: {}", msg);
        Self::new(StatusCode::BAD_REQUEST, ErrorMessage::Text(msg))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Not found: {}", msg);
        Self::new(StatusCode::NOT_FOUND, ErrorMessage::Text(msg))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Unauthorized: {}", msg);
        Self::new(StatusCode::UNAUTHORIZED, ErrorMessage::Text(msg))
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Forbidden: {}", msg);
        Self::new(StatusCode::FORBIDDEN, ErrorMessage::Text(msg))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        tracing::warn!("Conflict: {}", msg);
        Self::new(StatusCode::CONFLICT, ErrorMessage::Text(msg))
    }

    pub fn validation(errors: &validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                fields.insert(field.to_string(), message);
            }
        }
        tracing::warn!("Validation error: {:?}", fields);
        Self::new(StatusCode::BAD_REQUEST, ErrorMessage::Fields(fields))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &ErrorMessage {
        &self.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorEnvelope {
            ack: bool,
            message: ErrorMessage,
        }

        (
            self.status,
            Json(ErrorEnvelope {
                ack: false,
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorMessage::Text("Internal Server Error".to_string()),
        )
    }
}

impl From<sea_orm::TransactionError<ApiError>> for ApiError {
    fn from(err: sea_orm::TransactionError<ApiError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db_err) => db_err.into(),
            sea_orm::TransactionError::Transaction(api_err) => api_err,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation(&errors)
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        tracing::warn!("JWT error: {:?}", err);
        Self::unauthorized(format!("JWT error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        Self::internal(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        Self::internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        Self::bad_request(format!("JSON error: {}", err))
    }
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            ErrorMessage::Text(text) => write!(f, "{}: {}", self.status, text),
            ErrorMessage::Fields(fields) => {
                write!(f, "{}: {} invalid fields", self.status, fields.len())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
        #[validate(email(message = "Email address is not valid"))]
        email: String,
    }

    #[test]
    fn statuses_map_to_error_kind() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::unauthorized("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_become_field_map() {
        let probe = Probe {
            name: String::new(),
            email: "not-an-email".into(),
        };
        let err = ApiError::from(probe.validate().unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        match err.message() {
            ErrorMessage::Fields(fields) => {
                assert_eq!(fields.get("name").unwrap(), "Name is required");
                assert_eq!(fields.get("email").unwrap(), "Email address is not valid");
            }
            other => panic!("expected field map, got {:?}", other),
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = ApiError::internal("connection refused at 10.0.0.5");
        match err.message() {
            ErrorMessage::Text(text) => assert_eq!(text, "Internal Server Error"),
            other => panic!("expected text, got {:?}", other),
        }
    }
}
