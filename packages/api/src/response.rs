//! The uniform response envelope: `{ ack, data?, meta?, message }`.

use axum::{Json, response::IntoResponse};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<u64>,
}

impl Meta {
    pub fn paged(total: u64, page: u64, limit: u64) -> Self {
        Self {
            total,
            page: Some(page),
            limit: Some(limit),
            pages: Some(total.div_ceil(limit.max(1))),
        }
    }

    pub fn total_only(total: u64) -> Self {
        Self {
            total,
            page: None,
            limit: None,
            pages: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ack: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub message: String,
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            ack: true,
            data: None,
            meta: None,
            message: message.into(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            ack: true,
            data: Some(data),
            meta: None,
            message: message.into(),
        }
    }

    pub fn with_meta(data: T, meta: Meta, message: impl Into<String>) -> Self {
        Self {
            ack: true,
            data: Some(data),
            meta: Some(meta),
            message: message.into(),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_rounds_pages_up() {
        assert_eq!(Meta::paged(0, 1, 10).pages, Some(0));
        assert_eq!(Meta::paged(10, 1, 10).pages, Some(1));
        assert_eq!(Meta::paged(11, 1, 10).pages, Some(2));
        assert_eq!(Meta::paged(9, 1, 10).pages, Some(1));
    }

    #[test]
    fn envelope_omits_absent_parts() {
        let json = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(json["ack"], true);
        assert_eq!(json["message"], "done");
        assert!(json.get("data").is_none());
        assert!(json.get("meta").is_none());
    }

    #[test]
    fn envelope_carries_paged_meta() {
        let json = serde_json::to_value(ApiResponse::with_meta(
            vec![1, 2, 3],
            Meta::paged(23, 2, 10),
            "Category list fetched successfully",
        ))
        .unwrap();
        assert_eq!(json["meta"]["total"], 23);
        assert_eq!(json["meta"]["pages"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 3);
    }
}
