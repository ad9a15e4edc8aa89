//! Uniform success envelope for the HTTP boundary.
//!
//! Every successful operation is wrapped as `{code, message, data, metadata?}`;
//! `metadata` is present only on list endpoints. Failures are produced by
//! `AppError::into_response` as `{code, errors}`.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::pagination::PageMeta;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub code: u16,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data
    pub fn ok(data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::OK, data)
    }

    /// 201 Created with data
    pub fn created(data: T) -> (StatusCode, Json<Self>) {
        Self::with_status(StatusCode::CREATED, data)
    }

    /// 200 OK with data and pagination metadata
    pub fn paginated(data: T, meta: PageMeta) -> (StatusCode, Json<Self>) {
        (
            StatusCode::OK,
            Json(Self {
                code: StatusCode::OK.as_u16(),
                message: "success".to_string(),
                data,
                metadata: Some(meta),
            }),
        )
    }

    fn with_status(status: StatusCode, data: T) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                code: status.as_u16(),
                message: "success".to_string(),
                data,
                metadata: None,
            }),
        )
    }
}

/// Message-only payload for mutations with nothing else to return
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// No content response helper for DELETE-style endpoints that return a body-less 204
#[allow(dead_code)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_envelope_carries_code_and_message() {
        let (status, Json(body)) = ApiResponse::ok("payload");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.code, 200);
        assert_eq!(body.message, "success");
        assert!(body.metadata.is_none());
    }

    #[test]
    fn metadata_is_omitted_when_absent() {
        let (_, Json(body)) = ApiResponse::ok(42);
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn paginated_envelope_includes_metadata() {
        let params = crate::types::PaginationParams::default();
        let meta = PageMeta::new(&params, 5);
        let (_, Json(body)) = ApiResponse::paginated(vec![1, 2, 3], meta);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["metadata"]["total_data"], 5);
    }
}
