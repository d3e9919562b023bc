//! JSON response envelope shared by middleware rejections.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Standard API response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Whether the request succeeded.
    pub success: bool,
    /// Response payload, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Human-readable status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Error description for failed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    /// Successful envelope wrapping `data`.
    #[must_use]
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    /// Successful envelope wrapping `data` with a status message.
    #[must_use]
    pub fn success_with_message(data: serde_json::Value, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    /// Failed envelope carrying an error description.
    #[must_use]
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// 429 response for rejected admissions.
///
/// The status is reserved for rate limiting; no other error path in a
/// consuming service should reuse it, so clients can tell throttling
/// apart from bad requests and server faults.
#[must_use]
pub fn error_too_many_requests(message: &str) -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(ApiResponse::error(message)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_envelope_skips_empty_fields() {
        let envelope = ApiResponse::error("Rate limit exceeded. Too many requests.");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "Rate limit exceeded. Too many requests.",
            })
        );
    }

    #[test]
    fn test_success_envelope() {
        let envelope = ApiResponse::success(serde_json::json!({"id": 1}));
        assert!(envelope.success);
        assert_eq!(envelope.data, Some(serde_json::json!({"id": 1})));
        assert_eq!(envelope.error, None);
    }

    #[test]
    fn test_success_envelope_with_message() {
        let envelope =
            ApiResponse::success_with_message(serde_json::json!({"id": 1}), "created");
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "data": {"id": 1},
                "message": "created",
            })
        );
    }

    #[test]
    fn test_too_many_requests_status() {
        let response = error_too_many_requests("slow down");
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
