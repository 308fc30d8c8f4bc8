//! Success envelope shared by all JSON endpoints.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// `{httpCode, result, timestamp}` wrapper returned on success.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub http_code: u16,
    pub result: T,
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(status: StatusCode, result: T) -> Self {
        Self {
            http_code: status.as_u16(),
            result,
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn ok(result: T) -> Self {
        Self::new(StatusCode::OK, result)
    }

    pub fn created(result: T) -> Self {
        Self::new(StatusCode::CREATED, result)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.http_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
