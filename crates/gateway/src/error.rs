use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

/// A registry failure on its way to the client.
///
/// Duplicate ids answer 400, unknown ids 404, rejected field values 422 and
/// anything else 500, always with a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError(pub roster_registry::Error);

impl From<roster_registry::Error> for ApiError {
    fn from(err: roster_registry::Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_conflict() {
            StatusCode::BAD_REQUEST
        } else if self.0.is_not_found() {
            StatusCode::NOT_FOUND
        } else if self.0.is_invalid() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "registry request failed");
        }
        (status, Json(serde_json::json!({ "detail": self.0.to_string() }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
