// --- File: crates/nutrify_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{HttpStatusCode, NutrifyError};

// Include the client module
pub mod client;

/// Extension trait for NutrifyError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for NutrifyError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Flat `{"error": "..."}` body; never the Display form, which may carry detail.
        let body = Json(json!({ "error": self.client_message() }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for NutrifyError to make it easier to use in Axum handlers.
impl IntoResponse for NutrifyError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Converts a Result<T, E> into a Result<Json<T>, Response> using a custom error mapper.
/// Handlers use this to turn domain-specific errors into HTTP responses.
pub fn map_json_error<T, E, F>(result: Result<T, E>, f: F) -> Result<Json<T>, Response>
where
    T: serde::Serialize,
    F: FnOnce(E) -> NutrifyError,
{
    result.map(Json).map_err(|err| f(err).into_response())
}

/// Fallback for methods an endpoint does not serve.
pub async fn method_not_allowed() -> Response {
    NutrifyError::MethodNotAllowed.into_response()
}
