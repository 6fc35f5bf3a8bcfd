use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use crate::error::Error;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Pre-rendered JSON body with the content type clients expect.
pub fn json_response(status: StatusCode, body: String) -> Response {
    let mut resp = (status, body).into_response();
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(JSON_CONTENT_TYPE),
    );
    resp
}

/// Error as seen by clients: a status and a fixed message, never internal detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        ApiError { status, message }
    }

    pub fn body(&self) -> String {
        serde_json::json!({ "error": self.message }).to_string()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::UnsupportedCountry(_) => ApiError::new(StatusCode::BAD_REQUEST, "Country not supported"),
            Error::UnsupportedResolution(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, "Resolution not supported")
            }
            Error::InvalidInput(msg) => ApiError::new(StatusCode::BAD_REQUEST, msg),
            Error::NotYetAvailable => ApiError::new(StatusCode::NOT_FOUND, "Data not found"),
            Error::ForecastRejected => ApiError::new(StatusCode::BAD_REQUEST, "Invalid coordinates"),
            Error::ForecastUnavailable(_) => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Weather service unavailable")
            }
            Error::ForecastMalformed(_) => {
                ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Invalid response from weather service")
            }
            other => {
                tracing::error!("Unhandled error in request path: {}", other);
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        json_response(self.status, self.body())
    }
}
