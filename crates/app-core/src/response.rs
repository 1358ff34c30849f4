//! A structured wrapper for successful JSON API responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct Response<T> {
    message: String,
    data: T,

    #[serde(skip)]
    status: StatusCode,
}

impl<T> Response<T> {
    pub fn with_message(data: T, message: &str) -> Self {
        Self { message: message.to_string(), data, status: StatusCode::OK }
    }

    /// A `201 Created` response.
    pub fn created(data: T) -> Self {
        Self { message: "Created".to_string(), data, status: StatusCode::CREATED }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl<T> From<T> for Response<T> {
    fn from(data: T) -> Self {
        Self { message: "Successfully".to_string(), data, status: StatusCode::OK }
    }
}

impl<T: Serialize> IntoResponse for Response<T> {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}
