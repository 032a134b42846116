//! REST API module.
//!
//! Every JSON body carries `ok`; failures use [`crate::errors::ErrorResponse`].

mod content;
mod weather;

pub use content::*;
pub use weather::*;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Success response envelope: `{ "ok": true, ...payload }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub payload: T,
    /// Sent as `Cache-Control` when set
    #[serde(skip)]
    pub cache_control: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(payload: T) -> Self {
        Self {
            ok: true,
            payload,
            cache_control: None,
        }
    }

    pub fn cached(mut self, cache_control: String) -> Self {
        self.cache_control = Some(cache_control);
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let cache_control = self.cache_control.clone();
        let mut response = (StatusCode::OK, Json(self)).into_response();

        if let Some(value) = cache_control {
            match HeaderValue::from_str(&value) {
                Ok(value) => {
                    response.headers_mut().insert(header::CACHE_CONTROL, value);
                }
                Err(e) => tracing::warn!("Invalid Cache-Control value {:?}: {}", value, e),
            }
        }

        response
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;
