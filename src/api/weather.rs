//! Weather API endpoint.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::AppState;

/// GET /api/weather - Current conditions; unknown values are `null`.
pub async fn get_weather(State(state): State<AppState>) -> Response {
    let weather = state.weather.current().await;
    (
        [(header::CACHE_CONTROL, state.config.content_cache_control())],
        Json(weather),
    )
        .into_response()
}
