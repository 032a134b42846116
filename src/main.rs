//! SkiDráček Backend
//!
//! Marketing site for the Alšovice ski lift: public page, admin-editable
//! content blocks in SQLite, and current weather from Open-Meteo.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod pages;
mod schema;
mod weather;

use std::sync::Arc;

use axum::{middleware, routing::get, routing::put, Router};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::{AdminGate, SessionKeys};
use config::{Config, LogFormat};
use db::ContentStore;
use weather::{OpenMeteo, WeatherProvider};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ContentStore>,
    pub gate: Arc<AdminGate>,
    pub weather: Arc<dyn WeatherProvider>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();

    tracing::info!("Starting SkiDráček Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.session_secret.is_none() {
        tracing::warn!("No session secret configured (SKI_SESSION_SECRET). Content writes are disabled!");
    }
    if config.allowed_admins.is_none() {
        tracing::warn!(
            "No fallback admin allowlist (SKI_ALLOWED_ADMINS); writes need the admin-allowlist block"
        );
    }
    if config.weather.coordinates.is_none() {
        tracing::warn!("Weather coordinates not configured (SKI_WEATHER_LAT/LON)");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let store = Arc::new(ContentStore::new(pool));

    let gate = Arc::new(AdminGate::new(
        store.clone(),
        config.allowed_admins.clone(),
        config.session_secret.as_deref().map(SessionKeys::new),
    ));

    let weather: Arc<dyn WeatherProvider> = Arc::new(OpenMeteo::new(&config.weather)?);

    // Create application state
    let state = AppState {
        store,
        gate,
        weather,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Writes pass the admin gate first
    let admin_gate = middleware::from_fn_with_state(state.clone(), auth::admin_gate_layer);

    let api_routes = Router::new()
        .route(
            "/content",
            get(api::get_content).merge(put(api::put_content).route_layer(admin_gate)),
        )
        .route("/weather", get(api::get_weather));

    let page_routes = Router::new()
        .route("/", get(pages::public_page))
        .route("/admin", get(pages::admin_page));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Received shutdown signal");
}
