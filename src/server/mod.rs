//! # HTTP Server for Payloads, Rendering and Saved Designs
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /api/payload` | encode + validate `{type, fields}` |
//! | `POST /api/render` | PNG/SVG for `{type, fields, options?, format?}` |
//! | `POST /api/designs` | save `{data, options?, imageBase64?}` |
//! | `GET /api/designs/:id` | fetch a saved design |
//! | `GET /health` | liveness |
//!
//! ## Usage
//!
//! ```bash
//! qrforge serve --listen 0.0.0.0:8080 --data-dir data/designs
//! ```

mod handlers;
mod state;

pub use crate::config::ServerConfig;
pub use handlers::designs::decode_png_data_url;
pub use state::AppState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Settings;
use crate::error::QrForgeError;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_body_bytes;
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/payload", post(handlers::payload::encode))
        .route("/api/render", post(handlers::render::render))
        .route("/api/designs", post(handlers::designs::save))
        .route("/api/designs/:id", get(handlers::designs::fetch))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use qrforge::config::Settings;
/// use qrforge::server::serve;
///
/// # async fn example() -> Result<(), qrforge::QrForgeError> {
/// serve(Settings::default()).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(settings: Settings) -> Result<(), QrForgeError> {
    let app_state = Arc::new(AppState::with_fs_store(settings));
    let listen_addr = app_state.config.listen_addr.clone();
    let data_dir = app_state.config.data_dir.clone();
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .map_err(|e| QrForgeError::Server(format!("Failed to bind to {}: {}", listen_addr, e)))?;

    info!(addr = %listen_addr, data_dir = %data_dir.display(), "qrforge HTTP server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| QrForgeError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
