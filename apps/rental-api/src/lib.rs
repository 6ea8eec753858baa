//! # Reel Rentals API
//!
//! HTTP adapter over [`RentalService`](reel_core::RentalService).
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Rental API Server                                │
//! │                                                                         │
//! │  Client ──► axum (TraceLayer) ──► RentalParams ──► RentalService        │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                                              SqliteRentalStore          │
//! │                                                        │                │
//! │  Client ◄── JSON body / ApiError ◄─────────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ApiConfig`]. Environment variables:
//! - `REEL_CONFIG` - Optional TOML file
//! - `REEL_HOST` / `REEL_PORT` - Listen address (default: 0.0.0.0:3000)
//! - `REEL_DATABASE_PATH` - SQLite file (default: ./reel.db)
//! - `REEL_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `REEL_LOG` - Log filter when `RUST_LOG` is unset (default: info,sqlx=warn)

pub mod config;
pub mod error;
pub mod params;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;
pub use state::AppState;

/// Builds the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/check_out", post(routes::check_out))
        .route("/check_in", post(routes::check_in))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
