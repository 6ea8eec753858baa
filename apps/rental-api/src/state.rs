//! Shared application state.

use std::sync::Arc;

use reel_core::clock::Clock;
use reel_core::RentalService;
use reel_db::Database;

/// Handed to every handler through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub service: RentalService,
    pub db: Database,
}

impl AppState {
    /// State dated by the system clock.
    pub fn new(db: Database) -> Self {
        AppState {
            service: RentalService::with_system_clock(db.rental_store()),
            db,
        }
    }

    /// State dated by `clock`.
    pub fn with_clock(db: Database, clock: Arc<dyn Clock>) -> Self {
        AppState {
            service: RentalService::new(db.rental_store(), clock),
            db,
        }
    }
}
