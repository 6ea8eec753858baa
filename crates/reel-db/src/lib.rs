//! # reel-db: Database Layer for Reel Rentals
//!
//! This crate provides database access for Reel Rentals.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Reel Rentals Data Flow                           │
//! │                                                                         │
//! │  POST /check_out                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RentalService (reel-core) ── Arc<dyn RentalStore>                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     reel-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  VideoRepo    │    │  (embedded)  │  │   │
//! │  │   │               │    │  CustomerRepo │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│  RentalRepo   │    │ 001_init.sql │  │   │
//! │  │   └───────┬───────┘    └───────────────┘    └──────────────┘  │   │
//! │  │           │                                                     │   │
//! │  │   ┌───────▼─────────────┐                                      │   │
//! │  │   │ SqliteRentalStore   │  one sqlx transaction per operation  │   │
//! │  │   │   (store.rs)        │                                      │   │
//! │  │   └─────────────────────┘                                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (reel.db, WAL)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (video, customer, rental)
//! - [`store`] - The SQLite `RentalStore`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reel_db::{Database, DbConfig};
//! use reel_core::RentalService;
//!
//! let db = Database::new(DbConfig::new("./reel.db")).await?;
//! let service = RentalService::with_system_clock(db.rental_store());
//! let receipt = service.check_out(customer_id, video_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use store::SqliteRentalStore;

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::rental::RentalRepository;
pub use repository::video::VideoRepository;
