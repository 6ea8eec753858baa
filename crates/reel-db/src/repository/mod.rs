//! # Repository Module
//!
//! Database repository implementations for Reel Rentals.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  seed binary / admin tooling / tests                                   │
//! │       │                                                                 │
//! │       │  db.videos().insert(&new_video)                                │
//! │       ▼                                                                 │
//! │  VideoRepository                                                       │
//! │  ├── insert(&self, video)      validated before the INSERT             │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── list(&self, limit)                                                │
//! │  └── count(&self)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Counters are NOT written here: only SqliteRentalStore moves           │
//! │  available_inventory and videos_checked_out_count.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`VideoRepository`](video::VideoRepository) - Video catalogue
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers
//! - [`RentalRepository`](rental::RentalRepository) - Ledger queries (open, overdue)

pub mod customer;
pub mod rental;
pub mod video;
