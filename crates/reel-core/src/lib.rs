//! # reel-core: Rental Rules for Reel Rentals
//!
//! This crate is the **heart** of Reel Rentals. It decides when a video may
//! be checked out or checked in, and how the inventory and customer counters
//! move when it happens.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Reel Rentals Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 rental-api (HTTP adapter)                       │   │
//! │  │       POST /check_out            POST /check_in                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ reel-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  rental   │  │  service  │  │   store   │  │   │
//! │  │   │   Video   │  │  rules    │  │ Rental-   │  │ port +    │  │   │
//! │  │   │ Customer  │  │ CheckOut  │  │ Service   │  │ memory    │  │   │
//! │  │   │  Rental   │  │ CheckIn   │  │           │  │ store     │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • STORE IS INJECTED                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │ RentalStore trait                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    reel-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Records (Video, Customer, Rental) and their id newtypes
//! - [`rental`] - Pure check-out/check-in transitions
//! - [`validation`] - Field validation for new records
//! - [`error`] - Domain error types
//! - [`store`] - The `RentalStore` port and the in-memory implementation
//! - [`service`] - `RentalService`, which runs a rule inside one store transaction
//! - [`clock`] - Source of "today"
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use reel_core::clock::FixedClock;
//! use reel_core::store::MemoryRentalStore;
//! use reel_core::{NewCustomer, NewVideo, RentalService};
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let store = Arc::new(MemoryRentalStore::new());
//! let customer = store.add_customer(NewCustomer::named("Shelley Rocha")).await.unwrap();
//! let video = store
//!     .add_video(NewVideo::new("Blacksmith Of The Banished", NaiveDate::from_ymd_opt(1979, 1, 18).unwrap(), 3))
//!     .await
//!     .unwrap();
//!
//! let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
//! let service = RentalService::new(store, Arc::new(FixedClock(today)));
//!
//! let receipt = service.check_out(customer.id, video.id).await.unwrap();
//! assert_eq!(receipt.available_inventory, 2);
//! assert_eq!(receipt.videos_checked_out_count, 1);
//! assert_eq!(receipt.rental.due_date, NaiveDate::from_ymd_opt(2024, 5, 8).unwrap());
//! # });
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod error;
pub mod rental;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{RentalError, RentalResult, StoreError, ValidationError, ValidationErrors};
pub use service::{CheckInReceipt, CheckOutReceipt, RentalService};
pub use store::{RentalStore, RentalTransaction};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Length of a rental window in days.
///
/// A video checked out today is due back `RENTAL_PERIOD_DAYS` days later.
pub const RENTAL_PERIOD_DAYS: i64 = 7;

/// Generic message rendered for any id that does not resolve to a record.
pub const NOT_FOUND_MESSAGE: &str = "Not Found";
