//! # Rental Rules
//!
//! Pure check-out and check-in transitions. Given the records as they were
//! read, these functions compute the new counter values and the ledger
//! change, or the validation errors that forbid the operation. They never
//! write anything; [`RentalService`](crate::service::RentalService) applies
//! the result inside one store transaction.
//!
//! ## Counter Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         check_out                 check_in              │
//! │  video.available_inventory       - 1                  + 1               │
//! │  customer.videos_checked_out     + 1                  - 1               │
//! │  ledger                          new (open)           close (today)     │
//! │  guard                           available >= 0       count >= 0        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, NaiveDate};

use crate::error::ValidationErrors;
use crate::types::{Customer, NewRental, Rental, Video};
use crate::validation::non_negative;
use crate::RENTAL_PERIOD_DAYS;

/// Outcome of a permitted check-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOut {
    pub rental: NewRental,
    /// Video counter after the decrement.
    pub available_inventory: i64,
    /// Customer counter after the increment.
    pub videos_checked_out_count: i64,
}

/// Outcome of a permitted check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub checkin_date: NaiveDate,
    /// Video counter after the increment.
    pub available_inventory: i64,
    /// Customer counter after the decrement.
    pub videos_checked_out_count: i64,
}

/// Due date for a rental starting on `checkout_date`.
pub fn due_date(checkout_date: NaiveDate) -> NaiveDate {
    checkout_date
        .checked_add_days(Days::new(RENTAL_PERIOD_DAYS as u64))
        .unwrap_or(NaiveDate::MAX)
}

/// Decides whether `customer` may take one copy of `video` today.
///
/// ## Rules
/// - `video.available_inventory - 1` must stay `>= 0`
/// - the new ledger entry is due [`RENTAL_PERIOD_DAYS`] after `today`
pub fn check_out(customer: &Customer, video: &Video, today: NaiveDate) -> Result<CheckOut, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let available = non_negative(
        "video",
        "available_inventory",
        video.available_inventory.saturating_sub(1),
    );
    if let Err(e) = &available {
        errors.push(e.clone());
    }

    let count = non_negative(
        "customer",
        "videos_checked_out_count",
        customer.videos_checked_out_count.saturating_add(1),
    );
    if let Err(e) = &count {
        errors.push(e.clone());
    }

    match (available, count) {
        (Ok(available_inventory), Ok(videos_checked_out_count)) => Ok(CheckOut {
            rental: NewRental {
                customer_id: customer.id,
                video_id: video.id,
                checkout_date: today,
                due_date: due_date(today),
            },
            available_inventory,
            videos_checked_out_count,
        }),
        _ => Err(errors),
    }
}

/// Decides whether `customer` may return `video` against the open `rental`.
///
/// ## Rules
/// - `customer.videos_checked_out_count - 1` must stay `>= 0`
/// - `available_inventory` is incremented with no upper bound
pub fn check_in(
    customer: &Customer,
    video: &Video,
    rental: &Rental,
    today: NaiveDate,
) -> Result<CheckIn, ValidationErrors> {
    debug_assert_eq!(rental.customer_id, customer.id);
    debug_assert_eq!(rental.video_id, video.id);
    debug_assert!(rental.is_open());

    let mut errors = ValidationErrors::new();

    let count = non_negative(
        "customer",
        "videos_checked_out_count",
        customer.videos_checked_out_count.saturating_sub(1),
    );
    if let Err(e) = &count {
        errors.push(e.clone());
    }

    let available = non_negative(
        "video",
        "available_inventory",
        video.available_inventory.saturating_add(1),
    );
    if let Err(e) = &available {
        errors.push(e.clone());
    }

    match (available, count) {
        (Ok(available_inventory), Ok(videos_checked_out_count)) => Ok(CheckIn {
            checkin_date: today,
            available_inventory,
            videos_checked_out_count,
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
