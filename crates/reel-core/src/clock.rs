//! Source of the current calendar date.
//!
//! Rental dates are whole days, so the service only ever asks for "today".

use chrono::{NaiveDate, Utc};

/// Supplies today's date to [`RentalService`](crate::service::RentalService).
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Today's date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Always answers the same date. Used by tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
