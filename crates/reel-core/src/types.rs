//! # Domain Types
//!
//! Records used throughout Reel Rentals.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │       Video         │   │      Customer       │                     │
//! │  │  ─────────────────  │   │  ─────────────────  │                     │
//! │  │  id (VideoId)       │   │  id (CustomerId)    │                     │
//! │  │  title, overview    │   │  name               │                     │
//! │  │  total_inventory    │   │  videos_checked_    │                     │
//! │  │  available_inventory│   │    out_count        │                     │
//! │  └──────────┬──────────┘   └──────────┬──────────┘                     │
//! │             │ referenced by           │ referenced by                   │
//! │             ▼                         ▼                                 │
//! │  ┌───────────────────────────────────────────────┐                     │
//! │  │                 Rental (ledger entry)         │                     │
//! │  │  customer_id, video_id                        │                     │
//! │  │  checkout_date, due_date = checkout + 7 days  │                     │
//! │  │  checkin_date: None (open) → Some (closed)    │                     │
//! │  └───────────────────────────────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids are integer row ids wrapped in newtypes so a `VideoId` can never be
//! passed where a `CustomerId` is expected.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
        #[cfg_attr(feature = "sqlx", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw row id.
            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a [`Video`].
    VideoId
);
record_id!(
    /// Identifier of a [`Customer`].
    CustomerId
);
record_id!(
    /// Identifier of a [`Rental`] ledger entry.
    RentalId
);

// =============================================================================
// Video
// =============================================================================

/// A rentable title with a total and an available copy count.
///
/// `available_inventory` never goes below zero; only the rental rules
/// move it (down on check-out, up on check-in).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub overview: String,
    pub release_date: NaiveDate,
    pub image_url: Option<String>,
    /// Copies the store owns.
    pub total_inventory: i64,
    /// Copies on the shelf right now.
    pub available_inventory: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Number of copies currently out with customers.
    pub fn checked_out_copies(&self) -> i64 {
        self.total_inventory - self.available_inventory
    }

    /// Release date rendered as `"January 18th 1979"`.
    pub fn formatted_release_date(&self) -> String {
        let day = self.release_date.day();
        format!(
            "{} {}{} {}",
            self.release_date.format("%B"),
            day,
            ordinal_suffix(day),
            self.release_date.year()
        )
    }
}

/// English ordinal suffix for a day of month.
fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Fields for a video that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVideo {
    pub title: String,
    pub overview: String,
    pub release_date: NaiveDate,
    pub image_url: Option<String>,
    pub total_inventory: i64,
    pub available_inventory: i64,
}

impl NewVideo {
    /// A fully stocked title: every copy is on the shelf.
    pub fn new(title: impl Into<String>, release_date: NaiveDate, copies: i64) -> Self {
        let title = title.into();
        NewVideo {
            overview: format!("{title} on video."),
            title,
            release_date,
            image_url: None,
            total_inventory: copies,
            available_inventory: copies,
        }
    }

    /// Replaces the generated overview.
    pub fn overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = overview.into();
        self
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A renter with a running count of videos currently out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub registered_at: DateTime<Utc>,
    /// Never negative.
    pub videos_checked_out_count: i64,
    pub updated_at: DateTime<Utc>,
}

/// Fields for a customer that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub videos_checked_out_count: i64,
}

impl NewCustomer {
    /// A customer with no contact details and nothing checked out.
    pub fn named(name: impl Into<String>) -> Self {
        NewCustomer {
            name: name.into(),
            phone: None,
            postal_code: None,
            videos_checked_out_count: 0,
        }
    }
}

// =============================================================================
// Rental (ledger entry)
// =============================================================================

/// Lifecycle state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    /// Checked out, not yet returned.
    Open,
    /// Returned; terminal.
    Closed,
}

/// One checkout of one video by one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Rental {
    pub id: RentalId,
    pub customer_id: CustomerId,
    pub video_id: VideoId,
    pub checkout_date: NaiveDate,
    pub due_date: NaiveDate,
    pub checkin_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Rental {
    pub fn status(&self) -> RentalStatus {
        if self.checkin_date.is_some() {
            RentalStatus::Closed
        } else {
            RentalStatus::Open
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.status() == RentalStatus::Open
    }

    /// True when the rental is still open after its due date.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && today > self.due_date
    }
}

/// A ledger entry about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRental {
    pub customer_id: CustomerId,
    pub video_id: VideoId,
    pub checkout_date: NaiveDate,
    pub due_date: NaiveDate,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn video(release_date: NaiveDate) -> Video {
        let now = Utc::now();
        Video {
            id: VideoId(1),
            title: "Wonder Woman".to_string(),
            overview: "Amazon princess".to_string(),
            release_date,
            image_url: None,
            total_inventory: 5,
            available_inventory: 3,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_formatted_release_date() {
        assert_eq!(video(date(2017, 6, 2)).formatted_release_date(), "June 2nd 2017");
        assert_eq!(video(date(1979, 1, 18)).formatted_release_date(), "January 18th 1979");
        assert_eq!(video(date(2001, 3, 21)).formatted_release_date(), "March 21st 2001");
        assert_eq!(video(date(2001, 3, 11)).formatted_release_date(), "March 11th 2001");
        assert_eq!(video(date(2001, 3, 23)).formatted_release_date(), "March 23rd 2001");
    }

    #[test]
    fn test_checked_out_copies() {
        assert_eq!(video(date(2017, 6, 2)).checked_out_copies(), 2);
    }

    #[test]
    fn test_rental_status_and_overdue() {
        let mut rental = Rental {
            id: RentalId(1),
            customer_id: CustomerId(1),
            video_id: VideoId(1),
            checkout_date: date(2024, 5, 1),
            due_date: date(2024, 5, 8),
            checkin_date: None,
            created_at: Utc::now(),
        };
        assert_eq!(rental.status(), RentalStatus::Open);
        assert!(!rental.is_overdue(date(2024, 5, 8)));
        assert!(rental.is_overdue(date(2024, 5, 9)));

        rental.checkin_date = Some(date(2024, 5, 12));
        assert_eq!(rental.status(), RentalStatus::Closed);
        assert!(!rental.is_overdue(date(2024, 5, 20)));
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&VideoId(7)).unwrap(), "7");
        assert_eq!(CustomerId::from(3).get(), 3);
        assert_eq!(RentalId(9).to_string(), "9");
    }
}
