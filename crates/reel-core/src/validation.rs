//! # Validation Module
//!
//! Field rules for videos and customers.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP adapter                                                 │
//! │  └── Id parsing (missing / non-integer id → Not Found)                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + rental rules                                   │
//! │  ├── Presence of title / overview / name                               │
//! │  └── Counters >= 0                                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (available_inventory >= 0) etc.                             │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use chrono::NaiveDate;
//! use reel_core::validation::validate_new_video;
//! use reel_core::NewVideo;
//!
//! let video = NewVideo::new("Wonder Woman", NaiveDate::from_ymd_opt(2017, 6, 2).unwrap(), 5);
//! assert!(validate_new_video(&video).is_ok());
//! ```

use crate::error::{ValidationError, ValidationErrors};
use crate::types::{NewCustomer, NewVideo};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationErrors>;

// =============================================================================
// Field Rules
// =============================================================================

/// Returns `value` if it is `>= 0`.
///
/// ## Example
/// ```rust
/// use reel_core::validation::non_negative;
///
/// assert_eq!(non_negative("video", "available_inventory", 2), Ok(2));
/// assert!(non_negative("video", "available_inventory", -1).is_err());
/// ```
pub fn non_negative(
    record: &'static str,
    field: &'static str,
    value: i64,
) -> Result<i64, ValidationError> {
    if value < 0 {
        return Err(ValidationError::GreaterThanOrEqualTo {
            record,
            field,
            min: 0,
        });
    }
    Ok(value)
}

/// Rejects empty or whitespace-only text.
pub fn present(record: &'static str, field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { record, field });
    }
    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a video before insert.
///
/// ## Rules
/// - `title` and `overview` must not be blank
/// - `total_inventory` and `available_inventory` must be `>= 0`
/// - `available_inventory` must not exceed `total_inventory`
pub fn validate_new_video(video: &NewVideo) -> ValidationResult<()> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = present("video", "title", &video.title) {
        errors.push(e);
    }
    if let Err(e) = present("video", "overview", &video.overview) {
        errors.push(e);
    }
    if let Err(e) = non_negative("video", "total_inventory", video.total_inventory) {
        errors.push(e);
    }
    if let Err(e) = non_negative("video", "available_inventory", video.available_inventory) {
        errors.push(e);
    }
    if video.available_inventory > video.total_inventory {
        errors.push(ValidationError::LessThanOrEqualTo {
            record: "video",
            field: "available_inventory",
            max: video.total_inventory,
        });
    }

    errors.into_result(())
}

/// Validates a customer before insert.
///
/// ## Rules
/// - `name` must not be blank
/// - `videos_checked_out_count` must be `>= 0`
pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    let mut errors = ValidationErrors::new();

    if let Err(e) = present("customer", "name", &customer.name) {
        errors.push(e);
    }
    if let Err(e) = non_negative(
        "customer",
        "videos_checked_out_count",
        customer.videos_checked_out_count,
    ) {
        errors.push(e);
    }

    errors.into_result(())
}

// =============================================================================
// Unit Tests
// =============================================================================
