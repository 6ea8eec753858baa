//! # Error Types
//!
//! Domain-specific error types for reel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  reel-core errors (this file)                                          │
//! │  ├── RentalError       - What RentalService returns                    │
//! │  │   ├── NotFound      - customer / video / open rental missing        │
//! │  │   ├── Validation    - counter or field rule violated                │
//! │  │   └── Store         - the injected store failed                     │
//! │  ├── ValidationError   - One field-scoped rule violation               │
//! │  ├── ValidationErrors  - All violations for one operation              │
//! │  └── StoreError        - Store port failures (conflict, backend)       │
//! │                                                                         │
//! │  reel-db errors (separate crate)                                       │
//! │  └── DbError           - Database operation failures → StoreError      │
//! │                                                                         │
//! │  rental-api errors (in app)                                            │
//! │  └── ApiError          - HTTP status + JSON body                       │
//! │                                                                         │
//! │  Flow: ValidationError → RentalError → ApiError → HTTP response        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Field-Scoped Messages
//! Validation messages are keyed by record and field so the adapter can
//! render them as a nested map:
//! ```json
//! { "video": { "available_inventory": ["must be greater than or equal to 0"] } }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single rule violation on one field of one record.
///
/// `record` is the snake_case record name (`"video"`, `"customer"`),
/// `field` the column the rule applies to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Numeric value fell below its lower bound.
    #[error("{record}.{field}: must be greater than or equal to {min}")]
    GreaterThanOrEqualTo {
        record: &'static str,
        field: &'static str,
        min: i64,
    },

    /// Numeric value rose above its upper bound.
    #[error("{record}.{field}: must be less than or equal to {max}")]
    LessThanOrEqualTo {
        record: &'static str,
        field: &'static str,
        max: i64,
    },

    /// A required text field is missing or whitespace.
    #[error("{record}.{field}: can't be blank")]
    Blank {
        record: &'static str,
        field: &'static str,
    },
}

impl ValidationError {
    /// Record the violation belongs to.
    pub fn record(&self) -> &'static str {
        match self {
            ValidationError::GreaterThanOrEqualTo { record, .. }
            | ValidationError::LessThanOrEqualTo { record, .. }
            | ValidationError::Blank { record, .. } => record,
        }
    }

    /// Field the violation belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::GreaterThanOrEqualTo { field, .. }
            | ValidationError::LessThanOrEqualTo { field, .. }
            | ValidationError::Blank { field, .. } => field,
        }
    }

    /// The message without the `record.field:` prefix.
    pub fn message(&self) -> String {
        match self {
            ValidationError::GreaterThanOrEqualTo { min, .. } => {
                format!("must be greater than or equal to {min}")
            }
            ValidationError::LessThanOrEqualTo { max, .. } => {
                format!("must be less than or equal to {max}")
            }
            ValidationError::Blank { .. } => "can't be blank".to_string(),
        }
    }
}

// =============================================================================
// Validation Errors (collection)
// =============================================================================

/// Every violation found while validating one operation.
///
/// Serializes as `{ record: { field: [message, ...] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        ValidationErrors(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns `Ok(value)` when nothing was recorded, `Err(self)` otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Groups messages by record, then by field.
    pub fn field_messages(&self) -> BTreeMap<&'static str, BTreeMap<&'static str, Vec<String>>> {
        let mut map: BTreeMap<&'static str, BTreeMap<&'static str, Vec<String>>> = BTreeMap::new();
        for error in &self.0 {
            map.entry(error.record())
                .or_default()
                .entry(error.field())
                .or_default()
                .push(error.message());
        }
        map
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        ValidationErrors(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.field_messages().serialize(serializer)
    }
}

// =============================================================================
// Store Error
// =============================================================================

/// Failures reported by a [`RentalStore`](crate::store::RentalStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The row changed between read and write inside the transaction.
    #[error("{entity} {id} was modified concurrently")]
    Conflict { entity: &'static str, id: i64 },

    /// A row the transaction expected to update is gone.
    #[error("{entity} disappeared during update: {id}")]
    Missing { entity: &'static str, id: i64 },

    /// The backend could not be reached (pool closed, exhausted, ...).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(String),
}

// =============================================================================
// Rental Error
// =============================================================================

/// Errors returned by [`RentalService`](crate::service::RentalService).
#[derive(Debug, Error)]
pub enum RentalError {
    /// A referenced id does not resolve to a record.
    ///
    /// ## When This Occurs
    /// - Unknown customer id or video id (check-out and check-in)
    /// - Check-in of a video the customer has no open rental for
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A counter or field rule was violated; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The store failed; the transaction was not committed.
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),
}

impl RentalError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        RentalError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<ValidationError> for RentalError {
    fn from(error: ValidationError) -> Self {
        RentalError::Validation(error.into())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with RentalError.
pub type RentalResult<T> = Result<T, RentalError>;

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn exhausted() -> ValidationError {
        ValidationError::GreaterThanOrEqualTo {
            record: "video",
            field: "available_inventory",
            min: 0,
        }
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            exhausted().to_string(),
            "video.available_inventory: must be greater than or equal to 0"
        );
        assert_eq!(exhausted().message(), "must be greater than or equal to 0");

        let blank = ValidationError::Blank {
            record: "video",
            field: "title",
        };
        assert_eq!(blank.to_string(), "video.title: can't be blank");
    }

    #[test]
    fn test_field_messages_grouping() {
        let mut errors = ValidationErrors::new();
        errors.push(exhausted());
        errors.push(ValidationError::Blank {
            record: "video",
            field: "title",
        });
        errors.push(ValidationError::GreaterThanOrEqualTo {
            record: "customer",
            field: "videos_checked_out_count",
            min: 0,
        });

        let map = errors.field_messages();
        assert_eq!(map.len(), 2);
        assert_eq!(map["video"].len(), 2);
        assert_eq!(
            map["customer"]["videos_checked_out_count"],
            vec!["must be greater than or equal to 0".to_string()]
        );
    }

    #[test]
    fn test_validation_errors_serialize_as_nested_map() {
        let errors: ValidationErrors = exhausted().into();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "video": { "available_inventory": ["must be greater than or equal to 0"] }
            })
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(5).unwrap(), 5);
        let errors: ValidationErrors = exhausted().into();
        assert!(errors.into_result(5).is_err());
    }

    #[test]
    fn test_validation_converts_to_rental_error() {
        let err: RentalError = exhausted().into();
        assert!(matches!(err, RentalError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Validation failed: video.available_inventory: must be greater than or equal to 0"
        );
    }

    #[test]
    fn test_not_found_message() {
        let err = RentalError::not_found("Customer", 42);
        assert_eq!(err.to_string(), "Customer not found: 42");
    }
}
