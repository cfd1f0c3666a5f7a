//! # Error Types
//!
//! Domain-specific error types for khata-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  khata-core errors (this file)                                         │
//! │  ├── CoreError        - Calendar range + period state machine          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  khata-engine errors (separate crate)                                  │
//! │  └── EngineError      - Store lookups, timeouts, conflicts             │
//! │                                                                         │
//! │  khata-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → host service        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (period ID, year, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message without string parsing

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent calendar range violations or fiscal period state
/// machine violations. They should be caught and translated to user-friendly
/// messages by the host service.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A Bikram Sambat year fell outside the seeded month-length table.
    ///
    /// ## When This Occurs
    /// - Converting a civil date before the anchor or past the last table year
    /// - Creating a fiscal period whose name references an unseeded year
    ///
    /// The conversion tables are finite by design. Falling back to an
    /// assumed month length would silently produce wrong dates on official
    /// tax documents, so every table miss is a hard error until the table
    /// is extended.
    #[error("BS year {year} is outside the seeded calendar table ({min_year}..={max_year})")]
    CalendarOutOfRange {
        year: i32,
        min_year: i32,
        max_year: i32,
    },

    /// `close` was called on a period that is already closed.
    #[error("fiscal period {period_id} is already closed")]
    AlreadyClosed { period_id: String },

    /// `reopen` was called on a period that is not closed.
    #[error("fiscal period {period_id} is not closed")]
    NotClosed { period_id: String },

    /// `delete` was called on the tenant's current period.
    #[error("fiscal period {period_id} is current and cannot be deleted")]
    CannotDeleteCurrent { period_id: String },

    /// `delete` was called on a closed period.
    ///
    /// Closed periods are part of the tenant's audit trail. They must be
    /// reopened before they can be removed.
    #[error("fiscal period {period_id} is closed and cannot be deleted")]
    CannotDeleteClosed { period_id: String },

    /// A mutating operation (document numbering, set-current) was attempted
    /// against a closed period.
    ///
    /// ## When This Occurs
    /// - `next_document_number` on a closed period (counter stays unchanged)
    /// - `set_current` targeting a closed period
    #[error("fiscal period {period_id} is closed")]
    PeriodClosed { period_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g., invalid UUID, malformed period name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A Bikram Sambat date string or component is invalid.
    #[error("invalid BS date '{date}': {reason}")]
    InvalidDate { date: String, reason: String },

    /// A period's end date does not fall strictly after its start date.
    #[error("end date {end} must be after start date {start}")]
    EndBeforeStart { start: String, end: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::CalendarOutOfRange {
            year: 2095,
            min_year: 2080,
            max_year: 2090,
        };
        assert_eq!(
            err.to_string(),
            "BS year 2095 is outside the seeded calendar table (2080..=2090)"
        );

        let err = CoreError::PeriodClosed {
            period_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "fiscal period abc is closed");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::InvalidDate {
            date: "2082-13-01".to_string(),
            reason: "month must be 1..=12".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid BS date '2082-13-01': month must be 1..=12"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
