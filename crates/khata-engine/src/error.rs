//! # Engine Error Types
//!
//! Error types for the lifecycle and numbering services.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Engine Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │     Domain      │  │     Lookup      │  │     Persistence         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Core(..)       │  │  PeriodNotFound │  │  PersistenceTimeout     │ │
//! │  │  (calendar,     │  │  NoCurrentPeriod│  │  PersistenceConflict    │ │
//! │  │   state machine,│  │  DuplicateName  │  │  StoreFailure           │ │
//! │  │   validation)   │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use khata_core::CoreError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine error type covering lifecycle and numbering failures.
///
/// ## Design Principles
/// - Each variant carries the offending identifiers, so the host can
///   translate to user-facing messages without string parsing
/// - Persistence failures are split three ways because they demand
///   different host reactions: a conflict is safe to retry whole, a
///   timeout is NOT (the write may have committed), a backend failure
///   is for the operator
#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// A core domain rule was violated (calendar range, state machine,
    /// input validation).
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// No fiscal period exists with the given id.
    #[error("fiscal period {period_id} not found")]
    PeriodNotFound { period_id: String },

    /// The tenant has no current fiscal period.
    #[error("tenant {tenant_id} has no current fiscal period")]
    NoCurrentPeriod { tenant_id: String },

    /// The tenant already has a fiscal period with this name.
    #[error("fiscal period '{name}' already exists for tenant {tenant_id}")]
    DuplicatePeriodName { tenant_id: String, name: String },

    // =========================================================================
    // Persistence Errors
    // =========================================================================
    /// A port call did not complete within the configured deadline.
    ///
    /// The engine does not retry: the write may have committed at the
    /// store after the deadline elapsed, and a blind retry of a counter
    /// increment would issue a duplicate number. Only the host can verify
    /// the outcome and decide.
    #[error("{operation} timed out after {timeout_ms}ms (the write may still have committed)")]
    PersistenceTimeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    /// The store reported a transient conflict.
    ///
    /// Safe to retry the WHOLE engine operation from scratch; never safe
    /// to retry only part of it.
    #[error("{operation} hit a transient store conflict")]
    PersistenceConflict { operation: &'static str },

    /// The store failed in a way the engine cannot classify.
    #[error("{operation} failed at the store: {message}")]
    StoreFailure {
        operation: &'static str,
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_identifiers() {
        let err = EngineError::DuplicatePeriodName {
            tenant_id: "tenant-a".into(),
            name: "2082/83".into(),
        };
        assert!(err.to_string().contains("tenant-a"));
        assert!(err.to_string().contains("2082/83"));

        let err = EngineError::PersistenceTimeout {
            operation: "increment_counter",
            timeout_ms: 5000,
        };
        assert!(err.to_string().contains("increment_counter"));
        assert!(err.to_string().contains("5000"));
    }

    #[test]
    fn test_core_error_converts_transparently() {
        let core = CoreError::PeriodClosed {
            period_id: "abc".into(),
        };
        let err: EngineError = core.into();
        assert_eq!(err.to_string(), "fiscal period abc is closed");
    }
}
