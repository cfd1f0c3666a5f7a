//! # Validation Module
//!
//! Input validation utilities for the fiscal engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Host service                                                 │
//! │  ├── Request shape, authentication, tenancy resolution                 │
//! │  └── Immediate caller feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Engine entry points (Rust)                                   │
//! │  └── THIS MODULE: name grammar, tenant id checks                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE (tenant_id, name)                                          │
//! │  └── Partial unique index on is_current                                │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::validation::{validate_period_name, validate_tenant_id};
//!
//! // Validate the fiscal year label before creating a period
//! assert_eq!(validate_period_name("2082/83").unwrap(), 2082);
//!
//! // Validate the tenant key before any lookup
//! validate_tenant_id("tenant-a").unwrap();
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Period Name Validator
// =============================================================================

/// Validates a fiscal year name and returns its BS start year.
///
/// ## Rules
/// - Exact shape `YYYY/YY` (e.g. `"2082/83"`)
/// - The two-digit suffix must be the following year modulo 100, so
///   `"2082/84"` is rejected and `"2099/00"` is accepted
///
/// The name is the business key of a period and the source of its document
/// number prefixes, so a malformed name is refused here rather than parsed
/// leniently.
///
/// ## Example
/// ```rust
/// use khata_core::validation::validate_period_name;
///
/// assert_eq!(validate_period_name("2082/83").unwrap(), 2082);
/// assert!(validate_period_name("2082-83").is_err());
/// assert!(validate_period_name("2082/85").is_err());
/// ```
pub fn validate_period_name(name: &str) -> ValidationResult<i32> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "name".to_string(),
        reason: reason.to_string(),
    };

    let (start, end) = name
        .split_once('/')
        .ok_or_else(|| invalid("expected YYYY/YY, e.g. 2082/83"))?;

    if start.len() != 4 || end.len() != 2 {
        return Err(invalid("expected YYYY/YY, e.g. 2082/83"));
    }

    let start_year: i32 = start
        .parse()
        .map_err(|_| invalid("start year must be numeric"))?;
    let end_year: i32 = end
        .parse()
        .map_err(|_| invalid("end year must be numeric"))?;

    if end_year != (start_year + 1) % 100 {
        return Err(invalid("end year must be the year after the start year"));
    }

    Ok(start_year)
}

// =============================================================================
// Tenant Id Validator
// =============================================================================

/// Validates a tenant identifier.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 64 characters
///
/// Tenant ids are opaque keys issued by the host service; only their shape
/// is checked here.
pub fn validate_tenant_id(tenant_id: &str) -> ValidationResult<()> {
    let tenant_id = tenant_id.trim();

    if tenant_id.is_empty() {
        return Err(ValidationError::Required {
            field: "tenant_id".to_string(),
        });
    }

    if tenant_id.len() > 64 {
        return Err(ValidationError::InvalidFormat {
            field: "tenant_id".to_string(),
            reason: "must be at most 64 characters".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_period_name() {
        // Valid names
        assert_eq!(validate_period_name("2082/83").unwrap(), 2082);
        assert_eq!(validate_period_name("2080/81").unwrap(), 2080);
        // Century rollover
        assert_eq!(validate_period_name("2099/00").unwrap(), 2099);

        // Invalid names
        assert!(validate_period_name("").is_err());
        assert!(validate_period_name("   ").is_err());
        assert!(validate_period_name("2082").is_err());
        assert!(validate_period_name("2082-83").is_err());
        assert!(validate_period_name("82/83").is_err());
        assert!(validate_period_name("2082/8").is_err());
        assert!(validate_period_name("2082/085").is_err());
        assert!(validate_period_name("abcd/ef").is_err());
        // Non-consecutive years
        assert!(validate_period_name("2082/85").is_err());
        assert!(validate_period_name("2082/82").is_err());
    }

    #[test]
    fn test_validate_tenant_id() {
        assert!(validate_tenant_id("tenant-a").is_ok());
        assert!(validate_tenant_id("550e8400-e29b-41d4-a716-446655440000").is_ok());

        assert!(validate_tenant_id("").is_err());
        assert!(validate_tenant_id("   ").is_err());
        assert!(validate_tenant_id(&"x".repeat(100)).is_err());
    }
}
