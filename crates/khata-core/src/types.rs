//! # Domain Types
//!
//! Core domain types for the fiscal engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐        ┌─────────────────────┐                │
//! │  │    FiscalPeriod     │        │    DocumentType     │                │
//! │  │  ─────────────────  │        │  ─────────────────  │                │
//! │  │  id (UUID)          │        │  Invoice   → INV    │                │
//! │  │  tenant_id          │        │  Purchase  → PUR    │                │
//! │  │  name "2082/83"     │        │  Voucher   → JV     │                │
//! │  │  AD + BS boundaries │        └─────────────────────┘                │
//! │  │  is_current         │                                               │
//! │  │  is_closed          │        One immutable prefix and one           │
//! │  │  3 prefixes         │        monotonic counter per document         │
//! │  │  3 counters         │        type, scoped to the period.            │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every period has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `(tenant_id, name)`: business key - human-readable, unique per tenant

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::PeriodSpan;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Document Type
// =============================================================================

/// An independently numbered document category.
///
/// Each fiscal period carries one counter and one prefix per document type;
/// the three sequences never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Sales invoice.
    Invoice,
    /// Purchase voucher.
    Purchase,
    /// Journal voucher.
    Voucher,
}

impl DocumentType {
    /// The short tag that leads the formatted document number.
    #[inline]
    pub const fn tag(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INV",
            DocumentType::Purchase => "PUR",
            DocumentType::Voucher => "JV",
        }
    }

    /// The counter column this type increments in the period row.
    #[inline]
    pub const fn counter_column(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "last_invoice_num",
            DocumentType::Purchase => "last_purchase_num",
            DocumentType::Voucher => "last_voucher_num",
        }
    }

    /// All document types, in numbering-column order.
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::Purchase,
        DocumentType::Voucher,
    ];
}

// =============================================================================
// Prefix Derivation
// =============================================================================

/// Strips the separators from a fiscal year name: `"2082/83"` → `"8283"`.
///
/// Assumes the canonical `YYYY/YY` shape, which `validate_period_name`
/// guarantees before any period is created.
pub fn short_year_code(name: &str) -> String {
    if name.len() >= 7 {
        format!("{}{}", &name[2..4], &name[5..7])
    } else {
        name.to_string()
    }
}

/// Derives a document number prefix from a type tag and a period name.
///
/// ## Example
/// ```rust
/// use khata_core::types::{derive_prefix, DocumentType};
///
/// assert_eq!(derive_prefix(DocumentType::Invoice, "2082/83"), "INV-8283-");
/// assert_eq!(derive_prefix(DocumentType::Voucher, "2082/83"), "JV-8283-");
/// ```
///
/// Prefixes are computed exactly once, at period creation. The period name
/// is immutable afterwards, so a stored prefix can never drift from a
/// recomputed one.
pub fn derive_prefix(doc_type: DocumentType, name: &str) -> String {
    format!("{}-{}-", doc_type.tag(), short_year_code(name))
}

/// Formats a complete document number from a prefix and a counter value.
///
/// The counter is zero-padded to four digits; values past 9999 simply grow
/// wider rather than wrapping or truncating.
///
/// ## Example
/// ```rust
/// use khata_core::types::format_number;
///
/// assert_eq!(format_number("INV-8283-", 1), "INV-8283-0001");
/// assert_eq!(format_number("INV-8283-", 12345), "INV-8283-12345");
/// ```
pub fn format_number(prefix: &str, counter: i64) -> String {
    format!("{}{:04}", prefix, counter)
}

// =============================================================================
// Fiscal Period
// =============================================================================

/// A tenant-scoped fiscal period.
///
/// The aggregate root of the engine. Boundary dates are carried in both
/// calendars; the BS dates are stored in their serialized `YYYY-MM-DD`
/// string form so tax documents render them without reconversion.
///
/// ## Lifecycle
/// ```text
/// create ──► open, not current
///                │
///                ├── set_current ──► current (revokes any other period)
///                │
///                ├── close ⇄ reopen (reversible, keeps counters)
///                │
///                └── delete (only while open and not current)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct FiscalPeriod {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Tenant this period belongs to.
    pub tenant_id: String,

    /// Fiscal year label, e.g. "2082/83". Unique per tenant, immutable.
    pub name: String,

    /// First day of the period, civil calendar (inclusive).
    pub start_date: NaiveDate,

    /// Last day of the period, civil calendar (inclusive).
    pub end_date: NaiveDate,

    /// First day in BS, serialized as "YYYY-MM-DD" (e.g. "2082-04-01").
    pub start_date_bs: String,

    /// Last day in BS, serialized as "YYYY-MM-DD" (e.g. "2083-03-31").
    pub end_date_bs: String,

    /// Whether this is the tenant's current period. At most one per tenant.
    pub is_current: bool,

    /// Closed periods reject numbering and deletion until reopened.
    pub is_closed: bool,

    /// When the period was closed.
    pub closed_at: Option<DateTime<Utc>>,

    /// Who closed the period (user id).
    pub closed_by: Option<String>,

    /// Immutable invoice number prefix, e.g. "INV-8283-".
    pub invoice_prefix: String,

    /// Immutable purchase number prefix, e.g. "PUR-8283-".
    pub purchase_prefix: String,

    /// Immutable journal voucher prefix, e.g. "JV-8283-".
    pub voucher_prefix: String,

    /// Last issued invoice counter value.
    pub last_invoice_num: i64,

    /// Last issued purchase counter value.
    pub last_purchase_num: i64,

    /// Last issued voucher counter value.
    pub last_voucher_num: i64,

    /// When the period was created.
    pub created_at: DateTime<Utc>,

    /// When the period was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FiscalPeriod {
    /// Creates a new open, not-current fiscal period.
    ///
    /// Prefixes are derived here, once, from the name; counters start at
    /// zero so the first issued number for each type is `0001`.
    pub fn new(tenant_id: &str, name: &str, span: PeriodSpan) -> Self {
        let now = Utc::now();

        FiscalPeriod {
            id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            start_date: span.start_ad,
            end_date: span.end_ad,
            start_date_bs: span.start_bs.to_string(),
            end_date_bs: span.end_bs.to_string(),
            is_current: false,
            is_closed: false,
            closed_at: None,
            closed_by: None,
            invoice_prefix: derive_prefix(DocumentType::Invoice, name),
            purchase_prefix: derive_prefix(DocumentType::Purchase, name),
            voucher_prefix: derive_prefix(DocumentType::Voucher, name),
            last_invoice_num: 0,
            last_purchase_num: 0,
            last_voucher_num: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the stored prefix for a document type.
    #[inline]
    pub fn prefix_for(&self, doc_type: DocumentType) -> &str {
        match doc_type {
            DocumentType::Invoice => &self.invoice_prefix,
            DocumentType::Purchase => &self.purchase_prefix,
            DocumentType::Voucher => &self.voucher_prefix,
        }
    }

    /// Returns the last issued counter value for a document type.
    #[inline]
    pub fn counter_for(&self, doc_type: DocumentType) -> i64 {
        match doc_type {
            DocumentType::Invoice => self.last_invoice_num,
            DocumentType::Purchase => self.last_purchase_num,
            DocumentType::Voucher => self.last_voucher_num,
        }
    }

    /// Checks that the period accepts mutations (numbering, set-current).
    pub fn ensure_open(&self) -> CoreResult<()> {
        if self.is_closed {
            return Err(CoreError::PeriodClosed {
                period_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Checks the deletion guards: a period that is current or closed may
    /// not be permanently destroyed.
    pub fn ensure_deletable(&self) -> CoreResult<()> {
        if self.is_current {
            return Err(CoreError::CannotDeleteCurrent {
                period_id: self.id.clone(),
            });
        }
        if self.is_closed {
            return Err(CoreError::CannotDeleteClosed {
                period_id: self.id.clone(),
            });
        }
        Ok(())
    }

    /// Closes the period, stamping the closer's identity and the close time.
    ///
    /// ## Errors
    /// `AlreadyClosed` if the period is already closed.
    pub fn close(&mut self, closed_by: &str) -> CoreResult<()> {
        if self.is_closed {
            return Err(CoreError::AlreadyClosed {
                period_id: self.id.clone(),
            });
        }
        let now = Utc::now();
        self.is_closed = true;
        self.closed_at = Some(now);
        self.closed_by = Some(closed_by.to_string());
        self.updated_at = now;
        Ok(())
    }

    /// Reopens a closed period, clearing the close markers.
    ///
    /// Counter values are untouched: numbering resumes where it stopped.
    ///
    /// ## Errors
    /// `NotClosed` if the period is not closed.
    pub fn reopen(&mut self) -> CoreResult<()> {
        if !self.is_closed {
            return Err(CoreError::NotClosed {
                period_id: self.id.clone(),
            });
        }
        self.is_closed = false;
        self.closed_at = None;
        self.closed_by = None;
        self.updated_at = Utc::now();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::BsCalendar;

    fn sample_period() -> FiscalPeriod {
        let span = BsCalendar::seeded().fiscal_year_span(2082).unwrap();
        FiscalPeriod::new("tenant-a", "2082/83", span)
    }

    #[test]
    fn test_short_year_code() {
        assert_eq!(short_year_code("2082/83"), "8283");
        assert_eq!(short_year_code("2099/00"), "9900");
    }

    #[test]
    fn test_derive_prefix() {
        assert_eq!(derive_prefix(DocumentType::Invoice, "2082/83"), "INV-8283-");
        assert_eq!(derive_prefix(DocumentType::Purchase, "2082/83"), "PUR-8283-");
        assert_eq!(derive_prefix(DocumentType::Voucher, "2082/83"), "JV-8283-");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number("INV-8283-", 1), "INV-8283-0001");
        assert_eq!(format_number("INV-8283-", 42), "INV-8283-0042");
        assert_eq!(format_number("INV-8283-", 9999), "INV-8283-9999");
        assert_eq!(format_number("INV-8283-", 10000), "INV-8283-10000");
    }

    #[test]
    fn test_new_period_defaults() {
        let period = sample_period();

        assert_eq!(period.name, "2082/83");
        assert_eq!(period.start_date_bs, "2082-04-01");
        assert_eq!(period.end_date_bs, "2083-03-31");
        assert!(!period.is_current);
        assert!(!period.is_closed);
        assert_eq!(period.invoice_prefix, "INV-8283-");
        assert_eq!(period.purchase_prefix, "PUR-8283-");
        assert_eq!(period.voucher_prefix, "JV-8283-");
        for doc_type in DocumentType::ALL {
            assert_eq!(period.counter_for(doc_type), 0);
        }
    }

    #[test]
    fn test_close_and_reopen() {
        let mut period = sample_period();

        period.close("user-x").unwrap();
        assert!(period.is_closed);
        assert!(period.closed_at.is_some());
        assert_eq!(period.closed_by.as_deref(), Some("user-x"));

        // Closing twice is an error
        assert!(matches!(
            period.close("user-y").unwrap_err(),
            CoreError::AlreadyClosed { .. }
        ));

        period.reopen().unwrap();
        assert!(!period.is_closed);
        assert!(period.closed_at.is_none());
        assert!(period.closed_by.is_none());

        // Reopening an open period is an error
        assert!(matches!(
            period.reopen().unwrap_err(),
            CoreError::NotClosed { .. }
        ));
    }

    #[test]
    fn test_ensure_open() {
        let mut period = sample_period();
        assert!(period.ensure_open().is_ok());

        period.close("user-x").unwrap();
        assert!(matches!(
            period.ensure_open().unwrap_err(),
            CoreError::PeriodClosed { .. }
        ));
    }

    #[test]
    fn test_delete_guards() {
        let mut period = sample_period();
        assert!(period.ensure_deletable().is_ok());

        period.is_current = true;
        assert!(matches!(
            period.ensure_deletable().unwrap_err(),
            CoreError::CannotDeleteCurrent { .. }
        ));

        period.is_current = false;
        period.close("user-x").unwrap();
        assert!(matches!(
            period.ensure_deletable().unwrap_err(),
            CoreError::CannotDeleteClosed { .. }
        ));
    }

    #[test]
    fn test_reopen_preserves_counters() {
        let mut period = sample_period();
        period.last_invoice_num = 7;

        period.close("user-x").unwrap();
        period.reopen().unwrap();

        assert_eq!(period.counter_for(DocumentType::Invoice), 7);
    }
}
