//! # Persistence Port
//!
//! The transactional counter store the engine depends on but does not
//! implement.
//!
//! ## Port Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       PeriodStore Contract                              │
//! │                                                                         │
//! │  Reads (no locking required)                                           │
//! │  ├── load_period(period_id)                                            │
//! │  ├── load_current_period(tenant_id)                                    │
//! │  ├── load_period_by_name(tenant_id, name)                              │
//! │  └── list_periods(tenant_id)                                           │
//! │                                                                         │
//! │  Writes (each is ONE atomic transaction at the store)                  │
//! │  ├── insert_period(period)          unique (tenant_id, name)           │
//! │  ├── set_current(tenant, period)    clears all, sets one, same txn     │
//! │  ├── increment_counter(period, ty)  single read-modify-write,          │
//! │  │                                  refuses closed periods             │
//! │  ├── update_lifecycle_flags(..)     close / reopen markers             │
//! │  └── delete_period(period_id)       refuses current or closed rows     │
//! │                                                                         │
//! │  Partial application must NEVER be observable: an implementation       │
//! │  that revokes the old current flag but fails to set the new one        │
//! │  violates this contract.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Implementations: [`crate::memory::MemoryPeriodStore`] (reference,
//! in-process) and `khata_db::PeriodRepository` (SQLite).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use khata_core::{DocumentType, FiscalPeriod};

// =============================================================================
// Store Error
// =============================================================================

/// Failures a port implementation may surface.
///
/// The port stays thin: `NotFound` carries no key because the engine knows
/// which key it asked for and attaches the context itself. Guard refusals
/// (`Closed`, `Current`) DO carry the period id, since the store decides
/// them inside its own transaction.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row matched the lookup key.
    #[error("no fiscal period matched the lookup")]
    NotFound,

    /// Inserting would violate the unique `(tenant_id, name)` constraint.
    #[error("a fiscal period with that name already exists for the tenant")]
    DuplicateName,

    /// A guarded write refused a closed period.
    #[error("fiscal period {period_id} is closed")]
    Closed { period_id: String },

    /// A guarded delete refused the tenant's current period.
    #[error("fiscal period {period_id} is current")]
    Current { period_id: String },

    /// A transient conflict (lock contention, busy database). The whole
    /// operation may be retried from scratch by the host.
    #[error("transient store conflict: {message}")]
    Conflict { message: String },

    /// An unclassified backend failure.
    #[error("store backend failure: {message}")]
    Backend { message: String },
}

// =============================================================================
// PeriodStore Trait
// =============================================================================

/// The persistence port consumed by [`crate::service::PeriodEngine`].
///
/// ## Atomicity Requirements
/// - [`increment_counter`](PeriodStore::increment_counter) must be a single
///   linearizable read-modify-write: concurrent callers on one counter each
///   receive a distinct, consecutive value, none skipped or reused
/// - [`set_current`](PeriodStore::set_current) must clear and set the
///   current flags of one tenant in a single transaction, so no committed
///   instant shows two current periods (or none, when one existed before)
/// - Guard checks (closed, current) must happen INSIDE the same transaction
///   as the write they protect, never check-then-act
#[async_trait]
pub trait PeriodStore: Send + Sync {
    /// Loads a period by id.
    async fn load_period(&self, period_id: &str) -> Result<FiscalPeriod, StoreError>;

    /// Loads the tenant's current period.
    async fn load_current_period(&self, tenant_id: &str) -> Result<FiscalPeriod, StoreError>;

    /// Loads a period by its business key `(tenant_id, name)`.
    async fn load_period_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> Result<FiscalPeriod, StoreError>;

    /// Lists all of a tenant's periods, newest first.
    async fn list_periods(&self, tenant_id: &str) -> Result<Vec<FiscalPeriod>, StoreError>;

    /// Inserts a freshly created period.
    ///
    /// Surfaces a `(tenant_id, name)` uniqueness violation as
    /// [`StoreError::DuplicateName`].
    async fn insert_period(&self, period: &FiscalPeriod) -> Result<(), StoreError>;

    /// Makes `period_id` the tenant's only current period, in one
    /// transaction. Refuses closed targets with [`StoreError::Closed`].
    async fn set_current(&self, tenant_id: &str, period_id: &str) -> Result<(), StoreError>;

    /// Atomically increments one counter and returns the post-increment
    /// value. Refuses closed periods with [`StoreError::Closed`], leaving
    /// the counter untouched.
    async fn increment_counter(
        &self,
        period_id: &str,
        doc_type: DocumentType,
    ) -> Result<i64, StoreError>;

    /// Writes the close/reopen markers.
    async fn update_lifecycle_flags(
        &self,
        period_id: &str,
        closed: bool,
        closed_at: Option<DateTime<Utc>>,
        closed_by: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Permanently removes a period. Refuses current rows with
    /// [`StoreError::Current`] and closed rows with [`StoreError::Closed`],
    /// atomically with the delete itself.
    async fn delete_period(&self, period_id: &str) -> Result<(), StoreError>;
}
