//! # Period Engine
//!
//! The fiscal period lifecycle manager and the sequential document
//! numbering service, as one facade over the persistence port.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Operation Shape                             │
//! │                                                                         │
//! │  1. VALIDATE INPUT                                                     │
//! │     └── name grammar, tenant id shape (khata-core::validation)         │
//! │                                                                         │
//! │  2. PURE TRANSITION                                                    │
//! │     └── close()/reopen()/ensure_deletable() on the loaded aggregate    │
//! │                                                                         │
//! │  3. ONE PORT CALL                                                      │
//! │     └── wrapped in a deadline; the store applies the write as a        │
//! │         single transaction with the guard folded in                    │
//! │                                                                         │
//! │  NO RETRIES: a timed-out write may have committed. Only the host       │
//! │  can verify and decide - blind retry of an increment would issue       │
//! │  a duplicate document number.                                          │
//! │                                                                         │
//! │  NO CACHING: counter values are never kept in-process between          │
//! │  calls; every number comes from the store's own read-modify-write.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::future::Future;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info};

use khata_core::calendar::BsCalendar;
use khata_core::error::CoreError;
use khata_core::types::{format_number, DocumentType, FiscalPeriod};
use khata_core::validation::{validate_period_name, validate_tenant_id};

use crate::error::{EngineError, EngineResult};
use crate::store::{PeriodStore, StoreError};

// =============================================================================
// Configuration
// =============================================================================

/// Engine configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = EngineConfig::new().port_timeout(Duration::from_secs(2));
/// let engine = PeriodEngine::with_config(store, calendar, config);
/// ```
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Deadline applied to every persistence port call.
    /// Default: 5 seconds
    pub port_timeout: Duration,
}

impl EngineConfig {
    /// Creates a configuration with the defaults.
    pub fn new() -> Self {
        EngineConfig {
            port_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the per-call port deadline.
    pub fn port_timeout(mut self, timeout: Duration) -> Self {
        self.port_timeout = timeout;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Period Engine
// =============================================================================

/// Lifecycle manager and numbering service over a [`PeriodStore`].
///
/// The engine holds no mutable state of its own - just the store handle,
/// an immutable calendar table, and the config - so one instance can be
/// shared freely across the host's request-handling workers.
#[derive(Debug)]
pub struct PeriodEngine<S: PeriodStore> {
    store: S,
    calendar: BsCalendar,
    config: EngineConfig,
}

impl<S: PeriodStore> PeriodEngine<S> {
    /// Creates an engine with the default configuration.
    pub fn new(store: S, calendar: BsCalendar) -> Self {
        Self::with_config(store, calendar, EngineConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(store: S, calendar: BsCalendar, config: EngineConfig) -> Self {
        PeriodEngine {
            store,
            calendar,
            config,
        }
    }

    /// The calendar table this engine converts with.
    pub fn calendar(&self) -> &BsCalendar {
        &self.calendar
    }

    // =========================================================================
    // Lifecycle Manager
    // =========================================================================

    /// Creates a fiscal period from its name alone.
    ///
    /// Both calendars are derived from the name: BS start is Shrawan 1 of
    /// the named year, BS end is the true last day of Ashad of the next
    /// year, read from the month-length table.
    ///
    /// ## Errors
    /// - `Core(Validation)` for a malformed name or tenant id
    /// - `Core(CalendarOutOfRange)` when the named year is not seeded
    /// - `DuplicatePeriodName` when the tenant already has this name
    pub async fn create_period(&self, tenant_id: &str, name: &str) -> EngineResult<FiscalPeriod> {
        validate_tenant_id(tenant_id).map_err(CoreError::from)?;
        let start_year = validate_period_name(name).map_err(CoreError::from)?;

        let span = self.calendar.fiscal_year_span(start_year)?;
        self.insert(FiscalPeriod::new(tenant_id, name.trim(), span))
            .await
    }

    /// Creates a fiscal period from explicit civil boundary dates.
    ///
    /// The BS boundaries are derived by converting the supplied dates, so
    /// both must fall inside the seeded table.
    pub async fn create_period_with_dates(
        &self,
        tenant_id: &str,
        name: &str,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
    ) -> EngineResult<FiscalPeriod> {
        validate_tenant_id(tenant_id).map_err(CoreError::from)?;
        validate_period_name(name).map_err(CoreError::from)?;

        let span = self.calendar.span_from_civil(start_date, end_date)?;
        self.insert(FiscalPeriod::new(tenant_id, name.trim(), span))
            .await
    }

    async fn insert(&self, period: FiscalPeriod) -> EngineResult<FiscalPeriod> {
        info!(
            id = %period.id,
            tenant_id = %period.tenant_id,
            name = %period.name,
            start = %period.start_date,
            end = %period.end_date,
            "Creating fiscal period"
        );

        self.port_call("insert_period", self.store.insert_period(&period))
            .await?
            .map_err(|err| match err {
                StoreError::DuplicateName => EngineError::DuplicatePeriodName {
                    tenant_id: period.tenant_id.clone(),
                    name: period.name.clone(),
                },
                other => store_failure("insert_period", other),
            })?;

        Ok(period)
    }

    /// Loads a period by id.
    pub async fn get_period(&self, period_id: &str) -> EngineResult<FiscalPeriod> {
        self.port_call("load_period", self.store.load_period(period_id))
            .await?
            .map_err(|err| match err {
                StoreError::NotFound => EngineError::PeriodNotFound {
                    period_id: period_id.to_string(),
                },
                other => store_failure("load_period", other),
            })
    }

    /// Loads the tenant's current period.
    pub async fn get_current_period(&self, tenant_id: &str) -> EngineResult<FiscalPeriod> {
        validate_tenant_id(tenant_id).map_err(CoreError::from)?;

        self.port_call(
            "load_current_period",
            self.store.load_current_period(tenant_id),
        )
        .await?
        .map_err(|err| match err {
            StoreError::NotFound => EngineError::NoCurrentPeriod {
                tenant_id: tenant_id.to_string(),
            },
            other => store_failure("load_current_period", other),
        })
    }

    /// Loads a period by its business key `(tenant_id, name)`.
    pub async fn find_period_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> EngineResult<FiscalPeriod> {
        validate_tenant_id(tenant_id).map_err(CoreError::from)?;

        self.port_call(
            "load_period_by_name",
            self.store.load_period_by_name(tenant_id, name),
        )
        .await?
        .map_err(|err| match err {
            StoreError::NotFound => EngineError::PeriodNotFound {
                period_id: format!("{}:{}", tenant_id, name),
            },
            other => store_failure("load_period_by_name", other),
        })
    }

    /// Lists all of a tenant's periods, newest first.
    pub async fn list_periods(&self, tenant_id: &str) -> EngineResult<Vec<FiscalPeriod>> {
        validate_tenant_id(tenant_id).map_err(CoreError::from)?;

        self.port_call("list_periods", self.store.list_periods(tenant_id))
            .await?
            .map_err(|err| store_failure("list_periods", err))
    }

    /// Makes `period_id` the tenant's only current period.
    ///
    /// The clear-and-set runs as ONE transaction at the store, so at no
    /// committed instant are two periods simultaneously current. Under
    /// concurrent invocation the last committed writer wins.
    ///
    /// ## Errors
    /// `Core(PeriodClosed)` when the target is closed - a closed period
    /// may not be made current until reopened.
    pub async fn set_current(&self, tenant_id: &str, period_id: &str) -> EngineResult<()> {
        validate_tenant_id(tenant_id).map_err(CoreError::from)?;

        info!(tenant_id = %tenant_id, period_id = %period_id, "Setting current fiscal period");

        self.port_call("set_current", self.store.set_current(tenant_id, period_id))
            .await?
            .map_err(|err| match err {
                StoreError::NotFound => EngineError::PeriodNotFound {
                    period_id: period_id.to_string(),
                },
                other => store_failure("set_current", other),
            })
    }

    /// Closes a period, stamping who closed it and when.
    ///
    /// ## Errors
    /// `Core(AlreadyClosed)` if the period is already closed.
    pub async fn close_period(&self, period_id: &str, closed_by: &str) -> EngineResult<()> {
        let mut period = self.get_period(period_id).await?;
        period.close(closed_by)?;

        info!(period_id = %period_id, closed_by = %closed_by, "Closing fiscal period");

        self.write_lifecycle_flags(&period).await
    }

    /// Reopens a closed period. Counters keep their values, so numbering
    /// resumes where it stopped.
    ///
    /// ## Errors
    /// `Core(NotClosed)` if the period is not closed.
    pub async fn reopen_period(&self, period_id: &str) -> EngineResult<()> {
        let mut period = self.get_period(period_id).await?;
        period.reopen()?;

        info!(period_id = %period_id, "Reopening fiscal period");

        self.write_lifecycle_flags(&period).await
    }

    async fn write_lifecycle_flags(&self, period: &FiscalPeriod) -> EngineResult<()> {
        self.port_call(
            "update_lifecycle_flags",
            self.store.update_lifecycle_flags(
                &period.id,
                period.is_closed,
                period.closed_at,
                period.closed_by.as_deref(),
            ),
        )
        .await?
        .map_err(|err| match err {
            StoreError::NotFound => EngineError::PeriodNotFound {
                period_id: period.id.clone(),
            },
            other => store_failure("update_lifecycle_flags", other),
        })
    }

    /// Permanently removes a period.
    ///
    /// The open/not-current guards are checked on the loaded aggregate for
    /// a precise error, and enforced again inside the store's delete
    /// transaction so a concurrent close or set-current cannot slip past.
    pub async fn delete_period(&self, period_id: &str) -> EngineResult<()> {
        let period = self.get_period(period_id).await?;
        period.ensure_deletable()?;

        info!(period_id = %period_id, name = %period.name, "Deleting fiscal period");

        self.port_call("delete_period", self.store.delete_period(period_id))
            .await?
            .map_err(|err| match err {
                StoreError::NotFound => EngineError::PeriodNotFound {
                    period_id: period_id.to_string(),
                },
                other => store_failure("delete_period", other),
            })
    }

    // =========================================================================
    // Numbering Service
    // =========================================================================

    /// Issues the next document number for a period and document type.
    ///
    /// The counter increment is a single atomic read-modify-write at the
    /// store; concurrent callers each receive a distinct, consecutive
    /// value. Once issued a number is consumed forever, even if the caller
    /// crashes before using it - gaps can come only from crash-after-commit,
    /// never from contention, and voided documents keep their numbers.
    ///
    /// ## Errors
    /// `Core(PeriodClosed)` when the period is closed; the counter is left
    /// unchanged.
    pub async fn next_document_number(
        &self,
        period_id: &str,
        doc_type: DocumentType,
    ) -> EngineResult<String> {
        let period = self.get_period(period_id).await?;
        // Early gate for a precise error; the store re-checks inside the
        // increment transaction, so a concurrent close cannot race a
        // number out of a closed period.
        period.ensure_open()?;

        let next = self
            .port_call(
                "increment_counter",
                self.store.increment_counter(period_id, doc_type),
            )
            .await?
            .map_err(|err| match err {
                StoreError::NotFound => EngineError::PeriodNotFound {
                    period_id: period_id.to_string(),
                },
                other => store_failure("increment_counter", other),
            })?;

        let number = format_number(period.prefix_for(doc_type), next);
        debug!(period_id = %period_id, doc_type = ?doc_type, number = %number, "Issued document number");
        Ok(number)
    }

    /// Issues the next sales invoice number, e.g. `INV-8283-0001`.
    pub async fn next_invoice_number(&self, period_id: &str) -> EngineResult<String> {
        self.next_document_number(period_id, DocumentType::Invoice)
            .await
    }

    /// Issues the next purchase voucher number, e.g. `PUR-8283-0001`.
    pub async fn next_purchase_number(&self, period_id: &str) -> EngineResult<String> {
        self.next_document_number(period_id, DocumentType::Purchase)
            .await
    }

    /// Issues the next journal voucher number, e.g. `JV-8283-0001`.
    pub async fn next_voucher_number(&self, period_id: &str) -> EngineResult<String> {
        self.next_document_number(period_id, DocumentType::Voucher)
            .await
    }

    // =========================================================================
    // Port Plumbing
    // =========================================================================

    /// Runs one port call under the configured deadline.
    ///
    /// Elapsing surfaces [`EngineError::PersistenceTimeout`] and nothing
    /// else happens: the engine does not know whether the store committed,
    /// so it must not retry.
    async fn port_call<T, F>(
        &self,
        operation: &'static str,
        fut: F,
    ) -> EngineResult<Result<T, StoreError>>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        timeout(self.config.port_timeout, fut)
            .await
            .map_err(|_| EngineError::PersistenceTimeout {
                operation,
                timeout_ms: self.config.port_timeout.as_millis() as u64,
            })
    }
}

/// Maps the store errors no call site claims specially.
fn store_failure(operation: &'static str, err: StoreError) -> EngineError {
    match err {
        StoreError::Closed { period_id } => CoreError::PeriodClosed { period_id }.into(),
        StoreError::Current { period_id } => CoreError::CannotDeleteCurrent { period_id }.into(),
        StoreError::Conflict { .. } => EngineError::PersistenceConflict { operation },
        other => EngineError::StoreFailure {
            operation,
            message: other.to_string(),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
