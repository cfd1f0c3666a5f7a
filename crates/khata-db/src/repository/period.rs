//! # Fiscal Period Repository
//!
//! SQLite implementation of the engine's persistence port.
//!
//! ## Guarded Writes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 How the Guards Stay Race-Free                           │
//! │                                                                         │
//! │  Every guard is folded into the write statement itself:                │
//! │                                                                         │
//! │  increment:  UPDATE ... SET n = n + 1                                  │
//! │              WHERE id = ? AND is_closed = 0                            │
//! │              RETURNING n                                               │
//! │                                                                         │
//! │  delete:     DELETE ... WHERE id = ?                                   │
//! │              AND is_current = 0 AND is_closed = 0                      │
//! │                                                                         │
//! │  set_current: one transaction - clear flags, set target               │
//! │               (target guarded by is_closed = 0; a miss rolls back,    │
//! │                leaving the previous current flag untouched)           │
//! │                                                                         │
//! │  A statement that matches no row changed nothing; only THEN do we     │
//! │  look at the row again to name which guard fired. The precision of    │
//! │  the error is advisory - the guard itself already held atomically.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbError;
use khata_core::{DocumentType, FiscalPeriod};
use khata_engine::{PeriodStore, StoreError};

/// The full column list, shared by every period SELECT.
const SELECT_PERIOD: &str = "\
    SELECT id, tenant_id, name, start_date, end_date, start_date_bs, end_date_bs, \
           is_current, is_closed, closed_at, closed_by, \
           invoice_prefix, purchase_prefix, voucher_prefix, \
           last_invoice_num, last_purchase_num, last_voucher_num, \
           created_at, updated_at \
    FROM fiscal_periods";

/// Repository for fiscal period database operations.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    pool: SqlitePool,
}

impl PeriodRepository {
    /// Creates a new PeriodRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PeriodRepository { pool }
    }

    /// Reads a row's (is_current, is_closed) flags, if the row exists.
    ///
    /// Used only to name which guard made a write statement miss.
    async fn load_flags(&self, period_id: &str) -> Result<Option<(bool, bool)>, StoreError> {
        let flags: Option<(bool, bool)> =
            sqlx::query_as("SELECT is_current, is_closed FROM fiscal_periods WHERE id = ?1")
                .bind(period_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DbError::from)?;
        Ok(flags)
    }
}

#[async_trait]
impl PeriodStore for PeriodRepository {
    async fn load_period(&self, period_id: &str) -> Result<FiscalPeriod, StoreError> {
        let sql = format!("{} WHERE id = ?1", SELECT_PERIOD);
        let period = sqlx::query_as::<_, FiscalPeriod>(&sql)
            .bind(period_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        period.ok_or(StoreError::NotFound)
    }

    async fn load_current_period(&self, tenant_id: &str) -> Result<FiscalPeriod, StoreError> {
        let sql = format!(
            "{} WHERE tenant_id = ?1 AND is_current = 1 LIMIT 1",
            SELECT_PERIOD
        );
        let period = sqlx::query_as::<_, FiscalPeriod>(&sql)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        period.ok_or(StoreError::NotFound)
    }

    async fn load_period_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> Result<FiscalPeriod, StoreError> {
        let sql = format!(
            "{} WHERE tenant_id = ?1 AND name = ?2 LIMIT 1",
            SELECT_PERIOD
        );
        let period = sqlx::query_as::<_, FiscalPeriod>(&sql)
            .bind(tenant_id)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        period.ok_or(StoreError::NotFound)
    }

    async fn list_periods(&self, tenant_id: &str) -> Result<Vec<FiscalPeriod>, StoreError> {
        let sql = format!(
            "{} WHERE tenant_id = ?1 ORDER BY start_date DESC",
            SELECT_PERIOD
        );
        let periods = sqlx::query_as::<_, FiscalPeriod>(&sql)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::from)?;

        Ok(periods)
    }

    async fn insert_period(&self, period: &FiscalPeriod) -> Result<(), StoreError> {
        debug!(id = %period.id, tenant_id = %period.tenant_id, name = %period.name, "Inserting fiscal period");

        sqlx::query(
            "INSERT INTO fiscal_periods ( \
                id, tenant_id, name, start_date, end_date, start_date_bs, end_date_bs, \
                is_current, is_closed, closed_at, closed_by, \
                invoice_prefix, purchase_prefix, voucher_prefix, \
                last_invoice_num, last_purchase_num, last_voucher_num, \
                created_at, updated_at \
            ) VALUES ( \
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, \
                ?8, ?9, ?10, ?11, \
                ?12, ?13, ?14, \
                ?15, ?16, ?17, \
                ?18, ?19 \
            )",
        )
        .bind(&period.id)
        .bind(&period.tenant_id)
        .bind(&period.name)
        .bind(period.start_date)
        .bind(period.end_date)
        .bind(&period.start_date_bs)
        .bind(&period.end_date_bs)
        .bind(period.is_current)
        .bind(period.is_closed)
        .bind(period.closed_at)
        .bind(&period.closed_by)
        .bind(&period.invoice_prefix)
        .bind(&period.purchase_prefix)
        .bind(&period.voucher_prefix)
        .bind(period.last_invoice_num)
        .bind(period.last_purchase_num)
        .bind(period.last_voucher_num)
        .bind(period.created_at)
        .bind(period.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        Ok(())
    }

    async fn set_current(&self, tenant_id: &str, period_id: &str) -> Result<(), StoreError> {
        debug!(tenant_id = %tenant_id, period_id = %period_id, "Setting current fiscal period");

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        // Clear every other current flag for the tenant
        sqlx::query(
            "UPDATE fiscal_periods \
             SET is_current = 0, updated_at = ?1 \
             WHERE tenant_id = ?2 AND is_current = 1 AND id != ?3",
        )
        .bind(now)
        .bind(tenant_id)
        .bind(period_id)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        // Set the target, refusing closed rows in the same statement
        let result = sqlx::query(
            "UPDATE fiscal_periods \
             SET is_current = 1, updated_at = ?1 \
             WHERE id = ?2 AND tenant_id = ?3 AND is_closed = 0",
        )
        .bind(now)
        .bind(period_id)
        .bind(tenant_id)
        .execute(&mut *tx)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            // Roll back so the previous current flag stays exactly as it was
            tx.rollback().await.map_err(DbError::from)?;

            let flags: Option<(bool,)> =
                sqlx::query_as("SELECT is_closed FROM fiscal_periods WHERE id = ?1 AND tenant_id = ?2")
                    .bind(period_id)
                    .bind(tenant_id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(DbError::from)?;
            return Err(match flags {
                None => StoreError::NotFound,
                Some((true,)) => StoreError::Closed {
                    period_id: period_id.to_string(),
                },
                Some(_) => StoreError::Conflict {
                    message: "set_current matched no row".to_string(),
                },
            });
        }

        tx.commit().await.map_err(DbError::from)?;
        Ok(())
    }

    async fn increment_counter(
        &self,
        period_id: &str,
        doc_type: DocumentType,
    ) -> Result<i64, StoreError> {
        // The counter column is a compile-time constant per document type,
        // never caller input.
        let col = doc_type.counter_column();
        let sql = format!(
            "UPDATE fiscal_periods \
             SET {col} = {col} + 1, updated_at = ?1 \
             WHERE id = ?2 AND is_closed = 0 \
             RETURNING {col}",
            col = col
        );

        let next: Option<i64> = sqlx::query_scalar(&sql)
            .bind(Utc::now())
            .bind(period_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DbError::from)?;

        match next {
            Some(value) => {
                debug!(period_id = %period_id, counter = col, value, "Incremented counter");
                Ok(value)
            }
            None => Err(match self.load_flags(period_id).await? {
                None => StoreError::NotFound,
                Some((_, true)) => StoreError::Closed {
                    period_id: period_id.to_string(),
                },
                Some(_) => StoreError::Conflict {
                    message: "increment matched no row".to_string(),
                },
            }),
        }
    }

    async fn update_lifecycle_flags(
        &self,
        period_id: &str,
        closed: bool,
        closed_at: Option<DateTime<Utc>>,
        closed_by: Option<&str>,
    ) -> Result<(), StoreError> {
        debug!(period_id = %period_id, closed, "Updating lifecycle flags");

        let result = sqlx::query(
            "UPDATE fiscal_periods \
             SET is_closed = ?1, closed_at = ?2, closed_by = ?3, updated_at = ?4 \
             WHERE id = ?5",
        )
        .bind(closed)
        .bind(closed_at)
        .bind(closed_by)
        .bind(Utc::now())
        .bind(period_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn delete_period(&self, period_id: &str) -> Result<(), StoreError> {
        debug!(period_id = %period_id, "Deleting fiscal period");

        let result = sqlx::query(
            "DELETE FROM fiscal_periods \
             WHERE id = ?1 AND is_current = 0 AND is_closed = 0",
        )
        .bind(period_id)
        .execute(&self.pool)
        .await
        .map_err(DbError::from)?;

        if result.rows_affected() == 0 {
            return Err(match self.load_flags(period_id).await? {
                None => StoreError::NotFound,
                Some((true, _)) => StoreError::Current {
                    period_id: period_id.to_string(),
                },
                Some((_, true)) => StoreError::Closed {
                    period_id: period_id.to_string(),
                },
                Some(_) => StoreError::Conflict {
                    message: "delete matched no row".to_string(),
                },
            });
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
