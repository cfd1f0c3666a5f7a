//! # In-Memory Reference Store
//!
//! A `Mutex`-backed implementation of the persistence port.
//!
//! ## Why It Exists
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     MemoryPeriodStore Uses                              │
//! │                                                                         │
//! │  1. Engine tests                                                       │
//! │     └── Exercise lifecycle + numbering without a database              │
//! │                                                                         │
//! │  2. Host-service test doubles                                          │
//! │     └── Wire a PeriodEngine into handler tests cheaply                 │
//! │                                                                         │
//! │  3. Executable port contract                                           │
//! │     └── The simplest implementation that honors every atomicity        │
//! │         requirement, as documentation for adapter authors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation takes the single lock exactly once, so each operation is
//! trivially one atomic step: the same linearizability the SQLite adapter
//! gets from row-level locking.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use khata_core::{DocumentType, FiscalPeriod};

use crate::store::{PeriodStore, StoreError};

/// In-memory implementation of [`PeriodStore`], keyed by period id.
#[derive(Debug, Default)]
pub struct MemoryPeriodStore {
    periods: Mutex<HashMap<String, FiscalPeriod>>,
}

impl MemoryPeriodStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored periods (test helper).
    pub async fn len(&self) -> usize {
        self.periods.lock().await.len()
    }

    /// Returns true if the store holds no periods.
    pub async fn is_empty(&self) -> bool {
        self.periods.lock().await.is_empty()
    }
}

#[async_trait]
impl PeriodStore for MemoryPeriodStore {
    async fn load_period(&self, period_id: &str) -> Result<FiscalPeriod, StoreError> {
        self.periods
            .lock()
            .await
            .get(period_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn load_current_period(&self, tenant_id: &str) -> Result<FiscalPeriod, StoreError> {
        self.periods
            .lock()
            .await
            .values()
            .find(|p| p.tenant_id == tenant_id && p.is_current)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn load_period_by_name(
        &self,
        tenant_id: &str,
        name: &str,
    ) -> Result<FiscalPeriod, StoreError> {
        self.periods
            .lock()
            .await
            .values()
            .find(|p| p.tenant_id == tenant_id && p.name == name)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_periods(&self, tenant_id: &str) -> Result<Vec<FiscalPeriod>, StoreError> {
        let mut periods: Vec<FiscalPeriod> = self
            .periods
            .lock()
            .await
            .values()
            .filter(|p| p.tenant_id == tenant_id)
            .cloned()
            .collect();
        // Newest first, matching the SQLite adapter's ordering
        periods.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(periods)
    }

    async fn insert_period(&self, period: &FiscalPeriod) -> Result<(), StoreError> {
        let mut periods = self.periods.lock().await;

        if periods
            .values()
            .any(|p| p.tenant_id == period.tenant_id && p.name == period.name)
        {
            return Err(StoreError::DuplicateName);
        }

        periods.insert(period.id.clone(), period.clone());
        Ok(())
    }

    async fn set_current(&self, tenant_id: &str, period_id: &str) -> Result<(), StoreError> {
        let mut periods = self.periods.lock().await;

        // Guard the target before touching any flag, so a refusal leaves
        // every period exactly as it was.
        let target = periods
            .get(period_id)
            .filter(|p| p.tenant_id == tenant_id)
            .ok_or(StoreError::NotFound)?;
        if target.is_closed {
            return Err(StoreError::Closed {
                period_id: period_id.to_string(),
            });
        }

        let now = Utc::now();
        for period in periods.values_mut() {
            if period.tenant_id != tenant_id {
                continue;
            }
            let make_current = period.id == period_id;
            if period.is_current != make_current {
                period.is_current = make_current;
                period.updated_at = now;
            }
        }
        Ok(())
    }

    async fn increment_counter(
        &self,
        period_id: &str,
        doc_type: DocumentType,
    ) -> Result<i64, StoreError> {
        let mut periods = self.periods.lock().await;

        let period = periods.get_mut(period_id).ok_or(StoreError::NotFound)?;
        if period.is_closed {
            return Err(StoreError::Closed {
                period_id: period_id.to_string(),
            });
        }

        let next = period.counter_for(doc_type) + 1;
        match doc_type {
            DocumentType::Invoice => period.last_invoice_num = next,
            DocumentType::Purchase => period.last_purchase_num = next,
            DocumentType::Voucher => period.last_voucher_num = next,
        }
        period.updated_at = Utc::now();
        Ok(next)
    }

    async fn update_lifecycle_flags(
        &self,
        period_id: &str,
        closed: bool,
        closed_at: Option<DateTime<Utc>>,
        closed_by: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut periods = self.periods.lock().await;

        let period = periods.get_mut(period_id).ok_or(StoreError::NotFound)?;
        period.is_closed = closed;
        period.closed_at = closed_at;
        period.closed_by = closed_by.map(|s| s.to_string());
        period.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_period(&self, period_id: &str) -> Result<(), StoreError> {
        let mut periods = self.periods.lock().await;

        let period = periods.get(period_id).ok_or(StoreError::NotFound)?;
        if period.is_current {
            return Err(StoreError::Current {
                period_id: period_id.to_string(),
            });
        }
        if period.is_closed {
            return Err(StoreError::Closed {
                period_id: period_id.to_string(),
            });
        }

        periods.remove(period_id);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use khata_core::BsCalendar;

    fn period(tenant: &str, start_year: i32) -> FiscalPeriod {
        let span = BsCalendar::seeded().fiscal_year_span(start_year).unwrap();
        let name = format!("{}/{:02}", start_year, (start_year + 1) % 100);
        FiscalPeriod::new(tenant, &name, span)
    }

    #[tokio::test]
    async fn test_insert_and_lookups() {
        let store = MemoryPeriodStore::new();
        let p = period("tenant-a", 2082);
        store.insert_period(&p).await.unwrap();

        assert_eq!(store.load_period(&p.id).await.unwrap().id, p.id);
        assert_eq!(
            store
                .load_period_by_name("tenant-a", "2082/83")
                .await
                .unwrap()
                .id,
            p.id
        );
        assert!(matches!(
            store.load_period("missing").await.unwrap_err(),
            StoreError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_duplicate_name_is_refused() {
        let store = MemoryPeriodStore::new();
        store.insert_period(&period("tenant-a", 2082)).await.unwrap();

        let err = store
            .insert_period(&period("tenant-a", 2082))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName));

        // The same name under another tenant is fine
        store.insert_period(&period("tenant-b", 2082)).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_current_moves_the_flag() {
        let store = MemoryPeriodStore::new();
        let a = period("tenant-a", 2082);
        let b = period("tenant-a", 2083);
        store.insert_period(&a).await.unwrap();
        store.insert_period(&b).await.unwrap();

        store.set_current("tenant-a", &a.id).await.unwrap();
        store.set_current("tenant-a", &b.id).await.unwrap();

        assert!(!store.load_period(&a.id).await.unwrap().is_current);
        assert!(store.load_period(&b.id).await.unwrap().is_current);
        assert_eq!(
            store.load_current_period("tenant-a").await.unwrap().id,
            b.id
        );
    }

    #[tokio::test]
    async fn test_set_current_refuses_closed_target_untouched() {
        let store = MemoryPeriodStore::new();
        let a = period("tenant-a", 2082);
        let mut b = period("tenant-a", 2083);
        b.close("user-x").unwrap();
        store.insert_period(&a).await.unwrap();
        store.insert_period(&b).await.unwrap();
        store.set_current("tenant-a", &a.id).await.unwrap();

        let err = store.set_current("tenant-a", &b.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Closed { .. }));

        // The refusal left the previous current flag in place
        assert!(store.load_period(&a.id).await.unwrap().is_current);
    }

    #[tokio::test]
    async fn test_increment_refuses_closed_and_keeps_counter() {
        let store = MemoryPeriodStore::new();
        let p = period("tenant-a", 2082);
        store.insert_period(&p).await.unwrap();

        assert_eq!(
            store
                .increment_counter(&p.id, DocumentType::Invoice)
                .await
                .unwrap(),
            1
        );

        store
            .update_lifecycle_flags(&p.id, true, Some(Utc::now()), Some("user-x"))
            .await
            .unwrap();
        let err = store
            .increment_counter(&p.id, DocumentType::Invoice)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Closed { .. }));
        assert_eq!(store.load_period(&p.id).await.unwrap().last_invoice_num, 1);
    }

    #[tokio::test]
    async fn test_delete_guards() {
        let store = MemoryPeriodStore::new();
        let p = period("tenant-a", 2082);
        store.insert_period(&p).await.unwrap();
        store.set_current("tenant-a", &p.id).await.unwrap();

        assert!(matches!(
            store.delete_period(&p.id).await.unwrap_err(),
            StoreError::Current { .. }
        ));

        // Park the flag on another period, close the first, try again
        let other = period("tenant-a", 2083);
        store.insert_period(&other).await.unwrap();
        store.set_current("tenant-a", &other.id).await.unwrap();
        store
            .update_lifecycle_flags(&p.id, true, Some(Utc::now()), Some("user-x"))
            .await
            .unwrap();
        assert!(matches!(
            store.delete_period(&p.id).await.unwrap_err(),
            StoreError::Closed { .. }
        ));

        // Reopened and not current: deletable
        store
            .update_lifecycle_flags(&p.id, false, None, None)
            .await
            .unwrap();
        store.delete_period(&p.id).await.unwrap();
        assert_eq!(store.len().await, 1);
    }
}
