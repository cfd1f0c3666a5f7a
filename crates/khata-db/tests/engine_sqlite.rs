//! End-to-end tests: the real engine over the real SQLite store.
//!
//! The engine's own tests run against the in-memory reference store;
//! everything here exercises the full stack, including the guarded SQL
//! statements and the partial unique index.

use std::collections::HashSet;
use std::sync::Arc;

use khata_core::{BsCalendar, CoreError, DocumentType};
use khata_db::{Database, DbConfig, PeriodRepository};
use khata_engine::{EngineError, PeriodEngine};

async fn engine() -> PeriodEngine<PeriodRepository> {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    PeriodEngine::new(db.periods(), BsCalendar::seeded())
}

#[tokio::test]
async fn test_create_and_number_documents() {
    let engine = engine().await;

    let period = engine.create_period("tenant-a", "2082/83").await.unwrap();
    assert_eq!(period.start_date_bs, "2082-04-01");
    assert_eq!(period.end_date_bs, "2083-03-31");

    assert_eq!(
        engine.next_invoice_number(&period.id).await.unwrap(),
        "INV-8283-0001"
    );
    assert_eq!(
        engine.next_invoice_number(&period.id).await.unwrap(),
        "INV-8283-0002"
    );
    assert_eq!(
        engine.next_invoice_number(&period.id).await.unwrap(),
        "INV-8283-0003"
    );
    assert_eq!(
        engine.next_purchase_number(&period.id).await.unwrap(),
        "PUR-8283-0001"
    );
    assert_eq!(
        engine.next_voucher_number(&period.id).await.unwrap(),
        "JV-8283-0001"
    );
}

#[tokio::test]
async fn test_duplicate_name_is_refused_by_the_schema() {
    let engine = engine().await;
    engine.create_period("tenant-a", "2082/83").await.unwrap();

    let err = engine.create_period("tenant-a", "2082/83").await.unwrap_err();
    assert!(matches!(err, EngineError::DuplicatePeriodName { .. }));

    engine.create_period("tenant-b", "2082/83").await.unwrap();
}

#[tokio::test]
async fn test_close_blocks_numbering_until_reopen() {
    let engine = engine().await;
    let period = engine.create_period("tenant-a", "2082/83").await.unwrap();

    for _ in 0..3 {
        engine.next_invoice_number(&period.id).await.unwrap();
    }

    engine.close_period(&period.id, "user-x").await.unwrap();
    let err = engine.next_invoice_number(&period.id).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::PeriodClosed { .. })
    ));
    assert_eq!(
        engine.get_period(&period.id).await.unwrap().last_invoice_num,
        3
    );

    engine.reopen_period(&period.id).await.unwrap();
    assert_eq!(
        engine.next_invoice_number(&period.id).await.unwrap(),
        "INV-8283-0004"
    );
}

#[tokio::test]
async fn test_set_current_switches_atomically() {
    let engine = engine().await;
    let a = engine.create_period("tenant-a", "2082/83").await.unwrap();
    let b = engine.create_period("tenant-a", "2083/84").await.unwrap();

    engine.set_current("tenant-a", &a.id).await.unwrap();
    engine.set_current("tenant-a", &b.id).await.unwrap();

    assert!(!engine.get_period(&a.id).await.unwrap().is_current);
    assert!(engine.get_period(&b.id).await.unwrap().is_current);
    assert_eq!(engine.get_current_period("tenant-a").await.unwrap().id, b.id);
}

#[tokio::test]
async fn test_second_current_row_is_unrepresentable() {
    // Drive the schema directly: even buggy application code cannot commit
    // a second current row past the partial unique index.
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let repo = db.periods();
    let cal = BsCalendar::seeded();

    let a = khata_core::FiscalPeriod::new("tenant-a", "2082/83", cal.fiscal_year_span(2082).unwrap());
    let b = khata_core::FiscalPeriod::new("tenant-a", "2083/84", cal.fiscal_year_span(2083).unwrap());
    khata_engine::PeriodStore::insert_period(&repo, &a).await.unwrap();
    khata_engine::PeriodStore::insert_period(&repo, &b).await.unwrap();

    sqlx::query("UPDATE fiscal_periods SET is_current = 1 WHERE id = ?1")
        .bind(&a.id)
        .execute(db.pool())
        .await
        .unwrap();
    let err = sqlx::query("UPDATE fiscal_periods SET is_current = 1 WHERE id = ?1")
        .bind(&b.id)
        .execute(db.pool())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE constraint failed"));
}

#[tokio::test]
async fn test_concurrent_numbering_no_gaps_over_sqlite() {
    let engine = Arc::new(engine().await);
    let period = engine.create_period("tenant-a", "2082/83").await.unwrap();

    const CALLERS: i64 = 20;
    let mut handles = Vec::new();
    for _ in 0..CALLERS {
        let engine = Arc::clone(&engine);
        let period_id = period.id.clone();
        handles.push(tokio::spawn(async move {
            engine
                .next_document_number(&period_id, DocumentType::Invoice)
                .await
                .unwrap()
        }));
    }

    let mut numbers = HashSet::new();
    for handle in handles {
        numbers.insert(handle.await.unwrap());
    }

    assert_eq!(numbers.len() as i64, CALLERS);
    for n in 1..=CALLERS {
        assert!(numbers.contains(&format!("INV-8283-{:04}", n)));
    }
}

#[tokio::test]
async fn test_concurrent_set_current_storm_leaves_one_winner() {
    let engine = Arc::new(engine().await);
    let mut ids = Vec::new();
    for year in 2082..2086 {
        let name = format!("{}/{:02}", year, (year + 1) % 100);
        ids.push(engine.create_period("tenant-a", &name).await.unwrap().id);
    }

    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = Arc::clone(&engine);
        let id = ids[i % ids.len()].clone();
        handles.push(tokio::spawn(async move {
            engine.set_current("tenant-a", &id).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let current: Vec<_> = engine
        .list_periods("tenant-a")
        .await
        .unwrap()
        .into_iter()
        .filter(|p| p.is_current)
        .collect();
    assert_eq!(current.len(), 1);
}

#[tokio::test]
async fn test_delete_guards_over_sqlite() {
    let engine = engine().await;
    let a = engine.create_period("tenant-a", "2082/83").await.unwrap();
    let b = engine.create_period("tenant-a", "2083/84").await.unwrap();

    engine.set_current("tenant-a", &a.id).await.unwrap();
    let err = engine.delete_period(&a.id).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::CannotDeleteCurrent { .. })
    ));

    engine.close_period(&b.id, "user-x").await.unwrap();
    let err = engine.delete_period(&b.id).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Core(CoreError::CannotDeleteClosed { .. })
    ));

    engine.reopen_period(&b.id).await.unwrap();
    engine.delete_period(&b.id).await.unwrap();
    let err = engine.get_period(&b.id).await.unwrap_err();
    assert!(matches!(err, EngineError::PeriodNotFound { .. }));
}
