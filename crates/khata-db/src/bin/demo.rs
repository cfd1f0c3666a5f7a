//! # Engine Walkthrough
//!
//! Wires the full stack - SQLite store, period engine, seeded calendar -
//! and walks one fiscal year through its life.
//!
//! ## Usage
//! ```bash
//! cargo run -p khata-db --bin demo
//!
//! # With engine/store logging
//! RUST_LOG=debug cargo run -p khata-db --bin demo
//! ```

use khata_core::BsCalendar;
use khata_db::{Database, DbConfig};
use khata_engine::PeriodEngine;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let db = Database::new(DbConfig::in_memory()).await?;
    let engine = PeriodEngine::new(db.periods(), BsCalendar::seeded());
    let tenant = "demo-tenant";

    // Create the fiscal year from its name alone: both calendars derive
    // from the month-length table
    let period = engine.create_period(tenant, "2082/83").await?;
    println!("Created fiscal period {} ({})", period.name, period.id);
    println!("  AD: {} .. {}", period.start_date, period.end_date);
    println!("  BS: {} .. {}", period.start_date_bs, period.end_date_bs);

    let start_bs = engine.calendar().to_bs(period.start_date)?;
    println!(
        "  {} falls in {} ({})",
        period.start_date,
        start_bs.month_name(),
        start_bs.fiscal_year_name()
    );

    engine.set_current(tenant, &period.id).await?;
    let current = engine.get_current_period(tenant).await?;
    println!("Current period for {}: {}", tenant, current.name);

    for _ in 0..3 {
        println!("  next invoice:  {}", engine.next_invoice_number(&period.id).await?);
    }
    println!("  next purchase: {}", engine.next_purchase_number(&period.id).await?);
    println!("  next voucher:  {}", engine.next_voucher_number(&period.id).await?);

    // Closing gates the counters; reopening continues where they stopped
    engine.close_period(&period.id, "demo-user").await?;
    if let Err(err) = engine.next_invoice_number(&period.id).await {
        println!("Numbering against the closed period refused: {}", err);
    }

    engine.reopen_period(&period.id).await?;
    println!(
        "Reopened; numbering continues at {}",
        engine.next_invoice_number(&period.id).await?
    );

    db.close().await;
    Ok(())
}
