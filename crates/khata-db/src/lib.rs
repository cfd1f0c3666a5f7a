//! # khata-db: Database Layer for the Khata Fiscal Engine
//!
//! This crate implements the engine's persistence port over SQLite,
//! using sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Khata Fiscal Data Flow                            │
//! │                                                                         │
//! │  PeriodEngine (khata-engine)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     khata-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repository   │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (period.rs)  │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ PeriodRepo:   │    │ 001_fiscal_  │  │   │
//! │  │   │ WAL, FK on    │    │ PeriodStore   │    │ periods.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (or :memory: in tests)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types and the port-taxonomy mapping
//! - [`repository`] - The `PeriodStore` implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use khata_core::BsCalendar;
//! use khata_db::{Database, DbConfig};
//! use khata_engine::PeriodEngine;
//!
//! let db = Database::new(DbConfig::new("path/to/khata.db")).await?;
//! let engine = PeriodEngine::new(db.periods(), BsCalendar::seeded());
//!
//! let period = engine.create_period(tenant_id, "2082/83").await?;
//! let number = engine.next_invoice_number(&period.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::period::PeriodRepository;
