//! # khata-engine: Lifecycle and Numbering Services
//!
//! This crate turns the pure types of `khata-core` into the two services the
//! host calls: the fiscal period lifecycle manager and the sequential
//! document numbering service. It also owns the persistence port contract
//! that `khata-db` implements.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Khata Engine Data Flow                            │
//! │                                                                         │
//! │  Host worker (accounting / sales / purchasing module)                  │
//! │       │                                                                 │
//! │       │  engine.get_current_period(tenant)                             │
//! │       │  engine.next_invoice_number(period_id)                         │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  khata-engine (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ PeriodEngine  │    │  PeriodStore  │    │ MemoryPeriod │  │   │
//! │  │   │ (service.rs)  │───►│   (store.rs)  │◄───│Store(memory) │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ lifecycle +   │    │ async trait,  │    │ Mutex-backed │  │   │
//! │  │   │ numbering     │    │ atomic ops    │    │ test double  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  khata-db: SQLite implementation of PeriodStore                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`service`] - `PeriodEngine`: lifecycle manager + numbering service
//! - [`store`] - The `PeriodStore` persistence port and its error taxonomy
//! - [`memory`] - In-memory reference implementation of the port
//! - [`error`] - Engine error types
//!
//! ## Usage
//!
//! ```rust
//! use khata_core::BsCalendar;
//! use khata_engine::{MemoryPeriodStore, PeriodEngine};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = PeriodEngine::new(MemoryPeriodStore::new(), BsCalendar::seeded());
//!
//! let period = engine.create_period("tenant-a", "2082/83").await.unwrap();
//! engine.set_current("tenant-a", &period.id).await.unwrap();
//!
//! let number = engine.next_invoice_number(&period.id).await.unwrap();
//! assert_eq!(number, "INV-8283-0001");
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod service;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{EngineError, EngineResult};
pub use memory::MemoryPeriodStore;
pub use service::{EngineConfig, PeriodEngine};
pub use store::{PeriodStore, StoreError};
