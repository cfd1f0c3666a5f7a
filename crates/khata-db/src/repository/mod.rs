//! # Repository Module
//!
//! Database repository implementations for the fiscal store.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The repository implements the engine's persistence port over SQL.     │
//! │                                                                         │
//! │  PeriodEngine (khata-engine)                                           │
//! │       │                                                                 │
//! │       │  store.increment_counter(id, DocumentType::Invoice)            │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  PeriodRepository: impl PeriodStore                                    │
//! │  ├── guarded single-statement writes                                   │
//! │  ├── one transaction for set_current                                   │
//! │  └── post-guard classification for precise errors                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                        │
//! │  • The engine tests against the in-memory store instead               │
//! │  • Atomicity lives where the locks live                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`period::PeriodRepository`] - Fiscal period rows and their counters

pub mod period;
