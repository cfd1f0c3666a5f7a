//! # khata-core: Pure Business Logic for the Khata Fiscal Engine
//!
//! This crate is the **heart** of the fiscal engine. It contains all business
//! logic as pure functions and value types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Khata Fiscal Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Host Service (HTTP, auth, audit)                   │   │
//! │  │                       — out of scope —                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ in-process calls                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  khata-engine (Services)                        │   │
//! │  │    PeriodEngine: lifecycle manager + document numbering         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ khata-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ calendar  │  │   types   │  │   error   │  │ validation│  │   │
//! │  │   │ BsCalendar│  │FiscalPer. │  │ CoreError │  │   rules   │  │   │
//! │  │   │  BsDate   │  │ DocType   │  │Validation │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                   khata-db (Database Layer)                     │   │
//! │  │          SQLite persistence port, migrations, repository        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`calendar`] - BS↔AD conversion (table-driven, range-checked)
//! - [`types`] - Domain types (FiscalPeriod, DocumentType, number formatting)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (period name grammar, tenant ids)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **No Guessing**: Dates outside the seeded table are errors, never defaults
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use khata_core::calendar::BsCalendar;
//! use khata_core::types::{derive_prefix, DocumentType};
//!
//! // Canonical fiscal year 2082/83: Shrawan 1 2082 to the last day of
//! // Ashad 2083, read from the month-length table
//! let cal = BsCalendar::seeded();
//! let span = cal.fiscal_year_span(2082).unwrap();
//! assert_eq!(span.start_bs.to_string(), "2082-04-01");
//! assert_eq!(span.end_bs.to_string(), "2083-03-31");
//!
//! // Prefixes are fixed at period creation from the type tag and the name
//! assert_eq!(derive_prefix(DocumentType::Invoice, "2082/83"), "INV-8283-");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use khata_core::BsDate` instead of
// `use khata_core::calendar::BsDate`

pub use calendar::{BsCalendar, BsDate, PeriodSpan};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use types::*;
