//! # cue-core: Pure Business Logic for the Cue Club Backend
//!
//! This crate is the **heart** of the club backend. It holds the rules for
//! pricing a table session as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cue Club Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    club-api (axum)                              │   │
//! │  │    /api/sessions, /api/inventory, /api/auth, /api/admin         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                cue-db (SQLite + SessionManager)                 │   │
//! │  │       repositories, migrations, transactional lifecycle         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ cue-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌──────┐  ┌────────┐  │   │
//! │  │   │  types  │  │  money  │  │  rates  │  │ time │  │billing │  │   │
//! │  │   │ Session │  │  Money  │  │RateTable│  │ UTC  │  │  Bill  │  │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └──────┘  └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (TableSession, SessionItem, InventoryItem, Admin)
//! - [`money`] - Money type with integer arithmetic
//! - [`rates`] - Table-class hourly rates
//! - [`billing`] - Settlement and bill breakdown
//! - [`time`] - Client timestamp normalization
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use cue_core::billing::Bill;
//! use cue_core::money::Money;
//! use cue_core::rates::RateTable;
//!
//! let rates = RateTable::default();
//! let rate = rates.rate_for(1); // pool table, 140.00/h
//!
//! let start = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
//! let end = start + Duration::minutes(90);
//!
//! let bill = Bill::compute(start, end, rate, Money::from_cents(5_000));
//! assert_eq!(bill.time_played_hours, 1.5);
//! assert_eq!(bill.total_amount, 260.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod billing;
pub mod error;
pub mod money;
pub mod rates;
pub mod time;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use billing::{Bill, SessionBill, Settlement};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use rates::{RateClass, RateTable};
pub use time::ClientTimestamp;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single inventory item on one session.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Applies to the merged quantity when the same item is added again.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest price or margin, in cents, an inventory item may carry.
///
/// `MAX_PRICE_CENTS × MAX_ITEM_QUANTITY` summed over any realistic number of
/// lines stays far inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 10_000_000_000;

/// Page size used when a listing request does not specify one.
pub const DEFAULT_PAGE_SIZE: i64 = 100;

/// Upper bound for any paginated listing.
pub const MAX_PAGE_SIZE: i64 = 500;
