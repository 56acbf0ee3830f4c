//! # cue-db: Database Layer for the Cue Club Backend
//!
//! This crate provides database access and the transactional session
//! lifecycle. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cue Club Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /api/sessions/{id}/items)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     cue-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐  ┌────────────────┐  ┌──────────────────┐  │   │
//! │  │   │   Database    │  │ SessionManager │  │   Repositories   │  │   │
//! │  │   │   (pool.rs)   │  │ (lifecycle.rs) │  │ session, admin,  │  │   │
//! │  │   │               │  │                │  │ inventory        │  │   │
//! │  │   │ SqlitePool    │◄─│ one tx per op  │─►│ row-level SQL    │  │   │
//! │  │   └───────────────┘  └────────────────┘  └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//! - [`lifecycle`] - Open / update / add / remove / close / backfill
//! - [`password`] - Argon2 hashing for admin passwords
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cue_core::{NewSession, RateTable};
//! use cue_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./cue_club.db")).await?;
//! let sessions = db.lifecycle(RateTable::default());
//!
//! let opened = sessions.open(&new_session).await?;
//! let closed = sessions.close(&opened.session.id, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod migrations;
pub mod password;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use lifecycle::SessionManager;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::admin::AdminRepository;
pub use repository::inventory::InventoryRepository;
pub use repository::session::SessionRepository;
