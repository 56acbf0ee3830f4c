//! # Repository Module
//!
//! Database repository implementations for the club backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.inventory().list(0, 100, true)                              │
//! │       ▼                                                                 │
//! │  InventoryRepository                                                    │
//! │  ├── get / get_by_name / list                                           │
//! │  ├── create / update                                                    │
//! │  └── deactivate / delete                                                │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AdminRepository`](admin::AdminRepository) - Staff accounts and login checks
//! - [`InventoryRepository`](inventory::InventoryRepository) - Price list CRUD
//! - [`SessionRepository`](session::SessionRepository) - Session reads; writes go
//!   through [`SessionManager`](crate::lifecycle::SessionManager)

pub mod admin;
pub mod inventory;
pub mod session;
