//! # Cue Club API
//!
//! HTTP server for the club's front desk.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Club API                                        │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth          │  │  inventory     │  │  sessions                  ││
//! │  │                │  │                │  │                            ││
//! │  │ • register     │  │ • list / get   │  │ • open / update            ││
//! │  │ • login        │  │ • create       │  │ • add / remove line item   ││
//! │  │ • me           │  │ • update       │  │ • end (close + bill)       ││
//! │  │                │  │ • delete       │  │ • historical backfill      ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  CurrentAdmin extractor (JWT) ──► AppState { Database, SessionManager }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! TOML file at `CLUB_CONFIG`, then environment variables:
//! - `CLUB_HOST` / `CLUB_PORT` - listen address (default: 0.0.0.0:8000)
//! - `CLUB_DATABASE_PATH` - SQLite file (default: ./cue_club.db)
//! - `CLUB_DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `CLUB_JWT_SECRET` - Secret for JWT signing
//! - `CLUB_ACCESS_TOKEN_MINUTES` - Access token lifetime (default: 480)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

// Re-exports
pub use config::AppConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
