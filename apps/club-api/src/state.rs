//! Shared application state.

use std::sync::Arc;

use cue_core::RateTable;
use cue_db::{Database, SessionManager};

use crate::auth::JwtManager;
use crate::config::AppConfig;

/// Everything a handler needs, built once at startup.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub sessions: SessionManager,
    pub jwt: JwtManager,
}

impl AppState {
    pub fn new(db: Database, rates: RateTable, jwt: JwtManager) -> Self {
        let sessions = db.lifecycle(rates);
        AppState { db, sessions, jwt }
    }

    pub fn from_config(db: Database, config: &AppConfig) -> Arc<Self> {
        let jwt = JwtManager::new(
            config.auth.jwt_secret.clone(),
            config.auth.access_token_minutes * 60,
        );
        Arc::new(AppState::new(db, config.rates.clone(), jwt))
    }

    pub fn rates(&self) -> &RateTable {
        self.sessions.rates()
    }
}
