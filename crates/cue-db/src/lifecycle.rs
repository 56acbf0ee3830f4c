//! # Session Lifecycle
//!
//! Every state change of a table session goes through [`SessionManager`].
//! Each mutating call is one SQLite transaction: the checks, the writes and
//! the recomputed aggregate commit together or not at all.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   open(table) ──► ACTIVE ──────────────── close(end?) ──► CLOSED        │
//! │      │              │  ▲                                     │          │
//! │      │              │  │ update / add_line_item /            │          │
//! │      │              └──┘ remove_line_item                    │          │
//! │      │                                                       │          │
//! │      └─ TableOccupied if the table already has an ACTIVE one │          │
//! │                                                              │          │
//! │   create_historical ─────────────────────────────────────────┘          │
//! │   (already closed; every value taken as supplied)                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Active Session Per Table
//! Mutating transactions start with `BEGIN IMMEDIATE`, so they take the write
//! lock before reading and concurrent openings of one table run one after the
//! other: the later ones see the active row and fail with `TableOccupied`.
//! The partial unique index `idx_table_sessions_one_active` backs the check,
//! and a violation of it is reported as `TableOccupied` too.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use cue_core::billing::settle;
use cue_core::validation::{validate_new_session, validate_quantity, validate_session_update};
use cue_core::{
    ClientTimestamp, CoreError, HistoricalSession, ListQuery, NewSession, RateTable, SessionBill,
    SessionDetail, SessionItem, SessionUpdate, TableSession,
};

use crate::error::{DbError, DbResult};
use crate::repository::{inventory, session};

/// Transactional owner of the session lifecycle.
///
/// ## Usage
/// ```rust,ignore
/// let manager = db.lifecycle(RateTable::default());
///
/// let detail = manager.open(&NewSession { table_number: 1, .. }).await?;
/// manager.add_line_item(&detail.session.id, &soda.id, 2).await?;
/// let closed = manager.close(&detail.session.id, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SessionManager {
    pool: SqlitePool,
    rates: RateTable,
}

impl SessionManager {
    pub fn new(pool: SqlitePool, rates: RateTable) -> Self {
        SessionManager { pool, rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Opens a session on a free table at the table's current rate.
    pub async fn open(&self, input: &NewSession) -> DbResult<SessionDetail> {
        validate_new_session(input)?;
        let table_number = input.table_number;

        let mut tx = self.begin_write().await?;

        if let Some(existing) = session::fetch_active_for_table(&mut *tx, table_number).await? {
            warn!(
                table_number,
                active_session = %existing.id,
                "Rejected open: table occupied"
            );
            return Err(CoreError::TableOccupied { table_number }.into());
        }

        let class = self.rates.class_for(table_number);
        let now = Utc::now();
        let new_session = TableSession {
            id: Uuid::new_v4().to_string(),
            table_number,
            customer_name: input.customer_name.trim().to_string(),
            number_of_people: input.number_of_people,
            hourly_rate_cents: class.hourly_rate_cents,
            start_time: now,
            end_time: None,
            items_amount_cents: 0,
            total_amount: 0.0,
            is_active: true,
            notes: input.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        session::insert_session(&mut *tx, &new_session)
            .await
            .map_err(|err| occupied_on_unique(err, table_number))?;
        tx.commit().await.map_err(|err| occupied_on_unique(err.into(), table_number))?;

        info!(
            id = %new_session.id,
            table_number,
            rate_class = %class.name,
            hourly_rate_cents = new_session.hourly_rate_cents,
            "Session opened"
        );
        Ok(SessionDetail {
            session: new_session,
            items: Vec::new(),
        })
    }

    /// Changes the descriptive fields of an open session.
    ///
    /// The hourly rate is never touched, even when the party size changes.
    pub async fn update(&self, session_id: &str, changes: &SessionUpdate) -> DbResult<SessionDetail> {
        validate_session_update(changes)?;

        let mut tx = self.begin_write().await?;
        let mut current = fetch_active(&mut tx, session_id).await?;

        if let Some(name) = &changes.customer_name {
            current.customer_name = name.trim().to_string();
        }
        if let Some(people) = changes.number_of_people {
            current.number_of_people = people;
        }
        if let Some(notes) = &changes.notes {
            current.notes = notes.clone();
        }
        current.updated_at = Utc::now();

        session::update_details(&mut *tx, &current).await?;
        let detail = session::load_detail(&mut *tx, current).await?;
        tx.commit().await?;

        debug!(id = %session_id, "Session updated");
        Ok(detail)
    }

    /// Adds `quantity` of an inventory item to an open session.
    ///
    /// A second add of the same inventory item merges into the existing line
    /// at that line's snapshotted unit price.
    pub async fn add_line_item(
        &self,
        session_id: &str,
        inventory_item_id: &str,
        quantity: i64,
    ) -> DbResult<SessionItem> {
        validate_quantity(quantity)?;

        let mut tx = self.begin_write().await?;
        fetch_active(&mut tx, session_id).await?;

        let stock = match inventory::fetch_item(&mut *tx, inventory_item_id).await? {
            Some(item) if item.is_active => item,
            _ => {
                warn!(
                    session_id = %session_id,
                    inventory_item_id = %inventory_item_id,
                    "Rejected add: inventory item missing or inactive"
                );
                return Err(CoreError::InventoryItemUnavailable(inventory_item_id.to_string()).into());
            }
        };

        let now = Utc::now();
        let line = match session::fetch_item_for_inventory(&mut *tx, session_id, inventory_item_id).await? {
            Some(mut line) => {
                let merged = line.quantity + quantity;
                validate_quantity(merged)?;
                line.quantity = merged;
                line.total_price_cents = line.unit_price().multiply_quantity(merged)?.cents();
                session::update_item_quantity(&mut *tx, &line).await?;
                line
            }
            None => {
                let unit_price = stock.selling_price();
                let line = SessionItem {
                    id: Uuid::new_v4().to_string(),
                    session_id: session_id.to_string(),
                    inventory_item_id: stock.id.clone(),
                    item_name: stock.item_name.clone(),
                    quantity,
                    unit_price_cents: unit_price.cents(),
                    total_price_cents: unit_price.multiply_quantity(quantity)?.cents(),
                    created_at: now,
                };
                session::insert_item(&mut *tx, &line).await?;
                line
            }
        };

        let items_amount = session::recompute_items_amount(&mut *tx, session_id, now).await?;
        tx.commit().await?;

        info!(
            session_id = %session_id,
            item = %line.item_name,
            quantity = line.quantity,
            items_amount_cents = items_amount,
            "Line item added"
        );
        Ok(line)
    }

    /// Removes a line item from an open session.
    ///
    /// The line must belong to `session_id`; otherwise nothing changes.
    pub async fn remove_line_item(&self, session_id: &str, item_id: &str) -> DbResult<()> {
        let mut tx = self.begin_write().await?;
        fetch_active(&mut tx, session_id).await?;

        if session::fetch_item(&mut *tx, session_id, item_id).await?.is_none() {
            warn!(
                session_id = %session_id,
                item_id = %item_id,
                "Rejected remove: line item not in session"
            );
            return Err(CoreError::SessionItemNotFound {
                session_id: session_id.to_string(),
                item_id: item_id.to_string(),
            }
            .into());
        }

        session::delete_item(&mut *tx, item_id).await?;
        let items_amount = session::recompute_items_amount(&mut *tx, session_id, Utc::now()).await?;
        tx.commit().await?;

        info!(
            session_id = %session_id,
            item_id = %item_id,
            items_amount_cents = items_amount,
            "Line item removed"
        );
        Ok(())
    }

    /// Closes an open session and freezes its total.
    ///
    /// `end_time` defaults to now. A naive caller timestamp is read as UTC.
    pub async fn close(
        &self,
        session_id: &str,
        end_time: Option<ClientTimestamp>,
    ) -> DbResult<SessionDetail> {
        let mut tx = self.begin_write().await?;
        let current = fetch_active(&mut tx, session_id).await?;

        let now = Utc::now();
        let end = end_time.map(|ts| ts.to_utc()).unwrap_or(now);
        if end <= current.start_time {
            warn!(
                id = %session_id,
                start = %current.start_time,
                end = %end,
                "Rejected close: end time not after start"
            );
            return Err(CoreError::InvalidTimeRange {
                start: current.start_time.to_rfc3339(),
                end: end.to_rfc3339(),
            }
            .into());
        }

        let settlement = settle(
            current.start_time,
            end,
            current.hourly_rate(),
            current.items_amount(),
        );
        session::mark_closed(&mut *tx, session_id, end, settlement.total_amount, now).await?;

        let closed = session::fetch_session(&mut *tx, session_id)
            .await?
            .ok_or_else(|| DbError::not_found("Session", session_id))?;
        let detail = session::load_detail(&mut *tx, closed).await?;
        tx.commit().await?;

        info!(
            id = %session_id,
            table_number = detail.session.table_number,
            table_charges = settlement.table_charges,
            total_amount = settlement.total_amount,
            "Session closed"
        );
        Ok(detail)
    }

    /// Records a session that already happened, exactly as supplied.
    ///
    /// No occupancy check, no rate lookup and no recomputation: the totals may
    /// disagree with the time span and that is kept.
    pub async fn create_historical(&self, input: &HistoricalSession) -> DbResult<SessionDetail> {
        let start = input.start_time.to_utc();
        let end = input.end_time.to_utc();

        let record = TableSession {
            id: Uuid::new_v4().to_string(),
            table_number: input.table_number,
            customer_name: input.customer_name.clone(),
            number_of_people: input.number_of_people,
            hourly_rate_cents: input.hourly_rate_cents,
            start_time: start,
            end_time: Some(end),
            items_amount_cents: input.items_amount_cents,
            total_amount: input.total_amount,
            is_active: false,
            notes: input.notes.clone(),
            created_at: start,
            updated_at: end,
        };

        let mut tx = self.begin_write().await?;
        session::insert_session(&mut *tx, &record).await?;
        tx.commit().await?;

        info!(
            id = %record.id,
            table_number = record.table_number,
            total_amount = record.total_amount,
            "Historical session recorded"
        );
        Ok(SessionDetail {
            session: record,
            items: Vec::new(),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn get(&self, session_id: &str) -> DbResult<SessionDetail> {
        self.repo()
            .get(session_id)
            .await?
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()).into())
    }

    pub async fn list_active(&self) -> DbResult<Vec<SessionDetail>> {
        self.repo().list_active().await
    }

    pub async fn list(&self, query: ListQuery) -> DbResult<Vec<SessionDetail>> {
        self.repo().list(query).await
    }

    pub async fn active_for_table(&self, table_number: i64) -> DbResult<Option<SessionDetail>> {
        self.repo().active_for_table(table_number).await
    }

    /// Final bill of a closed session, or a running preview of an open one.
    pub async fn bill(&self, session_id: &str) -> DbResult<SessionBill> {
        let detail = self.get(session_id).await?;
        Ok(SessionBill::for_session(&detail.session, Utc::now()))
    }

    /// Write transaction holding the database write lock from its first statement.
    async fn begin_write(&self) -> DbResult<sqlx::Transaction<'static, sqlx::Sqlite>> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    fn repo(&self) -> session::SessionRepository {
        session::SessionRepository::new(self.pool.clone())
    }
}

/// Loads a session that must exist and still be open.
async fn fetch_active(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    session_id: &str,
) -> DbResult<TableSession> {
    match session::fetch_session(&mut **tx, session_id).await? {
        Some(found) if found.is_active => Ok(found),
        Some(_) => {
            warn!(id = %session_id, "Rejected: session already closed");
            Err(CoreError::SessionNotActive(session_id.to_string()).into())
        }
        None => Err(CoreError::SessionNotFound(session_id.to_string()).into()),
    }
}

/// The partial unique index fires when two openings race; report it as occupancy.
fn occupied_on_unique(err: DbError, table_number: i64) -> DbError {
    match err {
        DbError::UniqueViolation { field, .. } if field.contains("table_sessions") => {
            warn!(table_number, "Rejected open: one-active index violated");
            CoreError::TableOccupied { table_number }.into()
        }
        other => other,
    }
}

// =============================================================================
// Tests
// =============================================================================
