//! # Session Repository
//!
//! Row-level access to `table_sessions` and `session_items`.
//!
//! ## Two Entry Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  SessionRepository (pool)           free fns (&mut SqliteConnection)   │
//! │  ─────────────────────────          ───────────────────────────────    │
//! │  get / list / list_active           fetch_session, fetch_items,        │
//! │  active_for_table                   insert_session, upsert line,       │
//! │        │                            recompute_items_amount, ...        │
//! │        │                                     ▲                          │
//! │        └──── both run the same SQL ──────────┤                          │
//! │                                              │                          │
//! │                              SessionManager runs them inside one tx     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this file enforces lifecycle rules; that is
//! [`crate::lifecycle::SessionManager`]'s job.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use cue_core::{ListQuery, SessionDetail, SessionItem, TableSession};

const SESSION_COLUMNS: &str = "id, table_number, customer_name, number_of_people, \
     hourly_rate_cents, start_time, end_time, items_amount_cents, total_amount, \
     is_active, notes, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, session_id, inventory_item_id, item_name, quantity, \
     unit_price_cents, total_price_cents, created_at";

/// Read-side repository for sessions.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.sessions();
/// let open = repo.list_active().await?;
/// let one = repo.get("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Gets a session and its line items by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<SessionDetail>> {
        debug!(id = %id, "Getting session");
        let mut conn = self.pool.acquire().await?;
        match fetch_session(&mut conn, id).await? {
            Some(session) => Ok(Some(load_detail(&mut conn, session).await?)),
            None => Ok(None),
        }
    }

    /// All open sessions, ordered by table number.
    pub async fn list_active(&self) -> DbResult<Vec<SessionDetail>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM table_sessions \
             WHERE is_active = 1 ORDER BY table_number"
        );
        let mut conn = self.pool.acquire().await?;
        let sessions: Vec<TableSession> = sqlx::query_as(&sql).fetch_all(&mut *conn).await?;

        debug!(count = sessions.len(), "Listed active sessions");
        load_details(&mut conn, sessions).await
    }

    /// Paginated listing, newest first.
    pub async fn list(&self, query: ListQuery) -> DbResult<Vec<SessionDetail>> {
        let query = query.clamped();
        let filter = if query.active_only {
            "WHERE is_active = 1"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM table_sessions {filter} \
             ORDER BY start_time DESC, rowid DESC LIMIT ? OFFSET ?"
        );

        let mut conn = self.pool.acquire().await?;
        let sessions: Vec<TableSession> = sqlx::query_as(&sql)
            .bind(query.limit)
            .bind(query.skip)
            .fetch_all(&mut *conn)
            .await?;

        debug!(
            skip = query.skip,
            limit = query.limit,
            active_only = query.active_only,
            count = sessions.len(),
            "Listed sessions"
        );
        load_details(&mut conn, sessions).await
    }

    /// The open session on a table, if any.
    pub async fn active_for_table(&self, table_number: i64) -> DbResult<Option<SessionDetail>> {
        let mut conn = self.pool.acquire().await?;
        match fetch_active_for_table(&mut conn, table_number).await? {
            Some(session) => Ok(Some(load_detail(&mut conn, session).await?)),
            None => Ok(None),
        }
    }

    /// Line items of a session in insertion order.
    pub async fn items(&self, session_id: &str) -> DbResult<Vec<SessionItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut conn, session_id).await
    }

    /// Deletes a session. Its line items go with it (ON DELETE CASCADE).
    ///
    /// Returns false if the session did not exist.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting session");
        let result = sqlx::query("DELETE FROM table_sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Connection-level helpers (shared with the lifecycle manager)
// =============================================================================

pub(crate) async fn fetch_session(
    conn: &mut SqliteConnection,
    id: &str,
) -> DbResult<Option<TableSession>> {
    let sql = format!("SELECT {SESSION_COLUMNS} FROM table_sessions WHERE id = ?");
    let session = sqlx::query_as(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(session)
}

pub(crate) async fn fetch_active_for_table(
    conn: &mut SqliteConnection,
    table_number: i64,
) -> DbResult<Option<TableSession>> {
    let sql = format!(
        "SELECT {SESSION_COLUMNS} FROM table_sessions WHERE table_number = ? AND is_active = 1"
    );
    let session = sqlx::query_as(&sql)
        .bind(table_number)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(session)
}

pub(crate) async fn fetch_items(
    conn: &mut SqliteConnection,
    session_id: &str,
) -> DbResult<Vec<SessionItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM session_items WHERE session_id = ? ORDER BY rowid");
    let items = sqlx::query_as(&sql)
        .bind(session_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(items)
}

pub(crate) async fn fetch_item(
    conn: &mut SqliteConnection,
    session_id: &str,
    item_id: &str,
) -> DbResult<Option<SessionItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM session_items WHERE id = ? AND session_id = ?");
    let item = sqlx::query_as(&sql)
        .bind(item_id)
        .bind(session_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(item)
}

pub(crate) async fn fetch_item_for_inventory(
    conn: &mut SqliteConnection,
    session_id: &str,
    inventory_item_id: &str,
) -> DbResult<Option<SessionItem>> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM session_items WHERE session_id = ? AND inventory_item_id = ?"
    );
    let item = sqlx::query_as(&sql)
        .bind(session_id)
        .bind(inventory_item_id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(item)
}

pub(crate) async fn load_detail(
    conn: &mut SqliteConnection,
    session: TableSession,
) -> DbResult<SessionDetail> {
    let items = fetch_items(conn, &session.id).await?;
    Ok(SessionDetail { session, items })
}

async fn load_details(
    conn: &mut SqliteConnection,
    sessions: Vec<TableSession>,
) -> DbResult<Vec<SessionDetail>> {
    let mut details = Vec::with_capacity(sessions.len());
    for session in sessions {
        details.push(load_detail(conn, session).await?);
    }
    Ok(details)
}

pub(crate) async fn insert_session(
    conn: &mut SqliteConnection,
    session: &TableSession,
) -> DbResult<()> {
    debug!(
        id = %session.id,
        table_number = session.table_number,
        is_active = session.is_active,
        "Inserting session"
    );
    sqlx::query(
        r#"
        INSERT INTO table_sessions (
            id, table_number, customer_name, number_of_people,
            hourly_rate_cents, start_time, end_time, items_amount_cents, total_amount,
            is_active, notes, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.id)
    .bind(session.table_number)
    .bind(&session.customer_name)
    .bind(session.number_of_people)
    .bind(session.hourly_rate_cents)
    .bind(session.start_time)
    .bind(session.end_time)
    .bind(session.items_amount_cents)
    .bind(session.total_amount)
    .bind(session.is_active)
    .bind(&session.notes)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Writes the mutable descriptive fields of a session.
pub(crate) async fn update_details(
    conn: &mut SqliteConnection,
    session: &TableSession,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE table_sessions
        SET customer_name = ?, number_of_people = ?, notes = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&session.customer_name)
    .bind(session.number_of_people)
    .bind(&session.notes)
    .bind(session.updated_at)
    .bind(&session.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub(crate) async fn insert_item(conn: &mut SqliteConnection, item: &SessionItem) -> DbResult<()> {
    debug!(
        session_id = %item.session_id,
        inventory_item_id = %item.inventory_item_id,
        quantity = item.quantity,
        "Adding session item"
    );
    sqlx::query(
        r#"
        INSERT INTO session_items (
            id, session_id, inventory_item_id, item_name, quantity,
            unit_price_cents, total_price_cents, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&item.id)
    .bind(&item.session_id)
    .bind(&item.inventory_item_id)
    .bind(&item.item_name)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.total_price_cents)
    .bind(item.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub(crate) async fn update_item_quantity(
    conn: &mut SqliteConnection,
    item: &SessionItem,
) -> DbResult<()> {
    debug!(
        id = %item.id,
        quantity = item.quantity,
        total_price_cents = item.total_price_cents,
        "Updating session item quantity"
    );
    sqlx::query("UPDATE session_items SET quantity = ?, total_price_cents = ? WHERE id = ?")
        .bind(item.quantity)
        .bind(item.total_price_cents)
        .bind(&item.id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub(crate) async fn delete_item(conn: &mut SqliteConnection, item_id: &str) -> DbResult<()> {
    sqlx::query("DELETE FROM session_items WHERE id = ?")
        .bind(item_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Sets `items_amount_cents` to the sum of the session's line totals.
pub(crate) async fn recompute_items_amount(
    conn: &mut SqliteConnection,
    session_id: &str,
    now: DateTime<Utc>,
) -> DbResult<i64> {
    let items_amount: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_price_cents), 0) FROM session_items WHERE session_id = ?",
    )
    .bind(session_id)
    .fetch_one(&mut *conn)
    .await?;

    sqlx::query("UPDATE table_sessions SET items_amount_cents = ?, updated_at = ? WHERE id = ?")
        .bind(items_amount)
        .bind(now)
        .bind(session_id)
        .execute(&mut *conn)
        .await?;

    debug!(session_id = %session_id, items_amount_cents = items_amount, "Recomputed items amount");
    Ok(items_amount)
}

/// Stamps the end time and frozen total, and clears the active flag.
pub(crate) async fn mark_closed(
    conn: &mut SqliteConnection,
    session_id: &str,
    end_time: DateTime<Utc>,
    total_amount: f64,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        UPDATE table_sessions
        SET end_time = ?, total_amount = ?, is_active = 0, updated_at = ?
        WHERE id = ? AND is_active = 1
        "#,
    )
    .bind(end_time)
    .bind(total_amount)
    .bind(now)
    .bind(session_id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
