//! # Domain Types
//!
//! Core domain types used throughout the club backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   owns    ┌─────────────────┐                      │
//! │  │  TableSession   │ ────────► │  SessionItem    │                      │
//! │  │  ─────────────  │  1 .. *   │  ─────────────  │                      │
//! │  │  id (UUID)      │           │  id (UUID)      │                      │
//! │  │  table_number   │           │  session_id FK  │                      │
//! │  │  hourly_rate    │           │  unit_price     │ ◄── snapshot          │
//! │  │  items_amount   │           │  total_price    │                      │
//! │  │  total_amount   │           └────────┬────────┘                      │
//! │  └─────────────────┘                    │ references (never owns)       │
//! │                                         ▼                               │
//! │  ┌─────────────────┐           ┌─────────────────┐                      │
//! │  │     Admin       │           │ InventoryItem   │                      │
//! │  │  username       │           │ item_name       │                      │
//! │  │  password_hash  │           │ selling_price   │                      │
//! │  └─────────────────┘           └─────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity uses a UUID v4 string as `id`. Amounts that start life as a
//! price are integer cents; see [`crate::money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::money::Money;
use crate::time::ClientTimestamp;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Table Session
// =============================================================================

/// One occupancy of a billiard table, from open to close.
///
/// ## Lifecycle
/// ```text
/// open ──► (update | add item | remove item)* ──► close (terminal)
///
/// is_active:     true ─────────────────────────────► false
/// end_time:      None ─────────────────────────────► Some(t)
/// total_amount:  0.0  ─────────────────────────────► table + items (frozen)
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TableSession {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Physical table number. Selects the rate class.
    pub table_number: i64,

    pub customer_name: String,

    /// Party size. Recorded for the club's records, not priced.
    pub number_of_people: i64,

    /// Hourly rate in cents, fixed when the session opened.
    pub hourly_rate_cents: i64,

    pub start_time: DateTime<Utc>,

    /// Set exactly once, at close.
    pub end_time: Option<DateTime<Utc>>,

    /// Sum of the line items' `total_price_cents`.
    pub items_amount_cents: i64,

    /// Unrounded grand total in major units. 0.0 while active.
    pub total_amount: f64,

    pub is_active: bool,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TableSession {
    /// Returns the hourly rate as Money.
    #[inline]
    pub fn hourly_rate(&self) -> Money {
        Money::from_cents(self.hourly_rate_cents)
    }

    /// Returns the item charges as Money.
    #[inline]
    pub fn items_amount(&self) -> Money {
        Money::from_cents(self.items_amount_cents)
    }

    /// A session is closed once it carries an end time and is no longer active.
    #[inline]
    pub fn is_closed(&self) -> bool {
        !self.is_active && self.end_time.is_some()
    }
}

// =============================================================================
// Session Item
// =============================================================================

/// A line item on a session.
/// Uses snapshot pattern to freeze inventory data at the time of the first add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SessionItem {
    pub id: String,
    pub session_id: String,
    pub inventory_item_id: String,
    /// Item name at time of first add (frozen).
    pub item_name: String,
    pub quantity: i64,
    /// Unit price in cents at time of first add (frozen).
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub total_price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl SessionItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

/// A session together with its line items in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: TableSession,
    pub items: Vec<SessionItem>,
}

impl SessionDetail {
    /// Sum of the line totals as currently loaded.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(SessionItem::total_price).sum()
    }
}

// =============================================================================
// Inventory Item
// =============================================================================

/// A sellable item (drinks, snacks, chalk) on the club's price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: String,

    /// Display name. Unique across the ledger.
    pub item_name: String,

    /// Current price in cents. Sessions snapshot this when an item is added.
    pub selling_price_cents: i64,

    /// Per-unit margin in cents, for the club's bookkeeping.
    pub margin_cents: i64,

    /// Whether item is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    /// Returns the selling price as Money.
    #[inline]
    pub fn selling_price(&self) -> Money {
        Money::from_cents(self.selling_price_cents)
    }
}

// =============================================================================
// Admin
// =============================================================================

/// A club staff account allowed to use the API.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Admin {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    /// Argon2 PHC string. Never leaves the server.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Commands / Inputs
// =============================================================================

/// Input for opening a table.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    pub table_number: i64,
    pub customer_name: String,
    pub number_of_people: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update of an active session. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionUpdate {
    pub customer_name: Option<String>,
    pub number_of_people: Option<i64>,
    /// Absent: unchanged. `null`: cleared. A string: replaced.
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

/// Marks a field as present, so `null` is kept apart from a missing field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.customer_name.is_none() && self.number_of_people.is_none() && self.notes.is_none()
    }
}

/// Input for adding an inventory item to a session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSessionItem {
    pub inventory_item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Input for closing a session. `end_time` defaults to now.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseSession {
    #[serde(default)]
    pub end_time: Option<ClientTimestamp>,
}

/// A session that already happened, entered after the fact.
///
/// Every value is taken as supplied. Nothing is looked up or recomputed.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoricalSession {
    pub table_number: i64,
    pub customer_name: String,
    pub number_of_people: i64,
    pub start_time: ClientTimestamp,
    pub end_time: ClientTimestamp,
    pub hourly_rate_cents: i64,
    pub total_amount: f64,
    #[serde(default)]
    pub items_amount_cents: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for creating an inventory item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewInventoryItem {
    pub item_name: String,
    pub selling_price_cents: i64,
    #[serde(default)]
    pub margin_cents: i64,
}

/// Partial update of an inventory item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryItemUpdate {
    pub item_name: Option<String>,
    pub selling_price_cents: Option<i64>,
    pub margin_cents: Option<i64>,
    pub is_active: Option<bool>,
}

/// Input for registering an admin. The password is hashed before storage.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAdmin {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub password: String,
}

/// Partial update of an admin. A new password is re-hashed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Listing
// =============================================================================

/// Pagination and filtering for list endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub active_only: bool,
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
            active_only: false,
        }
    }
}

impl ListQuery {
    /// Clamps `skip` to ≥ 0 and `limit` to `1..=MAX_PAGE_SIZE`.
    pub fn clamped(self) -> Self {
        ListQuery {
            skip: self.skip.max(0),
            limit: self.limit.clamp(1, MAX_PAGE_SIZE),
            active_only: self.active_only,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session() -> TableSession {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        TableSession {
            id: "s-1".to_string(),
            table_number: 1,
            customer_name: "Ravi".to_string(),
            number_of_people: 2,
            hourly_rate_cents: 14_000,
            start_time: t0,
            end_time: None,
            items_amount_cents: 0,
            total_amount: 0.0,
            is_active: true,
            notes: None,
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn test_session_detail_flattens_session_fields() {
        let detail = SessionDetail {
            session: session(),
            items: vec![],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["table_number"], 1);
        assert_eq!(json["hourly_rate_cents"], 14_000);
        assert!(json["items"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_is_closed() {
        let mut s = session();
        assert!(!s.is_closed());
        s.is_active = false;
        s.end_time = Some(s.start_time + chrono::Duration::hours(1));
        assert!(s.is_closed());
    }

    #[test]
    fn test_admin_hides_password_hash() {
        let t0 = Utc::now();
        let admin = Admin {
            id: "a-1".into(),
            username: "frontdesk".into(),
            email: "desk@club.local".into(),
            full_name: None,
            password_hash: "$argon2id$secret".into(),
            is_active: true,
            is_superuser: false,
            created_at: t0,
            updated_at: t0,
        };
        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_list_query_clamped() {
        let q = ListQuery {
            skip: -4,
            limit: 10_000,
            active_only: true,
        }
        .clamped();
        assert_eq!(q.skip, 0);
        assert_eq!(q.limit, MAX_PAGE_SIZE);
        assert!(q.active_only);

        let q: ListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_session_update_tells_null_from_absent() {
        let absent: SessionUpdate = serde_json::from_str(r#"{"customer_name":"Ravi"}"#).unwrap();
        assert_eq!(absent.notes, None);

        let cleared: SessionUpdate = serde_json::from_str(r#"{"notes":null}"#).unwrap();
        assert_eq!(cleared.notes, Some(None));
        assert!(!cleared.is_empty());

        let replaced: SessionUpdate = serde_json::from_str(r#"{"notes":"window table"}"#).unwrap();
        assert_eq!(replaced.notes, Some(Some("window table".to_string())));
    }

    #[test]
    fn test_new_session_item_defaults_quantity() {
        let item: NewSessionItem = serde_json::from_str(r#"{"inventory_item_id":"i-1"}"#).unwrap();
        assert_eq!(item.quantity, 1);
    }
}
