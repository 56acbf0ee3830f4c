//! # Billing
//!
//! Turns a session's time span, hourly rate and item charges into money.
//!
//! ## Two Outputs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  settle(start, end, rate, items)  ──►  Settlement   (unrounded)         │
//! │        │                                  │                             │
//! │        │                                  └──► stored as total_amount   │
//! │        │                                                                │
//! │  Bill::compute(start, end, rate, items) ──► Bill    (2 decimals)        │
//! │                                               │                         │
//! │                                               └──► shown to the customer│
//! │                                                                         │
//! │  hours         = (end - start) in ms / 3_600_000                        │
//! │  table_charges = hours × hourly_rate                                    │
//! │  total_amount  = table_charges + items_amount                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding happens only in [`Bill`]. The stored total is the raw sum, so a
//! bill's `total_amount` may differ from the stored one in the last cent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TableSession;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours between two instants, as a fraction.
pub fn hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// The frozen charges computed when a session closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub table_charges: f64,
    pub total_amount: f64,
}

/// Computes the unrounded charges for a time span.
pub fn settle(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_rate: Money,
    items_amount: Money,
) -> Settlement {
    let table_charges = hours_between(start, end) * hourly_rate.to_major();
    Settlement {
        table_charges,
        total_amount: table_charges + items_amount.to_major(),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Customer-facing bill breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub time_played_hours: f64,
    /// Whole minutes played, truncated.
    pub time_played_minutes: i64,
    pub table_charges: f64,
    pub items_charges: f64,
    pub total_amount: f64,
}

impl Bill {
    /// Bills a time span at a given rate.
    pub fn compute(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        hourly_rate: Money,
        items_amount: Money,
    ) -> Self {
        let hours = hours_between(start, end);
        let settlement = settle(start, end, hourly_rate, items_amount);
        Bill {
            time_played_hours: round2(hours),
            time_played_minutes: (end - start).num_minutes(),
            table_charges: round2(settlement.table_charges),
            items_charges: round2(items_amount.to_major()),
            total_amount: round2(settlement.total_amount),
        }
    }

    /// Final bill of a closed session.
    pub fn for_session(session: &TableSession) -> CoreResult<Self> {
        match session.end_time {
            Some(end) if !session.is_active => Ok(Bill::compute(
                session.start_time,
                end,
                session.hourly_rate(),
                session.items_amount(),
            )),
            _ => Err(CoreError::SessionStillActive(session.id.clone())),
        }
    }

    /// Running bill of an active session, as if it closed at `at`.
    pub fn preview(session: &TableSession, at: DateTime<Utc>) -> Self {
        let end = session.end_time.unwrap_or(at);
        Bill::compute(
            session.start_time,
            end,
            session.hourly_rate(),
            session.items_amount(),
        )
    }
}

/// A bill tied to its session, either final or a running preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionBill {
    pub session_id: String,
    pub table_number: i64,
    /// False while the session is still open.
    pub is_final: bool,
    #[serde(flatten)]
    pub bill: Bill,
}

impl SessionBill {
    /// Final bill for a closed session, running preview otherwise.
    pub fn for_session(session: &TableSession, now: DateTime<Utc>) -> Self {
        let (bill, is_final) = match Bill::for_session(session) {
            Ok(bill) => (bill, true),
            Err(_) => (Bill::preview(session, now), false),
        };
        SessionBill {
            session_id: session.id.clone(),
            table_number: session.table_number,
            is_final,
            bill,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()
    }

    fn active_session(rate_cents: i64, items_cents: i64) -> TableSession {
        TableSession {
            id: "s-1".to_string(),
            table_number: 1,
            customer_name: "Meera".to_string(),
            number_of_people: 4,
            hourly_rate_cents: rate_cents,
            start_time: t0(),
            end_time: None,
            items_amount_cents: items_cents,
            total_amount: 0.0,
            is_active: true,
            notes: None,
            created_at: t0(),
            updated_at: t0(),
        }
    }

    #[test]
    fn test_two_hours_at_140_plus_50() {
        let s = settle(
            t0(),
            t0() + Duration::hours(2),
            Money::from_cents(14_000),
            Money::from_cents(5_000),
        );
        assert_eq!(s.table_charges, 280.0);
        assert_eq!(s.total_amount, 330.0);
    }

    #[test]
    fn test_ninety_minute_breakdown() {
        let bill = Bill::compute(
            t0(),
            t0() + Duration::minutes(90),
            Money::from_cents(14_000),
            Money::from_cents(5_000),
        );
        assert_eq!(bill.time_played_hours, 1.5);
        assert_eq!(bill.time_played_minutes, 90);
        assert_eq!(bill.table_charges, 210.0);
        assert_eq!(bill.items_charges, 50.0);
        assert_eq!(bill.total_amount, 260.0);
    }

    #[test]
    fn test_rounding_happens_only_in_bill() {
        // 20 minutes at 140.00/h = 46.666...
        let end = t0() + Duration::minutes(20);
        let rate = Money::from_cents(14_000);
        let s = settle(t0(), end, rate, Money::zero());
        assert!((s.total_amount - 46.666_666).abs() < 1e-4);

        let bill = Bill::compute(t0(), end, rate, Money::zero());
        assert_eq!(bill.table_charges, 46.67);
        assert_eq!(bill.time_played_hours, 0.33);
        assert_eq!(bill.time_played_minutes, 20);
    }

    #[test]
    fn test_minutes_truncate() {
        let end = t0() + Duration::seconds(59 * 60 + 59);
        let bill = Bill::compute(t0(), end, Money::from_cents(14_000), Money::zero());
        assert_eq!(bill.time_played_minutes, 59);
    }

    #[test]
    fn test_for_session_requires_closed() {
        let session = active_session(14_000, 0);
        let err = Bill::for_session(&session).unwrap_err();
        assert!(matches!(err, CoreError::SessionStillActive(_)));
    }

    #[test]
    fn test_preview_and_final() {
        let mut session = active_session(18_000, 2_500);
        let at = t0() + Duration::hours(1);

        let preview = SessionBill::for_session(&session, at);
        assert!(!preview.is_final);
        assert_eq!(preview.bill.table_charges, 180.0);
        assert_eq!(preview.bill.total_amount, 205.0);

        session.is_active = false;
        session.end_time = Some(t0() + Duration::minutes(30));
        let fin = SessionBill::for_session(&session, at);
        assert!(fin.is_final);
        assert_eq!(fin.bill.table_charges, 90.0);
        assert_eq!(fin.bill.total_amount, 115.0);
    }
}
