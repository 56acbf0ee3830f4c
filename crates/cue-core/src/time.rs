//! # Client Timestamps
//!
//! Callers send timestamps either with an explicit UTC offset or without any
//! zone at all. Subtracting the two kinds directly would be meaningless, so
//! every caller-supplied instant goes through [`ClientTimestamp::to_utc`]
//! before billing arithmetic.
//!
//! ```text
//! "2024-05-01T19:30:00+05:30"  ──► Zoned  ──┐
//!                                           ├──► DateTime<Utc>
//! "2024-05-01T14:00:00"        ──► Naive  ──┘    (naive = UTC)
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Accepted layouts for zone-less timestamps.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A timestamp as the caller wrote it, with or without an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClientTimestamp {
    /// No zone given. Interpreted as UTC.
    Naive(NaiveDateTime),
    /// Explicit offset given.
    Zoned(DateTime<FixedOffset>),
}

impl ClientTimestamp {
    /// Parses RFC 3339 first, then the naive layouts.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ClientTimestamp::Zoned(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Ok(ClientTimestamp::Zoned(dt));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(ClientTimestamp::Naive)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "timestamp",
                    format!("'{raw}' is not an RFC 3339 or YYYY-MM-DD HH:MM[:SS] value"),
                )
            })
    }

    /// Normalizes to UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            ClientTimestamp::Naive(naive) => naive.and_utc(),
            ClientTimestamp::Zoned(zoned) => zoned.with_timezone(&Utc),
        }
    }
}

impl From<DateTime<Utc>> for ClientTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        ClientTimestamp::Zoned(dt.fixed_offset())
    }
}

impl FromStr for ClientTimestamp {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClientTimestamp::parse(s)
    }
}

impl TryFrom<String> for ClientTimestamp {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ClientTimestamp::parse(&value)
    }
}

impl From<ClientTimestamp> for String {
    fn from(ts: ClientTimestamp) -> Self {
        ts.to_string()
    }
}

impl fmt::Display for ClientTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientTimestamp::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
            ClientTimestamp::Zoned(zoned) => write!(f, "{}", zoned.to_rfc3339()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
