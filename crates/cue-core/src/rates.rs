//! # Rate Table
//!
//! Maps a table number to its rate class and hourly rate.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  class          tables      hourly rate      │
//! │  ────────────   ─────────   ───────────      │
//! │  pool *         1, 2        140.00           │
//! │  mini_snooker   3           180.00           │
//! │                                              │
//! │  * default class: any other table number     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The rate never depends on party size. Unknown table numbers are billed at
//! the default class rate rather than rejected.
//!
//! The table is read once from configuration. [`RateTableConfig`] is the raw
//! serde shape; converting it into a [`RateTable`] validates it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

/// A named group of tables sharing one hourly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateClass {
    pub name: String,
    pub hourly_rate_cents: i64,
    #[serde(default)]
    pub tables: Vec<i64>,
}

impl RateClass {
    pub fn new(name: impl Into<String>, hourly_rate_cents: i64, tables: Vec<i64>) -> Self {
        RateClass {
            name: name.into(),
            hourly_rate_cents,
            tables,
        }
    }

    #[inline]
    pub fn hourly_rate(&self) -> Money {
        Money::from_cents(self.hourly_rate_cents)
    }
}

/// Unvalidated rate table, as written in the config file.
///
/// ```toml
/// [rates]
/// default_class = "pool"
///
/// [[rates.classes]]
/// name = "pool"
/// hourly_rate_cents = 14000
/// tables = [1, 2]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTableConfig {
    pub default_class: String,
    pub classes: Vec<RateClass>,
}

/// Validated table-number → hourly-rate lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RateTableConfig", into = "RateTableConfig")]
pub struct RateTable {
    classes: Vec<RateClass>,
    default_index: usize,
}

impl RateTable {
    /// Returns the class a table belongs to, or the default class.
    pub fn class_for(&self, table_number: i64) -> &RateClass {
        self.classes
            .iter()
            .find(|class| class.tables.contains(&table_number))
            .unwrap_or(&self.classes[self.default_index])
    }

    /// Returns the hourly rate for a table.
    pub fn rate_for(&self, table_number: i64) -> Money {
        self.class_for(table_number).hourly_rate()
    }

    pub fn default_class(&self) -> &RateClass {
        &self.classes[self.default_index]
    }

    pub fn classes(&self) -> &[RateClass] {
        &self.classes
    }
}

impl Default for RateTable {
    fn default() -> Self {
        RateTable {
            classes: vec![
                RateClass::new("pool", 14_000, vec![1, 2]),
                RateClass::new("mini_snooker", 18_000, vec![3]),
            ],
            default_index: 0,
        }
    }
}

impl TryFrom<RateTableConfig> for RateTable {
    type Error = ValidationError;

    fn try_from(config: RateTableConfig) -> Result<Self, Self::Error> {
        if config.classes.is_empty() {
            return Err(ValidationError::Required {
                field: "rates.classes".to_string(),
            });
        }

        let mut names = HashSet::new();
        let mut seen_tables = HashSet::new();
        for class in &config.classes {
            if class.name.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: "rates.classes.name".to_string(),
                });
            }
            if !names.insert(class.name.as_str()) {
                return Err(ValidationError::Duplicate {
                    field: "rate class".to_string(),
                    value: class.name.clone(),
                });
            }
            if class.hourly_rate_cents < 0 {
                return Err(ValidationError::MustNotBeNegative {
                    field: format!("rates.{}.hourly_rate_cents", class.name),
                });
            }
            for table in &class.tables {
                if !seen_tables.insert(*table) {
                    return Err(ValidationError::Duplicate {
                        field: "table number".to_string(),
                        value: table.to_string(),
                    });
                }
            }
        }

        let default_index = config
            .classes
            .iter()
            .position(|class| class.name == config.default_class)
            .ok_or_else(|| {
                ValidationError::invalid_format(
                    "rates.default_class",
                    format!("no class named '{}'", config.default_class),
                )
            })?;

        Ok(RateTable {
            classes: config.classes,
            default_index,
        })
    }
}

impl From<RateTable> for RateTableConfig {
    fn from(table: RateTable) -> Self {
        RateTableConfig {
            default_class: table.classes[table.default_index].name.clone(),
            classes: table.classes,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        let rates = RateTable::default();
        assert_eq!(rates.rate_for(1).cents(), 14_000);
        assert_eq!(rates.rate_for(2).cents(), 14_000);
        assert_eq!(rates.rate_for(3).cents(), 18_000);
        assert_eq!(rates.class_for(3).name, "mini_snooker");
    }

    #[test]
    fn test_unknown_table_falls_back_to_default_class() {
        let rates = RateTable::default();
        assert_eq!(rates.class_for(42).name, "pool");
        assert_eq!(rates.rate_for(0).cents(), 14_000);
        assert_eq!(rates.rate_for(-7).cents(), 14_000);
    }

    #[test]
    fn test_from_toml() {
        let toml_src = r#"
            default_class = "snooker"

            [[classes]]
            name = "pool"
            hourly_rate_cents = 15000
            tables = [1, 2, 3]

            [[classes]]
            name = "snooker"
            hourly_rate_cents = 25000
            tables = [4]
        "#;
        let rates: RateTable = toml::from_str(toml_src).unwrap();
        assert_eq!(rates.rate_for(3).cents(), 15_000);
        assert_eq!(rates.rate_for(4).cents(), 25_000);
        assert_eq!(rates.rate_for(9).cents(), 25_000);
        assert_eq!(rates.default_class().name, "snooker");
    }

    #[test]
    fn test_rejects_unknown_default_class() {
        let config = RateTableConfig {
            default_class: "carom".into(),
            classes: vec![RateClass::new("pool", 14_000, vec![1])],
        };
        assert!(RateTable::try_from(config).is_err());
    }

    #[test]
    fn test_rejects_table_in_two_classes() {
        let config = RateTableConfig {
            default_class: "pool".into(),
            classes: vec![
                RateClass::new("pool", 14_000, vec![1, 2]),
                RateClass::new("snooker", 18_000, vec![2]),
            ],
        };
        let err = RateTable::try_from(config).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { .. }));
    }

    #[test]
    fn test_rejects_negative_rate() {
        let config = RateTableConfig {
            default_class: "pool".into(),
            classes: vec![RateClass::new("pool", -1, vec![1])],
        };
        assert!(RateTable::try_from(config).is_err());
    }

    #[test]
    fn test_serializes_through_config_shape() {
        let json = serde_json::to_value(RateTable::default()).unwrap();
        assert_eq!(json["default_class"], "pool");
        assert_eq!(json["classes"][1]["hourly_rate_cents"], 18_000);
    }
}
