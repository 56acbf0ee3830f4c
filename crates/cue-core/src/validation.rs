//! # Validation Module
//!
//! Input validation for every command that reaches the lifecycle manager or
//! a repository.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: HTTP extractor (club-api)                                    │
//! │  └── JSON shape and types (deserialization)                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules: names, quantities, prices, party size             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE (item_name, username, email)                               │
//! │  ├── Partial UNIQUE (one active session per table)                     │
//! │  └── Foreign keys with cascade                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cue_core::validation::{validate_customer_name, validate_quantity};
//!
//! validate_customer_name("Ravi").unwrap();
//! validate_quantity(2).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{
    AdminUpdate, InventoryItemUpdate, NewAdmin, NewInventoryItem, NewSession, SessionUpdate,
};
use crate::{MAX_ITEM_QUANTITY, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_CUSTOMER_NAME: usize = 100;
const MAX_ITEM_NAME: usize = 100;
const MAX_NOTES: usize = 1_000;
const MIN_USERNAME: usize = 3;
const MAX_USERNAME: usize = 50;
const MIN_PASSWORD: usize = 8;

// =============================================================================
// String Validators
// =============================================================================

fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates the name a session is booked under.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
pub fn validate_customer_name(name: &str) -> ValidationResult<()> {
    validate_text("customer_name", name, MAX_CUSTOMER_NAME)
}

/// Validates an inventory item name.
///
/// ## Example
/// ```rust
/// use cue_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Lime Soda").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_text("item_name", name, MAX_ITEM_NAME)
}

pub fn validate_notes(notes: Option<&str>) -> ValidationResult<()> {
    match notes {
        Some(notes) if notes.chars().count() > MAX_NOTES => Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES,
        }),
        _ => Ok(()),
    }
}

/// Validates an admin username.
///
/// ## Rules
/// - 3 to 50 characters
/// - Letters, digits, `.`, `-`, `_` only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }
    if username.len() < MIN_USERNAME {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: MIN_USERNAME,
        });
    }
    if username.len() > MAX_USERNAME {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME,
        });
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
    {
        return Err(ValidationError::invalid_format(
            "username",
            "must contain only letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(())
}

/// Minimal structural check: one `@` with text on both sides and a dot in the domain.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::invalid_format(
            "email",
            "must look like name@example.com",
        ));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line item quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

pub fn validate_table_number(table_number: i64) -> ValidationResult<()> {
    if table_number < 1 {
        return Err(ValidationError::MustBePositive {
            field: "table_number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_number_of_people(people: i64) -> ValidationResult<()> {
    if people < 1 {
        return Err(ValidationError::MustBePositive {
            field: "number_of_people".to_string(),
        });
    }
    Ok(())
}

/// Validates a price or margin in cents. Zero is allowed (free items).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_PRICE_CENTS
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }
    Ok(())
}

// =============================================================================
// Command Validators
// =============================================================================

pub fn validate_new_session(input: &NewSession) -> ValidationResult<()> {
    validate_table_number(input.table_number)?;
    validate_customer_name(&input.customer_name)?;
    validate_number_of_people(input.number_of_people)?;
    validate_notes(input.notes.as_deref())
}

pub fn validate_session_update(input: &SessionUpdate) -> ValidationResult<()> {
    if let Some(name) = &input.customer_name {
        validate_customer_name(name)?;
    }
    if let Some(people) = input.number_of_people {
        validate_number_of_people(people)?;
    }
    validate_notes(input.notes.as_ref().and_then(|notes| notes.as_deref()))
}

pub fn validate_new_inventory_item(input: &NewInventoryItem) -> ValidationResult<()> {
    validate_item_name(&input.item_name)?;
    validate_price_cents("selling_price_cents", input.selling_price_cents)?;
    validate_price_cents("margin_cents", input.margin_cents)
}

pub fn validate_inventory_item_update(input: &InventoryItemUpdate) -> ValidationResult<()> {
    if let Some(name) = &input.item_name {
        validate_item_name(name)?;
    }
    if let Some(price) = input.selling_price_cents {
        validate_price_cents("selling_price_cents", price)?;
    }
    if let Some(margin) = input.margin_cents {
        validate_price_cents("margin_cents", margin)?;
    }
    Ok(())
}

pub fn validate_new_admin(input: &NewAdmin) -> ValidationResult<()> {
    validate_username(&input.username)?;
    validate_email(&input.email)?;
    validate_password(&input.password)
}

pub fn validate_admin_update(input: &AdminUpdate) -> ValidationResult<()> {
    if let Some(email) = &input.email {
        validate_email(email)?;
    }
    if let Some(password) = &input.password {
        validate_password(password)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(matches!(
            validate_quantity(1000),
            Err(ValidationError::OutOfRange { max: 999, .. })
        ));
    }

    #[test]
    fn test_validate_customer_name() {
        assert!(validate_customer_name("Ravi").is_ok());
        assert!(validate_customer_name("").is_err());
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name(&"x".repeat(100)).is_ok());
        assert!(validate_customer_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_new_session() {
        let ok = NewSession {
            table_number: 1,
            customer_name: "Ravi".into(),
            number_of_people: 2,
            notes: None,
        };
        assert!(validate_new_session(&ok).is_ok());

        let no_people = NewSession {
            number_of_people: 0,
            ..ok.clone()
        };
        assert!(validate_new_session(&no_people).is_err());

        let bad_table = NewSession {
            table_number: 0,
            ..ok
        };
        assert!(validate_new_session(&bad_table).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("front.desk_2").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("desk@club.local").is_ok());
        assert!(validate_email("desk.club.local").is_err());
        assert!(validate_email("@club.local").is_err());
        assert!(validate_email("desk@local").is_err());
    }

    #[test]
    fn test_validate_prices() {
        assert!(validate_price_cents("selling_price_cents", 0).is_ok());
        assert!(validate_price_cents("selling_price_cents", -1).is_err());
        assert!(validate_price_cents("selling_price_cents", MAX_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents("selling_price_cents", MAX_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { .. })
        ));

        let item = NewInventoryItem {
            item_name: "Chalk".into(),
            selling_price_cents: 1_000,
            margin_cents: -5,
        };
        assert!(validate_new_inventory_item(&item).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());
        assert!(validate_password("short").is_err());
    }
}
