//! Medicine models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Date format used at the persistence boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A medicine tracked by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicineRecord {
    /// Unique ID, assigned on creation
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display name (never empty)
    pub name: String,
    /// Dosage (e.g., "500mg")
    pub dosage: Option<String>,
    /// Frequency (e.g., "twice daily")
    pub frequency: Option<String>,
    /// Expiry date, no time component
    pub expiry_date: NaiveDate,
    /// Units left in the pack
    pub stock_remaining: Option<u32>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl MedicineRecord {
    /// Expiry date in `YYYY-MM-DD` form.
    pub fn expiry_date_string(&self) -> String {
        self.expiry_date.format(DATE_FORMAT).to_string()
    }
}

/// Reasons a medicine submission is rejected before any write.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter medicine name")]
    MissingName,

    #[error("Please enter expiry date")]
    MissingExpiryDate,

    #[error("Expiry date is not a valid YYYY-MM-DD date: {0}")]
    InvalidExpiryDate(String),

    #[error("Stock must be a non-negative whole number: {0}")]
    InvalidStock(String),
}

/// Medicine form input, exactly as typed (or auto-filled from a label scan).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NewMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub expiry_date: String,
    pub stock: String,
    pub notes: String,
}

/// Medicine input that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidMedicine {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub expiry_date: NaiveDate,
    pub stock_remaining: Option<u32>,
    pub notes: Option<String>,
}

impl NewMedicine {
    /// Check required fields and parse typed values.
    pub fn validate(&self) -> Result<ValidMedicine, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }

        let expiry = self.expiry_date.trim();
        if expiry.is_empty() {
            return Err(ValidationError::MissingExpiryDate);
        }
        let expiry_date = NaiveDate::parse_from_str(expiry, DATE_FORMAT)
            .map_err(|_| ValidationError::InvalidExpiryDate(expiry.to_string()))?;

        let stock = self.stock.trim();
        let stock_remaining = if stock.is_empty() {
            None
        } else {
            Some(
                stock
                    .parse::<u32>()
                    .map_err(|_| ValidationError::InvalidStock(stock.to_string()))?,
            )
        };

        Ok(ValidMedicine {
            name: name.to_string(),
            dosage: non_empty(&self.dosage),
            frequency: non_empty(&self.frequency),
            expiry_date,
            stock_remaining,
            notes: non_empty(&self.notes),
        })
    }
}

impl ValidMedicine {
    /// Turn into a record owned by `user_id`, assigning ID and timestamp.
    pub fn into_record(self, user_id: &str) -> MedicineRecord {
        MedicineRecord {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: self.name,
            dosage: self.dosage,
            frequency: self.frequency,
            expiry_date: self.expiry_date,
            stock_remaining: self.stock_remaining,
            notes: self.notes,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
