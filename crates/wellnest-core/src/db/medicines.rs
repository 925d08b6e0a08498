//! Medicine database operations.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{MedicineRecord, DATE_FORMAT};

const MEDICINE_COLUMNS: &str = "id, user_id, name, dosage, frequency, expiry_date, stock_remaining, notes, created_at";

impl Database {
    /// Insert a new medicine.
    pub fn insert_medicine(&self, medicine: &MedicineRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO medicines (
                id, user_id, name, dosage, frequency, expiry_date,
                stock_remaining, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                medicine.id,
                medicine.user_id,
                medicine.name,
                medicine.dosage,
                medicine.frequency,
                medicine.expiry_date_string(),
                medicine.stock_remaining,
                medicine.notes,
                medicine.created_at,
            ],
        )?;
        tracing::info!(user_id = %medicine.user_id, medicine_id = %medicine.id, "Inserted medicine");
        Ok(())
    }

    /// Get one of the user's medicines by ID.
    pub fn get_medicine(&self, user_id: &str, id: &str) -> DbResult<Option<MedicineRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM medicines WHERE user_id = ?1 AND id = ?2", MEDICINE_COLUMNS),
                [user_id, id],
                MedicineRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List the user's medicines, soonest expiry first.
    pub fn list_medicines(&self, user_id: &str) -> DbResult<Vec<MedicineRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM medicines WHERE user_id = ? ORDER BY expiry_date ASC, name ASC",
            MEDICINE_COLUMNS
        ))?;

        let rows = stmt.query_map([user_id], MedicineRow::from_row)?;

        let mut medicines = Vec::new();
        for row in rows {
            medicines.push(row?.try_into()?);
        }
        tracing::debug!(user_id, count = medicines.len(), "Listed medicines");
        Ok(medicines)
    }

    /// Permanently delete one of the user's medicines.
    pub fn delete_medicine(&self, user_id: &str, id: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM medicines WHERE user_id = ? AND id = ?",
            [user_id, id],
        )?;
        tracing::info!(user_id, medicine_id = id, deleted = rows_affected > 0, "Deleted medicine");
        Ok(rows_affected > 0)
    }
}

/// Intermediate row struct for database mapping.
struct MedicineRow {
    id: String,
    user_id: String,
    name: String,
    dosage: Option<String>,
    frequency: Option<String>,
    expiry_date: String,
    stock_remaining: Option<u32>,
    notes: Option<String>,
    created_at: String,
}

impl MedicineRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            dosage: row.get(3)?,
            frequency: row.get(4)?,
            expiry_date: row.get(5)?,
            stock_remaining: row.get(6)?,
            notes: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

impl TryFrom<MedicineRow> for MedicineRecord {
    type Error = DbError;

    fn try_from(row: MedicineRow) -> Result<Self, Self::Error> {
        let expiry_date = NaiveDate::parse_from_str(&row.expiry_date, DATE_FORMAT).map_err(|_| {
            DbError::Constraint(format!(
                "Medicine {} has malformed expiry date: {}",
                row.id, row.expiry_date
            ))
        })?;

        Ok(MedicineRecord {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            dosage: row.dosage,
            frequency: row.frequency,
            expiry_date,
            stock_remaining: row.stock_remaining,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
