//! Daily completion database operations.

use rusqlite::params;

use super::{Database, DbError, DbResult};
use crate::ledger::CompletionStore;
use crate::models::{CompletionEntry, DayNumber, PlanType};

impl CompletionStore for Database {
    fn list_completions(&self, user_id: &str) -> DbResult<Vec<CompletionEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT plan_type, day_number, completed_at
            FROM daily_completions
            WHERE user_id = ?
            ORDER BY plan_type, day_number
            "#,
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok(CompletionRow {
                plan_type: row.get(0)?,
                day_number: row.get(1)?,
                completed_at: row.get(2)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }

    fn insert_completion(&self, user_id: &str, entry: &CompletionEntry) -> DbResult<()> {
        // Upsert: re-marking a day just refreshes the timestamp
        self.conn.execute(
            r#"
            INSERT INTO daily_completions (user_id, plan_type, day_number, completed_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (user_id, plan_type, day_number)
            DO UPDATE SET completed_at = excluded.completed_at
            "#,
            params![
                user_id,
                entry.plan_type.as_str(),
                entry.day.get(),
                entry.completed_at,
            ],
        )?;
        Ok(())
    }

    fn delete_completion(&self, user_id: &str, plan_type: PlanType, day: DayNumber) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM daily_completions WHERE user_id = ?1 AND plan_type = ?2 AND day_number = ?3",
            params![user_id, plan_type.as_str(), day.get()],
        )?;
        Ok(rows_affected > 0)
    }

    fn clear_completions(&self, user_id: &str, plan_type: PlanType) -> DbResult<usize> {
        let rows_affected = self.conn.execute(
            "DELETE FROM daily_completions WHERE user_id = ?1 AND plan_type = ?2",
            params![user_id, plan_type.as_str()],
        )?;
        Ok(rows_affected)
    }
}

/// Intermediate row struct for database mapping.
struct CompletionRow {
    plan_type: String,
    day_number: u8,
    completed_at: String,
}

impl TryFrom<CompletionRow> for CompletionEntry {
    type Error = DbError;

    fn try_from(row: CompletionRow) -> Result<Self, Self::Error> {
        let plan_type = row.plan_type.parse::<PlanType>().map_err(DbError::Constraint)?;
        let day = DayNumber::try_from(row.day_number).map_err(DbError::Constraint)?;
        Ok(CompletionEntry {
            plan_type,
            day,
            completed_at: row.completed_at,
        })
    }
}
