//! Wellness plan database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{PlanType, WellnessPlan};

impl Database {
    /// Make `plan` the user's active plan of its type.
    ///
    /// In one transaction: every earlier plan of that type is deactivated
    /// (kept as history), the new plan is inserted active, and the user's
    /// completions for that type are cleared.
    pub fn replace_active_plan(&self, plan: &WellnessPlan) -> DbResult<()> {
        self.replace_active_plans(std::slice::from_ref(plan))
    }

    /// Replace several active plans as one unit.
    ///
    /// Either every plan is swapped in (and its completions cleared) or,
    /// on any failure, nothing changes.
    pub fn replace_active_plans(&self, plans: &[WellnessPlan]) -> DbResult<()> {
        if let Some(plan) = plans.iter().find(|p| !p.is_active) {
            return Err(DbError::Constraint(format!(
                "Plan {} must be active to replace the current plan",
                plan.id
            )));
        }

        let tx = self.conn.unchecked_transaction()?;
        for plan in plans {
            let deactivated = tx.execute(
                "UPDATE wellness_plans SET is_active = 0 WHERE user_id = ?1 AND plan_type = ?2 AND is_active = 1",
                params![plan.user_id, plan.plan_type.as_str()],
            )?;
            tx.execute(
                r#"
                INSERT INTO wellness_plans (id, user_id, plan_type, plan_text, is_active, created_at)
                VALUES (?1, ?2, ?3, ?4, 1, ?5)
                "#,
                params![
                    plan.id,
                    plan.user_id,
                    plan.plan_type.as_str(),
                    plan.plan_text,
                    plan.created_at,
                ],
            )?;
            let cleared = tx.execute(
                "DELETE FROM daily_completions WHERE user_id = ?1 AND plan_type = ?2",
                params![plan.user_id, plan.plan_type.as_str()],
            )?;
            tracing::info!(
                user_id = %plan.user_id,
                plan_type = %plan.plan_type,
                deactivated,
                cleared_completions = cleared,
                "Replaced active plan"
            );
        }
        tx.commit()?;
        Ok(())
    }

    /// Get the user's active plan of a type.
    pub fn get_active_plan(&self, user_id: &str, plan_type: PlanType) -> DbResult<Option<WellnessPlan>> {
        self.conn
            .query_row(
                r#"
                SELECT id, user_id, plan_type, plan_text, is_active, created_at
                FROM wellness_plans
                WHERE user_id = ?1 AND plan_type = ?2 AND is_active = 1
                "#,
                params![user_id, plan_type.as_str()],
                PlanRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// All of the user's plans of a type, newest first (active and history).
    pub fn list_plans(&self, user_id: &str, plan_type: PlanType) -> DbResult<Vec<WellnessPlan>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, user_id, plan_type, plan_text, is_active, created_at
            FROM wellness_plans
            WHERE user_id = ?1 AND plan_type = ?2
            ORDER BY created_at DESC, rowid DESC
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, plan_type.as_str()], PlanRow::from_row)?;

        let mut plans = Vec::new();
        for row in rows {
            plans.push(row?.try_into()?);
        }
        Ok(plans)
    }
}

/// Intermediate row struct for database mapping.
struct PlanRow {
    id: String,
    user_id: String,
    plan_type: String,
    plan_text: String,
    is_active: bool,
    created_at: String,
}

impl PlanRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            plan_type: row.get(2)?,
            plan_text: row.get(3)?,
            is_active: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<PlanRow> for WellnessPlan {
    type Error = DbError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        Ok(WellnessPlan {
            plan_type: row.plan_type.parse().map_err(DbError::Constraint)?,
            id: row.id,
            user_id: row.user_id,
            plan_text: row.plan_text,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}
