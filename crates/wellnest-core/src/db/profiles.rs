//! Profile database operations.

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{Biometrics, UserProfile};

const PROFILE_COLUMNS: &str = "user_id, first_name, last_name, age, height_cm, weight_kg, bmi, \
    health_goals, dietary_preferences, fitness_level, updated_at";

impl Database {
    /// Insert or overwrite the user's whole profile.
    pub fn save_profile(&self, profile: &UserProfile) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO profiles (
                user_id, first_name, last_name, age, height_cm, weight_kg, bmi,
                health_goals, dietary_preferences, fitness_level, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT (user_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                age = excluded.age,
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                bmi = excluded.bmi,
                health_goals = excluded.health_goals,
                dietary_preferences = excluded.dietary_preferences,
                fitness_level = excluded.fitness_level,
                updated_at = excluded.updated_at
            "#,
            params![
                profile.user_id,
                profile.first_name,
                profile.last_name,
                profile.age,
                profile.height_cm,
                profile.weight_kg,
                profile.bmi,
                profile.health_goals,
                profile.dietary_preferences,
                profile.fitness_level,
                profile.updated_at,
            ],
        )?;
        tracing::info!(user_id = %profile.user_id, "Saved profile");
        Ok(())
    }

    /// Record new measurements and the BMI computed from them.
    ///
    /// Other profile fields are left as they are. Returns the BMI.
    pub fn save_biometrics(&self, user_id: &str, biometrics: &Biometrics) -> DbResult<f64> {
        let bmi = biometrics.bmi().ok_or_else(|| {
            DbError::Constraint(format!(
                "Weight {} kg and height {} cm must both be positive",
                biometrics.weight_kg, biometrics.height_cm
            ))
        })?;

        self.conn.execute(
            r#"
            INSERT INTO profiles (user_id, height_cm, weight_kg, bmi, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT (user_id) DO UPDATE SET
                height_cm = excluded.height_cm,
                weight_kg = excluded.weight_kg,
                bmi = excluded.bmi,
                updated_at = excluded.updated_at
            "#,
            params![
                user_id,
                biometrics.height_cm,
                biometrics.weight_kg,
                bmi,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;
        tracing::info!(user_id, bmi, "Saved biometrics");
        Ok(bmi)
    }

    /// Get the user's profile, `None` if they never saved one.
    pub fn get_profile(&self, user_id: &str) -> DbResult<Option<UserProfile>> {
        let profile = self
            .conn
            .query_row(
                &format!("SELECT {} FROM profiles WHERE user_id = ?", PROFILE_COLUMNS),
                [user_id],
                ProfileRow::from_row,
            )
            .optional()?;
        Ok(profile.map(UserProfile::from))
    }
}

/// Intermediate row struct for database mapping.
struct ProfileRow {
    user_id: String,
    first_name: Option<String>,
    last_name: Option<String>,
    age: Option<u32>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    bmi: Option<f64>,
    health_goals: Option<String>,
    dietary_preferences: Option<String>,
    fitness_level: Option<String>,
    updated_at: String,
}

impl ProfileRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            age: row.get(3)?,
            height_cm: row.get(4)?,
            weight_kg: row.get(5)?,
            bmi: row.get(6)?,
            health_goals: row.get(7)?,
            dietary_preferences: row.get(8)?,
            fitness_level: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        UserProfile {
            user_id: row.user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            height_cm: row.height_cm,
            weight_kg: row.weight_kg,
            bmi: row.bmi,
            health_goals: row.health_goals,
            dietary_preferences: row.dietary_preferences,
            fitness_level: row.fitness_level,
            updated_at: row.updated_at,
        }
    }
}
