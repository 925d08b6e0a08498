//! SQLite schema definition.

/// Complete database schema for wellnest.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Medicines
-- ============================================================================

CREATE TABLE IF NOT EXISTS medicines (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    dosage TEXT,
    frequency TEXT,
    expiry_date TEXT NOT NULL,                   -- YYYY-MM-DD
    stock_remaining INTEGER CHECK (stock_remaining IS NULL OR stock_remaining >= 0),
    notes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_medicines_user_expiry ON medicines(user_id, expiry_date);

-- ============================================================================
-- Profiles (one row per user)
-- ============================================================================

CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    first_name TEXT,
    last_name TEXT,
    age INTEGER CHECK (age IS NULL OR age >= 0),
    height_cm REAL CHECK (height_cm IS NULL OR height_cm > 0),
    weight_kg REAL CHECK (weight_kg IS NULL OR weight_kg > 0),
    bmi REAL,
    health_goals TEXT,
    dietary_preferences TEXT,
    fitness_level TEXT,
    updated_at TEXT NOT NULL
);

-- ============================================================================
-- Wellness Plans (deactivated, never deleted)
-- ============================================================================

CREATE TABLE IF NOT EXISTS wellness_plans (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    plan_type TEXT NOT NULL CHECK (plan_type IN ('meal', 'workout')),
    plan_text TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_plans_user_type ON wellness_plans(user_id, plan_type, is_active);

-- At most one active plan per user and type
CREATE UNIQUE INDEX IF NOT EXISTS idx_plans_one_active
    ON wellness_plans(user_id, plan_type) WHERE is_active = 1;

-- ============================================================================
-- Daily Completions (sparse: a row means "done", no row means "not done")
-- ============================================================================

CREATE TABLE IF NOT EXISTS daily_completions (
    user_id TEXT NOT NULL,
    plan_type TEXT NOT NULL CHECK (plan_type IN ('meal', 'workout')),
    day_number INTEGER NOT NULL CHECK (day_number BETWEEN 1 AND 7),
    completed_at TEXT NOT NULL,
    UNIQUE (user_id, plan_type, day_number)
);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_completion_day_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO daily_completions (user_id, plan_type, day_number, completed_at) VALUES ('u1', 'meal', 8, 'now')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO daily_completions (user_id, plan_type, day_number, completed_at) VALUES ('u1', 'yoga', 1, 'now')",
            [],
        );
        assert!(result.is_err());

        let result = conn.execute(
            "INSERT INTO daily_completions (user_id, plan_type, day_number, completed_at) VALUES ('u1', 'meal', 7, 'now')",
            [],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_completion_unique_key() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let insert = "INSERT INTO daily_completions (user_id, plan_type, day_number, completed_at) VALUES ('u1', 'meal', 3, 'now')";
        assert!(conn.execute(insert, []).is_ok());
        assert!(conn.execute(insert, []).is_err());
    }

    #[test]
    fn test_profile_rejects_non_positive_height() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO profiles (user_id, height_cm, updated_at) VALUES ('u1', 0, 'now')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_single_active_plan_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO wellness_plans (id, user_id, plan_type, plan_text, is_active) VALUES ('p1', 'u1', 'meal', 'a', 1)",
            [],
        )
        .unwrap();

        // Second active meal plan is rejected
        let result = conn.execute(
            "INSERT INTO wellness_plans (id, user_id, plan_type, plan_text, is_active) VALUES ('p2', 'u1', 'meal', 'b', 1)",
            [],
        );
        assert!(result.is_err());

        // Inactive history rows are fine
        let result = conn.execute(
            "INSERT INTO wellness_plans (id, user_id, plan_type, plan_text, is_active) VALUES ('p3', 'u1', 'meal', 'c', 0)",
            [],
        );
        assert!(result.is_ok());
    }
}
