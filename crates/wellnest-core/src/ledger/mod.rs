//! Completion ledger for the 7-day meal and workout plans.
//!
//! The ledger is a sparse set of "day done" markers keyed by
//! (plan type, day). Marking a day done writes a row; unmarking deletes it.
//! There are never explicit "not done" rows.
//!
//! Writes go to the store first. The in-memory view only changes after the
//! store accepted the write, so a failed write leaves the displayed state
//! exactly as it was.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::db::{DbError, DbResult};
use crate::models::{CompletionEntry, DayNumber, PlanType, PLAN_HORIZON_DAYS};

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    #[error("Day {0} is outside the 1..=7 plan horizon")]
    InvalidDay(u8),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Persistence for completion markers, scoped by user.
pub trait CompletionStore {
    /// Every marker the user has.
    fn list_completions(&self, user_id: &str) -> DbResult<Vec<CompletionEntry>>;

    /// Insert (or refresh) a marker.
    fn insert_completion(&self, user_id: &str, entry: &CompletionEntry) -> DbResult<()>;

    /// Remove one marker. Returns whether a row existed.
    fn delete_completion(&self, user_id: &str, plan_type: PlanType, day: DayNumber) -> DbResult<bool>;

    /// Remove every marker of a plan type. Returns the number removed.
    fn clear_completions(&self, user_id: &str, plan_type: PlanType) -> DbResult<usize>;
}

type CompletionKey = (PlanType, DayNumber);

/// One user's completion markers, backed by a store.
pub struct CompletionLedger<'a, S: CompletionStore> {
    store: &'a S,
    user_id: String,
    entries: BTreeMap<CompletionKey, CompletionEntry>,
}

impl<'a, S: CompletionStore> CompletionLedger<'a, S> {
    /// Load the user's current markers from the store.
    pub fn load(store: &'a S, user_id: &str) -> LedgerResult<Self> {
        let entries = store.list_completions(user_id)?;
        Ok(Self::from_entries(store, user_id, entries))
    }

    /// Rebuild the ledger from a persisted list of entries.
    ///
    /// Later duplicates of a key replace earlier ones.
    pub fn from_entries(
        store: &'a S,
        user_id: &str,
        entries: impl IntoIterator<Item = CompletionEntry>,
    ) -> Self {
        let mut ledger = Self {
            store,
            user_id: user_id.to_string(),
            entries: BTreeMap::new(),
        };
        ledger.replace_entries(entries);
        ledger
    }

    /// Re-read the store, discarding the in-memory view.
    pub fn refresh(&mut self) -> LedgerResult<()> {
        let entries = self.store.list_completions(&self.user_id)?;
        self.replace_entries(entries);
        Ok(())
    }

    fn replace_entries(&mut self, entries: impl IntoIterator<Item = CompletionEntry>) {
        self.entries = entries
            .into_iter()
            .map(|entry| ((entry.plan_type, entry.day), entry))
            .collect();
        tracing::debug!(user_id = %self.user_id, entries = self.entries.len(), "Loaded completion ledger");
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether the day is marked done. Days outside the horizon never are.
    pub fn is_completed(&self, plan_type: PlanType, day: u8) -> bool {
        DayNumber::new(day)
            .map(|day| self.entries.contains_key(&(plan_type, day)))
            .unwrap_or(false)
    }

    /// The marker for a day, if any.
    pub fn entry(&self, plan_type: PlanType, day: u8) -> Option<&CompletionEntry> {
        self.entries.get(&(plan_type, DayNumber::new(day)?))
    }

    /// Flip a day's state and return the new state.
    pub fn toggle(&mut self, plan_type: PlanType, day: u8) -> LedgerResult<bool> {
        let day = DayNumber::new(day).ok_or(LedgerError::InvalidDay(day))?;
        let key = (plan_type, day);

        if self.entries.contains_key(&key) {
            self.store.delete_completion(&self.user_id, plan_type, day)?;
            self.entries.remove(&key);
            tracing::info!(user_id = %self.user_id, %plan_type, %day, "Day marked incomplete");
            Ok(false)
        } else {
            let entry = CompletionEntry::now(plan_type, day);
            self.store.insert_completion(&self.user_id, &entry)?;
            self.entries.insert(key, entry);
            tracing::info!(user_id = %self.user_id, %plan_type, %day, "Day marked complete");
            Ok(true)
        }
    }

    /// Clear every marker of a plan type (a new plan was generated).
    pub fn reset_all(&mut self, plan_type: PlanType) -> LedgerResult<()> {
        let removed = self.store.clear_completions(&self.user_id, plan_type)?;
        self.entries.retain(|(kind, _), _| *kind != plan_type);
        tracing::info!(user_id = %self.user_id, %plan_type, removed, "Reset completions");
        Ok(())
    }

    /// Completed days of a plan type, ascending.
    pub fn completed_days(&self, plan_type: PlanType) -> Vec<u8> {
        self.entries
            .keys()
            .filter(|(kind, _)| *kind == plan_type)
            .map(|(_, day)| day.get())
            .collect()
    }

    /// (completed days, days in plan).
    pub fn progress(&self, plan_type: PlanType) -> (usize, usize) {
        (
            self.completed_days(plan_type).len(),
            PLAN_HORIZON_DAYS as usize,
        )
    }

    /// All markers, ordered by plan type then day.
    pub fn entries(&self) -> impl Iterator<Item = &CompletionEntry> {
        self.entries.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use std::cell::Cell;

    /// Store that fails every write once `broken` is set.
    struct FlakyStore {
        inner: Database,
        broken: Cell<bool>,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: Database::open_in_memory().unwrap(),
                broken: Cell::new(false),
            }
        }

        fn check(&self) -> DbResult<()> {
            if self.broken.get() {
                Err(DbError::Constraint("store unavailable".into()))
            } else {
                Ok(())
            }
        }
    }

    impl CompletionStore for FlakyStore {
        fn list_completions(&self, user_id: &str) -> DbResult<Vec<CompletionEntry>> {
            self.inner.list_completions(user_id)
        }

        fn insert_completion(&self, user_id: &str, entry: &CompletionEntry) -> DbResult<()> {
            self.check()?;
            self.inner.insert_completion(user_id, entry)
        }

        fn delete_completion(&self, user_id: &str, plan_type: PlanType, day: DayNumber) -> DbResult<bool> {
            self.check()?;
            self.inner.delete_completion(user_id, plan_type, day)
        }

        fn clear_completions(&self, user_id: &str, plan_type: PlanType) -> DbResult<usize> {
            self.check()?;
            self.inner.clear_completions(user_id, plan_type)
        }
    }

    #[test]
    fn test_toggle_twice() {
        let db = Database::open_in_memory().unwrap();
        let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();

        assert!(!ledger.is_completed(PlanType::Meal, 3));
        assert!(ledger.toggle(PlanType::Meal, 3).unwrap());
        assert!(ledger.is_completed(PlanType::Meal, 3));
        assert!(!ledger.toggle(PlanType::Meal, 3).unwrap());
        assert!(!ledger.is_completed(PlanType::Meal, 3));

        // Sparse: nothing left behind in the store
        assert!(db.list_completions("user-1").unwrap().is_empty());
    }

    #[test]
    fn test_plan_types_are_independent() {
        let db = Database::open_in_memory().unwrap();
        let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();

        ledger.toggle(PlanType::Meal, 1).unwrap();
        assert!(ledger.is_completed(PlanType::Meal, 1));
        assert!(!ledger.is_completed(PlanType::Workout, 1));
    }

    #[test]
    fn test_reset_all() {
        let db = Database::open_in_memory().unwrap();
        let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();

        for day in [1, 2, 5, 7] {
            ledger.toggle(PlanType::Meal, day).unwrap();
        }
        ledger.toggle(PlanType::Meal, 2).unwrap();
        ledger.toggle(PlanType::Workout, 4).unwrap();

        ledger.reset_all(PlanType::Meal).unwrap();

        for day in 1..=7 {
            assert!(!ledger.is_completed(PlanType::Meal, day));
        }
        assert!(ledger.is_completed(PlanType::Workout, 4));

        let reloaded = CompletionLedger::load(&db, "user-1").unwrap();
        assert_eq!(reloaded.completed_days(PlanType::Meal), Vec::<u8>::new());
        assert_eq!(reloaded.completed_days(PlanType::Workout), vec![4]);
    }

    #[test]
    fn test_out_of_horizon_day() {
        let db = Database::open_in_memory().unwrap();
        let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();

        assert!(matches!(
            ledger.toggle(PlanType::Workout, 0),
            Err(LedgerError::InvalidDay(0))
        ));
        assert!(matches!(
            ledger.toggle(PlanType::Workout, 8),
            Err(LedgerError::InvalidDay(8))
        ));
        assert!(!ledger.is_completed(PlanType::Workout, 8));
    }

    #[test]
    fn test_reconstruct_from_entries() {
        let db = Database::open_in_memory().unwrap();
        let day = |n| DayNumber::new(n).unwrap();
        let at = |plan_type: PlanType, n: u8, completed_at: &str| CompletionEntry {
            plan_type,
            day: day(n),
            completed_at: completed_at.to_string(),
        };
        let entries = vec![
            at(PlanType::Meal, 6, "2030-03-01T08:00:00+00:00"),
            at(PlanType::Meal, 2, "2030-03-01T09:00:00+00:00"),
            at(PlanType::Meal, 6, "2030-03-02T08:00:00+00:00"),
            at(PlanType::Workout, 1, "2030-03-01T10:00:00+00:00"),
        ];

        let ledger = CompletionLedger::from_entries(&db, "user-1", entries);
        assert_eq!(ledger.completed_days(PlanType::Meal), vec![2, 6]);
        assert_eq!(ledger.progress(PlanType::Meal), (2, 7));
        assert_eq!(ledger.progress(PlanType::Workout), (1, 7));
        assert_eq!(ledger.entries().count(), 3);
        assert!(ledger.entry(PlanType::Workout, 1).is_some());

        // Later duplicate wins
        assert_eq!(
            ledger.entry(PlanType::Meal, 6).unwrap().completed_at,
            "2030-03-02T08:00:00+00:00"
        );
    }

    #[test]
    fn test_failed_write_leaves_state_unchanged() {
        let store = FlakyStore::new();
        let mut ledger = CompletionLedger::load(&store, "user-1").unwrap();
        ledger.toggle(PlanType::Meal, 1).unwrap();

        store.broken.set(true);

        assert!(matches!(ledger.toggle(PlanType::Meal, 1), Err(LedgerError::Store(_))));
        assert!(ledger.is_completed(PlanType::Meal, 1));

        assert!(ledger.toggle(PlanType::Meal, 2).is_err());
        assert!(!ledger.is_completed(PlanType::Meal, 2));

        assert!(ledger.reset_all(PlanType::Meal).is_err());
        assert!(ledger.is_completed(PlanType::Meal, 1));

        store.broken.set(false);
        ledger.refresh().unwrap();
        assert_eq!(ledger.completed_days(PlanType::Meal), vec![1]);
    }

    #[test]
    fn test_refresh_sees_other_writers() {
        let db = Database::open_in_memory().unwrap();
        let mut first = CompletionLedger::load(&db, "user-1").unwrap();
        let mut second = CompletionLedger::load(&db, "user-1").unwrap();

        second.toggle(PlanType::Workout, 5).unwrap();
        assert!(!first.is_completed(PlanType::Workout, 5));

        first.refresh().unwrap();
        assert!(first.is_completed(PlanType::Workout, 5));
    }
}
