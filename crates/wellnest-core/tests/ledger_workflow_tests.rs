//! End-to-end tests for the plan and completion workflow on a real
//! on-disk database.

use chrono::NaiveDate;
use tempfile::TempDir;
use wellnest_core::db::Database;
use wellnest_core::{CompletionLedger, ExpiryReport, NewMedicine, PlanType, UrgencyTier, WellnessPlan};

fn open_db(dir: &TempDir) -> Database {
    Database::open(dir.path().join("wellnest.db")).unwrap()
}

#[test]
fn test_week_of_progress_survives_reopen() {
    let dir = TempDir::new().unwrap();

    {
        let db = open_db(&dir);
        db.replace_active_plan(&WellnessPlan::new("user-1", PlanType::Meal, "Week one meals".into()))
            .unwrap();

        let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();
        for day in [1, 2, 3] {
            assert!(ledger.toggle(PlanType::Meal, day).unwrap());
        }
        assert!(ledger.toggle(PlanType::Workout, 1).unwrap());
        // Undo a mistaken tap
        assert!(!ledger.toggle(PlanType::Meal, 2).unwrap());
    }

    let db = open_db(&dir);
    let ledger = CompletionLedger::load(&db, "user-1").unwrap();
    assert_eq!(ledger.completed_days(PlanType::Meal), vec![1, 3]);
    assert_eq!(ledger.completed_days(PlanType::Workout), vec![1]);
    assert_eq!(ledger.progress(PlanType::Meal), (2, 7));
}

#[test]
fn test_new_plan_resets_only_its_type() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);

    db.replace_active_plan(&WellnessPlan::new("user-1", PlanType::Meal, "Meals v1".into()))
        .unwrap();
    db.replace_active_plan(&WellnessPlan::new("user-1", PlanType::Workout, "Workouts v1".into()))
        .unwrap();

    let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();
    ledger.toggle(PlanType::Meal, 4).unwrap();
    ledger.toggle(PlanType::Workout, 6).unwrap();

    db.replace_active_plan(&WellnessPlan::new("user-1", PlanType::Meal, "Meals v2".into()))
        .unwrap();

    ledger.refresh().unwrap();
    assert!(!ledger.is_completed(PlanType::Meal, 4));
    assert!(ledger.is_completed(PlanType::Workout, 6));

    let active = db.get_active_plan("user-1", PlanType::Meal).unwrap().unwrap();
    assert_eq!(active.plan_text, "Meals v2");

    let history = db.list_plans("user-1", PlanType::Meal).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history.iter().filter(|p| p.is_active).count(), 1);
}

#[test]
fn test_users_do_not_share_ledgers() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);

    let mut alice = CompletionLedger::load(&db, "alice").unwrap();
    alice.toggle(PlanType::Workout, 2).unwrap();

    let mut bob = CompletionLedger::load(&db, "bob").unwrap();
    assert!(!bob.is_completed(PlanType::Workout, 2));
    bob.reset_all(PlanType::Workout).unwrap();

    alice.refresh().unwrap();
    assert!(alice.is_completed(PlanType::Workout, 2));
}

#[test]
fn test_reset_after_any_toggles() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);
    let mut ledger = CompletionLedger::load(&db, "user-1").unwrap();

    for day in [7, 1, 3, 3, 5, 7, 2, 6] {
        ledger.toggle(PlanType::Meal, day).unwrap();
    }
    ledger.reset_all(PlanType::Meal).unwrap();

    let reloaded = CompletionLedger::load(&db, "user-1").unwrap();
    for day in 1..=7 {
        assert!(!ledger.is_completed(PlanType::Meal, day));
        assert!(!reloaded.is_completed(PlanType::Meal, day));
    }
}

#[test]
fn test_medicine_snapshot_report() {
    let dir = TempDir::new().unwrap();
    let db = open_db(&dir);

    for (name, expiry) in [("Cough syrup", "2030-02-20"), ("Aspirin", "2030-03-03"), ("Zinc", "2030-12-01")] {
        let record = NewMedicine {
            name: name.into(),
            expiry_date: expiry.into(),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .into_record("user-1");
        db.insert_medicine(&record).unwrap();
    }

    let today = NaiveDate::from_ymd_opt(2030, 3, 1).unwrap();
    let report = ExpiryReport::evaluate(db.list_medicines("user-1").unwrap(), today);

    let tiers: Vec<_> = report.medicines.iter().map(|m| m.status.tier).collect();
    assert_eq!(tiers, vec![UrgencyTier::Expired, UrgencyTier::Urgent, UrgencyTier::Good]);
    assert_eq!(report.alerts.len(), 1);
    assert_eq!(report.alerts[0].message(), "Aspirin expires in 2 days");

    // A fresh snapshot after a delete drops the alert
    let aspirin = &report.medicines[1].medicine;
    assert!(db.delete_medicine("user-1", &aspirin.id).unwrap());
    let report = ExpiryReport::evaluate(db.list_medicines("user-1").unwrap(), today);
    assert!(!report.has_alerts());
}
