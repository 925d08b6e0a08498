//! Wellnest Core Library
//!
//! Local core for a personal wellness tracker: medicine expiry tracking
//! and progress through generated 7-day meal/workout plans.
//!
//! # Architecture
//!
//! ```text
//!   Label photo → OCR service → raw text ──► label::LabelScan
//!                                               │ (expiry date, name guess)
//!                                               ▼
//!                                     models::NewMedicine::validate
//!                                               │
//!                                               ▼
//!                         db::Database (user-scoped SQLite rows)
//!                                               │ snapshot
//!                                               ▼
//!                         expiry::ExpiryReport (tiers + urgent alerts)
//!
//!   AI plan text ──► db::Database::replace_active_plan
//!                         (deactivate old, insert new, clear completions)
//!                                               │
//!                                               ▼
//!                         ledger::CompletionLedger (sparse day markers)
//! ```
//!
//! # Modules
//!
//! - [`db`]: SQLite persistence, every query scoped to one user
//! - [`models`]: Domain types (MedicineRecord, WellnessPlan, CompletionEntry, ...)
//! - [`expiry`]: Expiry classifier and alert policy
//! - [`label`]: Expiry date and name extraction from OCR text
//! - [`ledger`]: Completion ledger over a [`ledger::CompletionStore`]
//! - [`config`], [`logging`]: Environment configuration and log setup

pub mod config;
pub mod db;
pub mod expiry;
pub mod label;
pub mod ledger;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::CoreConfig;
pub use db::Database;
pub use expiry::{classify, ExpiryAlert, ExpiryReport, ExpiryStatus, UrgencyTier};
pub use label::{extract_expiry_date, LabelScan};
pub use ledger::{CompletionLedger, CompletionStore};
pub use models::{
    Biometrics, BmiCategory, CompletionEntry, DayNumber, MedicineRecord, NewMedicine, PlanType,
    UserProfile, WellnessPlan,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum WellnessError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for WellnessError {
    fn from(e: db::DbError) -> Self {
        WellnessError::DatabaseError(e.to_string())
    }
}

impl From<models::ValidationError> for WellnessError {
    fn from(e: models::ValidationError) -> Self {
        WellnessError::ValidationFailed(e.to_string())
    }
}

impl From<ledger::LedgerError> for WellnessError {
    fn from(e: ledger::LedgerError) -> Self {
        match e {
            ledger::LedgerError::Store(e) => e.into(),
            other => WellnessError::InvalidInput(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for WellnessError {
    fn from(e: serde_json::Error) -> Self {
        WellnessError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for WellnessError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WellnessError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, WellnessError> {
    NaiveDate::parse_from_str(value.trim(), models::DATE_FORMAT)
        .map_err(|_| WellnessError::InvalidInput(format!("Expected YYYY-MM-DD date, got: {}", value)))
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<WellnessCore>, WellnessError> {
    let db = Database::open(&path)?;
    Ok(WellnessCore::wrap(db))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<WellnessCore>, WellnessError> {
    let db = Database::open_in_memory()?;
    Ok(WellnessCore::wrap(db))
}

/// Open the database named by `WELLNEST_DB_PATH` and install logging per
/// `WELLNEST_LOG`.
#[uniffi::export]
pub fn open_from_config() -> Result<Arc<WellnessCore>, WellnessError> {
    let config = CoreConfig::from_env();
    logging::install(&config.log_filter);
    let db = match &config.database_path {
        Some(path) => Database::open(path)?,
        None => Database::open_in_memory()?,
    };
    Ok(WellnessCore::wrap(db))
}

/// Install the log subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn init_logging(filter: String) -> bool {
    logging::install(&filter)
}

// =========================================================================
// Stateless Helpers (exported to FFI)
// =========================================================================

/// Classify an expiry date (`YYYY-MM-DD`) relative to `today`.
#[uniffi::export]
pub fn classify_expiry(expiry_date: String, today: String) -> Result<FfiExpiryStatus, WellnessError> {
    let status = classify(parse_date(&expiry_date)?, parse_date(&today)?);
    Ok(status.into())
}

/// Extract an expiry date and a name suggestion from OCR text.
#[uniffi::export]
pub fn scan_label(ocr_text: String) -> FfiLabelScan {
    LabelScan::from_ocr_text(&ocr_text).into()
}

/// BMI and its category, `None` for non-positive inputs.
#[uniffi::export]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Option<FfiBmi> {
    models::bmi(weight_kg, height_cm).map(FfiBmi::from_value)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct WellnessCore {
    db: Arc<Mutex<Database>>,
}

impl WellnessCore {
    fn wrap(db: Database) -> Arc<Self> {
        Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
        })
    }
}

#[uniffi::export]
impl WellnessCore {
    // =========================================================================
    // Medicine Operations
    // =========================================================================

    /// Validate and store a medicine. Nothing is written if validation fails.
    pub fn add_medicine(&self, user_id: String, input: FfiNewMedicine) -> Result<FfiMedicine, WellnessError> {
        let form: NewMedicine = input.into();
        let valid = form.validate().inspect_err(|e| {
            tracing::warn!(%user_id, reason = %e, "Rejected medicine submission");
        })?;
        let record = valid.into_record(&user_id);

        let db = self.db.lock()?;
        db.insert_medicine(&record)?;
        Ok(record.into())
    }

    /// List the user's medicines, soonest expiry first.
    pub fn list_medicines(&self, user_id: String) -> Result<Vec<FfiMedicine>, WellnessError> {
        let db = self.db.lock()?;
        let medicines = db.list_medicines(&user_id)?;
        Ok(medicines.into_iter().map(|m| m.into()).collect())
    }

    /// Permanently delete a medicine. Returns false if it did not exist.
    pub fn delete_medicine(&self, user_id: String, medicine_id: String) -> Result<bool, WellnessError> {
        let db = self.db.lock()?;
        Ok(db.delete_medicine(&user_id, &medicine_id)?)
    }

    /// Classify every medicine and collect urgent alerts as of `today`.
    pub fn expiry_report(&self, user_id: String, today: String) -> Result<FfiExpiryReport, WellnessError> {
        let today = parse_date(&today)?;
        let db = self.db.lock()?;
        let report = ExpiryReport::evaluate(db.list_medicines(&user_id)?, today);
        Ok(report.into())
    }

    /// Same report as JSON.
    pub fn expiry_report_json(&self, user_id: String, today: String) -> Result<String, WellnessError> {
        let today = parse_date(&today)?;
        let db = self.db.lock()?;
        let report = ExpiryReport::evaluate(db.list_medicines(&user_id)?, today);
        Ok(report.to_json()?)
    }

    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Save weight and height with the BMI computed from them.
    pub fn save_biometrics(&self, user_id: String, weight_kg: f64, height_cm: f64) -> Result<FfiBmi, WellnessError> {
        let biometrics = Biometrics::new(weight_kg, height_cm);
        if biometrics.bmi().is_none() {
            return Err(WellnessError::InvalidInput(
                "Please enter valid weight and height values".into(),
            ));
        }
        let db = self.db.lock()?;
        let bmi = db.save_biometrics(&user_id, &biometrics)?;
        Ok(FfiBmi::from_value(bmi))
    }

    /// Insert or overwrite the user's profile.
    pub fn save_profile(&self, user_id: String, profile: FfiProfile) -> Result<(), WellnessError> {
        let profile = profile.into_profile(&user_id);
        let db = self.db.lock()?;
        Ok(db.save_profile(&profile)?)
    }

    /// The user's profile, if one was ever saved.
    pub fn get_profile(&self, user_id: String) -> Result<Option<FfiProfile>, WellnessError> {
        let db = self.db.lock()?;
        Ok(db.get_profile(&user_id)?.map(|p| p.into()))
    }

    // =========================================================================
    // Completion Ledger Operations
    // =========================================================================

    /// Whether a plan day is marked done.
    pub fn is_day_completed(&self, user_id: String, plan_type: FfiPlanType, day: u8) -> Result<bool, WellnessError> {
        let db = self.db.lock()?;
        let ledger = CompletionLedger::load(&*db, &user_id)?;
        Ok(ledger.is_completed(plan_type.into(), day))
    }

    /// Flip a plan day and return its new state.
    pub fn toggle_day(&self, user_id: String, plan_type: FfiPlanType, day: u8) -> Result<bool, WellnessError> {
        let db = self.db.lock()?;
        let mut ledger = CompletionLedger::load(&*db, &user_id)?;
        Ok(ledger.toggle(plan_type.into(), day)?)
    }

    /// Days marked done for a plan type, ascending.
    pub fn completed_days(&self, user_id: String, plan_type: FfiPlanType) -> Result<Vec<u8>, WellnessError> {
        let db = self.db.lock()?;
        let ledger = CompletionLedger::load(&*db, &user_id)?;
        Ok(ledger.completed_days(plan_type.into()))
    }

    /// Clear every completion of a plan type.
    pub fn reset_completions(&self, user_id: String, plan_type: FfiPlanType) -> Result<(), WellnessError> {
        let db = self.db.lock()?;
        let mut ledger = CompletionLedger::load(&*db, &user_id)?;
        Ok(ledger.reset_all(plan_type.into())?)
    }

    // =========================================================================
    // Plan Operations
    // =========================================================================

    /// Make `plan_text` the active plan of one type, resetting its progress.
    pub fn adopt_plan(
        &self,
        user_id: String,
        plan_type: FfiPlanType,
        plan_text: String,
    ) -> Result<FfiWellnessPlan, WellnessError> {
        if plan_text.trim().is_empty() {
            return Err(WellnessError::InvalidInput("Plan text is empty".into()));
        }
        let plan = WellnessPlan::new(&user_id, plan_type.into(), plan_text);
        let db = self.db.lock()?;
        db.replace_active_plan(&plan)?;
        Ok(plan.into())
    }

    /// Use one generated text as both the meal and the workout plan.
    ///
    /// Both plans are replaced in one transaction.
    pub fn adopt_generated_plan(
        &self,
        user_id: String,
        plan_text: String,
    ) -> Result<Vec<FfiWellnessPlan>, WellnessError> {
        if plan_text.trim().is_empty() {
            return Err(WellnessError::InvalidInput("Plan text is empty".into()));
        }
        let plans: Vec<WellnessPlan> = PlanType::ALL
            .iter()
            .map(|plan_type| WellnessPlan::new(&user_id, *plan_type, plan_text.clone()))
            .collect();

        let db = self.db.lock()?;
        db.replace_active_plans(&plans)?;
        Ok(plans.into_iter().map(|p| p.into()).collect())
    }

    /// The active plan of a type, if one was ever generated.
    pub fn get_active_plan(
        &self,
        user_id: String,
        plan_type: FfiPlanType,
    ) -> Result<Option<FfiWellnessPlan>, WellnessError> {
        let db = self.db.lock()?;
        let plan = db.get_active_plan(&user_id, plan_type.into())?;
        Ok(plan.map(|p| p.into()))
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe plan type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiPlanType {
    Meal,
    Workout,
}

impl From<FfiPlanType> for PlanType {
    fn from(plan_type: FfiPlanType) -> Self {
        match plan_type {
            FfiPlanType::Meal => PlanType::Meal,
            FfiPlanType::Workout => PlanType::Workout,
        }
    }
}

impl From<PlanType> for FfiPlanType {
    fn from(plan_type: PlanType) -> Self {
        match plan_type {
            PlanType::Meal => FfiPlanType::Meal,
            PlanType::Workout => FfiPlanType::Workout,
        }
    }
}

/// FFI-safe urgency tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiUrgencyTier {
    Expired,
    Urgent,
    CheckSoon,
    Good,
}

impl From<UrgencyTier> for FfiUrgencyTier {
    fn from(tier: UrgencyTier) -> Self {
        match tier {
            UrgencyTier::Expired => FfiUrgencyTier::Expired,
            UrgencyTier::Urgent => FfiUrgencyTier::Urgent,
            UrgencyTier::CheckSoon => FfiUrgencyTier::CheckSoon,
            UrgencyTier::Good => FfiUrgencyTier::Good,
        }
    }
}

/// FFI-safe medicine form input.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiNewMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub expiry_date: String,
    pub stock: String,
    pub notes: String,
}

impl From<FfiNewMedicine> for NewMedicine {
    fn from(input: FfiNewMedicine) -> Self {
        NewMedicine {
            name: input.name,
            dosage: input.dosage,
            frequency: input.frequency,
            expiry_date: input.expiry_date,
            stock: input.stock,
            notes: input.notes,
        }
    }
}

/// FFI-safe medicine.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicine {
    pub id: String,
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub expiry_date: String,
    pub stock_remaining: Option<u32>,
    pub notes: Option<String>,
}

impl From<MedicineRecord> for FfiMedicine {
    fn from(record: MedicineRecord) -> Self {
        Self {
            expiry_date: record.expiry_date_string(),
            id: record.id,
            name: record.name,
            dosage: record.dosage,
            frequency: record.frequency,
            stock_remaining: record.stock_remaining,
            notes: record.notes,
        }
    }
}

/// FFI-safe expiry status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExpiryStatus {
    pub days_until_expiry: i64,
    pub tier: FfiUrgencyTier,
    pub label: String,
}

impl From<ExpiryStatus> for FfiExpiryStatus {
    fn from(status: ExpiryStatus) -> Self {
        Self {
            days_until_expiry: status.days_until_expiry,
            tier: status.tier.into(),
            label: status.label,
        }
    }
}

/// FFI-safe medicine with its status.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiClassifiedMedicine {
    pub medicine: FfiMedicine,
    pub status: FfiExpiryStatus,
}

/// FFI-safe urgent alert.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExpiryAlert {
    pub medicine_id: String,
    pub name: String,
    pub expiry_date: String,
    pub days_until_expiry: i64,
    pub message: String,
}

impl From<ExpiryAlert> for FfiExpiryAlert {
    fn from(alert: ExpiryAlert) -> Self {
        Self {
            message: alert.message(),
            expiry_date: alert.expiry_date.format(models::DATE_FORMAT).to_string(),
            medicine_id: alert.medicine_id,
            name: alert.name,
            days_until_expiry: alert.days_until_expiry,
        }
    }
}

/// FFI-safe expiry report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiExpiryReport {
    /// `YYYY-MM-DD` day the tiers were computed for
    pub evaluated_on: String,
    pub medicines: Vec<FfiClassifiedMedicine>,
    pub alerts: Vec<FfiExpiryAlert>,
}

impl From<ExpiryReport> for FfiExpiryReport {
    fn from(report: ExpiryReport) -> Self {
        Self {
            evaluated_on: report.evaluated_on.format(models::DATE_FORMAT).to_string(),
            medicines: report
                .medicines
                .into_iter()
                .map(|m| FfiClassifiedMedicine {
                    medicine: m.medicine.into(),
                    status: m.status.into(),
                })
                .collect(),
            alerts: report.alerts.into_iter().map(|a| a.into()).collect(),
        }
    }
}

/// FFI-safe label scan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabelScan {
    /// `YYYY-MM-DD`, or `None` when manual entry is needed
    pub expiry_date: Option<String>,
    pub name_suggestion: Option<String>,
}

impl From<LabelScan> for FfiLabelScan {
    fn from(scan: LabelScan) -> Self {
        Self {
            expiry_date: scan
                .expiry_date
                .map(|d| d.format(models::DATE_FORMAT).to_string()),
            name_suggestion: scan.name_suggestion,
        }
    }
}

/// FFI-safe BMI result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBmi {
    pub bmi: f64,
    pub category: String,
}

impl FfiBmi {
    fn from_value(bmi: f64) -> Self {
        Self {
            bmi,
            category: BmiCategory::from_bmi(bmi).label().to_string(),
        }
    }
}

/// FFI-safe profile.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub bmi: Option<f64>,
    pub health_goals: Option<String>,
    pub dietary_preferences: Option<String>,
    pub fitness_level: Option<String>,
}

impl FfiProfile {
    fn into_profile(self, user_id: &str) -> UserProfile {
        UserProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            bmi: self.bmi,
            health_goals: self.health_goals,
            dietary_preferences: self.dietary_preferences,
            fitness_level: self.fitness_level,
            ..UserProfile::new(user_id)
        }
    }
}

impl From<UserProfile> for FfiProfile {
    fn from(profile: UserProfile) -> Self {
        Self {
            first_name: profile.first_name,
            last_name: profile.last_name,
            age: profile.age,
            height_cm: profile.height_cm,
            weight_kg: profile.weight_kg,
            bmi: profile.bmi,
            health_goals: profile.health_goals,
            dietary_preferences: profile.dietary_preferences,
            fitness_level: profile.fitness_level,
        }
    }
}

/// FFI-safe wellness plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWellnessPlan {
    pub id: String,
    pub plan_type: FfiPlanType,
    pub plan_text: String,
    pub is_active: bool,
    pub created_at: String,
}

impl From<WellnessPlan> for FfiWellnessPlan {
    fn from(plan: WellnessPlan) -> Self {
        Self {
            id: plan.id,
            plan_type: plan.plan_type.into(),
            plan_text: plan.plan_text,
            is_active: plan.is_active,
            created_at: plan.created_at,
        }
    }
}
