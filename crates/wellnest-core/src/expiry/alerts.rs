//! Urgent-expiry alerts and the per-snapshot expiry report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{classify, qualifies_for_alert, ExpiryStatus};
use crate::models::MedicineRecord;

/// A medicine that should be shown in the urgent alert banner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryAlert {
    pub medicine_id: String,
    pub name: String,
    pub expiry_date: NaiveDate,
    pub days_until_expiry: i64,
}

impl ExpiryAlert {
    /// Notification text, e.g. "Aspirin expires in 1 day".
    pub fn message(&self) -> String {
        let unit = if self.days_until_expiry == 1 { "day" } else { "days" };
        format!("{} expires in {} {}", self.name, self.days_until_expiry, unit)
    }
}

/// Alerts for every medicine expiring in `0..5` days, in input order.
pub fn urgent_alerts(records: &[MedicineRecord], today: NaiveDate) -> Vec<ExpiryAlert> {
    records
        .iter()
        .filter_map(|record| {
            let status = classify(record.expiry_date, today);
            qualifies_for_alert(status.days_until_expiry).then(|| ExpiryAlert {
                medicine_id: record.id.clone(),
                name: record.name.clone(),
                expiry_date: record.expiry_date,
                days_until_expiry: status.days_until_expiry,
            })
        })
        .collect()
}

/// A medicine paired with its derived status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedMedicine {
    pub medicine: MedicineRecord,
    pub status: ExpiryStatus,
}

/// Derived view over one snapshot of a user's medicines.
///
/// Rebuilt from scratch whenever a fresh snapshot arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryReport {
    pub evaluated_on: NaiveDate,
    pub medicines: Vec<ClassifiedMedicine>,
    pub alerts: Vec<ExpiryAlert>,
}

impl ExpiryReport {
    /// Classify every record and collect alerts.
    pub fn evaluate(records: Vec<MedicineRecord>, today: NaiveDate) -> Self {
        let alerts = urgent_alerts(&records, today);
        let medicines = records
            .into_iter()
            .map(|medicine| {
                let status = classify(medicine.expiry_date, today);
                ClassifiedMedicine { medicine, status }
            })
            .collect();

        Self {
            evaluated_on: today,
            medicines,
            alerts,
        }
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
