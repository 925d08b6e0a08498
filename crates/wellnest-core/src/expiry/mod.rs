//! Expiry classifier.
//!
//! Maps a medicine's expiry date to an urgency tier:
//!
//! ```text
//!   days < 0        Expired     "Expired!"
//!   0 <= days < 5   Urgent      "Urgent!"      <- alert banner
//!   5 <= days < 15  CheckSoon   "Check Soon"
//!   days >= 15      Good        "Good"
//! ```
//!
//! Everything here is pure: callers pass `today` in.

mod alerts;

pub use alerts::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Below this many days a medicine is urgent (and alerts).
pub const URGENT_DAYS: i64 = 5;
/// Below this many days a medicine should be checked soon.
pub const CHECK_SOON_DAYS: i64 = 15;

/// Remaining shelf life bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum UrgencyTier {
    Expired,
    Urgent,
    CheckSoon,
    Good,
}

impl UrgencyTier {
    /// Tier for a day count. Precedence: Expired, Urgent, CheckSoon, Good.
    pub fn from_days(days: i64) -> Self {
        if days < 0 {
            UrgencyTier::Expired
        } else if days < URGENT_DAYS {
            UrgencyTier::Urgent
        } else if days < CHECK_SOON_DAYS {
            UrgencyTier::CheckSoon
        } else {
            UrgencyTier::Good
        }
    }

    /// Display text for the tier.
    pub fn label(&self) -> &'static str {
        match self {
            UrgencyTier::Expired => "Expired!",
            UrgencyTier::Urgent => "Urgent!",
            UrgencyTier::CheckSoon => "Check Soon",
            UrgencyTier::Good => "Good",
        }
    }
}

/// Derived expiry status for one medicine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryStatus {
    pub days_until_expiry: i64,
    pub tier: UrgencyTier,
    pub label: String,
}

/// Whole calendar days from `today` to `expiry`.
///
/// Both are dates (midnight), so the ceiling of the millisecond
/// difference is exactly the day difference: expiring today is 0.
pub fn days_until_expiry(expiry: NaiveDate, today: NaiveDate) -> i64 {
    expiry.signed_duration_since(today).num_days()
}

/// Classify an expiry date relative to `today`.
pub fn classify(expiry: NaiveDate, today: NaiveDate) -> ExpiryStatus {
    let days_until_expiry = days_until_expiry(expiry, today);
    let tier = UrgencyTier::from_days(days_until_expiry);
    ExpiryStatus {
        days_until_expiry,
        tier,
        label: tier.label().to_string(),
    }
}

/// Whether a medicine belongs in the urgent alert banner.
///
/// Already-expired medicines are listed as "Expired!" but never alert.
pub fn qualifies_for_alert(days_until_expiry: i64) -> bool {
    (0..URGENT_DAYS).contains(&days_until_expiry)
}
