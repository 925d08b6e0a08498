//! Medicine label reading.
//!
//! Consumes the raw string returned by an OCR service; how the image was
//! read is not this module's concern.

mod date;
mod name;

pub use date::*;
pub use name::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Everything we can auto-fill from one label photo.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelScan {
    /// Parsed expiry date, `None` means manual entry is needed
    pub expiry_date: Option<NaiveDate>,
    /// Suggested medicine name
    pub name_suggestion: Option<String>,
}

impl LabelScan {
    /// Scan OCR output for an expiry date and a name suggestion.
    pub fn from_ocr_text(text: &str) -> Self {
        let scan = Self {
            expiry_date: extract_expiry_date(text),
            name_suggestion: candidate_name(text),
        };
        tracing::debug!(
            found_date = scan.expiry_date.is_some(),
            found_name = scan.name_suggestion.is_some(),
            "Scanned label text"
        );
        scan
    }

    /// True when the user must type the expiry date.
    pub fn needs_manual_date(&self) -> bool {
        self.expiry_date.is_none()
    }
}
