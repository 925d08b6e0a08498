//! Body measurements and BMI.

use serde::{Deserialize, Serialize};

/// Weight and height as entered on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Biometrics {
    pub weight_kg: f64,
    pub height_cm: f64,
}

impl Biometrics {
    pub fn new(weight_kg: f64, height_cm: f64) -> Self {
        Self { weight_kg, height_cm }
    }

    /// Body mass index, `None` unless both values are finite and positive.
    pub fn bmi(&self) -> Option<f64> {
        bmi(self.weight_kg, self.height_cm)
    }
}

/// `weight / height_m^2`.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !(weight_kg.is_finite() && height_cm.is_finite()) || weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    Some(weight_kg / (height_m * height_m))
}

/// What the user has told us about themselves.
///
/// Everything except the owner is optional; a fresh profile is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    /// Last computed BMI, saved alongside the measurements it came from
    pub bmi: Option<f64>,
    pub health_goals: Option<String>,
    pub dietary_preferences: Option<String>,
    pub fitness_level: Option<String>,
    pub updated_at: String,
}

impl UserProfile {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
            ..Default::default()
        }
    }

    /// Stored measurements, if both are present.
    pub fn biometrics(&self) -> Option<Biometrics> {
        Some(Biometrics::new(self.weight_kg?, self.height_cm?))
    }
}

/// Standard adult BMI bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmi() {
        let value = bmi(70.0, 175.0).unwrap();
        assert!((value - 22.857).abs() < 0.001);
        assert_eq!(Biometrics::new(70.0, 175.0).bmi(), Some(value));
    }

    #[test]
    fn test_bmi_rejects_bad_input() {
        assert_eq!(bmi(0.0, 175.0), None);
        assert_eq!(bmi(70.0, -1.0), None);
        assert_eq!(bmi(f64::NAN, 175.0), None);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(BmiCategory::from_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::from_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::from_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::from_bmi(30.0), BmiCategory::Obese);
        assert_eq!(BmiCategory::Normal.label(), "Normal weight");
    }

    #[test]
    fn test_profile_biometrics() {
        let mut profile = UserProfile::new("user-1");
        assert!(profile.biometrics().is_none());

        profile.weight_kg = Some(70.0);
        assert!(profile.biometrics().is_none());

        profile.height_cm = Some(175.0);
        assert_eq!(profile.biometrics(), Some(Biometrics::new(70.0, 175.0)));
    }
}
