//! Prompts for wellness plan generation.

use serde::{Deserialize, Serialize};

/// System prompt for the plan generator.
pub const SYSTEM_PROMPT: &str = "You are a nutrition and fitness coach. Write safe, practical \
wellness plans and remind the reader to consult a healthcare professional for medical advice.";

const DEFAULT_GOALS: &str = "General wellness";
const DEFAULT_CONDITIONS: &str = "None specified";
const DEFAULT_PREFERENCES: &str = "No specific preferences";

/// What the user told us about themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub bmi: f64,
    pub health_goals: Option<String>,
    pub health_conditions: Option<String>,
    pub dietary_preferences: Option<String>,
}

/// Blank or missing free text falls back to the default.
fn or_default<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
}

/// User prompt for one plan request.
pub fn make_plan_prompt(request: &PlanRequest) -> String {
    format!(
        r#"Create a personalised wellness plan for this person:

- Weight: {weight} kg
- Height: {height} cm
- BMI: {bmi:.1}
- Health goals: {goals}
- Health conditions: {conditions}
- Dietary preferences: {preferences}

Include a short BMI analysis, a 7-day meal plan, a 7-day workout plan and key health tips.
Use headers and bullet points, one section per day."#,
        weight = request.weight_kg,
        height = request.height_cm,
        bmi = request.bmi,
        goals = or_default(&request.health_goals, DEFAULT_GOALS),
        conditions = or_default(&request.health_conditions, DEFAULT_CONDITIONS),
        preferences = or_default(&request.dietary_preferences, DEFAULT_PREFERENCES),
    )
}

/// System prompt for yoga and herbal wellness suggestions.
pub const YOGA_SYSTEM_PROMPT: &str = "You are a wellness assistant for yoga, meditation and herbal \
remedies. Give short, practical, encouraging recommendations that fit the user's profile.";

const NOT_SPECIFIED: &str = "Not specified";

/// Profile details used to personalise suggestions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YogaRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub health_goals: Option<String>,
    pub dietary_preferences: Option<String>,
    pub fitness_level: Option<String>,
}

impl YogaRequest {
    /// Request used when the user has no profile yet.
    pub fn without_profile() -> Self {
        Self {
            first_name: Some("User".into()),
            health_goals: Some(DEFAULT_GOALS.into()),
            fitness_level: Some("Beginner".into()),
            ..Default::default()
        }
    }
}

fn or_not_specified<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.into())
}

/// User prompt for yoga and herbal suggestions.
pub fn make_yoga_prompt(request: &YogaRequest) -> String {
    let name = [request.first_name.as_deref(), request.last_name.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"Suggest a daily yoga routine, a meditation practice and herbal wellness tips for this person:

- Name: {name}
- Age: {age}
- Height: {height} cm
- Weight: {weight} kg
- Health goals: {goals}
- Dietary preferences: {preferences}
- Fitness level: {fitness}"#,
        name = or_not_specified(Some(name)),
        age = or_not_specified(request.age),
        height = or_not_specified(request.height_cm),
        weight = or_not_specified(request.weight_kg),
        goals = or_not_specified(request.health_goals.as_deref()),
        preferences = or_not_specified(request.dietary_preferences.as_deref()),
        fitness = or_not_specified(request.fitness_level.as_deref()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request() -> PlanRequest {
        PlanRequest {
            weight_kg: 70.0,
            height_cm: 175.0,
            bmi: 22.857,
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_prompt_defaults() {
        let prompt = make_plan_prompt(&request());
        assert!(prompt.contains("Weight: 70 kg"));
        assert!(prompt.contains("BMI: 22.9"));
        assert!(prompt.contains("Health goals: General wellness"));
        assert!(prompt.contains("Health conditions: None specified"));
        assert!(prompt.contains("Dietary preferences: No specific preferences"));
    }

    #[test]
    fn test_plan_prompt_user_text() {
        let prompt = make_plan_prompt(&PlanRequest {
            health_goals: Some("Run a 10k".into()),
            health_conditions: Some("   ".into()),
            dietary_preferences: Some("Vegetarian".into()),
            ..request()
        });
        assert!(prompt.contains("Health goals: Run a 10k"));
        assert!(prompt.contains("Health conditions: None specified"));
        assert!(prompt.contains("Dietary preferences: Vegetarian"));
    }

    #[test]
    fn test_yoga_prompt_without_profile() {
        let prompt = make_yoga_prompt(&YogaRequest::without_profile());
        assert!(prompt.contains("Name: User"));
        assert!(prompt.contains("Age: Not specified"));
        assert!(prompt.contains("Height: Not specified cm"));
        assert!(prompt.contains("Health goals: General wellness"));
        assert!(prompt.contains("Fitness level: Beginner"));
    }

    #[test]
    fn test_yoga_prompt_with_profile() {
        let prompt = make_yoga_prompt(&YogaRequest {
            first_name: Some("Asha".into()),
            last_name: Some("Rao".into()),
            age: Some(34),
            height_cm: Some(162.5),
            dietary_preferences: Some("".into()),
            ..Default::default()
        });
        assert!(prompt.contains("Name: Asha Rao"));
        assert!(prompt.contains("Age: 34"));
        assert!(prompt.contains("Height: 162.5 cm"));
        assert!(prompt.contains("Dietary preferences: Not specified"));
        assert!(prompt.contains("Fitness level: Not specified"));
    }

    proptest! {
        #[test]
        fn plan_prompt_rounds_bmi_to_one_decimal(bmi in 10.0f64..60.0) {
            let prompt = make_plan_prompt(&PlanRequest { bmi, ..request() });
            let expected = format!("BMI: {:.1}\n", bmi);
            prop_assert!(prompt.contains(&expected));
        }
    }
}
