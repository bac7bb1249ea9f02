//! Advice request and result types

use serde::{Deserialize, Serialize};

pub const EMPTY_CHAT_REPLY: &str = "Please enter a message.";
pub const UNCLEAR_CHAT_REPLY: &str = "I couldn't understand. Please rephrase.";
pub const CHAT_UNAVAILABLE: &str = "AI connection failed. Try again later.";

pub const ANALYSIS_UNAVAILABLE: &str = "AI health analysis unavailable due to server issue.";
pub const UNKNOWN_RISK: &str = "Unknown";

pub const FALLBACK_RISK: &str = "Moderate";
pub const FALLBACK_DIET: &str = "- Drink more water";
pub const FALLBACK_FITNESS: &str = "- Walk 30 min daily";
pub const FALLBACK_GOALS: &str = "- Improve sleep";

/// The ten metrics a user submits for analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    pub age: f64,
    pub gender: String,
    /// Inches
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    pub blood_pressure_sys: f64,
    pub blood_pressure_dia: f64,
    pub heart_rate: f64,
    pub sleep_hours: f64,
    /// Litres per day
    pub water_intake: f64,
    pub workout_minutes: f64,
}

/// What the caller wants from the model
#[derive(Debug, Clone, PartialEq)]
pub enum AdviceRequest {
    Chat { query: String },
    Assessment(HealthMetrics),
}

impl AdviceRequest {
    pub fn chat(query: impl Into<String>) -> Self {
        AdviceRequest::Chat { query: query.into() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AdviceRequest::Chat { .. } => "chat",
            AdviceRequest::Assessment(_) => "assessment",
        }
    }
}

/// Normalized model output. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceResult {
    pub summary: String,
    pub risk_level: String,
    pub diet: String,
    pub fitness: String,
    pub goals: String,
}

impl AdviceResult {
    /// Result carrying only a summary line
    pub fn summary_only(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Default::default()
        }
    }

    /// Returned when the model call itself failed during an assessment
    pub fn unavailable() -> Self {
        Self {
            summary: ANALYSIS_UNAVAILABLE.to_string(),
            risk_level: UNKNOWN_RISK.to_string(),
            ..Default::default()
        }
    }

    /// Returned when the reply could not be read as JSON at all
    pub fn fallback(cleaned_reply: &str) -> Self {
        Self {
            summary: cleaned_reply.to_string(),
            risk_level: FALLBACK_RISK.to_string(),
            diet: FALLBACK_DIET.to_string(),
            fitness: FALLBACK_FITNESS.to_string(),
            goals: FALLBACK_GOALS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_use_camel_case_on_the_wire() {
        let json = r#"{
            "age": 34, "gender": "Female", "height": 65, "weight": 61.5,
            "bloodPressureSys": 118, "bloodPressureDia": 76, "heartRate": 68,
            "sleepHours": 7.5, "waterIntake": 2, "workoutMinutes": 30
        }"#;
        let metrics: HealthMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.blood_pressure_sys, 118.0);
        assert_eq!(metrics.water_intake, 2.0);

        let back = serde_json::to_value(&metrics).unwrap();
        assert!(back.get("workoutMinutes").is_some());
    }

    #[test]
    fn test_unavailable_result() {
        let result = AdviceResult::unavailable();
        assert_eq!(result.summary, ANALYSIS_UNAVAILABLE);
        assert_eq!(result.risk_level, "Unknown");
        assert!(result.diet.is_empty() && result.fitness.is_empty() && result.goals.is_empty());
    }
}
