//! Prompt templates sent to the model

use super::types::HealthMetrics;

/// Free-form question prompt. `query` must already be trimmed.
pub fn chat_prompt(query: &str) -> String {
    format!(
        r#"You are a friendly AI medical assistant.

User Question:
"{query}"

Respond clearly and helpfully in plain text. Avoid extreme medical claims."#
    )
}

/// Structured analysis prompt asking for a bare JSON object
pub fn assessment_prompt(m: &HealthMetrics) -> String {
    format!(
        r#"You are an expert AI health assistant. Analyze the following user data:

Age: {age}
Gender: {gender}
Height: {height} inches
Weight: {weight} kg
Blood Pressure: {sys}/{dia}
Heart Rate: {hr} bpm
Sleep: {sleep} hrs/day
Water Intake: {water} L/day
Workout: {workout} min/day

Provide output ONLY in this exact JSON format:

{{
  "summary": "short summary",
  "risk_level": "Low" | "Moderate" | "High",
  "diet": "- item 1\n- item 2",
  "fitness": "- item 1\n- item 2",
  "goals": "- goal 1\n- goal 2"
}}

No markdown, no extra text."#,
        age = m.age,
        gender = m.gender,
        height = m.height,
        weight = m.weight,
        sys = m.blood_pressure_sys,
        dia = m.blood_pressure_dia,
        hr = m.heart_rate,
        sleep = m.sleep_hours,
        water = m.water_intake,
        workout = m.workout_minutes,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_prompt_embeds_query() {
        let prompt = chat_prompt("What is diabetes?");
        assert!(prompt.contains("\"What is diabetes?\""));
        assert!(prompt.starts_with("You are a friendly AI medical assistant."));
    }

    #[test]
    fn test_assessment_prompt_lists_every_metric() {
        let metrics = HealthMetrics {
            age: 42.0,
            gender: "Male".to_string(),
            height: 70.0,
            weight: 82.5,
            blood_pressure_sys: 128.0,
            blood_pressure_dia: 84.0,
            heart_rate: 72.0,
            sleep_hours: 6.5,
            water_intake: 1.5,
            workout_minutes: 20.0,
        };
        let prompt = assessment_prompt(&metrics);

        assert!(prompt.contains("Age: 42\n"));
        assert!(prompt.contains("Gender: Male\n"));
        assert!(prompt.contains("Height: 70 inches"));
        assert!(prompt.contains("Weight: 82.5 kg"));
        assert!(prompt.contains("Blood Pressure: 128/84"));
        assert!(prompt.contains("Heart Rate: 72 bpm"));
        assert!(prompt.contains("Sleep: 6.5 hrs/day"));
        assert!(prompt.contains("Water Intake: 1.5 L/day"));
        assert!(prompt.contains("Workout: 20 min/day"));
        assert!(prompt.contains(r#""risk_level": "Low" | "Moderate" | "High""#));
        // the bullet separator is a literal backslash-n for the model to copy
        assert!(prompt.contains(r#""- item 1\n- item 2""#));
    }
}
