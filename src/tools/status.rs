//! PHS Status Tool
//!
//! Provides runtime status information about the PHS service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::Database;
use crate::models::{HealthInsight, HealthRecord, User};

/// Usage guide for AI assistants
pub const HEALTH_INSTRUCTIONS: &str = r#"
# PHS Usage Instructions

This guide explains how to use the Personalized Health System (PHS) tools.

## Users

Every user is identified by their `azure_id` (the sign-in subject).

1. Call `check_or_create_user` on first contact. It returns `exists: true` for a
   returning user and registers a new one otherwise (`exists: false`).
2. `get_profile` returns name, email, profile picture and registration date.
3. `delete_account` removes the user with all records and insights. It cannot be undone;
   confirm with the user first.
4. `list_users` lists every registered user as `user_id`, `name` and `created_at` rows,
   with a `total`.

---

## Submitting Health Data

`submit_health_data` takes ten metrics:

| Field | Unit |
|-------|------|
| age | years |
| gender | free text |
| height | inches |
| weight | kg |
| blood_pressure_sys / blood_pressure_dia | mmHg |
| heart_rate | bpm |
| sleep_hours | hours per day |
| water_intake | litres per day |
| workout_minutes | minutes per day |

The record is stored, assessed by the AI model, and the assessment is stored as an insight.
The response contains the assessment with five fields: summary, risk_level, diet, fitness, goals.

If the AI model is unreachable the record is still saved and the insight reads
"AI health analysis unavailable due to server issue." with risk level "Unknown".
Submit again later for a real assessment.

---

## Reading History

- `get_latest_health_record` - most recent submission
- `get_latest_insight` - most recent assessment
- `list_health_records` - all submissions oldest first, with blood pressure, heart rate and sleep

---

## Chat

`chat` answers a free-form health question in plain language. Empty questions are not sent
to the model.

---

## Reports

`generate_health_report` renders a PDF from the profile, latest record and latest insight.
All three must exist; submit health data first. The response gives the file path and the
download name `Medical_Health_Report.pdf`.

---

## Important Notes

- AI advice is informational and not a substitute for professional medical advice
- Dates are stored in UTC as `YYYY-MM-DD HH:MM:SS`
"#;

/// Row counts per table
#[derive(Debug, Clone, Serialize)]
pub struct TableCounts {
    pub users: i64,
    pub health_records: i64,
    pub health_insights: i64,
}

/// Runtime status of the PHS service
#[derive(Debug, Clone, Serialize)]
pub struct PhsStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub counts: Option<TableCounts>,

    /// AI model information
    pub ai_model: String,
    pub ai_configured: bool,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    ai_model: String,
    ai_configured: bool,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, ai_model: String, ai_configured: bool) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            ai_model,
            ai_configured,
        }
    }

    /// Get the current status
    pub fn get_status(&self, db: &Database) -> PhsStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let counts = db
            .with_conn(|conn| {
                Ok(TableCounts {
                    users: User::count(conn)?,
                    health_records: HealthRecord::count(conn)?,
                    health_insights: HealthInsight::count(conn)?,
                })
            })
            .map_err(|e| tracing::warn!(error = %e, "could not count rows"))
            .ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        PhsStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            counts,
            ai_model: self.ai_model.clone(),
            ai_configured: self.ai_configured,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::tools::users::check_or_create_user;
    use tempfile::TempDir;

    #[test]
    fn test_status_reports_counts_and_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("phs.db");
        let db = Database::new(&path).unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        check_or_create_user(&db, Some("az-s"), None, None, None).unwrap();

        let tracker = StatusTracker::new(path, "gemini-2.5-flash".to_string(), false);
        let status = tracker.get_status(&db);

        let counts = status.counts.unwrap();
        assert_eq!(counts.users, 1);
        assert_eq!(counts.health_records, 0);
        assert!(status.database_size_bytes.is_some());
        assert_eq!(status.ai_model, "gemini-2.5-flash");
        assert!(!status.ai_configured);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_status_without_schema_has_no_counts() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.db");
        let db = Database::new(&path).unwrap();

        let tracker = StatusTracker::new(path, "m".to_string(), true);
        assert!(tracker.get_status(&db).counts.is_none());
    }

    #[test]
    fn test_instructions_quote_the_unavailable_record() {
        use crate::advice::AdviceResult;

        let unavailable = AdviceResult::unavailable();
        assert!(HEALTH_INSTRUCTIONS.contains(&format!("\"{}\"", unavailable.summary)));
        assert!(HEALTH_INSTRUCTIONS.contains(&format!("risk level \"{}\"", unavailable.risk_level)));
    }

    #[test]
    fn test_instructions_name_every_tool() {
        for tool in [
            "check_or_create_user",
            "get_profile",
            "delete_account",
            "list_users",
            "submit_health_data",
            "get_latest_health_record",
            "get_latest_insight",
            "list_health_records",
            "chat",
            "generate_health_report",
        ] {
            assert!(HEALTH_INSTRUCTIONS.contains(tool), "missing {}", tool);
        }
    }
}
