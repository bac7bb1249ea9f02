//! Report MCP Tools
//!
//! Renders the medical health report for a user and writes it to the
//! reports directory.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::db::Database;
use crate::models::{HealthInsight, HealthRecord, User};
use crate::report::{self, PatientProfile, REPORT_FILENAME};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateReportResponse {
    pub success: bool,
    pub report_id: String,
    pub file_path: String,
    /// Name to offer when the file is downloaded
    pub filename: String,
    pub size_bytes: usize,
    pub message: String,
}

/// Report identifier, `PHS-{year}-{six upper-case hex digits}`
pub fn report_id(generated_on: NaiveDate, insight_id: i64) -> String {
    format!("PHS-{}-{:06X}", generated_on.year(), insight_id & 0xFF_FFFF)
}

// ============================================================================
// Report Generation
// ============================================================================

/// Render the report from the user's profile, latest record and latest insight.
///
/// Returns `Ok(None)` when any of the three is missing.
pub fn generate_health_report(
    db: &Database,
    reports_dir: &Path,
    user_id: &str,
    generated_on: NaiveDate,
) -> Result<Option<GenerateReportResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = User::get_by_azure_id(&conn, user_id).map_err(|e| format!("Failed to get user: {}", e))?;
    let record = HealthRecord::latest_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get health record: {}", e))?;
    let insight = HealthInsight::latest_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get health insight: {}", e))?;
    drop(conn);

    let (Some(user), Some(record), Some(insight)) = (user, record, insight) else {
        tracing::warn!(user_id, "report requested without complete data");
        return Ok(None);
    };

    let profile = PatientProfile {
        name: user.display_name().to_string(),
        email: user.email.clone().unwrap_or_default(),
        patient_id: user.azure_id.clone(),
        generated_on,
    };

    let bytes = report::render(&profile, &record.to_snapshot(), &insight.to_advice())
        .map_err(|e| format!("Failed to render report: {}", e))?;

    let report_id = report_id(generated_on, insight.id);
    let path = reports_dir.join(format!("{}.pdf", report_id));

    std::fs::create_dir_all(reports_dir).map_err(|e| e.to_string())?;
    let file = File::create(&path).map_err(|e| e.to_string())?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(|e| e.to_string())?;
    writer.flush().map_err(|e| e.to_string())?;

    tracing::info!(user_id, report_id = %report_id, size = bytes.len(), "health report written");

    Ok(Some(GenerateReportResponse {
        success: true,
        file_path: path.display().to_string(),
        filename: REPORT_FILENAME.to_string(),
        size_bytes: bytes.len(),
        message: format!("Health report {} generated for {}", report_id, profile.name),
        report_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::testing::ScriptedModel;
    use crate::advice::{AdviceNormalizer, HealthMetrics};
    use crate::db::migrations::run_migrations;
    use crate::tools::health::submit_health_data;
    use crate::tools::users::check_or_create_user;
    use tempfile::TempDir;

    fn test_db(dir: &TempDir) -> Database {
        let db = Database::new(dir.path().join("phs.db")).unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        check_or_create_user(&db, Some("az-3"), Some("Sam Okafor"), Some("sam@example.com"), None).unwrap();
        db
    }

    fn metrics() -> HealthMetrics {
        HealthMetrics {
            age: 60.0,
            gender: "Male".to_string(),
            height: 70.0,
            weight: 92.0,
            blood_pressure_sys: 148.0,
            blood_pressure_dia: 94.0,
            heart_rate: 83.0,
            sleep_hours: 6.0,
            water_intake: 1.2,
            workout_minutes: 5.0,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()
    }

    #[test]
    fn test_report_id_format() {
        assert_eq!(report_id(day(), 1), "PHS-2025-000001");
        assert_eq!(report_id(day(), 0xABCDE), "PHS-2025-0ABCDE");
    }

    #[test]
    fn test_report_written_to_reports_dir() {
        let dir = TempDir::new().unwrap();
        let db = test_db(&dir);
        let normalizer = AdviceNormalizer::new(ScriptedModel::replying(
            r#"{"summary":"High blood pressure.","risk_level":"High","diet":"• Cut sodium • More potassium","fitness":"- Daily walks","goals":"- See a doctor"}"#,
        ));
        submit_health_data(&db, &normalizer, "az-3", metrics()).unwrap();

        let reports_dir = dir.path().join("reports");
        let response = generate_health_report(&db, &reports_dir, "az-3", day()).unwrap().unwrap();

        assert!(response.success);
        assert!(response.report_id.starts_with("PHS-2025-"));
        assert_eq!(response.filename, "Medical_Health_Report.pdf");

        let bytes = std::fs::read(&response.file_path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(bytes.len(), response.size_bytes);
    }

    #[test]
    fn test_missing_data_gives_none() {
        let dir = TempDir::new().unwrap();
        let db = test_db(&dir);
        let reports_dir = dir.path().join("reports");

        // Registered but nothing submitted
        assert!(generate_health_report(&db, &reports_dir, "az-3", day()).unwrap().is_none());
        // Unknown user
        assert!(generate_health_report(&db, &reports_dir, "az-unknown", day()).unwrap().is_none());
        assert!(!reports_dir.exists());
    }
}
