//! Health MCP Tools
//!
//! Health data submission with AI assessment, the health chat, and read
//! access to stored records and insights.

use serde::Serialize;

use crate::advice::{AdviceNormalizer, AdviceRequest, AdviceResult, HealthMetrics};
use crate::db::Database;
use crate::models::{HealthInsight, HealthRecord, HealthTrendPoint, User};

/// Response for submit_health_data
#[derive(Debug, Serialize)]
pub struct SubmitHealthDataResponse {
    pub message: String,
    pub record_id: i64,
    pub insight_id: i64,
    pub user_id: String,
    pub ai: AdviceResult,
}

/// Response for chat
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Response for get_latest_health_record
#[derive(Debug, Serialize)]
pub struct LatestHealthRecordResponse {
    #[serde(flatten)]
    pub metrics: HealthMetrics,
    pub created_at: String,
}

/// Response for get_latest_insight
#[derive(Debug, Serialize)]
pub struct LatestInsightResponse {
    #[serde(flatten)]
    pub advice: AdviceResult,
    pub created_at: String,
}

/// Response for list_health_records
#[derive(Debug, Serialize)]
pub struct ListHealthRecordsResponse {
    pub records: Vec<HealthTrendPoint>,
    pub total: usize,
}

/// Store a submission, run the AI assessment on it and store the insight.
///
/// Blocks for one model call; the connection is not held across it.
pub fn submit_health_data(
    db: &Database,
    normalizer: &AdviceNormalizer,
    user_id: &str,
    metrics: HealthMetrics,
) -> Result<SubmitHealthDataResponse, String> {
    let record = {
        let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

        let registered = User::exists(&conn, user_id).map_err(|e| format!("Failed to look up user: {}", e))?;
        if !registered {
            return Err(format!("User not found: {}", user_id));
        }

        HealthRecord::create(&conn, user_id, &metrics)
            .map_err(|e| format!("Failed to save health record: {}", e))?
    };

    let advice = normalizer.get_advice(&AdviceRequest::Assessment(metrics));

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let insight = HealthInsight::create(&conn, user_id, Some(record.id), &advice)
        .map_err(|e| format!("Failed to save health insight: {}", e))?;

    tracing::info!(user_id, record_id = record.id, insight_id = insight.id, "health data saved");

    Ok(SubmitHealthDataResponse {
        message: "Saved Successfully".to_string(),
        record_id: record.id,
        insight_id: insight.id,
        user_id: user_id.to_string(),
        ai: advice,
    })
}

/// Answer a free-form health question
pub fn chat(normalizer: &AdviceNormalizer, query: &str) -> ChatResponse {
    let advice = normalizer.get_advice(&AdviceRequest::chat(query));
    ChatResponse {
        response: advice.summary,
    }
}

/// Get the user's most recent health record
pub fn get_latest_health_record(db: &Database, user_id: &str) -> Result<Option<LatestHealthRecordResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let record = HealthRecord::latest_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get health record: {}", e))?;

    Ok(record.map(|r| LatestHealthRecordResponse {
        metrics: r.to_metrics(),
        created_at: r.created_at,
    }))
}

/// Get the user's most recent AI insight
pub fn get_latest_insight(db: &Database, user_id: &str) -> Result<Option<LatestInsightResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let insight = HealthInsight::latest_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to get health insight: {}", e))?;

    Ok(insight.map(|i| LatestInsightResponse {
        advice: i.to_advice(),
        created_at: i.created_at,
    }))
}

/// List the user's records oldest first, reduced to the charted fields
pub fn list_health_records(db: &Database, user_id: &str) -> Result<ListHealthRecordsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let records = HealthRecord::list_for_user(&conn, user_id)
        .map_err(|e| format!("Failed to list health records: {}", e))?;

    let points: Vec<HealthTrendPoint> = records.iter().map(HealthRecord::trend_point).collect();
    let total = points.len();

    Ok(ListHealthRecordsResponse { records: points, total })
}
