//! PHS MCP Server Implementation
//!
//! Implements the MCP server with all PHS tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::advice::{AdviceNormalizer, HealthMetrics};
use crate::config::Config;
use crate::db::Database;
use crate::tools::health;
use crate::tools::reports;
use crate::tools::status::StatusTracker;
use crate::tools::users;

/// PHS MCP Service
#[derive(Clone)]
pub struct PhsService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    normalizer: AdviceNormalizer,
    reports_dir: PathBuf,
    tool_router: ToolRouter<PhsService>,
}

impl PhsService {
    pub fn new(config: &Config, database: Database, normalizer: AdviceNormalizer) -> Self {
        let tracker = StatusTracker::new(
            config.database_path.clone(),
            config.advisor.model.clone(),
            config.advisor.api_key.is_some(),
        );

        Self {
            status_tracker: Arc::new(Mutex::new(tracker)),
            database,
            normalizer,
            reports_dir: config.reports_dir.clone(),
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn message_json(key: &str, message: &str) -> Result<CallToolResult, McpError> {
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), message.into());
    to_json(&body)
}

/// Run blocking work (model calls, PDF rendering) off the async runtime
async fn run_blocking<T, F>(work: F) -> Result<T, McpError>
where
    F: FnOnce() -> Result<T, String> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| McpError::internal_error(format!("Task failed: {}", e), None))?
        .map_err(|e| McpError::internal_error(e, None))
}

// ============================================================================
// User Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CheckOrCreateUserParams {
    /// External identity (sign-in subject). Missing means nothing is registered.
    pub azure_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    /// The user's azure_id
    pub user_id: String,
}

// ============================================================================
// Health Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SubmitHealthDataParams {
    /// The user's azure_id
    pub user_id: String,
    /// Age in years
    pub age: f64,
    pub gender: String,
    /// Height in inches
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
    /// Systolic blood pressure in mmHg
    pub blood_pressure_sys: f64,
    /// Diastolic blood pressure in mmHg
    pub blood_pressure_dia: f64,
    /// Heart rate in bpm
    pub heart_rate: f64,
    /// Sleep in hours per day
    pub sleep_hours: f64,
    /// Water intake in litres per day
    pub water_intake: f64,
    /// Workout in minutes per day
    pub workout_minutes: f64,
}

impl SubmitHealthDataParams {
    fn into_parts(self) -> (String, HealthMetrics) {
        let metrics = HealthMetrics {
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            blood_pressure_sys: self.blood_pressure_sys,
            blood_pressure_dia: self.blood_pressure_dia,
            heart_rate: self.heart_rate,
            sleep_hours: self.sleep_hours,
            water_intake: self.water_intake,
            workout_minutes: self.workout_minutes,
        };
        (self.user_id, metrics)
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChatParams {
    /// The health question
    pub query: String,
}

// ============================================================================
// Tool Router Implementation
// ============================================================================

#[tool_router]
impl PhsService {
    // --- Status ---

    #[tool(description = "Get the current status of the PHS service including build info, database status, row counts and process information")]
    async fn phs_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get instructions for using the PHS tools. Call this when starting a session or when unsure how to use the health tools.")]
    fn health_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::HEALTH_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(HEALTH_INSTRUCTIONS)]))
    }

    // --- Users ---

    #[tool(description = "Check whether a user is registered, registering them if not. Returns exists=true only for returning users.")]
    fn check_or_create_user(&self, Parameters(p): Parameters<CheckOrCreateUserParams>) -> Result<CallToolResult, McpError> {
        let result = users::check_or_create_user(
            &self.database,
            p.azure_id.as_deref(),
            p.name.as_deref(),
            p.email.as_deref(),
            p.profile_pic.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a user's profile (name, email, profile picture, registration date)")]
    fn get_profile(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = users::get_profile(&self.database, &p.user_id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(profile) => to_json(&profile),
            None => message_json("error", "User not found"),
        }
    }

    #[tool(description = "Delete a user's account together with all their health records and insights. Cannot be undone.")]
    fn delete_account(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = users::delete_account(&self.database, &p.user_id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "List every registered user with user_id, name and registration date")]
    fn list_users(&self) -> Result<CallToolResult, McpError> {
        let result = users::list_users(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Health Data ---

    #[tool(description = "Submit the ten health metrics for a registered user. Stores the record, runs the AI health assessment and stores the resulting insight.")]
    async fn submit_health_data(&self, Parameters(p): Parameters<SubmitHealthDataParams>) -> Result<CallToolResult, McpError> {
        let (user_id, metrics) = p.into_parts();
        let database = self.database.clone();
        let normalizer = self.normalizer.clone();

        let result = run_blocking(move || health::submit_health_data(&database, &normalizer, &user_id, metrics)).await?;
        to_json(&result)
    }

    #[tool(description = "Ask the AI a free-form health question and get a plain-language answer")]
    async fn chat(&self, Parameters(p): Parameters<ChatParams>) -> Result<CallToolResult, McpError> {
        let normalizer = self.normalizer.clone();
        let result = run_blocking(move || Ok(health::chat(&normalizer, &p.query))).await?;
        to_json(&result)
    }

    #[tool(description = "Get the user's most recent health record")]
    fn get_latest_health_record(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = health::get_latest_health_record(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(record) => to_json(&record),
            None => message_json("message", "No records found"),
        }
    }

    #[tool(description = "Get the user's most recent AI health insight")]
    fn get_latest_insight(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = health::get_latest_insight(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(insight) => to_json(&insight),
            None => message_json("message", "No insights yet"),
        }
    }

    #[tool(description = "List all of the user's health records oldest first with blood pressure, heart rate and sleep (for trend charts)")]
    fn list_health_records(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = health::list_health_records(&self.database, &p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Reports ---

    #[tool(description = "Generate the PDF medical health report from the user's profile, latest record and latest insight. Returns the file path.")]
    async fn generate_health_report(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let database = self.database.clone();
        let reports_dir = self.reports_dir.clone();
        let today = chrono::Local::now().date_naive();

        let result = run_blocking(move || reports::generate_health_report(&database, &reports_dir, &p.user_id, today)).await?;
        match result {
            Some(report) => to_json(&report),
            None => message_json("error", "Data not found"),
        }
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for PhsService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "phs".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Personalized Health System".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Personalized Health System (PHS) - Health metrics tracking with AI insights and PDF reports. \
                 IMPORTANT: Call health_instructions first. \
                 Users: check_or_create_user, get_profile, delete_account, list_users. \
                 Health: submit_health_data, get_latest_health_record, get_latest_insight, list_health_records. \
                 AI: chat. Reports: generate_health_report. Service: phs_status."
                    .into(),
            ),
        }
    }
}
