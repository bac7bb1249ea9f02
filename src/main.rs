//! Personalized Health System (PHS)
//!
//! An MCP server for health metric tracking with AI insights.

use std::sync::Arc;

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use phs::advice::{AdviceNormalizer, GeminiClient};
use phs::build_info;
use phs::config::Config;
use phs::db;
use phs::mcp::PhsService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Missing .env is fine; the environment may already be set
    dotenv::dotenv().ok();

    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("phs=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    eprintln!("Database path: {}", config.database_path.display());
    eprintln!("Reports directory: {}", config.reports_dir.display());

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&config.reports_dir)?;

    eprintln!("Initializing database...");
    let database = db::Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        db::migrations::run_migrations(conn)?;
        let version = db::migrations::get_schema_version(conn)?;
        eprintln!("Database schema version: {}", version);
        Ok(())
    })?;

    if config.advisor.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; AI insights will be unavailable");
    }
    let client = GeminiClient::new(config.advisor.clone());
    eprintln!("AI model: {}", client.model());
    let normalizer = AdviceNormalizer::new(Arc::new(client));

    let service = PhsService::new(&config, database, normalizer);

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
