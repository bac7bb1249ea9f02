//! Runtime configuration
//!
//! Everything the server needs is read once from the environment (after `.env`
//! loading in `main`) and handed to constructors explicitly.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

/// Settings for the outbound AI model
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl AdvisorConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let timeout = std::env::var("PHS_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        Self {
            api_key,
            model: std::env::var("PHS_GEMINI_MODEL").unwrap_or(defaults.model),
            endpoint: std::env::var("PHS_GEMINI_ENDPOINT").unwrap_or(defaults.endpoint),
            timeout,
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub reports_dir: PathBuf,
    pub advisor: AdvisorConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var("PHS_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root().join("data").join("phs.db"));

        let reports_dir = std::env::var("PHS_REPORTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| project_root().join("reports"));

        Self {
            database_path,
            reports_dir,
            advisor: AdvisorConfig::from_env(),
        }
    }
}

/// Directory of the executable, stepping out of `target/{debug,release}`
pub fn project_root() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisor_defaults() {
        let cfg = AdvisorConfig::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert_eq!(cfg.timeout, Duration::from_secs(60));
        assert!(cfg.endpoint.starts_with("https://"));
    }
}
