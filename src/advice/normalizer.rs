//! Advice normalizer
//!
//! Turns an [`AdviceRequest`] into an [`AdviceResult`]. Every failure (empty
//! input, unreadable reply, failed model call) maps to a fixed placeholder, so
//! callers never see an error.

use std::sync::Arc;

use super::gemini::CompletionModel;
use super::parser::parse_assessment;
use super::prompt::{assessment_prompt, chat_prompt};
use super::types::{
    AdviceRequest, AdviceResult, HealthMetrics, CHAT_UNAVAILABLE, EMPTY_CHAT_REPLY,
    UNCLEAR_CHAT_REPLY,
};

#[derive(Clone)]
pub struct AdviceNormalizer {
    model: Arc<dyn CompletionModel>,
}

impl AdviceNormalizer {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Blocks for the duration of one model call (none for an empty chat).
    pub fn get_advice(&self, request: &AdviceRequest) -> AdviceResult {
        match request {
            AdviceRequest::Chat { query } => self.chat(query),
            AdviceRequest::Assessment(metrics) => self.assess(metrics),
        }
    }

    fn chat(&self, query: &str) -> AdviceResult {
        let query = query.trim();
        if query.is_empty() {
            return AdviceResult::summary_only(EMPTY_CHAT_REPLY);
        }

        match self.model.complete(&chat_prompt(query)) {
            Ok(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    AdviceResult::summary_only(UNCLEAR_CHAT_REPLY)
                } else {
                    AdviceResult::summary_only(reply)
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chat model call failed");
                AdviceResult::summary_only(CHAT_UNAVAILABLE)
            }
        }
    }

    fn assess(&self, metrics: &HealthMetrics) -> AdviceResult {
        let raw = match self.model.complete(&assessment_prompt(metrics)) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!(error = %e, "health analysis model call failed");
                return AdviceResult::unavailable();
            }
        };

        let (result, outcome) = parse_assessment(&raw);
        tracing::info!(parsed_by = outcome.as_str(), risk = %result.risk_level, "health analysis normalized");
        result
    }
}
