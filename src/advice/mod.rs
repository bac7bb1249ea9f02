//! AI health advice
//!
//! Prompts the external model and turns whatever it replies with into a fully
//! populated [`AdviceResult`].

mod gemini;
mod normalizer;
mod parser;
mod prompt;
#[cfg(test)]
pub(crate) mod testing;
mod types;

pub use gemini::{CompletionModel, GeminiClient, ModelError};
pub use normalizer::AdviceNormalizer;
pub use parser::{clean_reply, parse_assessment, ParseOutcome};
pub use prompt::{assessment_prompt, chat_prompt};
pub use types::{AdviceRequest, AdviceResult, HealthMetrics};
