//! Assessment reply parsing
//!
//! Replies are tried against an ordered list of strategies; the first one that
//! yields a JSON object wins, and the fallback record is used when none do.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use super::types::AdviceResult;

/// Which step of the chain produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The whole cleaned reply was a JSON object
    Direct,
    /// A `{...}` span inside the reply was a JSON object
    Embedded,
    /// Nothing parsed; placeholder advice was substituted
    Fallback,
}

impl ParseOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseOutcome::Direct => "direct",
            ParseOutcome::Embedded => "embedded",
            ParseOutcome::Fallback => "fallback",
        }
    }
}

type Strategy = fn(&str) -> Option<AdviceResult>;

const STRATEGIES: &[(ParseOutcome, Strategy)] = &[
    (ParseOutcome::Direct, parse_direct),
    (ParseOutcome::Embedded, parse_embedded_span),
];

/// Remove Markdown code fences and surrounding whitespace
pub fn clean_reply(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Run the strategy chain over a raw model reply
pub fn parse_assessment(raw: &str) -> (AdviceResult, ParseOutcome) {
    let cleaned = clean_reply(raw);

    for (outcome, strategy) in STRATEGIES {
        if let Some(result) = strategy(&cleaned) {
            return (result, *outcome);
        }
    }

    (AdviceResult::fallback(&cleaned), ParseOutcome::Fallback)
}

fn parse_direct(cleaned: &str) -> Option<AdviceResult> {
    parse_object(cleaned)
}

/// Greedy: spans from the first `{` to the last `}` in the reply.
fn parse_embedded_span(cleaned: &str) -> Option<AdviceResult> {
    let span = json_span()?.find(cleaned)?;
    parse_object(span.as_str())
}

fn json_span() -> Option<&'static Regex> {
    static SPAN: OnceLock<Option<Regex>> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"(?s)\{.*\}").ok()).as_ref()
}

fn parse_object(text: &str) -> Option<AdviceResult> {
    match serde_json::from_str::<Value>(text).ok()? {
        Value::Object(obj) => Some(result_from_object(&obj)),
        _ => None,
    }
}

fn result_from_object(obj: &Map<String, Value>) -> AdviceResult {
    let risk_level = match obj.get("risk_level") {
        Some(v) => text_of(v),
        None => obj.get("riskLevel").map(text_of).unwrap_or_default(),
    };

    AdviceResult {
        summary: field(obj, "summary"),
        risk_level,
        diet: field(obj, "diet"),
        fitness: field(obj, "fitness"),
        goals: field(obj, "goals"),
    }
}

fn field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).map(text_of).unwrap_or_default()
}

/// Coerce any JSON value into the plain-text field convention.
/// Arrays become one `- item` line per element.
fn text_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                let line = text_of(item);
                if line.starts_with('-') {
                    line
                } else {
                    format!("- {}", line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
