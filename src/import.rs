// src/import.rs

//! Turns an untrusted question-bank payload into normalized questions.
//!
//! Everything here is pure: no clock, no storage. A payload is accepted or
//! rejected as a whole; the first bad element aborts the import.

use serde_json::Value;
use thiserror::Error;

use crate::{
    config::{OPTION_COUNT, OPTION_PLACEHOLDER, STEM_PLACEHOLDER},
    models::question::NewQuestion,
    utils::json::{integral, truthy},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("exam JSON must be an array of questions")]
    NotAnArray,

    /// `position` is 1-based, as shown to the user.
    #[error("question {position} is invalid")]
    NotARecord { position: usize },

    #[error("question {position} is missing a valid answerIndex")]
    InvalidAnswerIndex { position: usize },

    #[error("no questions found")]
    NoQuestions,
}

/// Parses raw file text and normalizes it. An empty question list is rejected
/// here because an exam needs at least one question to exist.
pub fn parse_payload(text: &str) -> Result<Vec<NewQuestion>, ValidationError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
    let questions = normalize(&raw)?;
    if questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }
    Ok(questions)
}

/// Normalizes an already parsed payload, preserving input order.
pub fn normalize(raw: &Value) -> Result<Vec<NewQuestion>, ValidationError> {
    let items = raw.as_array().ok_or(ValidationError::NotAnArray)?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| normalize_question(item, i + 1))
        .collect()
}

fn normalize_question(item: &Value, position: usize) -> Result<NewQuestion, ValidationError> {
    let record = item
        .as_object()
        .ok_or(ValidationError::NotARecord { position })?;

    let answer_index = record
        .get("answerIndex")
        .and_then(integral_index)
        .ok_or(ValidationError::InvalidAnswerIndex { position })?;

    let mut options: Vec<String> = record
        .get("options")
        .and_then(Value::as_array)
        .map(|opts| opts.iter().take(OPTION_COUNT).map(option_text).collect())
        .unwrap_or_default();
    options.resize(OPTION_COUNT, OPTION_PLACEHOLDER.to_string());

    let stem = text_field(record.get("stem"));

    Ok(NewQuestion {
        category: text_field(record.get("category")),
        drug: text_field(record.get("drug")),
        stem: if stem.is_empty() {
            STEM_PLACEHOLDER.to_string()
        } else {
            stem
        },
        // resize above guarantees the length
        options: options
            .try_into()
            .map_err(|_| ValidationError::NotARecord { position })?,
        answer_index,
    })
}

/// Accepts `2` and `2.0`, rejects `2.5`, negatives, strings and anything past the last option.
fn integral_index(value: &Value) -> Option<u8> {
    integral(value)
        .filter(|&i| i < OPTION_COUNT as u64)
        .map(|i| i as u8)
}

fn option_text(value: &Value) -> String {
    match value {
        Value::Null => OPTION_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Falsy values (`null`, `false`, `0`, `""`) read as absent.
fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) if truthy(other) => other.to_string(),
        _ => String::new(),
    }
}
