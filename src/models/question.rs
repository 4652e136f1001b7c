// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::config::OPTION_COUNT;

/// A question owned by an exam, as presented to the user.
///
/// `order` is the position within the exam; every session index refers to
/// this position, never to storage order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub exam_id: String,
    pub order: u32,
    pub category: String,
    pub drug: String,
    pub stem: String,
    pub options: [String; OPTION_COUNT],
    pub answer_index: u8,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[usize::from(self.answer_index)]
    }
}

/// A normalized, not yet persisted question produced by the import pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuestion {
    pub category: String,
    pub drug: String,
    pub stem: String,
    pub options: [String; OPTION_COUNT],
    pub answer_index: u8,
}

/// Raw row of the 'questions' table.
/// `position` maps to `order`, which is a reserved word in SQL.
#[derive(Debug, FromRow)]
pub(crate) struct QuestionRow {
    pub id: String,
    pub exam_id: String,
    pub position: i64,
    pub category: String,
    pub drug: String,
    pub stem: String,
    pub options: Json<Vec<String>>,
    pub answer_index: i64,
}

impl TryFrom<QuestionRow> for Question {
    type Error = String;

    /// Rejects rows that break the six-options / answer-in-range invariant.
    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let options: [String; OPTION_COUNT] = row
            .options
            .0
            .try_into()
            .map_err(|v: Vec<String>| format!("question {} has {} options", row.id, v.len()))?;
        let answer_index = u8::try_from(row.answer_index)
            .ok()
            .filter(|i| usize::from(*i) < OPTION_COUNT)
            .ok_or_else(|| format!("question {} has answer index {}", row.id, row.answer_index))?;
        let order = u32::try_from(row.position)
            .map_err(|_| format!("question {} has position {}", row.id, row.position))?;

        Ok(Question {
            id: row.id,
            exam_id: row.exam_id,
            order,
            category: row.category,
            drug: row.drug,
            stem: row.stem,
            options,
            answer_index,
        })
    }
}

/// Letter shown next to an option: 0 → 'A', 5 → 'F'.
pub fn option_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// DTO for showing a question before it is answered (excludes the answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicQuestion {
    pub id: String,
    pub order: u32,
    pub category: String,
    pub drug: String,
    pub stem: String,
    pub options: [String; OPTION_COUNT],
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            order: q.order,
            category: q.category.clone(),
            drug: q.drug.clone(),
            stem: q.stem.clone(),
            options: q.options.clone(),
        }
    }
}
