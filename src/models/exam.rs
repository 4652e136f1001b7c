// src/models/exam.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'exams' table in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,

    pub name: String,

    /// Name of the JSON file the questions were imported from.
    pub file_name: String,

    /// Epoch milliseconds.
    pub created_at: i64,
    pub updated_at: i64,

    /// Cached number of questions; always equals the stored question rows.
    pub question_count: i64,
}

/// DTO for importing a question bank.
///
/// `content` is the raw file text; it is parsed and normalized server-side
/// so that malformed files fail the same way as malformed questions.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ImportExamRequest {
    #[validate(length(min = 1, max = 200, message = "Give your exam a name"))]
    pub name: String,
    #[validate(length(min = 1, max = 255, message = "Choose a JSON file first"))]
    pub file_name: String,
    pub content: String,
}

/// DTO for renaming an exam.
#[derive(Debug, Deserialize, Validate)]
pub struct RenameExamRequest {
    #[validate(length(min = 1, max = 200, message = "Exam name cannot be empty"))]
    pub name: String,
}
