// src/pages/exams.rs

use serde::Serialize;

use super::View;
use crate::{error::AppError, models::exam::Exam, state::AppState, utils::time::day_label};

/// One exam in the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamCard {
    pub id: String,
    pub name: String,
    pub question_count: i64,
    pub created_at: i64,
    /// e.g. "Oct 16"
    pub created_label: String,
}

impl From<Exam> for ExamCard {
    fn from(exam: Exam) -> Self {
        Self {
            created_label: day_label(exam.created_at),
            id: exam.id,
            name: exam.name,
            question_count: exam.question_count,
            created_at: exam.created_at,
        }
    }
}

pub async fn render_list(state: &AppState) -> Result<View, AppError> {
    let exams = state.catalog.list_exams().await?;

    Ok(View::ExamList {
        exams: exams.into_iter().map(ExamCard::from).collect(),
    })
}
