// src/pages/score.rs

use serde::Serialize;

use super::View;
use crate::{
    error::AppError,
    models::exam::Exam,
    session::{ScoreSummary, SessionError},
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub exam: Exam,
    pub score: ScoreSummary,
    /// Enables the "review marked questions" action.
    pub has_marked: bool,
}

pub async fn render(state: &AppState, exam_id: &str) -> Result<View, AppError> {
    let Some(exam) = state.catalog.get_exam(exam_id).await? else {
        return Ok(View::not_found(exam_id));
    };
    let question_count = usize::try_from(exam.question_count).unwrap_or(0);
    let session = state.sessions.load(exam_id, question_count)?;

    match ScoreSummary::from_session(&session, question_count) {
        Ok(score) => Ok(View::Score(ScoreView {
            has_marked: !session.marked.is_empty(),
            score,
            exam,
        })),
        Err(SessionError::NotCompleted) => Ok(View::ScoreLocked { exam }),
        Err(SessionError::EmptyExam) => Ok(View::EmptyExam { exam }),
        Err(e) => Err(e.into()),
    }
}
