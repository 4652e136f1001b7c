// src/pages/take.rs

use serde::Serialize;

use super::View;
use crate::{
    error::AppError,
    models::{exam::Exam, question::PublicQuestion},
    session::AnswerRecord,
    state::AppState,
};

/// The exam-taking page, positioned on the session's current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeView {
    pub exam: Exam,
    pub index: usize,
    pub total: usize,
    pub progress_percent: u32,
    pub question: PublicQuestion,
    pub answer: Option<AnswerRecord>,
    /// Revealed only once the question is answered.
    pub correct_index: Option<u8>,
    pub correct_option: Option<String>,
    pub marked: bool,
    /// The forward action finishes the exam instead of advancing.
    pub is_last: bool,
    pub can_advance: bool,
    pub completed: bool,
}

/// Opening the take page creates the session if the exam has none yet.
pub async fn render(state: &AppState, exam_id: &str) -> Result<View, AppError> {
    let Some(exam) = state.catalog.get_exam(exam_id).await? else {
        return Ok(View::not_found(exam_id));
    };
    let questions = state.catalog.get_questions(exam_id).await?;
    if questions.is_empty() {
        return Ok(View::EmptyExam { exam });
    }

    let session = state.sessions.open(exam_id, questions.len())?;
    let total = questions.len();
    let index = session.current_index.min(total - 1);
    let question = &questions[index];
    let answer = session.answer_at(index).copied();

    Ok(View::Take(TakeView {
        index,
        total,
        progress_percent: session.progress_percent(),
        question: PublicQuestion::from(question),
        answer,
        correct_index: answer.map(|_| question.answer_index),
        correct_option: answer.map(|_| question.correct_option().to_string()),
        marked: session.is_marked(index),
        is_last: index == total - 1,
        can_advance: answer.is_some(),
        completed: session.is_completed(),
        exam,
    }))
}
