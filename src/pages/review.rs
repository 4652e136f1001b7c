// src/pages/review.rs

use serde::Serialize;

use super::View;
use crate::{
    error::AppError,
    models::{
        exam::Exam,
        question::{Question, option_letter},
    },
    session::AnswerRecord,
    state::AppState,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewItem {
    pub index: usize,
    pub question: Question,
    pub answer: Option<AnswerRecord>,
    pub selected_letter: Option<char>,
    pub correct_letter: char,
    pub marked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    pub exam: Exam,
    pub marked_only: bool,
    pub items: Vec<ReviewItem>,
}

/// Lists every question with the user's answer, or only the marked ones.
/// Available whether or not the exam has been finished.
pub async fn render(state: &AppState, exam_id: &str, marked_only: bool) -> Result<View, AppError> {
    let Some(exam) = state.catalog.get_exam(exam_id).await? else {
        return Ok(View::not_found(exam_id));
    };
    let questions = state.catalog.get_questions(exam_id).await?;
    let session = state.sessions.load(exam_id, questions.len())?;

    let items = questions
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !marked_only || session.is_marked(*index))
        .map(|(index, question)| {
            let answer = session.answer_at(index).copied();
            ReviewItem {
                index,
                selected_letter: answer.map(|a| option_letter(usize::from(a.selected_index))),
                correct_letter: option_letter(usize::from(question.answer_index)),
                marked: session.is_marked(index),
                answer,
                question,
            }
        })
        .collect();

    Ok(View::Review(ReviewView {
        exam,
        marked_only,
        items,
    }))
}
