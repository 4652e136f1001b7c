// src/handlers/session.rs

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::{ScreenResponse, show};
use crate::{
    error::AppError, models::exam::Exam, notify::Notifier, session::SessionError,
    state::AppState, utils::time::now_millis,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub question_index: i64,
    pub option_index: i64,
}

#[derive(Debug, Deserialize)]
pub struct GotoRequest {
    /// May be out of range; it is clamped.
    pub index: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkRequest {
    /// Out-of-range values, negative included, leave the marks unchanged.
    pub index: i64,
}

async fn require_exam(state: &AppState, id: &str) -> Result<Exam, AppError> {
    state
        .catalog
        .get_exam(id)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))
}

fn question_count(exam: &Exam) -> usize {
    usize::try_from(exam.question_count).unwrap_or(0)
}

/// Negative indices get the same rejection as indices past the end.
fn answer_indices(payload: &AnswerRequest, count: usize) -> Result<(usize, usize), SessionError> {
    let option_index = usize::try_from(payload.option_index)
        .map_err(|_| SessionError::OptionOutOfRange(payload.option_index))?;
    let question_index =
        usize::try_from(payload.question_index).map_err(|_| SessionError::QuestionOutOfRange {
            index: payload.question_index,
            count,
        })?;
    Ok((question_index, option_index))
}

/// Records the answer to one question. Correctness is decided here, once,
/// against the stored answer index.
pub async fn answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    require_exam(&state, &id).await?;
    let questions = state.catalog.get_questions(&id).await?;

    let session = state.sessions.load(&id, questions.len())?;
    let (question_index, option_index) = answer_indices(&payload, questions.len())?;
    let is_correct = questions
        .get(question_index)
        .is_some_and(|q| usize::from(q.answer_index) == option_index);
    let next = session.answer(question_index, option_index, is_correct, now_millis())?;
    if next != session {
        state.sessions.save(&id, &next)?;
    }

    show(&state, &format!("/exam/{id}")).await
}

/// Moves the cursor (previous / next / jump).
pub async fn goto(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<GotoRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    let exam = require_exam(&state, &id).await?;

    let session = state.sessions.load(&id, question_count(&exam))?;
    let next = session.navigate(payload.index, now_millis())?;
    state.sessions.save(&id, &next)?;

    show(&state, &format!("/exam/{id}")).await
}

pub async fn toggle_mark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MarkRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    let exam = require_exam(&state, &id).await?;

    let session = state.sessions.load(&id, question_count(&exam))?;
    let Ok(index) = usize::try_from(payload.index) else {
        return show(&state, &format!("/exam/{id}")).await;
    };
    let next = session.toggle_mark(index, now_millis())?;
    if next != session {
        state.sessions.save(&id, &next)?;
        if next.is_marked(index) {
            state.toasts.success("Question marked");
        } else {
            state.toasts.info("Question unmarked");
        }
    }

    show(&state, &format!("/exam/{id}")).await
}

/// Freezes the score and shows it. Finishing twice changes nothing.
pub async fn finish(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreenResponse>, AppError> {
    let exam = require_exam(&state, &id).await?;

    let session = state.sessions.load(&id, question_count(&exam))?;
    let next = session.finalize(now_millis());
    if next != session {
        state.sessions.save(&id, &next)?;
        tracing::info!(
            "Exam {} finished: {} correct out of {}",
            id,
            next.correct_answers(),
            next.question_count()
        );
    }

    show(&state, &format!("/score/{id}")).await
}

/// Discards the session and starts over.
pub async fn retake(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ScreenResponse>, AppError> {
    require_exam(&state, &id).await?;

    state.sessions.reset(&id)?;
    state.toasts.info("Session reset. Good luck!");

    show(&state, &format!("/exam/{id}")).await
}
