// src/handlers/exams.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use super::show;
use crate::{
    error::AppError,
    import,
    models::exam::{ImportExamRequest, RenameExamRequest},
    notify::Notifier,
    state::AppState,
};

/// Imports a question bank as a new exam.
///
/// * Validates the name and file name.
/// * Parses and normalizes the file content; one bad question rejects the file.
///   Failures come back as a 400 body and emit no notification.
/// * Persists the exam and its questions atomically, then shows the exam list.
pub async fn import_exam(
    State(state): State<AppState>,
    Json(mut payload): Json<ImportExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.name = payload.name.trim().to_string();
    payload.validate()?;

    // A rejected import reports through the error body only; nothing is queued.
    let questions = import::parse_payload(&payload.content).map_err(|e| {
        tracing::warn!("Rejected import of {}: {}", payload.file_name, e);
        AppError::Validation(format!("Invalid JSON structure: {e}"))
    })?;

    state
        .catalog
        .create_exam(&payload.name, &payload.file_name, &questions)
        .await?;
    state.toasts.success("Exam imported successfully");

    Ok((StatusCode::CREATED, show(&state, "/exams").await?))
}

/// Renames an exam. Blank names are rejected.
pub async fn rename_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut payload): Json<RenameExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.name = payload.name.trim().to_string();
    payload.validate()?;

    state
        .catalog
        .rename_exam(&id, &payload.name)
        .await?
        .ok_or(AppError::NotFound("Exam not found".to_string()))?;
    state.toasts.success("Exam renamed");

    show(&state, "/exams").await
}

/// Deletes an exam with its questions, then discards its session.
///
/// The session cleanup is best-effort: the catalog delete has already
/// committed and stays committed if it fails.
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.catalog.delete_exam(&id).await? {
        return Err(AppError::NotFound("Exam not found".to_string()));
    }
    if let Err(e) = state.sessions.reset(&id) {
        tracing::warn!("Exam {} deleted but its session was kept: {}", id, e);
    }
    state.toasts.info("Exam deleted");

    show(&state, "/exams").await
}
