// src/handlers/screen.rs

use axum::{Json, extract::State};
use serde::Deserialize;

use super::{ScreenResponse, show};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub token: String,
}

/// Returns the committed screen, rendering the current route first if
/// nothing has been shown yet.
pub async fn current_screen(
    State(state): State<AppState>,
) -> Result<Json<ScreenResponse>, AppError> {
    match state.navigator.screen() {
        Some(screen) => Ok(Json(ScreenResponse {
            screen,
            notifications: state.toasts.drain(),
        })),
        None => {
            let token = state.navigator.current().to_string();
            show(&state, &token).await
        }
    }
}

/// Router navigation. Unknown tokens land on the exam list.
pub async fn navigate(
    State(state): State<AppState>,
    Json(payload): Json<NavigateRequest>,
) -> Result<Json<ScreenResponse>, AppError> {
    show(&state, &payload.token).await
}
