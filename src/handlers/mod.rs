// src/handlers/mod.rs

pub mod exams;
pub mod screen;
pub mod session;

use axum::Json;
use serde::Serialize;

use crate::{error::AppError, notify::Notification, router::Screen, state::AppState};

/// Body of every screen-changing response.
#[derive(Debug, Serialize)]
pub struct ScreenResponse {
    pub screen: Screen,
    /// Toasts emitted since the previous response.
    pub notifications: Vec<Notification>,
}

/// Navigates to `token` and answers with whatever ends up on screen.
///
/// If a newer navigation overtook this one, the newer screen is returned.
pub(crate) async fn show(state: &AppState, token: &str) -> Result<Json<ScreenResponse>, AppError> {
    let screen = match state.navigator.navigate(state, token).await? {
        Some(screen) => screen,
        None => state
            .navigator
            .screen()
            .ok_or_else(|| AppError::Conflict("navigation was superseded".to_string()))?,
    };

    Ok(Json(ScreenResponse {
        screen,
        notifications: state.toasts.drain(),
    }))
}
