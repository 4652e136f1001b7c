// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    handlers::{exams, screen, session},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Screen routes (current screen, navigation).
/// * Exam commands (import, rename, delete) and session commands.
/// * Serves the client from `static_dir` when configured.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let screen_routes = Router::new()
        .route("/api/screen", get(screen::current_screen))
        .route("/api/navigate", post(screen::navigate));

    let exam_routes = Router::new()
        .route("/api/exams", post(exams::import_exam))
        .route(
            "/api/exams/{id}",
            patch(exams::rename_exam).delete(exams::delete_exam),
        )
        .route("/api/exams/{id}/answer", post(session::answer))
        .route("/api/exams/{id}/goto", post(session::goto))
        .route("/api/exams/{id}/mark", post(session::toggle_mark))
        .route("/api/exams/{id}/finish", post(session::finish))
        .route("/api/exams/{id}/retake", post(session::retake));

    let mut router = Router::new().merge(screen_routes).merge(exam_routes);

    if let Some(dir) = &state.config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
