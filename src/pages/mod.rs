// src/pages/mod.rs

//! Page controllers. Each one reads the catalog and the session store and
//! returns a `View` for the presentation layer to paint.

pub mod exams;
pub mod review;
pub mod score;
pub mod take;

use serde::Serialize;

use crate::{error::AppError, models::exam::Exam, router::Route, state::AppState};

pub use exams::ExamCard;
pub use review::{ReviewItem, ReviewView};
pub use score::ScoreView;
pub use take::TakeView;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum View {
    ExamList { exams: Vec<ExamCard> },
    Import,
    Take(TakeView),
    /// The exam exists but has no questions to take.
    EmptyExam { exam: Exam },
    Score(ScoreView),
    /// The session is not finished yet, so there is no score to show.
    ScoreLocked { exam: Exam },
    Review(ReviewView),
    #[serde(rename_all = "camelCase")]
    NotFound { exam_id: String },
}

impl View {
    pub fn not_found(exam_id: &str) -> Self {
        View::NotFound {
            exam_id: exam_id.to_string(),
        }
    }
}

/// Routes to the matching controller.
pub async fn render(state: &AppState, route: &Route) -> Result<View, AppError> {
    match route {
        Route::ExamList => exams::render_list(state).await,
        Route::Import => Ok(View::Import),
        Route::Take(id) => take::render(state, id).await,
        Route::Score(id) => score::render(state, id).await,
        Route::Review(id) => review::render(state, id, false).await,
        Route::Marked(id) => review::render(state, id, true).await,
    }
}
