// src/session/score.rs

use serde::Serialize;

use super::{Session, SessionError, round_percent};

/// Result figures shown on the score page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub percent: u32,
}

impl ScoreSummary {
    /// Derives the summary from a finalized session.
    ///
    /// `correct` is the frozen count, not a recount of the answers.
    pub fn from_session(session: &Session, question_count: usize) -> Result<Self, SessionError> {
        if question_count == 0 {
            return Err(SessionError::EmptyExam);
        }
        let completion = session.completion.ok_or(SessionError::NotCompleted)?;

        let answered = session.answered_count().min(question_count);
        let correct = (completion.correct_count as usize).min(answered);

        Ok(Self {
            total: question_count,
            answered,
            correct,
            incorrect: answered - correct,
            unanswered: question_count - answered,
            percent: round_percent(correct, question_count),
        })
    }
}
