// src/session/mod.rs

//! Per-exam progress: the transition logic and its persistence.
//!
//! Transitions never mutate in place. Each one returns the next `Session`
//! value so the caller can persist it first and only then treat it as
//! committed.

pub mod score;
pub mod store;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::OPTION_COUNT;

pub use score::ScoreSummary;
pub use store::{FileStore, KeyValueStore, MemoryStore, SessionStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("question {index} is out of range for an exam of {count} questions")]
    QuestionOutOfRange { index: i64, count: usize },

    #[error("option {0} is out of range")]
    OptionOutOfRange(i64),

    #[error("the exam is already finished; retake it to change answers")]
    Completed,

    #[error("finish the exam to view your score")]
    NotCompleted,

    #[error("an exam needs at least one question")]
    EmptyExam,
}

/// One answered question. Never modified once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub selected_index: u8,
    pub is_correct: bool,
    pub answered_at: i64,
}

/// Frozen outcome of a finalized session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub completed_at: i64,
    pub correct_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    InProgress,
    Completed,
}

/// Progress through one exam.
///
/// `answers` always has one slot per question, `marked` holds unique in-range
/// indices and `current_index` stays inside the question range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "SessionRecord")]
pub struct Session {
    pub current_index: usize,
    pub answers: Vec<Option<AnswerRecord>>,
    pub marked: Vec<usize>,
    pub completion: Option<Completion>,
    pub updated_at: i64,
}

impl Session {
    pub fn fresh(question_count: usize, now: i64) -> Self {
        Self {
            current_index: 0,
            answers: vec![None; question_count],
            marked: Vec::new(),
            completion: None,
            updated_at: now,
        }
    }

    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    pub fn state(&self) -> SessionState {
        if self.completion.is_some() {
            SessionState::Completed
        } else {
            SessionState::InProgress
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().flatten().count()
    }

    pub fn correct_answers(&self) -> u32 {
        self.answers.iter().flatten().filter(|a| a.is_correct).count() as u32
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.contains(&index)
    }

    pub fn answer_at(&self, index: usize) -> Option<&AnswerRecord> {
        self.answers.get(index).and_then(Option::as_ref)
    }

    /// Share of answered questions, rounded half up.
    pub fn progress_percent(&self) -> u32 {
        round_percent(self.answered_count(), self.question_count())
    }

    /// Records an answer for `index`. A slot that already holds an answer is
    /// left untouched and the session is returned as is.
    pub fn answer(
        &self,
        index: usize,
        option_index: usize,
        is_correct: bool,
        now: i64,
    ) -> Result<Session, SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        if option_index >= OPTION_COUNT {
            return Err(SessionError::OptionOutOfRange(option_index as i64));
        }
        let slot = self
            .answers
            .get(index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: index as i64,
                count: self.question_count(),
            })?;
        if slot.is_some() {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        next.answers[index] = Some(AnswerRecord {
            selected_index: option_index as u8,
            is_correct,
            answered_at: now,
        });
        next.updated_at = now;
        Ok(next)
    }

    /// Moves to `target`, clamped into the question range. Allowed whether or
    /// not the current question is answered.
    pub fn navigate(&self, target: i64, now: i64) -> Result<Session, SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        let mut next = self.clone();
        next.current_index = clamp_index(target, self.question_count());
        next.updated_at = now;
        Ok(next)
    }

    /// Flips the mark on `index`. Out-of-range indices are ignored.
    pub fn toggle_mark(&self, index: usize, now: i64) -> Result<Session, SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        if index >= self.question_count() {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        if let Some(pos) = next.marked.iter().position(|&m| m == index) {
            next.marked.remove(pos);
        } else {
            next.marked.push(index);
        }
        next.updated_at = now;
        Ok(next)
    }

    /// Freezes the score. Unanswered questions count as neither correct nor
    /// incorrect. Finalizing a completed session returns it unchanged.
    pub fn finalize(&self, now: i64) -> Session {
        if self.is_completed() {
            return self.clone();
        }
        let mut next = self.clone();
        next.completion = Some(Completion {
            completed_at: now,
            correct_count: self.correct_answers(),
        });
        next.updated_at = now;
        next
    }
}

pub(crate) fn clamp_index(target: i64, question_count: usize) -> usize {
    if question_count == 0 || target <= 0 {
        return 0;
    }
    (target as u64).min(question_count as u64 - 1) as usize
}

/// `part / whole * 100`, rounded half up. Zero when `whole` is zero.
pub(crate) fn round_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part * 100 + whole / 2) / whole) as u32
}

/// Persisted shape of a session, keyed per exam.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub current_index: usize,
    pub answers: Vec<Option<AnswerRecord>>,
    pub marked: Vec<usize>,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_count: Option<u32>,
    pub updated_at: i64,
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        Self {
            current_index: session.current_index,
            answers: session.answers,
            marked: session.marked,
            completed: session.completion.is_some(),
            completed_at: session.completion.map(|c| c.completed_at),
            correct_count: session.completion.map(|c| c.correct_count),
            updated_at: session.updated_at,
        }
    }
}
