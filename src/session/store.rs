// src/session/store.rs

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use serde_json::{Map, Value};
use thiserror::Error;

use super::{AnswerRecord, Completion, Session, clamp_index};
use crate::{
    config::OPTION_COUNT,
    utils::{
        json::{integral, truthy},
        time::now_millis,
    },
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Synchronous string storage, one value per key.
///
/// Calls never suspend, so a load-transition-save cycle on the session store
/// cannot interleave with another one on the same thread.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// One JSON file per key inside `dir`.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write leaves the previous value readable.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Storage key of an exam's session record.
pub fn session_key(exam_id: &str) -> String {
    format!("qcm-session-{exam_id}")
}

/// Loads, repairs and persists sessions on top of a `KeyValueStore`.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Returns the stored session repaired to `question_count`, or a fresh one
    /// when nothing usable is stored. Never writes.
    pub fn load(&self, exam_id: &str, question_count: usize) -> Result<Session, StoreError> {
        let key = session_key(exam_id);
        let Some(text) = self.backend.get(&key)? else {
            return Ok(Session::fresh(question_count, now_millis()));
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(record)) => Ok(repair(&record, question_count, now_millis())),
            Ok(_) => {
                tracing::warn!("Session record {} is not an object, starting fresh", key);
                Ok(Session::fresh(question_count, now_millis()))
            }
            Err(e) => {
                tracing::warn!("Session record {} is unreadable ({}), starting fresh", key, e);
                Ok(Session::fresh(question_count, now_millis()))
            }
        }
    }

    /// Like `load`, but persists a fresh session when none is stored yet.
    pub fn open(&self, exam_id: &str, question_count: usize) -> Result<Session, StoreError> {
        if self.exists(exam_id)? {
            return self.load(exam_id, question_count);
        }
        let session = Session::fresh(question_count, now_millis());
        self.save(exam_id, &session)?;
        Ok(session)
    }

    pub fn exists(&self, exam_id: &str) -> Result<bool, StoreError> {
        Ok(self.backend.get(&session_key(exam_id))?.is_some())
    }

    pub fn save(&self, exam_id: &str, session: &Session) -> Result<(), StoreError> {
        let text = serde_json::to_string(session)?;
        self.backend.set(&session_key(exam_id), &text)
    }

    /// Drops the stored session; the exam goes back to not started.
    pub fn reset(&self, exam_id: &str) -> Result<(), StoreError> {
        self.backend.remove(&session_key(exam_id))
    }
}

/// Rebuilds a session from a stored record of unknown quality.
///
/// Answers are resized to `question_count` keeping slots by index, marks
/// outside the range are dropped, the cursor is clamped and `completed` is
/// coerced the way a loosely typed client would read it.
pub fn repair(record: &Map<String, Value>, question_count: usize, now: i64) -> Session {
    let mut answers: Vec<Option<AnswerRecord>> = record
        .get("answers")
        .and_then(Value::as_array)
        .map(|slots| {
            slots
                .iter()
                .take(question_count)
                .map(answer_record)
                .collect()
        })
        .unwrap_or_default();
    answers.resize(question_count, None);

    let mut marked: Vec<usize> = Vec::new();
    for index in record
        .get("marked")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(integral)
    {
        let Ok(index) = usize::try_from(index) else {
            continue;
        };
        if index < question_count && !marked.contains(&index) {
            marked.push(index);
        }
    }

    let current_index = record
        .get("currentIndex")
        .and_then(Value::as_i64)
        .map(|i| clamp_index(i, question_count))
        .unwrap_or(0);

    let updated_at = record
        .get("updatedAt")
        .and_then(Value::as_i64)
        .unwrap_or(now);

    let completed = record.get("completed").is_some_and(truthy);
    let completion = completed.then(|| Completion {
        completed_at: record
            .get("completedAt")
            .and_then(Value::as_i64)
            .unwrap_or(updated_at),
        correct_count: answers.iter().flatten().filter(|a| a.is_correct).count() as u32,
    });

    Session {
        current_index,
        answers,
        marked,
        completion,
        updated_at,
    }
}

fn answer_record(slot: &Value) -> Option<AnswerRecord> {
    serde_json::from_value::<AnswerRecord>(slot.clone())
        .ok()
        .filter(|a| usize::from(a.selected_index) < OPTION_COUNT)
}

