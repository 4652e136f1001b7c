// tests/session_tests.rs

use std::sync::Arc;

use qcm::session::{
    KeyValueStore, ScoreSummary, Session, SessionError, SessionState, SessionStore, StoreError,
    store::session_key,
};

const NOW: i64 = 1_700_000_000_000;

#[test]
fn fresh_session_has_one_slot_per_question() {
    let s = Session::fresh(4, NOW);

    assert_eq!(s.answers.len(), 4);
    assert_eq!(s.current_index, 0);
    assert!(s.marked.is_empty());
    assert_eq!(s.state(), SessionState::InProgress);
}

#[test]
fn answer_is_written_once() {
    let s = Session::fresh(3, NOW);

    let first = s.answer(1, 4, false, NOW + 1).unwrap();
    let again = first.answer(1, 2, true, NOW + 2).unwrap();

    let record = again.answer_at(1).unwrap();
    assert_eq!(record.selected_index, 4);
    assert!(!record.is_correct);
    assert_eq!(record.answered_at, NOW + 1);
    assert_eq!(again, first);
}

#[test]
fn answer_rejects_bad_indices() {
    let s = Session::fresh(2, NOW);

    assert_eq!(
        s.answer(0, 6, true, NOW),
        Err(SessionError::OptionOutOfRange(6))
    );
    assert_eq!(
        s.answer(2, 0, true, NOW),
        Err(SessionError::QuestionOutOfRange { index: 2, count: 2 })
    );
}

#[test]
fn navigate_clamps_into_range() {
    let s = Session::fresh(5, NOW);

    assert_eq!(s.navigate(3, NOW).unwrap().current_index, 3);
    assert_eq!(s.navigate(-1, NOW).unwrap().current_index, 0);
    assert_eq!(s.navigate(99, NOW).unwrap().current_index, 4);
}

#[test]
fn marking_twice_unmarks() {
    let s = Session::fresh(3, NOW);

    let marked = s.toggle_mark(0, NOW).unwrap();
    assert!(marked.is_marked(0));

    let unmarked = marked.toggle_mark(0, NOW).unwrap();
    assert!(unmarked.marked.is_empty());
}

#[test]
fn marking_out_of_range_is_ignored() {
    let s = Session::fresh(3, NOW);

    assert_eq!(s.toggle_mark(7, NOW).unwrap(), s);
}

#[test]
fn finalize_counts_only_correct_answers_and_is_idempotent() {
    let s = Session::fresh(4, NOW)
        .answer(0, 1, true, NOW)
        .unwrap()
        .answer(1, 1, false, NOW)
        .unwrap()
        .answer(2, 3, true, NOW)
        .unwrap();

    let done = s.finalize(NOW + 10);
    let again = done.finalize(NOW + 20);

    let completion = done.completion.unwrap();
    assert_eq!(completion.correct_count, 2);
    assert_eq!(completion.completed_at, NOW + 10);
    assert_eq!(again, done);
}

#[test]
fn completed_session_rejects_further_changes() {
    let done = Session::fresh(2, NOW).finalize(NOW);

    assert_eq!(done.answer(0, 0, true, NOW), Err(SessionError::Completed));
    assert_eq!(done.navigate(1, NOW), Err(SessionError::Completed));
    assert_eq!(done.toggle_mark(0, NOW), Err(SessionError::Completed));
}

#[test]
fn score_splits_correct_incorrect_and_unanswered() {
    let done = Session::fresh(8, NOW)
        .answer(0, 0, true, NOW)
        .unwrap()
        .answer(1, 0, false, NOW)
        .unwrap()
        .answer(2, 0, false, NOW)
        .unwrap()
        .finalize(NOW);

    let score = ScoreSummary::from_session(&done, 8).unwrap();

    assert_eq!(score.correct, 1);
    assert_eq!(score.incorrect, 2);
    assert_eq!(score.unanswered, 5);
    // 12.5% rounds half up
    assert_eq!(score.percent, 13);
}

#[test]
fn score_requires_a_finished_non_empty_exam() {
    let s = Session::fresh(2, NOW);

    assert_eq!(
        ScoreSummary::from_session(&s, 2),
        Err(SessionError::NotCompleted)
    );
    assert_eq!(
        ScoreSummary::from_session(&s.finalize(NOW), 0),
        Err(SessionError::EmptyExam)
    );
}

#[test]
fn store_round_trips_a_reachable_session() {
    let store = SessionStore::in_memory();
    let session = Session::fresh(3, NOW)
        .answer(0, 2, true, NOW + 1)
        .unwrap()
        .toggle_mark(2, NOW + 2)
        .unwrap()
        .navigate(2, NOW + 3)
        .unwrap()
        .finalize(NOW + 4);

    store.save("exam-1", &session).unwrap();

    assert_eq!(store.load("exam-1", 3).unwrap(), session);
}

#[test]
fn missing_session_loads_fresh_without_writing() {
    let store = SessionStore::in_memory();

    let s = store.load("exam-1", 2).unwrap();

    assert_eq!(s.answers, vec![None, None]);
    assert!(!store.exists("exam-1").unwrap());
}

#[test]
fn open_persists_a_new_session() {
    let store = SessionStore::in_memory();

    store.open("exam-1", 2).unwrap();

    assert!(store.exists("exam-1").unwrap());
}

#[test]
fn reset_removes_the_record() {
    let store = SessionStore::in_memory();
    store.save("exam-1", &Session::fresh(1, NOW)).unwrap();

    store.reset("exam-1").unwrap();

    assert!(!store.exists("exam-1").unwrap());
}

/// Store seeded with raw text, to exercise repair of foreign records.
fn seeded(raw: &str) -> SessionStore {
    let backend = qcm::session::MemoryStore::new();
    backend.set(&session_key("exam-1"), raw).unwrap();
    SessionStore::new(Arc::new(backend))
}

#[test]
fn repair_resizes_answers_and_filters_marks() {
    let store = seeded(
        r#"{
            "currentIndex": 9,
            "answers": [
                {"selectedIndex": 1, "isCorrect": true, "answeredAt": 5},
                null,
                {"selectedIndex": 0, "isCorrect": false, "answeredAt": 6},
                {"selectedIndex": 3, "isCorrect": true, "answeredAt": 7}
            ],
            "marked": [0, 2, 2, 3, -1, "x"],
            "completed": false,
            "updatedAt": 10
        }"#,
    );

    let shrunk = store.load("exam-1", 3).unwrap();
    assert_eq!(shrunk.answers.len(), 3);
    assert_eq!(shrunk.answer_at(0).map(|a| a.selected_index), Some(1));
    assert_eq!(shrunk.answer_at(2).map(|a| a.selected_index), Some(0));
    assert_eq!(shrunk.marked, vec![0, 2]);
    assert_eq!(shrunk.current_index, 2);

    let grown = store.load("exam-1", 6).unwrap();
    assert_eq!(grown.answers.len(), 6);
    assert!(grown.answers[4..].iter().all(Option::is_none));
    assert_eq!(grown.marked, vec![0, 2, 3]);
}

#[test]
fn repair_keeps_marks_written_as_whole_floats() {
    let store = seeded(
        r#"{
            "answers": [null, null, null],
            "marked": [1.0, 2.5, 0, 1, -2.0],
            "completed": false,
            "updatedAt": 10
        }"#,
    );

    let s = store.load("exam-1", 3).unwrap();

    assert_eq!(s.marked, vec![1, 0]);
}

#[test]
fn repair_coerces_completed_and_recounts() {
    let store = seeded(
        r#"{
            "answers": [{"selectedIndex": 1, "isCorrect": true, "answeredAt": 5}, null],
            "marked": "nope",
            "completed": 1,
            "correctCount": 7,
            "updatedAt": 42
        }"#,
    );

    let s = store.load("exam-1", 2).unwrap();

    let completion = s.completion.unwrap();
    assert_eq!(completion.correct_count, 1);
    assert_eq!(completion.completed_at, 42);
    assert!(s.marked.is_empty());
    assert_eq!(s.current_index, 0);
}

// Unreadable records are treated as missing rather than surfaced as errors.
#[test]
fn corrupt_record_loads_as_fresh_session() {
    for raw in ["{ definitely not json", "[1, 2, 3]", "\"text\""] {
        let s = seeded(raw).load("exam-1", 4).unwrap();
        assert_eq!(s.answers, vec![None; 4]);
        assert_eq!(s.state(), SessionState::InProgress);
    }
}

struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("disk full")))
    }
}

#[test]
fn save_failure_is_reported() {
    let store = SessionStore::new(Arc::new(BrokenStore));

    assert!(store.save("exam-1", &Session::fresh(1, NOW)).is_err());
    assert!(store.open("exam-1", 1).is_err());
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::fresh(2, NOW).answer(1, 5, true, NOW).unwrap();

    let first = SessionStore::new(Arc::new(qcm::session::FileStore::open(dir.path()).unwrap()));
    first.save("exam-1", &session).unwrap();

    let second = SessionStore::new(Arc::new(qcm::session::FileStore::open(dir.path()).unwrap()));
    assert_eq!(second.load("exam-1", 2).unwrap(), session);

    second.reset("exam-1").unwrap();
    second.reset("exam-1").unwrap();
    assert!(!second.exists("exam-1").unwrap());
}

#[test]
fn file_store_rejects_path_like_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = qcm::session::FileStore::open(dir.path()).unwrap();

    assert!(matches!(
        store.set("../escape", "{}"),
        Err(StoreError::InvalidKey(_))
    ));
}
