// tests/import_tests.rs

use qcm::config::{OPTION_PLACEHOLDER, STEM_PLACEHOLDER};
use qcm::import::{ValidationError, normalize, parse_payload};
use serde_json::json;

#[test]
fn normalizes_a_full_question() {
    let raw = json!([{
        "category": "Cardio",
        "drug": "Aspirin",
        "stem": "Which dose?",
        "options": ["a", "b", "c", "d", "e", "f"],
        "answerIndex": 2
    }]);

    let questions = normalize(&raw).unwrap();

    assert_eq!(questions.len(), 1);
    let q = &questions[0];
    assert_eq!(q.category, "Cardio");
    assert_eq!(q.drug, "Aspirin");
    assert_eq!(q.stem, "Which dose?");
    assert_eq!(q.options, ["a", "b", "c", "d", "e", "f"].map(String::from));
    assert_eq!(q.answer_index, 2);
}

#[test]
fn pads_short_option_lists_with_placeholder() {
    let raw = json!([{ "options": ["x", "y", "z"], "answerIndex": 0 }]);

    let q = &normalize(&raw).unwrap()[0];

    assert_eq!(&q.options[..3], ["x", "y", "z"]);
    assert!(q.options[3..].iter().all(|o| o == OPTION_PLACEHOLDER));
}

#[test]
fn truncates_long_option_lists() {
    let raw = json!([{ "options": ["1", "2", "3", "4", "5", "6", "7", "8"], "answerIndex": 5 }]);

    let q = &normalize(&raw).unwrap()[0];

    assert_eq!(q.options.last().map(String::as_str), Some("6"));
}

#[test]
fn missing_fields_get_defaults() {
    let raw = json!([{ "answerIndex": 1 }]);

    let q = &normalize(&raw).unwrap()[0];

    assert_eq!(q.category, "");
    assert_eq!(q.drug, "");
    assert_eq!(q.stem, STEM_PLACEHOLDER);
    assert!(q.options.iter().all(|o| o == OPTION_PLACEHOLDER));
}

#[test]
fn falsy_text_fields_count_as_missing() {
    let raw = json!([
        { "stem": 0, "category": false, "drug": null, "answerIndex": 0 },
        { "stem": "", "category": 0.0, "drug": "", "answerIndex": 0 },
        { "stem": 7, "category": "0", "drug": true, "answerIndex": 0 }
    ]);

    let questions = normalize(&raw).unwrap();

    for q in &questions[..2] {
        assert_eq!(q.stem, STEM_PLACEHOLDER);
        assert_eq!(q.category, "");
        assert_eq!(q.drug, "");
    }
    assert_eq!(questions[2].stem, "7");
    assert_eq!(questions[2].category, "0");
    assert_eq!(questions[2].drug, "true");
}

#[test]
fn rejects_non_array_payload() {
    assert_eq!(
        normalize(&json!({ "questions": [] })),
        Err(ValidationError::NotAnArray)
    );
}

#[test]
fn rejects_non_record_element() {
    let raw = json!([{ "answerIndex": 0 }, "oops"]);

    assert_eq!(
        normalize(&raw),
        Err(ValidationError::NotARecord { position: 2 })
    );
}

#[test]
fn rejects_missing_or_out_of_range_answer_index() {
    for bad in [json!(null), json!(6), json!(-1), json!("2"), json!(1.5)] {
        let raw = json!([{ "options": ["a"], "answerIndex": bad }]);
        assert_eq!(
            normalize(&raw),
            Err(ValidationError::InvalidAnswerIndex { position: 1 }),
            "answerIndex {bad} should be rejected"
        );
    }

    let missing = json!([{ "options": ["a", "b"] }]);
    assert!(matches!(
        normalize(&missing),
        Err(ValidationError::InvalidAnswerIndex { .. })
    ));
}

#[test]
fn one_bad_question_rejects_the_whole_payload() {
    let raw = json!([
        { "answerIndex": 0 },
        { "answerIndex": 1 },
        { "answerIndex": 9 }
    ]);

    assert_eq!(
        normalize(&raw),
        Err(ValidationError::InvalidAnswerIndex { position: 3 })
    );
}

#[test]
fn normalize_is_deterministic() {
    let raw = json!([
        { "stem": "Q1", "options": ["a", "b"], "answerIndex": 1 },
        { "category": "Neuro", "answerIndex": 4 }
    ]);

    assert_eq!(normalize(&raw), normalize(&raw));
}

#[test]
fn parse_payload_rejects_malformed_and_empty_files() {
    assert!(matches!(
        parse_payload("{ not json"),
        Err(ValidationError::MalformedJson(_))
    ));
    assert_eq!(parse_payload("[]"), Err(ValidationError::NoQuestions));
}
