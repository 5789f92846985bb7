use serde_json::json;

use audit_spec::{
    ResponseSet, TemplateSpec, ValidationResult, check_answers, resolve_visibility, validate,
};

fn store_check() -> TemplateSpec {
    serde_json::from_value(json!({
        "name": "Store Check",
        "sections": [
            {
                "section_id": "s1",
                "title": "Shelf",
                "order": 1,
                "questions": [
                    {
                        "question_id": "q1",
                        "text": "Is the product on the shelf?",
                        "type": "yes_no",
                        "mandatory": true
                    },
                    {
                        "question_id": "q2",
                        "text": "Estimate the remaining stock.",
                        "type": "numeric_input",
                        "mandatory": true,
                        "validation": { "min": 0, "max": 100 }
                    },
                    {
                        "question_id": "q3",
                        "text": "Which issues did you notice?",
                        "type": "multiple_choice",
                        "options": ["Dust", "Damage", "Mispricing"],
                        "mandatory": true
                    }
                ]
            }
        ],
        "conditional_logic": [
            {
                "rule_id": "r1",
                "source_question_id": "q1",
                "condition_type": "equals",
                "condition_value": "Yes",
                "action": "show",
                "target_question_ids": ["q2"]
            }
        ]
    }))
    .expect("deserialize")
}

#[test]
fn first_missing_mandatory_question_fails_in_declared_order() {
    let spec = store_check();
    let responses = ResponseSet::new();
    let visible = resolve_visibility(&spec, &responses);

    // q2 is hidden (q1 unanswered), so q1 itself is the first failure.
    let result = validate(&spec, &responses, &visible);
    assert_eq!(
        result.failing_question(),
        Some("Is the product on the shelf?")
    );
}

#[test]
fn hidden_mandatory_questions_are_not_validated() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "No");
    responses.set("s1", "q3", vec!["Dust".to_string()]);

    let visible = resolve_visibility(&spec, &responses);
    assert!(!visible.contains("q2"));
    assert!(validate(&spec, &responses, &visible).is_valid());
}

#[test]
fn visible_mandatory_question_fails_until_answered() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Yes");
    responses.set("s1", "q3", vec!["Damage".to_string()]);

    let visible = resolve_visibility(&spec, &responses);
    assert!(visible.contains("q2"));
    assert_eq!(
        validate(&spec, &responses, &visible).failing_question(),
        Some("Estimate the remaining stock.")
    );

    responses.set("s1", "q2", "12");
    let visible = resolve_visibility(&spec, &responses);
    assert!(validate(&spec, &responses, &visible).is_valid());
}

#[test]
fn empty_string_and_empty_list_count_as_unanswered() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "No");
    responses.set("s1", "q3", Vec::<String>::new());

    let visible = resolve_visibility(&spec, &responses);
    assert_eq!(
        validate(&spec, &responses, &visible).failing_question(),
        Some("Which issues did you notice?")
    );

    responses.set("s1", "q3", vec!["Dust".to_string()]);
    responses.set("s1", "q1", "");
    let visible = resolve_visibility(&spec, &responses);
    assert_eq!(
        validate(&spec, &responses, &visible).failing_question(),
        Some("Is the product on the shelf?")
    );
}

#[test]
fn zero_is_a_real_answer() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Yes");
    responses.set("s1", "q2", "0");
    responses.set("s1", "q3", vec!["Mispricing".to_string()]);

    let visible = resolve_visibility(&spec, &responses);
    assert!(validate(&spec, &responses, &visible).is_valid());
}

#[test]
fn validation_result_serializes_with_status_tag() {
    let invalid = ValidationResult::Invalid {
        question_text: "Is the product on the shelf?".into(),
    };
    let value = serde_json::to_value(&invalid).expect("serialize");
    assert_eq!(value["status"], "invalid");
    assert_eq!(value["question_text"], "Is the product on the shelf?");

    let valid = serde_json::to_value(ValidationResult::Valid).expect("serialize");
    assert_eq!(valid["status"], "valid");
}

#[test]
fn answer_checks_report_constraint_violations() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Yes");
    responses.set("s1", "q2", "250");
    responses.set("s1", "q3", vec!["Rust".to_string()]);

    let visible = resolve_visibility(&spec, &responses);
    let errors = check_answers(&spec, &responses, &visible);
    let codes: Vec<&str> = errors.iter().map(|error| error.code.as_str()).collect();
    assert_eq!(codes, vec!["max", "option_mismatch"]);
    assert_eq!(errors[0].path, "/s1/q2");
}

#[test]
fn answer_checks_flag_unknown_yes_no_labels() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Maybe");
    responses.set("s1", "q3", vec!["Dust".to_string()]);

    let visible = resolve_visibility(&spec, &responses);
    let errors = check_answers(&spec, &responses, &visible);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "yes_no_mismatch");
    assert_eq!(errors[0].question_id, "q1");
}

#[test]
fn answer_checks_skip_hidden_and_unanswered_questions() {
    let spec = store_check();
    let mut responses = ResponseSet::new();
    // q2 hidden (q1 is "No"), yet carries garbage: not reported.
    responses.set("s1", "q1", "No");
    responses.set("s1", "q2", "not a number");

    let visible = resolve_visibility(&spec, &responses);
    assert!(check_answers(&spec, &responses, &visible).is_empty());
}
