use serde_json::json;

use audit_spec::{ResponseSet, TemplateSpec, resolve_visibility, score, validate};

/// The one-section template from the scoring walkthrough: weight 100, a
/// mandatory yes/no and an optional numeric gated behind a "No" answer.
fn gated_template() -> TemplateSpec {
    serde_json::from_value(json!({
        "name": "Gate Check",
        "sections": [
            {
                "section_id": "s1",
                "title": "Gate",
                "order": 1,
                "questions": [
                    {
                        "question_id": "q1",
                        "text": "Is everything in order?",
                        "type": "yes_no",
                        "mandatory": true
                    },
                    {
                        "question_id": "q2",
                        "text": "How many problems did you count?",
                        "type": "numeric_input",
                        "mandatory": false
                    }
                ]
            }
        ],
        "conditional_logic": [
            {
                "rule_id": "r1",
                "source_question_id": "q1",
                "condition_type": "equals",
                "condition_value": "No",
                "action": "show",
                "target_question_ids": ["q2"]
            }
        ],
        "scoring_rules": {
            "enabled": true,
            "threshold": 80,
            "weights": { "s1": 100 }
        }
    }))
    .expect("deserialize")
}

fn without_weights(mut spec: TemplateSpec) -> TemplateSpec {
    if let Some(rules) = spec.scoring_rules.as_mut() {
        rules.weights.clear();
    }
    spec
}

#[test]
fn fully_answered_section_scores_its_full_weight() {
    let spec = gated_template();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "No");
    responses.set("s1", "q2", "3");

    let visible = resolve_visibility(&spec, &responses);
    assert_eq!(visible.len(), 2);
    assert!(validate(&spec, &responses, &visible).is_valid());

    let report = score(&spec, &responses);
    assert_eq!(report.total, Some(100.0));
    assert_eq!(report.by_section["s1"], 100.0);
    assert_eq!(report.passed(80.0), Some(true));
}

#[test]
fn hidden_unanswered_question_still_counts_toward_the_ceiling() {
    let spec = gated_template();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Yes");

    let visible = resolve_visibility(&spec, &responses);
    assert!(!visible.contains("q2"));
    assert!(validate(&spec, &responses, &visible).is_valid());

    // q2 is hidden, but its 10-point ceiling remains: (10/20) x 100.
    let report = score(&spec, &responses);
    assert_eq!(report.total, Some(50.0));
    assert_eq!(report.by_section["s1"], 50.0);
    assert_eq!(report.passed(80.0), Some(false));
}

#[test]
fn missing_or_empty_weights_mean_no_score() {
    let spec = without_weights(gated_template());
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "No");
    responses.set("s1", "q2", "3");

    let report = score(&spec, &responses);
    assert_eq!(report.total, None);
    assert!(report.by_section.is_empty());
    assert_eq!(report.passed(80.0), None);

    let mut spec = spec;
    spec.scoring_rules = None;
    assert_eq!(score(&spec, &responses).total, None);
}

#[test]
fn answered_means_full_credit_regardless_of_content() {
    let spec = gated_template();
    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "No");
    responses.set("s1", "q2", "0");

    // "0" is an answer; there is no correctness concept.
    assert_eq!(score(&spec, &responses).total, Some(100.0));
}

#[test]
fn unweighted_sections_contribute_nothing() {
    let spec: TemplateSpec = serde_json::from_value(json!({
        "name": "Partial Weights",
        "sections": [
            {
                "section_id": "s1",
                "title": "Weighted",
                "order": 1,
                "questions": [
                    { "question_id": "q1", "text": "A?", "type": "yes_no", "mandatory": false }
                ]
            },
            {
                "section_id": "s2",
                "title": "Unweighted",
                "order": 2,
                "questions": [
                    { "question_id": "q2", "text": "B?", "type": "yes_no", "mandatory": false }
                ]
            },
            {
                "section_id": "s3",
                "title": "Empty",
                "order": 3,
                "questions": []
            }
        ],
        "scoring_rules": {
            "enabled": true,
            "weights": { "s1": 60 }
        }
    }))
    .expect("deserialize");

    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Yes");
    responses.set("s2", "q2", "Yes");

    let report = score(&spec, &responses);
    assert_eq!(report.total, Some(60.0));
    assert_eq!(report.by_section["s2"], 0.0);
    // A section with no questions scores zero rather than dividing by zero.
    assert_eq!(report.by_section["s3"], 0.0);
}

#[test]
fn totals_round_to_two_decimals() {
    let spec: TemplateSpec = serde_json::from_value(json!({
        "name": "Thirds",
        "sections": [
            {
                "section_id": "s1",
                "title": "Three Questions",
                "order": 1,
                "questions": [
                    { "question_id": "q1", "text": "A?", "type": "yes_no", "mandatory": false },
                    { "question_id": "q2", "text": "B?", "type": "yes_no", "mandatory": false },
                    { "question_id": "q3", "text": "C?", "type": "yes_no", "mandatory": false }
                ]
            }
        ],
        "scoring_rules": { "enabled": true, "weights": { "s1": 100 } }
    }))
    .expect("deserialize");

    let mut responses = ResponseSet::new();
    responses.set("s1", "q1", "Yes");

    // 10/30 x 100 = 33.333... -> 33.33
    assert_eq!(score(&spec, &responses).total, Some(33.33));
}

#[test]
fn fixture_scores_by_section_weights() {
    let spec: TemplateSpec =
        serde_json::from_str(include_str!("fixtures/retail_execution.json")).expect("deserialize");

    let mut responses = ResponseSet::new();
    // Answer the whole availability section (weight 25) and nothing else.
    responses.set("availability", "q1", "No");
    responses.set("availability", "q2", "Out of stock");
    responses.set("availability", "q3", "2");
    responses.set("availability", "q4", "Yes");

    let report = score(&spec, &responses);
    assert_eq!(report.by_section["availability"], 25.0);
    assert_eq!(report.total, Some(25.0));
}
