use chrono::{TimeZone, Utc};
use serde_json::json;

use audit_spec::{AuditInstance, AuditStatus, Location, SubmitError, TemplateSpec};

fn checklist() -> TemplateSpec {
    serde_json::from_value(json!({
        "template_id": "tpl-1",
        "name": "Closing Checklist",
        "sections": [
            {
                "section_id": "s1",
                "title": "Closing",
                "order": 1,
                "questions": [
                    {
                        "question_id": "q1",
                        "text": "Were the doors locked?",
                        "type": "yes_no",
                        "mandatory": true
                    },
                    {
                        "question_id": "q2",
                        "text": "Any remarks?",
                        "type": "text_input",
                        "mandatory": false
                    }
                ]
            }
        ],
        "scoring_rules": { "enabled": true, "weights": { "s1": 100 } }
    }))
    .expect("deserialize")
}

#[test]
fn first_answer_moves_pending_into_progress() {
    let mut audit = AuditInstance::new("tpl-1");
    assert_eq!(audit.status, AuditStatus::Pending);

    audit.set_answer("s1", "q1", "Yes").expect("record");
    assert_eq!(audit.status, AuditStatus::InProgress);
}

#[test]
fn failed_submission_leaves_the_instance_untouched() {
    let spec = checklist();
    let mut audit = AuditInstance::new("tpl-1");
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    let err = audit.submit(&spec, now).unwrap_err();
    assert_eq!(
        err,
        SubmitError::MissingAnswer {
            question_text: "Were the doors locked?".into()
        }
    );
    assert_eq!(audit.status, AuditStatus::Pending);
    assert_eq!(audit.score, None);
    assert_eq!(audit.submitted_at, None);
}

#[test]
fn successful_submission_freezes_the_instance() {
    let spec = checklist();
    let mut audit = AuditInstance::new("tpl-1").with_location(Location {
        store_name: Some("Main Street 12".into()),
        address: None,
    });
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();

    audit.set_answer("s1", "q1", "Yes").expect("record");
    let report = audit.submit(&spec, now).expect("submit");

    assert_eq!(report.total, Some(50.0));
    assert_eq!(audit.status, AuditStatus::Completed);
    assert_eq!(audit.score, Some(50.0));
    assert_eq!(audit.submitted_at, Some(now));

    // Completed is terminal: no more answers, no second submission.
    assert_eq!(
        audit.set_answer("s1", "q2", "late remark"),
        Err(SubmitError::AlreadyCompleted)
    );
    assert_eq!(audit.submit(&spec, now), Err(SubmitError::AlreadyCompleted));
    assert_eq!(audit.submitted_at, Some(now));
}

#[test]
fn status_uses_the_persisted_labels() {
    let mut audit = AuditInstance::new("tpl-1");
    audit.set_answer("s1", "q1", "Yes").expect("record");

    let value = serde_json::to_value(&audit).expect("serialize");
    assert_eq!(value["status"], "In Progress");
    assert_eq!(value["template_id"], "tpl-1");

    let parsed: AuditInstance = serde_json::from_value(value).expect("deserialize");
    assert_eq!(parsed.status, AuditStatus::InProgress);
}
