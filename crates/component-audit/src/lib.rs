//! String-in/string-out boundary over the pure audit engines.
//!
//! Hosts (HTTP controllers, embedded runtimes) hand in JSON payloads and get
//! JSON back. Engine-level conditions — validation failures, absent scores,
//! dangling rule references — come back as data; only malformed payloads and
//! structurally broken templates produce an `error` envelope.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use thiserror::Error;

use audit_spec::{
    AuditInstance, Location, SubmitError, TemplateError, TemplateSpec, build_form_view,
    check_answers, check_template, render_json, resolve_visibility, response_schema, score,
    validate,
};

#[derive(Debug, Error)]
enum ComponentError {
    #[error("failed to parse template JSON: {0}")]
    TemplateParse(#[source] serde_json::Error),
    #[error("failed to parse responses JSON: {0}")]
    ResponsesParse(#[source] serde_json::Error),
    #[error("failed to parse location JSON: {0}")]
    LocationParse(#[source] serde_json::Error),
    #[error("invalid submitted_at timestamp: {0}")]
    Timestamp(#[source] chrono::ParseError),
    #[error("template failed checks: {0}")]
    Template(#[from] TemplateError),
    #[error("json encode error: {0}")]
    JsonEncode(#[source] serde_json::Error),
}

fn respond(result: Result<Value, ComponentError>) -> String {
    match result {
        Ok(value) => serde_json::to_string(&value).unwrap_or_else(|error| {
            json!({ "error": format!("json encode: {}", error) }).to_string()
        }),
        Err(error) => json!({ "error": error.to_string() }).to_string(),
    }
}

fn load_template(template_json: &str) -> Result<TemplateSpec, ComponentError> {
    let spec: TemplateSpec =
        serde_json::from_str(template_json).map_err(ComponentError::TemplateParse)?;
    check_template(&spec)?;
    Ok(spec)
}

fn parse_responses(responses_json: &str) -> Result<audit_spec::ResponseSet, ComponentError> {
    serde_json::from_str(responses_json).map_err(ComponentError::ResponsesParse)
}

/// Echo the checked, normalized template back to the caller.
pub fn describe(template_json: &str) -> String {
    respond(
        load_template(template_json)
            .and_then(|spec| serde_json::to_value(spec).map_err(ComponentError::JsonEncode)),
    )
}

/// Current visible question ids plus the response schema restricted to them.
pub fn visibility(template_json: &str, responses_json: &str) -> String {
    respond(load_template(template_json).and_then(|spec| {
        let responses = parse_responses(responses_json)?;
        let visible = resolve_visibility(&spec, &responses);
        let schema = response_schema(&spec, &visible);
        Ok(json!({
            "visible": visible.iter().collect::<Vec<_>>(),
            "schema": schema,
        }))
    }))
}

/// Computed form view for frontends: status, progress counters, the next
/// open question, and per-question visibility.
pub fn render_form(template_json: &str, responses_json: &str) -> String {
    respond(load_template(template_json).and_then(|spec| {
        let responses = parse_responses(responses_json)?;
        let view = build_form_view(&spec, &responses);
        Ok(render_json(&view))
    }))
}

/// Mandatory validation plus advisory per-answer constraint checks.
pub fn validate_responses(template_json: &str, responses_json: &str) -> String {
    respond(load_template(template_json).and_then(|spec| {
        let responses = parse_responses(responses_json)?;
        let visible = resolve_visibility(&spec, &responses);
        let validation = validate(&spec, &responses, &visible);
        let errors = check_answers(&spec, &responses, &visible);
        Ok(json!({
            "validation": validation,
            "errors": errors,
        }))
    }))
}

/// Weighted score for a finalized response set.
pub fn score_audit(template_json: &str, responses_json: &str) -> String {
    respond(load_template(template_json).and_then(|spec| {
        let responses = parse_responses(responses_json)?;
        let report = score(&spec, &responses);
        serde_json::to_value(report).map_err(ComponentError::JsonEncode)
    }))
}

/// Run the full submission path: build an instance, validate, score, freeze.
///
/// A validation failure is a normal outcome, returned as
/// `{"validation": {...}}` with no audit attached. The timestamp is passed
/// in RFC 3339 form so hosts control the clock.
pub fn submit_audit(
    template_json: &str,
    responses_json: &str,
    location_json: &str,
    submitted_at: &str,
) -> String {
    respond(load_template(template_json).and_then(|spec| {
        let responses = parse_responses(responses_json)?;
        let location: Location = if location_json.trim().is_empty() {
            Location::default()
        } else {
            serde_json::from_str(location_json).map_err(ComponentError::LocationParse)?
        };
        let now: DateTime<Utc> = submitted_at
            .parse()
            .map_err(ComponentError::Timestamp)?;

        let template_id = spec.id.clone().unwrap_or_else(|| spec.name.clone());
        let mut audit = AuditInstance::new(template_id).with_location(location);
        // set_responses and submit cannot hit AlreadyCompleted on a fresh
        // instance, but the failure path must not drop the validation detail.
        if let Err(error) = audit.set_responses(responses) {
            return Ok(json!({ "error": error.to_string() }));
        }
        match audit.submit(&spec, now) {
            Ok(report) => Ok(json!({
                "audit": audit,
                "score": report,
                "message": "Audit submitted successfully",
            })),
            Err(SubmitError::MissingAnswer { question_text }) => Ok(json!({
                "validation": {
                    "status": "invalid",
                    "question_text": question_text,
                },
            })),
            Err(error) => Ok(json!({ "error": error.to_string() })),
        }
    }))
}
