use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::responses::{Answer, ResponseSet};
use crate::scoring::{ScoreReport, score};
use crate::spec::template::TemplateSpec;
use crate::validate::{ValidationResult, validate};
use crate::visibility::resolve_visibility;

/// Lifecycle of one filled-out audit. Transitions are monotonic: once
/// completed an instance never moves again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum AuditStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

/// Where the audit was performed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Why a mutation or submission was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("audit was already submitted")]
    AlreadyCompleted,
    #[error("please answer: {question_text}")]
    MissingAnswer { question_text: String },
}

/// One occurrence of a template being filled out.
///
/// The instance owns the mutable response state; the engines it calls are
/// pure. The referenced template is resolved by the caller and passed into
/// every operation that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditInstance {
    #[serde(rename = "audit_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub template_id: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub responses: ResponseSet,
    #[serde(default)]
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl AuditInstance {
    pub fn new(template_id: impl Into<String>) -> Self {
        AuditInstance {
            id: None,
            template_id: template_id.into(),
            location: Location::default(),
            responses: ResponseSet::new(),
            status: AuditStatus::Pending,
            score: None,
            submitted_at: None,
        }
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == AuditStatus::Completed
    }

    /// Record an answer. Moves a pending audit into progress.
    pub fn set_answer(
        &mut self,
        section_id: impl Into<String>,
        question_id: impl Into<String>,
        answer: impl Into<Answer>,
    ) -> Result<(), SubmitError> {
        if self.is_completed() {
            return Err(SubmitError::AlreadyCompleted);
        }
        self.responses.set(section_id, question_id, answer);
        if self.status == AuditStatus::Pending {
            self.status = AuditStatus::InProgress;
        }
        Ok(())
    }

    pub fn clear_answer(
        &mut self,
        section_id: &str,
        question_id: &str,
    ) -> Result<Option<Answer>, SubmitError> {
        if self.is_completed() {
            return Err(SubmitError::AlreadyCompleted);
        }
        Ok(self.responses.clear(section_id, question_id))
    }

    /// Replace the whole response set, as a wire payload submission does.
    pub fn set_responses(&mut self, responses: ResponseSet) -> Result<(), SubmitError> {
        if self.is_completed() {
            return Err(SubmitError::AlreadyCompleted);
        }
        if self.status == AuditStatus::Pending && !responses.is_empty() {
            self.status = AuditStatus::InProgress;
        }
        self.responses = responses;
        Ok(())
    }

    /// Finalize the audit: validate visible mandatory questions, score, and
    /// freeze. On a validation failure the instance is left untouched and
    /// the failure is returned as a value.
    ///
    /// The submission timestamp is injected so the engine layer stays free
    /// of ambient clock reads.
    pub fn submit(
        &mut self,
        spec: &TemplateSpec,
        now: DateTime<Utc>,
    ) -> Result<ScoreReport, SubmitError> {
        if self.is_completed() {
            return Err(SubmitError::AlreadyCompleted);
        }

        let visible = resolve_visibility(spec, &self.responses);
        if let ValidationResult::Invalid { question_text } =
            validate(spec, &self.responses, &visible)
        {
            return Err(SubmitError::MissingAnswer { question_text });
        }

        let report = score(spec, &self.responses);
        self.score = report.total;
        self.status = AuditStatus::Completed;
        self.submitted_at = Some(now);
        Ok(report)
    }
}
