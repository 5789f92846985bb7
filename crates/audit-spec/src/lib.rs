#![allow(missing_docs)]

pub mod check;
pub mod examples;
pub mod instance;
pub mod progress;
pub mod render;
pub mod responses;
pub mod schema;
pub mod scoring;
pub mod spec;
pub mod validate;
pub mod visibility;

pub use check::{TemplateError, check_template};
pub use examples::generate as example_responses;
pub use instance::{AuditInstance, AuditStatus, Location, SubmitError};
pub use progress::{answered_count, next_question};
pub use render::{
    FormStatus, FormView, QuestionView, SectionView, build_form_view, render_json, render_text,
};
pub use responses::{Answer, AuditSubmission, ResponseSet, SubmissionMeta};
pub use schema::generate as response_schema;
pub use scoring::{ScoreReport, score};
pub use spec::{
    ConditionRule, ConditionType, Constraint, QuestionSpec, QuestionType, RuleAction,
    ScoringRules, SectionSpec, TemplateSpec,
};
pub use validate::{AnswerError, ValidationResult, check_answers, validate};
pub use visibility::{VisibleSet, resolve_visibility};
