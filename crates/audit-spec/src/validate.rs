use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::responses::{Answer, ResponseSet};
use crate::spec::question::{QuestionSpec, QuestionType};
use crate::spec::template::TemplateSpec;
use crate::visibility::VisibleSet;

/// Outcome of mandatory validation: valid, or the first failing question's
/// prompt text in section/question declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid { question_text: String },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn failing_question(&self) -> Option<&str> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { question_text } => Some(question_text),
        }
    }
}

/// Check that every visible mandatory question has a non-empty answer.
///
/// Short-circuits at the first failure so error messages are deterministic;
/// questions outside `visible` are never inspected.
pub fn validate(
    spec: &TemplateSpec,
    responses: &ResponseSet,
    visible: &VisibleSet,
) -> ValidationResult {
    for section in &spec.sections {
        for question in &section.questions {
            if !question.mandatory || !visible.contains(&question.id) {
                continue;
            }
            let answered = responses
                .answer(&section.id, &question.id)
                .is_some_and(|answer| !answer.is_empty());
            if !answered {
                return ValidationResult::Invalid {
                    question_text: question.text.clone(),
                };
            }
        }
    }
    ValidationResult::Valid
}

/// A constraint violation on an answered question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnswerError {
    pub question_id: String,
    pub path: String,
    pub message: String,
    pub code: String,
}

impl AnswerError {
    fn new(section_id: &str, question: &QuestionSpec, message: &str, code: &str) -> Self {
        AnswerError {
            question_id: question.id.clone(),
            path: format!("/{}/{}", section_id, question.id),
            message: message.into(),
            code: code.into(),
        }
    }
}

/// Collect constraint violations for visible, answered questions.
///
/// Advisory companion to [`validate`]: it never gates submission on its own
/// and reports every violation rather than short-circuiting.
pub fn check_answers(
    spec: &TemplateSpec,
    responses: &ResponseSet,
    visible: &VisibleSet,
) -> Vec<AnswerError> {
    let mut errors = Vec::new();

    for section in &spec.sections {
        for question in &section.questions {
            if !visible.contains(&question.id) {
                continue;
            }
            let Some(answer) = responses.answer(&section.id, &question.id) else {
                continue;
            };
            if answer.is_empty() {
                continue;
            }
            check_answer(&section.id, question, answer, &mut errors);
        }
    }

    errors
}

fn check_answer(
    section_id: &str,
    question: &QuestionSpec,
    answer: &Answer,
    errors: &mut Vec<AnswerError>,
) {
    match question.kind {
        QuestionType::NumericInput | QuestionType::RatingScale => {
            let Some(value) = answer.as_number() else {
                errors.push(AnswerError::new(
                    section_id,
                    question,
                    "answer is not a number",
                    "not_numeric",
                ));
                return;
            };
            if let Some(constraint) = &question.validation {
                if constraint.min.is_some_and(|min| value < min) {
                    errors.push(AnswerError::new(
                        section_id,
                        question,
                        "value below minimum",
                        "min",
                    ));
                }
                if constraint.max.is_some_and(|max| value > max) {
                    errors.push(AnswerError::new(
                        section_id,
                        question,
                        "value above maximum",
                        "max",
                    ));
                }
            }
        }
        QuestionType::YesNo => {
            if !matches!(answer.as_text(), Some("Yes" | "No")) {
                errors.push(AnswerError::new(
                    section_id,
                    question,
                    "expected Yes or No",
                    "yes_no_mismatch",
                ));
            }
        }
        QuestionType::SingleChoice | QuestionType::Dropdown => {
            match answer.as_text() {
                Some(text) if !question.options().iter().any(|option| option == text) => {
                    errors.push(AnswerError::new(
                        section_id,
                        question,
                        "answer is not one of the configured options",
                        "option_mismatch",
                    ));
                }
                Some(_) => {}
                None => errors.push(AnswerError::new(
                    section_id,
                    question,
                    "expected a single chosen option",
                    "single_choice_shape",
                )),
            }
        }
        QuestionType::MultipleChoice => match answer.as_selections() {
            Some(items) => {
                for item in items {
                    if !question.options().iter().any(|option| option == item) {
                        errors.push(AnswerError::new(
                            section_id,
                            question,
                            "selection is not one of the configured options",
                            "option_mismatch",
                        ));
                        break;
                    }
                }
            }
            None => errors.push(AnswerError::new(
                section_id,
                question,
                "expected a list of chosen options",
                "multiple_choice_shape",
            )),
        },
        QuestionType::TextInput
        | QuestionType::DateTime
        | QuestionType::FileUpload
        | QuestionType::BarcodeScanner
        | QuestionType::ImageUpload => {
            if let Some(pattern) = question
                .validation
                .as_ref()
                .and_then(|constraint| constraint.pattern.as_deref())
                && let Ok(regex) = Regex::new(pattern)
                && let Some(text) = answer.as_text()
                && !regex.is_match(text)
            {
                errors.push(AnswerError::new(
                    section_id,
                    question,
                    "answer does not match pattern",
                    "pattern_mismatch",
                ));
            }
        }
    }
}
