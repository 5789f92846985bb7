use std::collections::BTreeSet;

use thiserror::Error;

use crate::spec::template::TemplateSpec;

/// Structural problems that must be rejected before a template reaches the
/// engines. Dangling rule references are deliberately absent: the engines
/// treat those as unresolved conditions / no-op targets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("duplicate question id '{0}'")]
    DuplicateQuestionId(String),
    #[error("duplicate section id '{0}'")]
    DuplicateSectionId(String),
    #[error("rule '{rule_id}' lists its own source question '{question_id}' as a target")]
    SelfTargetingRule { rule_id: String, question_id: String },
    #[error("rule '{0}' has no target questions")]
    RuleWithoutTargets(String),
    #[error("question '{0}' is a choice question but defines no options")]
    MissingOptions(String),
    #[error("question '{question_id}' has min {min} above max {max}")]
    InvertedRange {
        question_id: String,
        min: f64,
        max: f64,
    },
    #[error("scoring weights sum to {0}, expected 100")]
    WeightSum(u32),
    #[error("scoring weight refers to unknown section '{0}'")]
    UnknownWeightSection(String),
}

/// Validate a template definition. Returns the first problem found, walking
/// sections, then rules, then scoring, in declared order.
pub fn check_template(spec: &TemplateSpec) -> Result<(), TemplateError> {
    let mut section_ids = BTreeSet::new();
    let mut question_ids = BTreeSet::new();

    for section in &spec.sections {
        if !section_ids.insert(section.id.as_str()) {
            return Err(TemplateError::DuplicateSectionId(section.id.clone()));
        }
        for question in &section.questions {
            if !question_ids.insert(question.id.as_str()) {
                return Err(TemplateError::DuplicateQuestionId(question.id.clone()));
            }
            if question.kind.is_choice() && question.options().is_empty() {
                return Err(TemplateError::MissingOptions(question.id.clone()));
            }
            if let Some(constraint) = &question.validation
                && let (Some(min), Some(max)) = (constraint.min, constraint.max)
                && min > max
            {
                return Err(TemplateError::InvertedRange {
                    question_id: question.id.clone(),
                    min,
                    max,
                });
            }
        }
    }

    for rule in &spec.conditional_logic {
        if rule.target_question_ids.is_empty() {
            return Err(TemplateError::RuleWithoutTargets(rule.id.clone()));
        }
        if rule
            .target_question_ids
            .iter()
            .any(|target| *target == rule.source_question_id)
        {
            return Err(TemplateError::SelfTargetingRule {
                rule_id: rule.id.clone(),
                question_id: rule.source_question_id.clone(),
            });
        }
    }

    if let Some(scoring) = &spec.scoring_rules
        && scoring.enabled
        && !scoring.weights.is_empty()
    {
        for section_id in scoring.weights.keys() {
            if !section_ids.contains(section_id.as_str()) {
                return Err(TemplateError::UnknownWeightSection(section_id.clone()));
            }
        }
        let sum: u32 = scoring.weights.values().sum();
        if sum != 100 {
            return Err(TemplateError::WeightSum(sum));
        }
    }

    Ok(())
}
