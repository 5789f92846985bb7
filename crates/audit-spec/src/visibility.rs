use std::collections::BTreeSet;

use crate::responses::ResponseSet;
use crate::spec::rule::{ConditionRule, ConditionType, RuleAction};
use crate::spec::template::TemplateSpec;

/// Question ids currently eligible to be shown, answered, and validated.
pub type VisibleSet = BTreeSet<String>;

/// Compute the set of visible question ids for the current responses.
///
/// Every question starts visible; rules only carve out exceptions. Rules are
/// folded left to right in declaration order and each rule unconditionally
/// sets membership for its targets, so the last rule naming a target wins.
/// The function is pure and recomputed from scratch on every call.
pub fn resolve_visibility(spec: &TemplateSpec, responses: &ResponseSet) -> VisibleSet {
    let mut visible: VisibleSet = spec
        .questions()
        .map(|(_, question)| question.id.clone())
        .collect();

    for rule in &spec.conditional_logic {
        let holds = condition_holds(spec, responses, rule);
        for target in &rule.target_question_ids {
            if !spec.has_question(target) {
                // Dangling target: no-op rather than a phantom entry.
                continue;
            }
            let keep = match rule.action {
                RuleAction::Show => holds,
                RuleAction::Hide => !holds,
            };
            if keep {
                visible.insert(target.clone());
            } else {
                visible.remove(target);
            }
        }
    }

    visible
}

fn condition_holds(spec: &TemplateSpec, responses: &ResponseSet, rule: &ConditionRule) -> bool {
    let Some(value) = source_value(spec, responses, &rule.source_question_id) else {
        // Unanswered or dangling source: the condition never holds.
        return false;
    };

    match rule.condition_type {
        ConditionType::Equals => value == rule.condition_value,
        ConditionType::NotEquals => value != rule.condition_value,
        ConditionType::Contains => value.contains(rule.condition_value.as_str()),
        ConditionType::GreaterThan => compare_numeric(&value, &rule.condition_value, f64::gt),
        ConditionType::LessThan => compare_numeric(&value, &rule.condition_value, f64::lt),
    }
}

/// Scan the template's sections in declared order and take the first
/// non-empty answer recorded for the question id.
fn source_value(
    spec: &TemplateSpec,
    responses: &ResponseSet,
    question_id: &str,
) -> Option<String> {
    for section in &spec.sections {
        if let Some(answer) = responses.answer(&section.id, question_id)
            && !answer.is_empty()
        {
            return Some(answer.condition_text().into_owned());
        }
    }
    None
}

fn compare_numeric(left: &str, right: &str, op: fn(&f64, &f64) -> bool) -> bool {
    match (parse_number(left), parse_number(right)) {
        (Some(left), Some(right)) => op(&left, &right),
        // Coercion failure is a false condition, never an error.
        _ => false,
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}
