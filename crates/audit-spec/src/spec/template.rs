use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::question::QuestionSpec;
use crate::spec::rule::ConditionRule;

/// Weighted scoring configuration attached to a template.
///
/// `threshold` and `critical_questions` are informational for downstream
/// consumers (pass/fail banners); the scoring engine only reads `weights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoringRules {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub weights: BTreeMap<String, u32>,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub critical_questions: Vec<String>,
}

fn default_threshold() -> f64 {
    80.0
}

/// A titled group of questions, rendered and evaluated in declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SectionSpec {
    #[serde(rename = "section_id")]
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub questions: Vec<QuestionSpec>,
}

/// Authored audit template: sections, conditional logic, and scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateSpec {
    #[serde(
        rename = "template_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_logic: Vec<ConditionRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring_rules: Option<ScoringRules>,
}

impl TemplateSpec {
    /// Iterate every question in section order, then question order.
    pub fn questions(&self) -> impl Iterator<Item = (&SectionSpec, &QuestionSpec)> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter().map(move |question| (section, question)))
    }

    /// Locate a question by id anywhere in the template.
    pub fn find_question(&self, question_id: &str) -> Option<(&SectionSpec, &QuestionSpec)> {
        self.questions()
            .find(|(_, question)| question.id == question_id)
    }

    pub fn has_question(&self, question_id: &str) -> bool {
        self.find_question(question_id).is_some()
    }

    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }
}
