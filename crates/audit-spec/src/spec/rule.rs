use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Comparison applied between a source answer and the rule's literal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    Equals,
    NotEquals,
    Contains,
    GreaterThan,
    LessThan,
}

/// Effect a rule has on its targets while its condition holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Show,
    Hide,
}

/// Conditional visibility rule.
///
/// Rules are evaluated in declaration order and each rule fully determines
/// membership for its targets, so a later rule targeting the same question
/// overrides any earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ConditionRule {
    #[serde(rename = "rule_id")]
    pub id: String,
    pub source_question_id: String,
    pub condition_type: ConditionType,
    #[serde(deserialize_with = "literal_as_string")]
    pub condition_value: String,
    pub action: RuleAction,
    #[serde(default)]
    pub target_question_ids: Vec<String>,
}

/// Stored templates carry numeric and boolean rule literals; comparisons are
/// string-based, so normalize them on the way in.
fn literal_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Literal {
        Text(String),
        Number(f64),
        Flag(bool),
    }

    Ok(match Literal::deserialize(deserializer)? {
        Literal::Text(text) => text,
        Literal::Number(number) if number.fract() == 0.0 && number.abs() < 1e15 => {
            format!("{}", number as i64)
        }
        Literal::Number(number) => number.to_string(),
        Literal::Flag(flag) => flag.to_string(),
    })
}
