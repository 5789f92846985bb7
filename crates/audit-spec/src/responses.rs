use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::instance::Location;

/// A recorded answer: a plain string for most question kinds, a list of
/// chosen labels for multi-select questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Selections(Vec<String>),
}

impl Answer {
    /// An empty string or an empty selection list counts as unanswered.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(text) => text.is_empty(),
            Answer::Selections(items) => items.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(text) => Some(text),
            Answer::Selections(_) => None,
        }
    }

    pub fn as_selections(&self) -> Option<&[String]> {
        match self {
            Answer::Text(_) => None,
            Answer::Selections(items) => Some(items),
        }
    }

    /// String form used by condition comparisons. Selection lists render as
    /// comma-joined labels so substring rules can match individual choices.
    pub fn condition_text(&self) -> Cow<'_, str> {
        match self {
            Answer::Text(text) => Cow::Borrowed(text),
            Answer::Selections(items) => Cow::Owned(items.join(",")),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        self.as_text().and_then(|text| text.trim().parse().ok())
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Answer::Text(text.to_string())
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Answer::Text(text)
    }
}

impl From<Vec<String>> for Answer {
    fn from(items: Vec<String>) -> Self {
        Answer::Selections(items)
    }
}

/// Two-level response map: section id -> question id -> answer.
///
/// This is exactly the wire shape audits persist; a well-formed set never
/// places the same question id under two sections, but the type does not
/// enforce that (template checks do, at load time).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ResponseSet(BTreeMap<String, BTreeMap<String, Answer>>);

impl ResponseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, section_id: &str, question_id: &str) -> Option<&Answer> {
        self.0.get(section_id).and_then(|map| map.get(question_id))
    }

    pub fn set(
        &mut self,
        section_id: impl Into<String>,
        question_id: impl Into<String>,
        answer: impl Into<Answer>,
    ) {
        self.0
            .entry(section_id.into())
            .or_default()
            .insert(question_id.into(), answer.into());
    }

    pub fn clear(&mut self, section_id: &str, question_id: &str) -> Option<Answer> {
        let removed = self.0.get_mut(section_id)?.remove(question_id);
        if self.0.get(section_id).is_some_and(BTreeMap::is_empty) {
            self.0.remove(section_id);
        }
        removed
    }

    pub fn section(&self, section_id: &str) -> Option<&BTreeMap<String, Answer>> {
        self.0.get(section_id)
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, Answer>)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Number of recorded answers, empty or not.
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

/// Extra context captured alongside a finalized submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Finalized responses bound to the template they answer, in the shape
/// transported to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditSubmission {
    pub template_id: String,
    pub responses: ResponseSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<SubmissionMeta>,
}

impl AuditSubmission {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_cbor(&self) -> Result<Vec<u8>, serde_cbor::Error> {
        serde_cbor::to_vec(self)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self, serde_cbor::Error> {
        serde_cbor::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_drops_empty_section_maps() {
        let mut responses = ResponseSet::new();
        responses.set("s1", "q1", "Yes");
        assert_eq!(responses.len(), 1);
        responses.clear("s1", "q1");
        assert!(responses.section("s1").is_none());
        assert!(responses.is_empty());
    }

    #[test]
    fn answer_emptiness() {
        assert!(Answer::from("").is_empty());
        assert!(Answer::Selections(vec![]).is_empty());
        assert!(!Answer::from("0").is_empty());
    }

    #[test]
    fn selections_render_comma_joined_for_conditions() {
        let answer = Answer::Selections(vec!["Brand A".into(), "Brand B".into()]);
        assert_eq!(answer.condition_text(), "Brand A,Brand B");
    }
}
