use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::responses::{Answer, ResponseSet};
use crate::spec::template::TemplateSpec;

/// Aggregate weighted score plus the per-section breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreReport {
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_section: BTreeMap<String, f64>,
}

impl ScoreReport {
    fn unscored() -> Self {
        ScoreReport {
            total: None,
            by_section: BTreeMap::new(),
        }
    }

    /// Pass/fail against a threshold percentage; `None` while unscored.
    pub fn passed(&self, threshold: f64) -> Option<bool> {
        self.total.map(|total| total >= threshold)
    }
}

/// Compute the weighted presence-based score for a finalized response set.
///
/// Every question carries a flat 10-point ceiling; an answered question earns
/// the full 10 regardless of its content (there is no correctness concept).
/// Hidden questions still count toward a section's ceiling. The total is
/// `None` when the template has no scoring weights at all.
pub fn score(spec: &TemplateSpec, responses: &ResponseSet) -> ScoreReport {
    let Some(weights) = spec
        .scoring_rules
        .as_ref()
        .map(|rules| &rules.weights)
        .filter(|weights| !weights.is_empty())
    else {
        return ScoreReport::unscored();
    };

    let mut total = 0.0;
    let mut by_section = BTreeMap::new();

    for section in &spec.sections {
        let max_points = 10.0 * section.questions.len() as f64;
        let mut earned = 0.0;
        for question in &section.questions {
            if responses
                .answer(&section.id, &question.id)
                .is_some_and(credits)
            {
                earned += 10.0;
            }
        }

        let weight = weights.get(&section.id).copied().unwrap_or(0) as f64;
        let section_score = if max_points > 0.0 {
            earned / max_points * weight
        } else {
            0.0
        };
        by_section.insert(section.id.clone(), section_score);
        total += section_score;
    }

    ScoreReport {
        total: Some(round2(total)),
        by_section,
    }
}

/// Presence test for credit. Differs from validation emptiness on purpose:
/// a recorded selection list earns credit even when empty, because for
/// choice questions the recorded key itself is what counts.
fn credits(answer: &Answer) -> bool {
    match answer {
        Answer::Text(text) => !text.is_empty(),
        Answer::Selections(_) => true,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
