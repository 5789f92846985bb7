use crate::responses::{Answer, ResponseSet};
use crate::spec::question::{QuestionSpec, QuestionType};
use crate::spec::template::TemplateSpec;
use crate::visibility::VisibleSet;

/// Generate plausible example responses for every visible question. Used by
/// bundle generation and as a fixture seed in tests; the output is a
/// starting point, not guaranteed to survive its own visibility rules.
pub fn generate(spec: &TemplateSpec, visible: &VisibleSet) -> ResponseSet {
    let mut responses = ResponseSet::new();
    for (section, question) in spec.questions() {
        if visible.contains(&question.id) {
            responses.set(&section.id, &question.id, example_answer(question));
        }
    }
    responses
}

fn example_answer(question: &QuestionSpec) -> Answer {
    match question.kind {
        QuestionType::YesNo => Answer::from("Yes"),
        QuestionType::NumericInput | QuestionType::RatingScale => {
            let floor = question
                .validation
                .as_ref()
                .and_then(|constraint| constraint.min)
                .unwrap_or(1.0);
            Answer::Text(format!("{}", floor))
        }
        QuestionType::SingleChoice | QuestionType::Dropdown => Answer::Text(
            question
                .options()
                .first()
                .cloned()
                .unwrap_or_else(|| "example-choice".into()),
        ),
        QuestionType::MultipleChoice => Answer::Selections(
            question
                .options()
                .first()
                .cloned()
                .into_iter()
                .collect(),
        ),
        QuestionType::DateTime => Answer::from("2024-01-01"),
        QuestionType::FileUpload | QuestionType::ImageUpload => {
            Answer::Text(format!("upload://{}", question.id))
        }
        QuestionType::BarcodeScanner => Answer::from("4006381333931"),
        QuestionType::TextInput => Answer::Text(format!("example-{}", question.id)),
    }
}
