use crate::responses::ResponseSet;
use crate::spec::question::QuestionSpec;
use crate::spec::template::{SectionSpec, TemplateSpec};
use crate::visibility::VisibleSet;

/// First visible question without a non-empty answer, in section order then
/// question order. `None` means every visible question is answered.
pub fn next_question<'spec>(
    spec: &'spec TemplateSpec,
    responses: &ResponseSet,
    visible: &VisibleSet,
) -> Option<(&'spec SectionSpec, &'spec QuestionSpec)> {
    spec.questions().find(|(section, question)| {
        visible.contains(&question.id) && !answered(responses, &section.id, &question.id)
    })
}

/// Number of visible questions carrying a non-empty answer.
pub fn answered_count(spec: &TemplateSpec, responses: &ResponseSet, visible: &VisibleSet) -> usize {
    spec.questions()
        .filter(|(section, question)| {
            visible.contains(&question.id) && answered(responses, &section.id, &question.id)
        })
        .count()
}

fn answered(responses: &ResponseSet, section_id: &str, question_id: &str) -> bool {
    responses
        .answer(section_id, question_id)
        .is_some_and(|answer| !answer.is_empty())
}
