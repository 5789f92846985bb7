use serde_json::{Map, Value, json};

use crate::progress::{answered_count, next_question};
use crate::responses::{Answer, ResponseSet};
use crate::spec::question::QuestionType;
use crate::spec::template::TemplateSpec;
use crate::visibility::resolve_visibility;

/// Status labels exposed to form frontends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    /// More input is required.
    NeedInput,
    /// All visible questions are filled.
    Complete,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormStatus::NeedInput => "need_input",
            FormStatus::Complete => "complete",
        }
    }
}

/// One question as a frontend should present it.
#[derive(Debug, Clone)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub kind: QuestionType,
    pub mandatory: bool,
    pub options: Option<Vec<String>>,
    pub visible: bool,
    pub answer: Option<Answer>,
}

#[derive(Debug, Clone)]
pub struct SectionView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<QuestionView>,
}

/// Computed view over a template plus in-flight responses. This is data for
/// a presenter, not presentation itself.
#[derive(Debug, Clone)]
pub struct FormView {
    pub template_name: String,
    pub status: FormStatus,
    pub next_question_id: Option<String>,
    pub answered: usize,
    pub total: usize,
    pub sections: Vec<SectionView>,
}

pub fn build_form_view(spec: &TemplateSpec, responses: &ResponseSet) -> FormView {
    let visible = resolve_visibility(spec, responses);
    let next = next_question(spec, responses, &visible);

    let sections = spec
        .sections
        .iter()
        .map(|section| SectionView {
            id: section.id.clone(),
            title: section.title.clone(),
            description: section.description.clone(),
            questions: section
                .questions
                .iter()
                .map(|question| QuestionView {
                    id: question.id.clone(),
                    text: question.text.clone(),
                    kind: question.kind,
                    mandatory: question.mandatory,
                    options: question.options.clone(),
                    visible: visible.contains(&question.id),
                    answer: responses.answer(&section.id, &question.id).cloned(),
                })
                .collect(),
        })
        .collect();

    FormView {
        template_name: spec.name.clone(),
        status: if next.is_some() {
            FormStatus::NeedInput
        } else {
            FormStatus::Complete
        },
        next_question_id: next.map(|(_, question)| question.id.clone()),
        answered: answered_count(spec, responses, &visible),
        total: visible.len(),
        sections,
    }
}

/// Render the view as a structured JSON-friendly value.
pub fn render_json(view: &FormView) -> Value {
    let sections = view
        .sections
        .iter()
        .map(|section| {
            json!({
                "section_id": section.id,
                "title": section.title,
                "description": section.description,
                "questions": section
                    .questions
                    .iter()
                    .map(question_json)
                    .collect::<Vec<_>>(),
            })
        })
        .collect::<Vec<_>>();

    json!({
        "template_name": view.template_name,
        "status": view.status.as_str(),
        "next_question_id": view.next_question_id,
        "progress": {
            "answered": view.answered,
            "total": view.total,
        },
        "sections": sections,
    })
}

fn question_json(question: &QuestionView) -> Value {
    let mut map = Map::new();
    map.insert("question_id".into(), Value::String(question.id.clone()));
    map.insert("text".into(), Value::String(question.text.clone()));
    map.insert(
        "type".into(),
        Value::String(question.kind.label().to_string()),
    );
    map.insert("mandatory".into(), Value::Bool(question.mandatory));
    map.insert("visible".into(), Value::Bool(question.visible));
    if let Some(options) = &question.options {
        map.insert("options".into(), json!(options));
    }
    if let Some(answer) = &question.answer {
        map.insert(
            "answer".into(),
            serde_json::to_value(answer).unwrap_or(Value::Null),
        );
    }
    Value::Object(map)
}

/// Render the view as human-friendly text.
pub fn render_text(view: &FormView) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Audit: {}", view.template_name));
    lines.push(format!(
        "Status: {} ({}/{})",
        view.status.as_str(),
        view.answered,
        view.total
    ));

    for section in &view.sections {
        let visible_questions: Vec<_> = section
            .questions
            .iter()
            .filter(|question| question.visible)
            .collect();
        if visible_questions.is_empty() {
            continue;
        }
        lines.push(format!("[{}] {}", section.id, section.title));
        for question in visible_questions {
            let mut entry = format!(" - {} ({})", question.id, question.text);
            if question.mandatory {
                entry.push_str(" *");
            }
            if let Some(answer) = &question.answer {
                if !answer.is_empty() {
                    entry.push_str(&format!(" = {}", answer.condition_text()));
                }
            }
            lines.push(entry);
        }
    }

    lines.join("\n")
}
