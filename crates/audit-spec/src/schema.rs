use serde_json::{Map, Value, json};

use crate::spec::question::{QuestionSpec, QuestionType};
use crate::spec::template::TemplateSpec;
use crate::visibility::VisibleSet;

/// JSON schema for the two-level response map, restricted to currently
/// visible questions. Mandatory visible questions land in each section's
/// `required` array.
pub fn generate(spec: &TemplateSpec, visible: &VisibleSet) -> Value {
    let mut sections = Map::new();

    for section in &spec.sections {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for question in &section.questions {
            if !visible.contains(&question.id) {
                continue;
            }
            properties.insert(question.id.clone(), question_schema(question));
            if question.mandatory {
                required.push(Value::String(question.id.clone()));
            }
        }

        if properties.is_empty() {
            continue;
        }

        let mut body = Map::new();
        body.insert("type".into(), Value::String("object".into()));
        body.insert("properties".into(), Value::Object(properties));
        body.insert("additionalProperties".into(), Value::Bool(false));
        if !required.is_empty() {
            body.insert("required".into(), Value::Array(required));
        }
        sections.insert(section.id.clone(), Value::Object(body));
    }

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": spec.name,
        "type": "object",
        "properties": sections,
        "additionalProperties": false,
    })
}

fn question_schema(question: &QuestionSpec) -> Value {
    match question.kind {
        QuestionType::NumericInput | QuestionType::RatingScale => {
            let mut schema = Map::new();
            schema.insert("type".into(), Value::String("string".into()));
            schema.insert(
                "pattern".into(),
                Value::String("^-?[0-9]+(\\.[0-9]+)?$".into()),
            );
            if let Some(constraint) = &question.validation {
                if let Some(min) = constraint.min {
                    schema.insert("x-min".into(), json!(min));
                }
                if let Some(max) = constraint.max {
                    schema.insert("x-max".into(), json!(max));
                }
            }
            Value::Object(schema)
        }
        QuestionType::YesNo => json!({ "type": "string", "enum": ["Yes", "No"] }),
        QuestionType::SingleChoice | QuestionType::Dropdown => {
            json!({ "type": "string", "enum": question.options() })
        }
        QuestionType::MultipleChoice => json!({
            "type": "array",
            "items": { "type": "string", "enum": question.options() },
        }),
        QuestionType::TextInput
        | QuestionType::DateTime
        | QuestionType::FileUpload
        | QuestionType::BarcodeScanner
        | QuestionType::ImageUpload => match question
            .validation
            .as_ref()
            .and_then(|constraint| constraint.pattern.as_deref())
        {
            Some(pattern) => json!({ "type": "string", "pattern": pattern }),
            None => json!({ "type": "string" }),
        },
    }
}
