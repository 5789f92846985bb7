use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Closed set of question kinds understood by the engines.
///
/// Wire labels match the persisted template format (`text_input`,
/// `yes_no`, ...); dispatch inside the engines is always on this tag,
/// never on free-form strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    TextInput,
    NumericInput,
    SingleChoice,
    MultipleChoice,
    Dropdown,
    DateTime,
    FileUpload,
    BarcodeScanner,
    YesNo,
    RatingScale,
    ImageUpload,
}

impl QuestionType {
    /// Kinds whose answers come from a configured option list.
    pub fn is_choice(self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultipleChoice | QuestionType::Dropdown
        )
    }

    /// Kinds whose answers are numeric strings.
    pub fn is_numeric(self) -> bool {
        matches!(self, QuestionType::NumericInput | QuestionType::RatingScale)
    }

    pub fn label(self) -> &'static str {
        match self {
            QuestionType::TextInput => "text_input",
            QuestionType::NumericInput => "numeric_input",
            QuestionType::SingleChoice => "single_choice",
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::Dropdown => "dropdown",
            QuestionType::DateTime => "date_time",
            QuestionType::FileUpload => "file_upload",
            QuestionType::BarcodeScanner => "barcode_scanner",
            QuestionType::YesNo => "yes_no",
            QuestionType::RatingScale => "rating_scale",
            QuestionType::ImageUpload => "image_upload",
        }
    }
}

/// Optional per-question answer constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// A single question inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSpec {
    #[serde(rename = "question_id")]
    pub id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    #[serde(default)]
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Constraint>,
}

impl QuestionSpec {
    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }
}
