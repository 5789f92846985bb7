use std::fmt::Write;

use audit_spec::{
    AuditSubmission, FormStatus, FormView, QuestionSpec, QuestionType, ScoreReport, SectionSpec,
};

/// Controls which bits of state the fill wizard prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: question prompts only.
    Clean,
    /// Verbose output: progress, visible questions, section breakdowns.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Prints headers, prompts, and the completion summary for the fill wizard.
pub struct WizardPresenter {
    verbosity: Verbosity,
    header_printed: bool,
    show_responses_json: bool,
}

impl WizardPresenter {
    pub fn new(verbosity: Verbosity, show_responses_json: bool) -> Self {
        Self {
            verbosity,
            header_printed: false,
            show_responses_json,
        }
    }

    pub fn show_header(&mut self, view: &FormView) {
        if self.header_printed {
            return;
        }
        println!("Audit: {}", view.template_name);
        self.header_printed = true;
    }

    pub fn show_status(&self, view: &FormView) {
        if self.verbosity.is_verbose() {
            println!(
                "Status: {} ({}/{})",
                view.status.as_str(),
                view.answered,
                view.total
            );
            self.print_visible_questions(view);
        } else if view.status == FormStatus::NeedInput && view.total == 0 {
            println!("No visible questions are available; check the conditional logic.");
        }
    }

    fn print_visible_questions(&self, view: &FormView) {
        println!("Visible questions:");
        for section in &view.sections {
            for question in section.questions.iter().filter(|question| question.visible) {
                let mut entry = format!(" - {} ({})", question.id, question.text);
                if question.mandatory {
                    entry.push_str(" [mandatory]");
                }
                println!("{}", entry);
            }
        }
    }

    pub fn show_prompt(&self, prompt: &PromptContext) {
        let mut line = if prompt.total > 0 {
            format!(
                "{}/{} [{}] {}",
                prompt.index, prompt.total, prompt.section_title, prompt.text
            )
        } else {
            format!("[{}] {}", prompt.section_title, prompt.text)
        };
        if prompt.mandatory {
            line.push_str(" *");
        }
        if let Some(hint) = &prompt.hint {
            line.push(' ');
            line.push_str(hint);
        }
        println!("{}", line);
        if self.verbosity.is_verbose() && !prompt.options.is_empty() {
            println!("Options: {}", prompt.options.join(", "));
        }
    }

    pub fn show_parse_error(&self, error: &AnswerParseError) {
        eprintln!("Invalid answer: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_completion(&self, submission: &AuditSubmission, report: &ScoreReport) {
        println!("Done ✅");
        match report.total {
            Some(total) => {
                println!("Score: {:.2}%", total);
                if self.verbosity.is_verbose() {
                    for (section_id, section_score) in &report.by_section {
                        println!("  {}: {:.2}", section_id, section_score);
                    }
                }
            }
            None => println!("Score: not configured for this template."),
        }
        match submission.to_cbor() {
            Ok(bytes) => println!("Responses (CBOR hex): {}", encode_hex(&bytes)),
            Err(err) => eprintln!("Failed to serialize responses to CBOR: {}", err),
        }
        if self.show_responses_json {
            match submission.to_json_pretty() {
                Ok(pretty) => println!("{}", pretty),
                Err(err) => eprintln!("Failed to serialize responses to JSON: {}", err),
            }
        }
    }
}

/// Context used to format a single prompt.
pub struct PromptContext {
    pub index: usize,
    pub total: usize,
    pub section_title: String,
    pub text: String,
    pub mandatory: bool,
    pub hint: Option<String>,
    pub options: Vec<String>,
}

impl PromptContext {
    pub fn new(
        section: &SectionSpec,
        question: &QuestionSpec,
        answered: usize,
        total: usize,
    ) -> Self {
        Self {
            index: (answered + 1).max(1),
            total,
            section_title: section.title.clone(),
            text: question.text.clone(),
            mandatory: question.mandatory,
            hint: type_hint(question),
            options: question.options().to_vec(),
        }
    }
}

fn type_hint(question: &QuestionSpec) -> Option<String> {
    let options = question.options();
    match question.kind {
        QuestionType::YesNo => Some("(yes/no)".to_string()),
        QuestionType::NumericInput => Some("(number)".to_string()),
        QuestionType::RatingScale => {
            let (min, max) = rating_bounds(question);
            Some(format!("(rating {}-{})", min, max))
        }
        QuestionType::SingleChoice | QuestionType::Dropdown if !options.is_empty() => {
            Some(format!("({})", options.join("/")))
        }
        QuestionType::MultipleChoice if !options.is_empty() => {
            Some(format!("(comma separated: {})", options.join("/")))
        }
        QuestionType::DateTime => Some("(YYYY-MM-DD)".to_string()),
        QuestionType::FileUpload | QuestionType::ImageUpload => {
            Some("(file reference)".to_string())
        }
        QuestionType::BarcodeScanner => Some("(scan or type the code)".to_string()),
        _ => None,
    }
}

/// Rating scales default to 1..5 when the template gives no bounds.
pub fn rating_bounds(question: &QuestionSpec) -> (i64, i64) {
    let constraint = question.validation.as_ref();
    let min = constraint.and_then(|c| c.min).unwrap_or(1.0) as i64;
    let max = constraint.and_then(|c| c.max).unwrap_or(5.0) as i64;
    (min, max)
}

/// Error produced when parsing answers typed by the user.
#[derive(Debug)]
pub struct AnswerParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl AnswerParseError {
    pub fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

fn encode_hex(bytes: &[u8]) -> String {
    let mut encoded = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(&mut encoded, "{:02x}", byte).expect("writing to string cannot fail");
    }
    encoded
}
