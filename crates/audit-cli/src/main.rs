mod sample;

mod wizard;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use audit_spec::{
    Answer, AuditSubmission, QuestionSpec, QuestionType, ResponseSet, SectionSpec, SubmissionMeta,
    TemplateSpec, ValidationResult, VisibleSet, build_form_view, check_answers, check_template,
    resolve_visibility, score, validate,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use wizard::{AnswerParseError, PromptContext, Verbosity, WizardPresenter, rating_bounds};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Field audit questionnaire CLI",
    long_about = "Fill, check, validate, score, and submit audit questionnaires whose question visibility reacts live to prior answers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fill out a template interactively; visibility reacts to every answer.
    Fill {
        /// Path to the template JSON.
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
        /// Optional JSON file containing initial responses.
        #[arg(long, value_name = "RESPONSES")]
        responses: Option<PathBuf>,
        /// Show verbose output (progress, visible questions, breakdowns).
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Also emit the finished responses as pretty JSON.
        #[arg(long)]
        responses_json: bool,
    },
    /// Check a template definition for structural problems.
    Check {
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
    },
    /// Validate responses against a template.
    Validate {
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
        #[arg(long, value_name = "RESPONSES")]
        responses: PathBuf,
    },
    /// Score responses and print the per-section breakdown.
    Score {
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
        #[arg(long, value_name = "RESPONSES")]
        responses: PathBuf,
    },
    /// Submit responses: validate, score, and print the frozen audit.
    Submit {
        #[arg(long, value_name = "TEMPLATE")]
        template: PathBuf,
        #[arg(long, value_name = "RESPONSES")]
        responses: PathBuf,
        /// Store name recorded on the audit.
        #[arg(long, value_name = "NAME")]
        location_name: Option<String>,
        /// Street address recorded on the audit.
        #[arg(long, value_name = "ADDRESS")]
        location_address: Option<String>,
    },
    /// Emit the bundled retail-execution sample (template, responses, schema).
    Sample {
        /// Directory the bundle is written into (defaults to the current directory).
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Overwrite an existing bundle.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> CliResult<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Fill {
            template,
            responses,
            verbose,
            responses_json,
        } => run_fill(template, responses, verbose, responses_json),
        Command::Check { template } => run_check(template),
        Command::Validate {
            template,
            responses,
        } => run_validate(template, responses),
        Command::Score {
            template,
            responses,
        } => run_score(template, responses),
        Command::Submit {
            template,
            responses,
            location_name,
            location_address,
        } => run_submit(template, responses, location_name, location_address),
        Command::Sample { out, force } => run_sample(out, force),
    }
}

fn load_template(path: &Path) -> CliResult<TemplateSpec> {
    let contents = fs::read_to_string(path)?;
    let spec: TemplateSpec = serde_json::from_str(&contents)?;
    check_template(&spec)?;
    log::debug!(
        "loaded template '{}': {} sections, {} questions, {} rules",
        spec.name,
        spec.sections.len(),
        spec.question_count(),
        spec.conditional_logic.len()
    );
    Ok(spec)
}

fn load_responses(path: &Path) -> CliResult<ResponseSet> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn template_label(spec: &TemplateSpec) -> String {
    spec.id.clone().unwrap_or_else(|| spec.name.clone())
}

fn run_check(template_path: PathBuf) -> CliResult<()> {
    let spec = load_template(&template_path)?;
    println!(
        "Template OK: {} sections, {} questions, {} rules",
        spec.sections.len(),
        spec.question_count(),
        spec.conditional_logic.len()
    );
    Ok(())
}

fn run_validate(template_path: PathBuf, responses_path: PathBuf) -> CliResult<()> {
    let spec = load_template(&template_path)?;
    let responses = load_responses(&responses_path)?;
    let visible = resolve_visibility(&spec, &responses);

    let validation = validate(&spec, &responses, &visible);
    let answer_errors = check_answers(&spec, &responses, &visible);

    match &validation {
        ValidationResult::Valid => println!("Validation result: valid"),
        ValidationResult::Invalid { question_text } => {
            println!("Validation result: invalid");
            println!("Please answer: {}", question_text);
        }
    }
    if !answer_errors.is_empty() {
        println!("Answer problems:");
        for error in &answer_errors {
            println!("  {} - {}", error.path, error.message);
        }
    }

    if validation.is_valid() && answer_errors.is_empty() {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn run_score(template_path: PathBuf, responses_path: PathBuf) -> CliResult<()> {
    let spec = load_template(&template_path)?;
    let responses = load_responses(&responses_path)?;
    let report = score(&spec, &responses);

    match report.total {
        Some(total) => {
            println!("Total: {:.2}", total);
            for (section_id, section_score) in &report.by_section {
                println!("  {}: {:.2}", section_id, section_score);
            }
            if let Some(rules) = &spec.scoring_rules {
                let verdict = if total >= rules.threshold { "pass" } else { "fail" };
                println!("Threshold {}: {}", rules.threshold, verdict);
            }
        }
        None => println!("Scoring is not configured for this template."),
    }
    Ok(())
}

fn run_submit(
    template_path: PathBuf,
    responses_path: PathBuf,
    location_name: Option<String>,
    location_address: Option<String>,
) -> CliResult<()> {
    let template_json = fs::read_to_string(&template_path)?;
    let responses_json = fs::read_to_string(&responses_path)?;
    let location_json = json!({
        "store_name": location_name,
        "address": location_address,
    })
    .to_string();

    let raw = component_audit::submit_audit(
        &template_json,
        &responses_json,
        &location_json,
        &Utc::now().to_rfc3339(),
    );
    let value: serde_json::Value = serde_json::from_str(&raw)?;

    if let Some(error) = value.get("error").and_then(serde_json::Value::as_str) {
        return Err(error.into());
    }
    if let Some(question_text) = value
        .pointer("/validation/question_text")
        .and_then(serde_json::Value::as_str)
    {
        println!("Submission rejected. Please answer: {}", question_text);
        return Err("validation failed".into());
    }

    println!("{}", serde_json::to_string_pretty(&value["audit"])?);
    Ok(())
}

fn run_sample(out: Option<PathBuf>, force: bool) -> CliResult<()> {
    let out_root = out.unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&out_root)?;
    let bundle_dir = sample::write_bundle(&out_root, force)?;
    println!("Generated sample bundle at {}", bundle_dir.display());
    Ok(())
}

fn run_fill(
    template_path: PathBuf,
    responses_path: Option<PathBuf>,
    verbose: bool,
    responses_json: bool,
) -> CliResult<()> {
    let spec = load_template(&template_path)?;
    let mut responses = match responses_path {
        Some(path) => load_responses(&path)?,
        None => ResponseSet::new(),
    };
    let mut presenter = WizardPresenter::new(Verbosity::from_verbose(verbose), responses_json);

    loop {
        let visible = resolve_visibility(&spec, &responses);
        let Some((section, question)) = next_unvisited(&spec, &responses, &visible) else {
            break;
        };

        let view = build_form_view(&spec, &responses);
        presenter.show_header(&view);
        presenter.show_status(&view);

        let prompt = PromptContext::new(section, question, view.answered, view.total);
        let answer = prompt_question(&prompt, question, &presenter)?;
        // A skipped optional question is recorded as an empty answer so the
        // wizard does not offer it again; the engines treat it as unanswered.
        responses.set(
            section.id.clone(),
            question.id.clone(),
            answer.unwrap_or_else(|| Answer::from("")),
        );
    }

    let visible = resolve_visibility(&spec, &responses);
    if let ValidationResult::Invalid { question_text } = validate(&spec, &responses, &visible) {
        return Err(format!("please answer: {}", question_text).into());
    }

    let report = score(&spec, &responses);
    let submission = AuditSubmission {
        template_id: template_label(&spec),
        responses,
        meta: Some(SubmissionMeta {
            score: report.total,
            submitted_at: None,
            location: None,
        }),
    };
    presenter.show_completion(&submission, &report);
    Ok(())
}

/// First visible question the wizard has not yet offered. Unlike the
/// engine-level next-question helper this treats a recorded empty answer
/// (a deliberate skip) as visited.
fn next_unvisited<'spec>(
    spec: &'spec TemplateSpec,
    responses: &ResponseSet,
    visible: &VisibleSet,
) -> Option<(&'spec SectionSpec, &'spec QuestionSpec)> {
    spec.questions().find(|(section, question)| {
        visible.contains(&question.id) && responses.answer(&section.id, &question.id).is_none()
    })
}

fn prompt_question(
    prompt: &PromptContext,
    question: &QuestionSpec,
    presenter: &WizardPresenter,
) -> CliResult<Option<Answer>> {
    loop {
        presenter.show_prompt(prompt);
        print!("> ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Err("input ended before the audit was complete".into());
        }

        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("exit") {
            return Err("audit aborted by user".into());
        }

        match parse_answer(question, trimmed) {
            Ok(answer) => return Ok(answer),
            Err(err) => presenter.show_parse_error(&err),
        }
    }
}

fn parse_answer(question: &QuestionSpec, raw: &str) -> Result<Option<Answer>, AnswerParseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        if question.mandatory {
            return Err(AnswerParseError::new(
                "This question requires an answer.",
                None,
            ));
        }
        return Ok(None);
    }

    let answer = match question.kind {
        QuestionType::YesNo => parse_yes_no(raw)?,
        QuestionType::NumericInput => parse_numeric(question, raw)?,
        QuestionType::RatingScale => parse_rating(question, raw)?,
        QuestionType::SingleChoice | QuestionType::Dropdown => parse_choice(question, raw)?,
        QuestionType::MultipleChoice => parse_multi_choice(question, raw)?,
        QuestionType::TextInput
        | QuestionType::DateTime
        | QuestionType::FileUpload
        | QuestionType::BarcodeScanner
        | QuestionType::ImageUpload => Answer::from(raw),
    };
    Ok(Some(answer))
}

fn parse_yes_no(raw: &str) -> Result<Answer, AnswerParseError> {
    match raw.to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(Answer::from("Yes")),
        "no" | "n" | "false" | "0" => Ok(Answer::from("No")),
        _ => Err(AnswerParseError::new(
            "Please enter yes or no.",
            Some("expected yes/no (y/n)".to_string()),
        )),
    }
}

fn parse_numeric(question: &QuestionSpec, raw: &str) -> Result<Answer, AnswerParseError> {
    let value = raw.parse::<f64>().ok().filter(|value| value.is_finite());
    let Some(value) = value else {
        return Err(AnswerParseError::new(
            "Please enter a number.",
            Some("expected number".to_string()),
        ));
    };

    if let Some(constraint) = &question.validation {
        if constraint.min.is_some_and(|min| value < min) {
            return Err(AnswerParseError::new(
                format!("Value must be at least {}.", constraint.min.unwrap_or(0.0)),
                None,
            ));
        }
        if constraint.max.is_some_and(|max| value > max) {
            return Err(AnswerParseError::new(
                format!("Value must be at most {}.", constraint.max.unwrap_or(0.0)),
                None,
            ));
        }
    }
    Ok(Answer::from(raw))
}

fn parse_rating(question: &QuestionSpec, raw: &str) -> Result<Answer, AnswerParseError> {
    let (min, max) = rating_bounds(question);
    match raw.parse::<i64>() {
        Ok(value) if value >= min && value <= max => Ok(Answer::from(raw)),
        Ok(_) => Err(AnswerParseError::new(
            format!("Rating must be between {} and {}.", min, max),
            None,
        )),
        Err(_) => Err(AnswerParseError::new(
            "Please enter a whole number rating.",
            Some(format!("expected integer in {}..{}", min, max)),
        )),
    }
}

fn parse_choice(question: &QuestionSpec, raw: &str) -> Result<Answer, AnswerParseError> {
    let options = question.options();
    match options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(raw))
    {
        Some(option) => Ok(Answer::from(option.clone())),
        None => Err(AnswerParseError::new(
            format!("Choose one of: {}.", options.join(", ")),
            Some(format!("allowed values: {}", options.join(", "))),
        )),
    }
}

fn parse_multi_choice(question: &QuestionSpec, raw: &str) -> Result<Answer, AnswerParseError> {
    let options = question.options();
    let mut chosen = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match options.iter().find(|option| option.eq_ignore_ascii_case(part)) {
            Some(option) => {
                if !chosen.contains(option) {
                    chosen.push(option.clone());
                }
            }
            None => {
                return Err(AnswerParseError::new(
                    format!("'{}' is not an option. Choose from: {}.", part, options.join(", ")),
                    Some(format!("allowed values: {}", options.join(", "))),
                ));
            }
        }
    }
    if chosen.is_empty() {
        return Err(AnswerParseError::new(
            "Provide at least one option (comma separated).",
            None,
        ));
    }
    Ok(Answer::Selections(chosen))
}
