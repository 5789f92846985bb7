use std::fs;
use std::path::{Path, PathBuf};

use audit_spec::{
    ResponseSet, TemplateSpec, check_template, example_responses, resolve_visibility,
    response_schema,
};

/// The bundled retail-execution template, shared with the engine fixtures.
pub const SAMPLE_TEMPLATE: &str =
    include_str!("../../audit-spec/tests/fixtures/retail_execution.json");

const BUNDLE_NAME: &str = "retail-execution";

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Write the sample bundle: the template, example responses generated from
/// the initial visibility, and the matching response schema.
pub fn write_bundle(out_root: &Path, force: bool) -> CliResult<PathBuf> {
    let spec: TemplateSpec = serde_json::from_str(SAMPLE_TEMPLATE)?;
    check_template(&spec)?;

    let bundle_dir = out_root.join(BUNDLE_NAME);
    if bundle_dir.exists() {
        if force {
            fs::remove_dir_all(&bundle_dir)?;
        } else {
            return Err(format!(
                "bundle {} already exists; rerun with --force to overwrite",
                bundle_dir.display()
            )
            .into());
        }
    }
    fs::create_dir_all(&bundle_dir)?;

    let visible = resolve_visibility(&spec, &ResponseSet::new());
    let responses = example_responses(&spec, &visible);
    let schema = response_schema(&spec, &visible);

    write_json(
        &bundle_dir.join(format!("{}.template.json", BUNDLE_NAME)),
        &serde_json::to_value(&spec)?,
    )?;
    write_json(
        &bundle_dir.join(format!("{}.responses.example.json", BUNDLE_NAME)),
        &serde_json::to_value(&responses)?,
    )?;
    write_json(
        &bundle_dir.join(format!("{}.responses.schema.json", BUNDLE_NAME)),
        &schema,
    )?;

    Ok(bundle_dir)
}

fn write_json(path: &Path, value: &serde_json::Value) -> CliResult<()> {
    let mut contents = serde_json::to_string_pretty(value)?;
    contents.push('\n');
    fs::write(path, contents)?;
    Ok(())
}
