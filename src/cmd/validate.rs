use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::domain::config::ValidationConfiguration;
use crate::domain::document::LoadedDocument;
use crate::domain::error::RunError;
use crate::domain::report::{RunReport, ValidationOutcome};
use crate::engine::{self, FormatRegistry};
use crate::io::{self, Format};

/// Input arguments for one validation run.
#[derive(Debug, Clone)]
pub struct ValidateCommandArgs {
    /// Glob or path of the data documents.
    pub data: String,
    /// Glob or path of the schema; the first match wins.
    pub schema: String,
    pub format: Format,
    /// Turn a content-validation failure into a successful run.
    pub ignore_errors: bool,
    pub config: ValidationConfiguration,
}

/// Run outcome: exit code, the `result` output, and the failure notice if any.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidateCommandResponse {
    pub exit_code: i32,
    pub result: RunReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Value>,
}

/// Exit codes: 0 valid (or ignored), 2 invalid data, 3 load or configuration
/// error, 1 unexpected error.
pub fn run(args: &ValidateCommandArgs) -> ValidateCommandResponse {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| execute(args)))
        .unwrap_or_else(|payload| Err(RunError::unexpected(panic_message(payload.as_ref()))));

    match outcome {
        Ok(report) => report_response(report, args.ignore_errors),
        Err(error) => error_response(&error),
    }
}

fn report_response(report: RunReport, ignore_errors: bool) -> ValidateCommandResponse {
    if report.valid {
        return ValidateCommandResponse {
            exit_code: 0,
            result: report,
            failure: None,
        };
    }

    let serialized = match serde_json::to_string(&report.errors) {
        Ok(serialized) => serialized,
        Err(error) => {
            return error_response(&RunError::unexpected(format!(
                "failed to serialize validation errors: {error}"
            )));
        }
    };
    ValidateCommandResponse {
        exit_code: if ignore_errors { 0 } else { 2 },
        result: report,
        failure: Some(json!({
            "error": "validation_failure",
            "message": format!("validation errors: {serialized}"),
            "ignored": ignore_errors,
        })),
    }
}

fn error_response(error: &RunError) -> ValidateCommandResponse {
    ValidateCommandResponse {
        exit_code: error.exit_code(),
        result: RunReport::invalid(),
        failure: Some(json!({
            "error": error.kind(),
            "message": error.to_string(),
        })),
    }
}

fn execute(args: &ValidateCommandArgs) -> Result<RunReport, RunError> {
    let (data, schemas) = load_inputs(args)?;
    let schema = select_schema(schemas)?;

    if data.is_empty() {
        info!(pattern = %args.data, "no data documents matched; nothing to validate");
        return Ok(RunReport::valid());
    }

    for option in args.config.unsupported_overrides() {
        warn!(option, "option is not supported by the validation engine and has no effect");
    }
    let formats = FormatRegistry::for_configuration(&args.config);
    let compiled = engine::compile(schema.content(), &args.config, &formats)?;

    let outcomes: Vec<ValidationOutcome> = data
        .iter()
        .map(|document| compiled.validate_document(document))
        .collect();
    let failing = outcomes.iter().filter(|outcome| !outcome.is_valid()).count();
    info!(
        documents = outcomes.len(),
        failing,
        schema = schema.identifier(),
        "validation finished"
    );

    Ok(RunReport::from_outcomes(outcomes))
}

/// Loads data and schema documents concurrently. Both loads finish before
/// either error is returned; a data error takes precedence.
fn load_inputs(
    args: &ValidateCommandArgs,
) -> Result<(Vec<LoadedDocument>, Vec<LoadedDocument>), RunError> {
    let (data, schemas) = rayon::join(
        || io::load_documents(&args.data, args.format),
        || io::load_documents(&args.schema, args.format),
    );
    Ok((data?, schemas?))
}

fn select_schema(schemas: Vec<LoadedDocument>) -> Result<LoadedDocument, RunError> {
    let mut schemas = schemas.into_iter();
    let Some(schema) = schemas.next() else {
        return Err(RunError::configuration("no schema found"));
    };
    let ignored: Vec<String> = schemas
        .map(|extra| extra.identifier().to_string())
        .collect();
    if !ignored.is_empty() {
        warn!(
            used = schema.identifier(),
            ignored = ?ignored,
            "schema pattern matched several files; using the first"
        );
    }
    Ok(schema)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("validation panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("validation panicked: {message}")
    } else {
        "validation panicked".to_string()
    }
}
