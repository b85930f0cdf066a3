use jsonschema::{Draft, ValidationError, Validator};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::config::{LogToggle, SchemaDraft, ValidationConfiguration};
use crate::domain::document::LoadedDocument;
use crate::domain::report::{ErrorDetail, ValidationOutcome};

use super::{EngineError, FormatRegistry};

/// Validator compiled once per run and applied to every data document.
pub struct CompiledSchema {
    validator: Validator,
    all_errors: bool,
    verbose: bool,
}

/// Compiles `schema` with the engine options derived from `config`.
///
/// The engine always checks the schema against its meta-schema. In `log`
/// mode the violation is also logged before compiling.
pub fn compile(
    schema: &Value,
    config: &ValidationConfiguration,
    formats: &FormatRegistry,
) -> Result<CompiledSchema, EngineError> {
    let draft = resolve_draft(schema, config.draft);
    if config.validate_schema == LogToggle::Log {
        if let Some(violation) = meta_schema_violation(schema, draft) {
            warn!(%violation, "schema does not conform to its meta-schema");
        }
    }

    let mut options = jsonschema::options().should_validate_formats(config.validate_formats);
    if let Some(draft) = draft {
        options = options.with_draft(draft);
    }
    for format in formats.iter() {
        debug!(format = format.name, "registering custom format");
        options = options.with_format(format.name, format.check);
    }
    let validator = options
        .build(schema)
        .map_err(|error| EngineError::InvalidSchema(error.to_string()))?;

    Ok(CompiledSchema {
        validator,
        all_errors: config.all_errors,
        verbose: config.verbose,
    })
}

/// Draft to pin, or `None` to let the engine detect it from `$schema`.
/// Schemas without `$schema` compile as draft 7 in `auto` mode.
fn resolve_draft(schema: &Value, draft: SchemaDraft) -> Option<Draft> {
    match draft {
        SchemaDraft::Auto if schema.get("$schema").is_some() => None,
        SchemaDraft::Auto | SchemaDraft::Draft7 => Some(Draft::Draft7),
        SchemaDraft::Draft4 => Some(Draft::Draft4),
        SchemaDraft::Draft6 => Some(Draft::Draft6),
        SchemaDraft::Draft201909 => Some(Draft::Draft201909),
        SchemaDraft::Draft202012 => Some(Draft::Draft202012),
    }
}

fn meta_schema_violation(schema: &Value, draft: Option<Draft>) -> Option<String> {
    let checked = match draft {
        Some(Draft::Draft4) => jsonschema::draft4::meta::validate(schema),
        Some(Draft::Draft6) => jsonschema::draft6::meta::validate(schema),
        Some(Draft::Draft7) => jsonschema::draft7::meta::validate(schema),
        Some(Draft::Draft201909) => jsonschema::draft201909::meta::validate(schema),
        Some(Draft::Draft202012) => jsonschema::draft202012::meta::validate(schema),
        _ => jsonschema::meta::validate(schema),
    };
    checked.err().map(|error| error.to_string())
}

impl CompiledSchema {
    /// Errors in engine order; only the first one unless `all_errors` is set.
    pub fn validate(&self, document: &Value) -> Option<Vec<ErrorDetail>> {
        let limit = if self.all_errors { usize::MAX } else { 1 };
        let details: Vec<ErrorDetail> = self
            .validator
            .iter_errors(document)
            .take(limit)
            .map(|error| self.error_detail(document, &error))
            .collect();

        if details.is_empty() {
            None
        } else {
            Some(details)
        }
    }

    pub fn validate_document(&self, document: &LoadedDocument) -> ValidationOutcome {
        ValidationOutcome {
            identifier: document.identifier().to_string(),
            errors: self.validate(document.content()),
        }
    }

    fn error_detail(&self, document: &Value, error: &ValidationError<'_>) -> ErrorDetail {
        let instance_path = error.instance_path().as_str().to_string();
        let schema_path = error.schema_path().as_str().to_string();
        ErrorDetail {
            keyword: keyword_from_schema_path(&schema_path),
            data: self
                .verbose
                .then(|| value_at_pointer(document, &instance_path)),
            instance_path,
            schema_path,
            message: error.to_string(),
        }
    }
}

fn keyword_from_schema_path(schema_path: &str) -> String {
    schema_path
        .rsplit('/')
        .next()
        .map(|token| token.replace("~1", "/").replace("~0", "~"))
        .unwrap_or_default()
}

fn value_at_pointer(root: &Value, pointer: &str) -> Value {
    if pointer.is_empty() {
        return root.clone();
    }
    root.pointer(pointer).cloned().unwrap_or(Value::Null)
}
