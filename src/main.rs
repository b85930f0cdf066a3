use std::process;

use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches, Parser};
use schemacheck::action::{ActionContext, Annotation};
use schemacheck::cmd::validate::{self, ValidateCommandArgs, ValidateCommandResponse};
use schemacheck::domain::config::{
    CoerceTypes, ConfigOverrides, LogToggle, OptimizeLevel, RemoveAdditional, SchemaDraft,
    TimestampMode, UseDefaults,
};
use schemacheck::io::Format;
use serde::Serialize;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// Every input can also be supplied through the GitHub Actions
/// `INPUT_<NAME>` environment variable. A blank variable counts as unset.
#[derive(Debug, Parser)]
#[command(
    name = "schemacheck",
    version,
    about = "Validate JSON and YAML documents against a JSON Schema"
)]
struct Cli {
    /// Glob or path of the data documents.
    #[arg(long, env = "INPUT_DATA")]
    data: String,

    /// Glob or path of the schema; the first match in path order is used.
    #[arg(long, env = "INPUT_SCHEMA", required_unless_present = "schemas")]
    schema: Option<String>,

    #[arg(long, env = "INPUT_SCHEMAS", hide = true)]
    schemas: Option<String>,

    /// Parse format for data and schema files.
    #[arg(long, env = "INPUT_FORMAT", default_value_t = Format::Yaml)]
    format: Format,

    /// Treat invalid documents as a successful run; errors are still reported.
    #[arg(long, env = "INPUT_IGNOREERRORS", value_parser = BoolishValueParser::new())]
    ignore_errors: Option<bool>,

    /// Print the resolved validator configuration to stderr before validating.
    #[arg(long, default_value_t = false)]
    emit_config: bool,

    #[command(flatten)]
    options: ValidatorOptionArgs,
}

#[derive(Debug, clap::Args)]
#[command(next_help_heading = "Validator options")]
struct ValidatorOptionArgs {
    #[arg(long, env = "INPUT_STRICT")]
    strict: Option<LogToggle>,

    #[arg(long, env = "INPUT_STRICTSCHEMA")]
    strict_schema: Option<LogToggle>,

    #[arg(long, env = "INPUT_STRICTNUMBERS")]
    strict_numbers: Option<LogToggle>,

    #[arg(long, env = "INPUT_STRICTTYPES")]
    strict_types: Option<LogToggle>,

    #[arg(long, env = "INPUT_STRICTTUPLES")]
    strict_tuples: Option<LogToggle>,

    #[arg(long, env = "INPUT_STRICTREQUIRED")]
    strict_required: Option<LogToggle>,

    #[arg(long, env = "INPUT_ALLOWUNIONTYPES", value_parser = BoolishValueParser::new())]
    allow_union_types: Option<bool>,

    #[arg(long, env = "INPUT_ALLOWMATCHINGPROPERTIES", value_parser = BoolishValueParser::new())]
    allow_matching_properties: Option<bool>,

    #[arg(long, env = "INPUT_VALIDATEFORMATS", value_parser = BoolishValueParser::new())]
    validate_formats: Option<bool>,

    /// Report every error per document instead of the first one.
    #[arg(long, env = "INPUT_ALLERRORS", value_parser = BoolishValueParser::new())]
    all_errors: Option<bool>,

    /// Include the failing value in each error.
    #[arg(long, env = "INPUT_VERBOSE", value_parser = BoolishValueParser::new())]
    verbose: Option<bool>,

    #[arg(long, env = "INPUT_DISCRIMINATOR", value_parser = BoolishValueParser::new())]
    discriminator: Option<bool>,

    #[arg(long = "unicode-regexp", env = "INPUT_UNICODEREGEXP", value_parser = BoolishValueParser::new())]
    unicode_reg_exp: Option<bool>,

    #[arg(long, env = "INPUT_TIMESTAMP")]
    timestamp: Option<TimestampMode>,

    #[arg(long, env = "INPUT_PARSEDATE", value_parser = BoolishValueParser::new())]
    parse_date: Option<bool>,

    #[arg(long, env = "INPUT_ALLOWDATE", value_parser = BoolishValueParser::new())]
    allow_date: Option<bool>,

    #[arg(long, env = "INPUT_INT32RANGE", value_parser = BoolishValueParser::new())]
    int32range: Option<bool>,

    #[arg(long, env = "INPUT_COMMENT", value_parser = BoolishValueParser::new())]
    comment: Option<bool>,

    #[arg(long, env = "INPUT_REMOVEADDITIONAL")]
    remove_additional: Option<RemoveAdditional>,

    #[arg(long, env = "INPUT_USEDEFAULTS")]
    use_defaults: Option<UseDefaults>,

    #[arg(long, env = "INPUT_COERCETYPES")]
    coerce_types: Option<CoerceTypes>,

    /// Meta-schema check (`true`, `false` or `log`); always enforced, `log` also logs the violation.
    #[arg(long, env = "INPUT_VALIDATESCHEMA")]
    validate_schema: Option<LogToggle>,

    #[arg(long, env = "INPUT_INLINEREFS", value_parser = BoolishValueParser::new())]
    inline_refs: Option<bool>,

    #[arg(long, env = "INPUT_PASSCONTEXT", value_parser = BoolishValueParser::new())]
    pass_context: Option<bool>,

    #[arg(long, env = "INPUT_LOOPREQUIRED")]
    loop_required: Option<u32>,

    #[arg(long, env = "INPUT_LOOPENUM")]
    loop_enum: Option<u32>,

    #[arg(long, env = "INPUT_OWNPROPERTIES", value_parser = BoolishValueParser::new())]
    own_properties: Option<bool>,

    #[arg(long, env = "INPUT_MULTIPLEOFPRECISION")]
    multiple_of_precision: Option<u32>,

    #[arg(long, env = "INPUT_CODEES5", value_parser = BoolishValueParser::new())]
    code_es5: Option<bool>,

    #[arg(long, env = "INPUT_CODEESM", value_parser = BoolishValueParser::new())]
    code_esm: Option<bool>,

    #[arg(long, env = "INPUT_CODELINES", value_parser = BoolishValueParser::new())]
    code_lines: Option<bool>,

    #[arg(long, env = "INPUT_CODESOURCE", value_parser = BoolishValueParser::new())]
    code_source: Option<bool>,

    #[arg(long, env = "INPUT_CODEOPTIMIZE")]
    code_optimize: Option<OptimizeLevel>,

    /// Register extra formats (`boolean`: true/false/0/1/yes/no/enabled/disabled/on/off).
    #[arg(long, env = "INPUT_EXTRAFORMATS", value_parser = BoolishValueParser::new())]
    extra_formats: Option<bool>,

    /// JSON Schema draft: auto (from `$schema`, else 7), 4, 6, 7, 2019-09 or 2020-12.
    #[arg(long, env = "INPUT_DRAFT")]
    draft: Option<SchemaDraft>,
}

impl From<ValidatorOptionArgs> for ConfigOverrides {
    fn from(args: ValidatorOptionArgs) -> Self {
        Self {
            strict: args.strict,
            strict_schema: args.strict_schema,
            strict_numbers: args.strict_numbers,
            strict_types: args.strict_types,
            strict_tuples: args.strict_tuples,
            strict_required: args.strict_required,
            allow_union_types: args.allow_union_types,
            allow_matching_properties: args.allow_matching_properties,
            validate_formats: args.validate_formats,
            all_errors: args.all_errors,
            verbose: args.verbose,
            discriminator: args.discriminator,
            unicode_reg_exp: args.unicode_reg_exp,
            timestamp: args.timestamp,
            parse_date: args.parse_date,
            allow_date: args.allow_date,
            int32range: args.int32range,
            comment: args.comment,
            remove_additional: args.remove_additional,
            use_defaults: args.use_defaults,
            coerce_types: args.coerce_types,
            validate_schema: args.validate_schema,
            inline_refs: args.inline_refs,
            pass_context: args.pass_context,
            loop_required: args.loop_required,
            loop_enum: args.loop_enum,
            own_properties: args.own_properties,
            multiple_of_precision: args.multiple_of_precision,
            code_es5: args.code_es5,
            code_esm: args.code_esm,
            code_lines: args.code_lines,
            code_source: args.code_source,
            code_optimize: args.code_optimize,
            extra_formats: args.extra_formats,
            draft: args.draft,
        }
    }
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let parsed = cli_command()
        .try_get_matches()
        .and_then(|matches| Cli::from_arg_matches(&matches));
    let cli = match parsed {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };
    init_tracing();

    let emit_config = cli.emit_config;
    let Some(schema) = non_blank(cli.schema).or_else(|| non_blank(cli.schemas)) else {
        emit_error(
            "input_usage_error",
            "missing required input `schema`".to_string(),
            json!({"input": "schema"}),
            3,
        );
        return 3;
    };
    let args = ValidateCommandArgs {
        data: cli.data,
        schema,
        format: cli.format,
        ignore_errors: cli.ignore_errors.unwrap_or(false),
        config: ConfigOverrides::from(cli.options).resolve(),
    };

    if emit_config {
        match serde_json::to_value(&args.config) {
            Ok(config) => {
                emit_json_stderr(&json!({"config": config}));
            }
            Err(error) => {
                emit_error(
                    "unexpected_error",
                    format!("failed to serialize configuration: {error}"),
                    json!({"flag": "emit_config"}),
                    1,
                );
                return 1;
            }
        }
    }

    let response = validate::run(&args);
    report(&ActionContext::from_env(), &response)
}

/// Runners export every declared input, unset ones as empty strings. Those
/// fall back to the argument's default as if the variable were absent.
fn cli_command() -> clap::Command {
    Cli::command().mut_args(|arg| {
        let blank = arg
            .get_env()
            .and_then(std::env::var_os)
            .is_some_and(|value| value.to_string_lossy().trim().is_empty());
        if blank {
            arg.env(None::<&'static str>)
        } else {
            arg
        }
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

/// Publishes the `result` output and the failure notice, returning the exit code.
fn report(context: &ActionContext, response: &ValidateCommandResponse) -> i32 {
    let result = match serde_json::to_string(&response.result) {
        Ok(serialized) => serialized,
        Err(error) => {
            emit_error(
                "unexpected_error",
                format!("failed to serialize result: {error}"),
                json!({"output": "result"}),
                1,
            );
            return 1;
        }
    };
    println!("{result}");
    if let Err(error) = context.set_output("result", &result) {
        emit_error(
            "unexpected_error",
            error.to_string(),
            json!({"output": "result"}),
            1,
        );
        return 1;
    }

    if let Some(failure) = &response.failure {
        if !emit_json_stderr(failure) {
            emit_error(
                "unexpected_error",
                "failed to serialize failure notice".to_string(),
                json!({"output": "failure"}),
                1,
            );
            return 1;
        }
        let level = if response.exit_code == 0 {
            Annotation::Warning
        } else {
            Annotation::Error
        };
        let message = failure["message"].as_str().unwrap_or("validation failed");
        if let Some(line) = context.annotation(level, message) {
            println!("{line}");
        }
    }

    response.exit_code
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"unexpected_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
