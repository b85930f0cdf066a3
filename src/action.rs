use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to write output `{name}` to `{path}`: {source}")]
    WriteOutput {
        name: String,
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Workflow annotation severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    Error,
    Warning,
}

impl Annotation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

/// GitHub Actions runner integration: step outputs and workflow annotations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionContext {
    output_file: Option<PathBuf>,
    annotations: bool,
}

impl ActionContext {
    pub fn new(output_file: Option<PathBuf>, annotations: bool) -> Self {
        Self {
            output_file,
            annotations,
        }
    }

    /// Reads `GITHUB_OUTPUT` and `GITHUB_ACTIONS` from the environment.
    pub fn from_env() -> Self {
        let output_file = env::var_os("GITHUB_OUTPUT")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let annotations = env::var("GITHUB_ACTIONS").is_ok_and(|value| value == "true");
        Self::new(output_file, annotations)
    }

    /// Appends a step output. No-op outside a runner.
    pub fn set_output(&self, name: &str, value: &str) -> Result<(), ActionError> {
        let Some(path) = &self.output_file else {
            return Ok(());
        };
        let write_error = |source: std::io::Error| ActionError::WriteOutput {
            name: name.to_string(),
            path: path.display().to_string(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(write_error)?;
        file.write_all(format_output(name, value).as_bytes())
            .map_err(write_error)
    }

    /// Workflow command line for `message`, or `None` outside a runner.
    pub fn annotation(&self, level: Annotation, message: &str) -> Option<String> {
        self.annotations
            .then(|| format!("::{}::{}", level.as_str(), escape_data(message)))
    }
}

/// Heredoc-style `name<<DELIM` entry; the delimiter never occurs in `value`.
fn format_output(name: &str, value: &str) -> String {
    let mut delimiter = "schemacheck_EOF".to_string();
    let mut attempt = 0;
    while value.contains(&delimiter) {
        attempt += 1;
        delimiter = format!("schemacheck_EOF_{attempt}");
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
