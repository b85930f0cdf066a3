pub mod error;
pub mod format;
pub mod loader;
pub mod reader;
pub mod writer;

use std::fmt;
use std::str::FromStr;

pub use error::IoError;
pub use loader::{LoadError, load_documents, resolve_paths};

/// Parse format for data and schema files. Selected by configuration, never sniffed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = IoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(IoError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}
