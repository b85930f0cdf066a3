use thiserror::Error;

use crate::engine::EngineError;
use crate::io::LoadError;

/// Fatal run failures. Content-validation failures are not errors; they are
/// carried by [`crate::domain::report::RunReport`].
#[derive(Debug, Error)]
pub enum RunError {
    /// A data or schema file could not be resolved, read, or parsed.
    #[error("failed to load documents: {0}")]
    Load(#[from] LoadError),

    /// No schema was found or the engine rejected it.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Anything else, including panics caught at the run boundary.
    #[error("unexpected error: {message}")]
    Unexpected { message: String },
}

impl RunError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Stable failure-class label used in the error payload.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load_error",
            Self::Configuration { .. } => "configuration_error",
            Self::Unexpected { .. } => "unexpected_error",
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unexpected { .. } => 1,
            Self::Load(_) | Self::Configuration { .. } => 3,
        }
    }
}

impl From<EngineError> for RunError {
    fn from(error: EngineError) -> Self {
        Self::configuration(error.to_string())
    }
}
