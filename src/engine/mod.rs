pub mod formats;
pub mod schema;

use thiserror::Error;

pub use formats::{FormatDefinition, FormatRegistry};
pub use schema::{CompiledSchema, compile};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}
