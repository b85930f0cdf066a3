use serde_json::Value;

/// A parsed data or schema file. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    identifier: String,
    content: Value,
}

impl LoadedDocument {
    pub fn new(identifier: impl Into<String>, content: Value) -> Self {
        Self {
            identifier: identifier.into(),
            content,
        }
    }

    /// Source path the document was read from.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn content(&self) -> &Value {
        &self.content
    }
}
