use std::sync::LazyLock;

use regex::Regex;

use crate::domain::config::ValidationConfiguration;

/// Predicate deciding whether a string satisfies a named `format`.
pub type FormatCheck = fn(&str) -> bool;

#[derive(Debug, Clone, Copy)]
pub struct FormatDefinition {
    pub name: &'static str,
    pub check: FormatCheck,
}

/// Formats registered with `extraFormats`.
pub const EXTRA_FORMATS: [FormatDefinition; 1] = [FormatDefinition {
    name: "boolean",
    check: is_boolean_like,
}];

static BOOLEAN_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:true|false|0|1|yes|no|enabled|disabled|on|off)$")
        .expect("Invalid boolean-like pattern")
});

/// Accepts boolean-like strings such as `Yes`, `off` or `1`.
pub fn is_boolean_like(value: &str) -> bool {
    BOOLEAN_LIKE.is_match(value)
}

/// Custom formats handed to the engine in addition to its built-in ones.
#[derive(Debug, Clone, Default)]
pub struct FormatRegistry {
    formats: Vec<FormatDefinition>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_configuration(config: &ValidationConfiguration) -> Self {
        let mut registry = Self::new();
        if config.extra_formats {
            for format in EXTRA_FORMATS {
                registry.register(format);
            }
        }
        registry
    }

    /// Adds a format, replacing any earlier definition with the same name.
    pub fn register(&mut self, format: FormatDefinition) {
        self.formats.retain(|existing| existing.name != format.name);
        self.formats.push(format);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormatDefinition> {
        self.formats.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}
