use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Single engine error, passed through without interpretation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorDetail {
    /// JSON pointer into the data document.
    pub instance_path: String,
    /// JSON pointer into the schema.
    pub schema_path: String,
    pub keyword: String,
    pub message: String,
    /// Failing value, only attached in verbose mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Result of validating one data document. `errors` is `None` when valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub identifier: String,
    pub errors: Option<Vec<ErrorDetail>>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_none()
    }
}

/// Errors of one failing document in the `result` output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileErrors {
    pub filename: String,
    pub errors: Vec<ErrorDetail>,
}

/// Consolidated run result written to the `result` output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FileErrors>>,
}

impl RunReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: None,
        }
    }

    /// Invalid run without per-document detail, used for fatal failures.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            errors: None,
        }
    }

    /// Aggregates outcomes, keeping only failing documents in input order.
    pub fn from_outcomes(outcomes: Vec<ValidationOutcome>) -> Self {
        let failing: Vec<FileErrors> = outcomes
            .into_iter()
            .filter_map(|outcome| {
                outcome.errors.map(|errors| FileErrors {
                    filename: outcome.identifier,
                    errors,
                })
            })
            .collect();

        if failing.is_empty() {
            Self::valid()
        } else {
            Self {
                valid: false,
                errors: Some(failing),
            }
        }
    }
}
