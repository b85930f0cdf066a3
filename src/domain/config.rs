use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Rejected option value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid value `{value}`; expected one of: {expected}")]
pub struct OptionValueError {
    pub value: String,
    pub expected: &'static str,
}

impl OptionValueError {
    fn new(value: &str, expected: &'static str) -> Self {
        Self {
            value: value.to_string(),
            expected,
        }
    }
}

fn parse_boolish(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Boolean option that can also be set to only log instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogToggle {
    Off,
    On,
    Log,
}

impl FromStr for LogToggle {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("log") {
            return Ok(Self::Log);
        }
        match parse_boolish(s) {
            Some(true) => Ok(Self::On),
            Some(false) => Ok(Self::Off),
            None => Err(OptionValueError::new(s, "true, false, log")),
        }
    }
}

/// How date-time values are expected to be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampMode {
    String,
    Date,
}

impl FromStr for TimestampMode {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "date" => Ok(Self::Date),
            _ => Err(OptionValueError::new(s, "string, date")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoveAdditional {
    Off,
    On,
    All,
    Failing,
}

impl FromStr for RemoveAdditional {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "failing" => Ok(Self::Failing),
            other => match parse_boolish(other) {
                Some(true) => Ok(Self::On),
                Some(false) => Ok(Self::Off),
                None => Err(OptionValueError::new(s, "true, false, all, failing")),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UseDefaults {
    Off,
    On,
    Empty,
}

impl FromStr for UseDefaults {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "empty" => Ok(Self::Empty),
            other => match parse_boolish(other) {
                Some(true) => Ok(Self::On),
                Some(false) => Ok(Self::Off),
                None => Err(OptionValueError::new(s, "true, false, empty")),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoerceTypes {
    Off,
    On,
    Array,
}

impl FromStr for CoerceTypes {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "array" => Ok(Self::Array),
            other => match parse_boolish(other) {
                Some(true) => Ok(Self::On),
                Some(false) => Ok(Self::Off),
                None => Err(OptionValueError::new(s, "true, false, array")),
            },
        }
    }
}

/// Code optimization passes; `false` parses as 0 and `true` as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OptimizeLevel(pub u32);

impl FromStr for OptimizeLevel {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(passes) = s.trim().parse::<u32>() {
            return Ok(Self(passes));
        }
        match parse_boolish(s) {
            Some(enabled) => Ok(Self(u32::from(enabled))),
            None => Err(OptionValueError::new(s, "true, false, or a pass count")),
        }
    }
}

/// JSON Schema draft used to compile the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SchemaDraft {
    /// Detect from `$schema`, falling back to draft 7 when it is absent.
    #[default]
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "4")]
    Draft4,
    #[serde(rename = "6")]
    Draft6,
    #[serde(rename = "7")]
    Draft7,
    #[serde(rename = "2019-09")]
    Draft201909,
    #[serde(rename = "2020-12")]
    Draft202012,
}

impl SchemaDraft {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Draft4 => "4",
            Self::Draft6 => "6",
            Self::Draft7 => "7",
            Self::Draft201909 => "2019-09",
            Self::Draft202012 => "2020-12",
        }
    }
}

impl fmt::Display for SchemaDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaDraft {
    type Err = OptionValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix("draft")
            .map(|rest| rest.trim_start_matches(['-', '_']))
            .unwrap_or(&normalized);
        match normalized {
            "auto" => Ok(Self::Auto),
            "4" | "04" => Ok(Self::Draft4),
            "6" | "06" => Ok(Self::Draft6),
            "7" | "07" => Ok(Self::Draft7),
            "2019-09" | "201909" => Ok(Self::Draft201909),
            "2020-12" | "202012" => Ok(Self::Draft202012),
            _ => Err(OptionValueError::new(
                s,
                "auto, 4, 6, 7, 2019-09, 2020-12",
            )),
        }
    }
}

/// Validator options for one run.
///
/// Defaults follow the Ajv v8 defaults the option names come from. The Rust
/// engine honours `validate_formats`, `all_errors`, `verbose`, `extra_formats`
/// and `draft`. The meta-schema check always runs, so `validate_schema` only
/// adds an early warning in `log` mode. Every other field is carried for
/// diagnostics and reported by [`ValidationConfiguration::unsupported_overrides`]
/// when changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfiguration {
    /// Unknown keywords and ignored schema parts. Default `true`.
    pub strict_schema: LogToggle,
    /// NaN and Infinity rejected as numbers. Default `true`.
    pub strict_numbers: LogToggle,
    /// Union and applicator type consistency. Default `log`.
    pub strict_types: LogToggle,
    /// Tuple `items` without `minItems`/`additionalItems`. Default `log`.
    pub strict_tuples: LogToggle,
    /// `required` entries not defined in `properties`. Default `false`.
    pub strict_required: LogToggle,
    pub allow_union_types: bool,
    pub allow_matching_properties: bool,
    /// Default `true`.
    pub validate_formats: bool,
    /// Report every error instead of stopping at the first per document.
    pub all_errors: bool,
    /// Attach the failing value to each error.
    pub verbose: bool,
    pub discriminator: bool,
    /// Default `true`.
    pub unicode_reg_exp: bool,
    /// Default: unset, both representations accepted.
    pub timestamp: Option<TimestampMode>,
    pub parse_date: bool,
    pub allow_date: bool,
    /// Default `true`.
    pub int32range: bool,
    /// Honour `$comment` keywords.
    pub comment: bool,
    pub remove_additional: RemoveAdditional,
    pub use_defaults: UseDefaults,
    pub coerce_types: CoerceTypes,
    /// Meta-schema check. The engine always enforces it; `log` also warns with
    /// the violation before compiling. Default `true`.
    pub validate_schema: LogToggle,
    /// Default `true`.
    pub inline_refs: bool,
    pub pass_context: bool,
    /// Unset means never unroll.
    pub loop_required: Option<u32>,
    pub loop_enum: Option<u32>,
    pub own_properties: bool,
    pub multiple_of_precision: Option<u32>,
    pub code_es5: bool,
    pub code_esm: bool,
    pub code_lines: bool,
    pub code_source: bool,
    /// Default 1 pass.
    pub code_optimize: OptimizeLevel,
    /// Register the extra format matchers (currently `boolean`).
    pub extra_formats: bool,
    pub draft: SchemaDraft,
}

impl Default for ValidationConfiguration {
    fn default() -> Self {
        Self {
            strict_schema: LogToggle::On,
            strict_numbers: LogToggle::On,
            strict_types: LogToggle::Log,
            strict_tuples: LogToggle::Log,
            strict_required: LogToggle::Off,
            allow_union_types: false,
            allow_matching_properties: false,
            validate_formats: true,
            all_errors: false,
            verbose: false,
            discriminator: false,
            unicode_reg_exp: true,
            timestamp: None,
            parse_date: false,
            allow_date: false,
            int32range: true,
            comment: false,
            remove_additional: RemoveAdditional::Off,
            use_defaults: UseDefaults::Off,
            coerce_types: CoerceTypes::Off,
            validate_schema: LogToggle::On,
            inline_refs: true,
            pass_context: false,
            loop_required: None,
            loop_enum: None,
            own_properties: false,
            multiple_of_precision: None,
            code_es5: false,
            code_esm: false,
            code_lines: false,
            code_source: false,
            code_optimize: OptimizeLevel(1),
            extra_formats: false,
            draft: SchemaDraft::Auto,
        }
    }
}

impl ValidationConfiguration {
    /// Names of options set away from their default that the engine cannot honour.
    pub fn unsupported_overrides(&self) -> Vec<&'static str> {
        let defaults = Self::default();
        [
            ("strictSchema", self.strict_schema != defaults.strict_schema),
            ("strictNumbers", self.strict_numbers != defaults.strict_numbers),
            ("strictTypes", self.strict_types != defaults.strict_types),
            ("strictTuples", self.strict_tuples != defaults.strict_tuples),
            ("strictRequired", self.strict_required != defaults.strict_required),
            ("allowUnionTypes", self.allow_union_types),
            ("allowMatchingProperties", self.allow_matching_properties),
            ("discriminator", self.discriminator),
            ("unicodeRegExp", !self.unicode_reg_exp),
            ("timestamp", self.timestamp.is_some()),
            ("parseDate", self.parse_date),
            ("allowDate", self.allow_date),
            ("int32range", !self.int32range),
            ("comment", self.comment),
            (
                "removeAdditional",
                self.remove_additional != defaults.remove_additional,
            ),
            ("useDefaults", self.use_defaults != defaults.use_defaults),
            ("coerceTypes", self.coerce_types != defaults.coerce_types),
            ("validateSchema", self.validate_schema != defaults.validate_schema),
            ("inlineRefs", !self.inline_refs),
            ("passContext", self.pass_context),
            ("loopRequired", self.loop_required.is_some()),
            ("loopEnum", self.loop_enum.is_some()),
            ("ownProperties", self.own_properties),
            ("multipleOfPrecision", self.multiple_of_precision.is_some()),
            ("codeEs5", self.code_es5),
            ("codeEsm", self.code_esm),
            ("codeLines", self.code_lines),
            ("codeSource", self.code_source),
            ("codeOptimize", self.code_optimize != defaults.code_optimize),
        ]
        .into_iter()
        .filter_map(|(name, changed)| changed.then_some(name))
        .collect()
    }
}

/// Named inputs as received; `None` means the input was not provided.
///
/// `strict` sets every `strict*` option that is not given individually.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub strict: Option<LogToggle>,
    pub strict_schema: Option<LogToggle>,
    pub strict_numbers: Option<LogToggle>,
    pub strict_types: Option<LogToggle>,
    pub strict_tuples: Option<LogToggle>,
    pub strict_required: Option<LogToggle>,
    pub allow_union_types: Option<bool>,
    pub allow_matching_properties: Option<bool>,
    pub validate_formats: Option<bool>,
    pub all_errors: Option<bool>,
    pub verbose: Option<bool>,
    pub discriminator: Option<bool>,
    pub unicode_reg_exp: Option<bool>,
    pub timestamp: Option<TimestampMode>,
    pub parse_date: Option<bool>,
    pub allow_date: Option<bool>,
    pub int32range: Option<bool>,
    pub comment: Option<bool>,
    pub remove_additional: Option<RemoveAdditional>,
    pub use_defaults: Option<UseDefaults>,
    pub coerce_types: Option<CoerceTypes>,
    pub validate_schema: Option<LogToggle>,
    pub inline_refs: Option<bool>,
    pub pass_context: Option<bool>,
    pub loop_required: Option<u32>,
    pub loop_enum: Option<u32>,
    pub own_properties: Option<bool>,
    pub multiple_of_precision: Option<u32>,
    pub code_es5: Option<bool>,
    pub code_esm: Option<bool>,
    pub code_lines: Option<bool>,
    pub code_source: Option<bool>,
    pub code_optimize: Option<OptimizeLevel>,
    pub extra_formats: Option<bool>,
    pub draft: Option<SchemaDraft>,
}

impl ConfigOverrides {
    /// Resolves provided inputs over the defaults.
    pub fn resolve(self) -> ValidationConfiguration {
        let defaults = ValidationConfiguration::default();
        let strict = |field: Option<LogToggle>, default: LogToggle| {
            field.or(self.strict).unwrap_or(default)
        };

        ValidationConfiguration {
            strict_schema: strict(self.strict_schema, defaults.strict_schema),
            strict_numbers: strict(self.strict_numbers, defaults.strict_numbers),
            strict_types: strict(self.strict_types, defaults.strict_types),
            strict_tuples: strict(self.strict_tuples, defaults.strict_tuples),
            strict_required: strict(self.strict_required, defaults.strict_required),
            allow_union_types: self
                .allow_union_types
                .unwrap_or(defaults.allow_union_types),
            allow_matching_properties: self
                .allow_matching_properties
                .unwrap_or(defaults.allow_matching_properties),
            validate_formats: self.validate_formats.unwrap_or(defaults.validate_formats),
            all_errors: self.all_errors.unwrap_or(defaults.all_errors),
            verbose: self.verbose.unwrap_or(defaults.verbose),
            discriminator: self.discriminator.unwrap_or(defaults.discriminator),
            unicode_reg_exp: self.unicode_reg_exp.unwrap_or(defaults.unicode_reg_exp),
            timestamp: self.timestamp.or(defaults.timestamp),
            parse_date: self.parse_date.unwrap_or(defaults.parse_date),
            allow_date: self.allow_date.unwrap_or(defaults.allow_date),
            int32range: self.int32range.unwrap_or(defaults.int32range),
            comment: self.comment.unwrap_or(defaults.comment),
            remove_additional: self
                .remove_additional
                .unwrap_or(defaults.remove_additional),
            use_defaults: self.use_defaults.unwrap_or(defaults.use_defaults),
            coerce_types: self.coerce_types.unwrap_or(defaults.coerce_types),
            validate_schema: self.validate_schema.unwrap_or(defaults.validate_schema),
            inline_refs: self.inline_refs.unwrap_or(defaults.inline_refs),
            pass_context: self.pass_context.unwrap_or(defaults.pass_context),
            loop_required: self.loop_required.or(defaults.loop_required),
            loop_enum: self.loop_enum.or(defaults.loop_enum),
            own_properties: self.own_properties.unwrap_or(defaults.own_properties),
            multiple_of_precision: self
                .multiple_of_precision
                .or(defaults.multiple_of_precision),
            code_es5: self.code_es5.unwrap_or(defaults.code_es5),
            code_esm: self.code_esm.unwrap_or(defaults.code_esm),
            code_lines: self.code_lines.unwrap_or(defaults.code_lines),
            code_source: self.code_source.unwrap_or(defaults.code_source),
            code_optimize: self.code_optimize.unwrap_or(defaults.code_optimize),
            extra_formats: self.extra_formats.unwrap_or(defaults.extra_formats),
            draft: self.draft.unwrap_or(defaults.draft),
        }
    }
}
