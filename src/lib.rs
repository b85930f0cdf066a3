//! Validates JSON and YAML documents against a JSON Schema for CI jobs.
//!
//! Data and schema files are resolved from glob patterns, loaded in parallel,
//! and checked with the `jsonschema` engine. The outcome is reported as a
//! single `result` JSON value and an exit code.

pub mod action;
pub mod cmd;
pub mod domain;
pub mod engine;
pub mod io;
