use std::io::{Read, Write};

use serde_json::Value;

use crate::io::IoError;

/// Reads a single YAML document. Mapping keys must be representable as JSON
/// object keys, so the document is routed through `serde_yaml::Value` first.
pub fn read_yaml<R: Read>(reader: R) -> Result<Value, IoError> {
    let yaml_value: serde_yaml::Value = serde_yaml::from_reader(reader)?;
    Ok(serde_json::to_value(yaml_value)?)
}

pub fn write_yaml<W: Write>(writer: W, value: &Value) -> Result<(), IoError> {
    serde_yaml::to_writer(writer, value)?;
    Ok(())
}
