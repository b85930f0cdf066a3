use std::io::{Read, Write};

use serde_json::Value;

use crate::io::IoError;

pub fn read_json<R: Read>(reader: R) -> Result<Value, IoError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_json<W: Write>(writer: W, value: &Value) -> Result<(), IoError> {
    serde_json::to_writer(writer, value)?;
    Ok(())
}
