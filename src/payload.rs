//! Payload envelope: the JSON object handed from stage to stage.
//!
//! Each stage reads the whole payload, derives a handful of new fields, and
//! emits the original object with those fields merged in. Fields a stage does
//! not recognize pass through untouched, so stages can run in any host that
//! chains JSON items.

use crate::Result;
use anyhow::{Context, bail};
use serde_json::{Map, Value};

pub type Payload = Map<String, Value>;

pub fn read_payload(path: &str) -> Result<Payload> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read payload {}", path))?;
    let value: Value =
        serde_json::from_str(&text).with_context(|| format!("parse payload {}", path))?;

    match value {
        Value::Object(map) => Ok(map),
        other => bail!("payload must be a JSON object, got {}", json_kind(&other)),
    }
}

/// Write the payload to `out`, or pretty-print it to stdout when no path was
/// given (useful when stages are piped together).
pub fn write_payload(payload: &Payload, out: Option<&str>) -> Result<()> {
    let text = serde_json::to_string_pretty(payload)?;
    match out {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("write payload {}", path))?
        }
        None => println!("{}", text),
    }
    Ok(())
}

pub fn str_field<'a>(payload: &'a Payload, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(Value::as_str)
}

pub fn project_name(payload: &Payload) -> &str {
    str_field(payload, "project_name").unwrap_or("Hardware_Project")
}

pub fn system_type(payload: &Payload) -> &str {
    str_field(payload, "system_type").unwrap_or("Digital_Controller")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
