use super::Reader;
use anyhow::{Context, Result};
use holo_sdk::Sample;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a file holding one JSON array of records, the shape the extractor
/// writes its raw snapshots in.
pub struct JsonArrayReader {
    records: std::vec::IntoIter<Value>,
}

impl JsonArrayReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse JSON in {:?}", path))?;

        let records = match value {
            Value::Array(records) => records,
            other => anyhow::bail!(
                "Expected a JSON array of records in {:?}, found {}",
                path,
                kind_of(&other)
            ),
        };

        Ok(Self {
            records: records.into_iter(),
        })
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "an object",
        Value::Array(_) => "an array",
        Value::String(_) => "a string",
        Value::Number(_) => "a number",
        Value::Bool(_) => "a bool",
        Value::Null => "null",
    }
}

impl Iterator for JsonArrayReader {
    type Item = Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|value| Ok(Sample(value)))
    }
}

impl Reader for JsonArrayReader {}
