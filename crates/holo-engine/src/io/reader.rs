use holo_sdk::Sample;

/// Unified reader trait for record sources
/// Returns samples one by one (generator-like API). Elements that are not
/// JSON objects are passed through so schema validation can report them.
pub trait Reader: Iterator<Item = anyhow::Result<Sample>> + Send {}

pub mod json;
pub mod jsonl;
pub mod multi_file;
