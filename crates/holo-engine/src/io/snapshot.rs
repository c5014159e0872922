use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SNAPSHOT_PREFIX: &str = "people";

pub fn snapshot_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    format!("{}_{}.json", SNAPSHOT_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// Write raw records as an indented JSON array into `dir`, named after the
/// capture time. Returns the path written.
pub fn write_snapshot<Tz: TimeZone>(
    dir: &Path,
    records: &[Value],
    at: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz::Offset: Display,
{
    if records.is_empty() {
        anyhow::bail!("Refusing to write an empty snapshot");
    }

    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    let path = dir.join(snapshot_file_name(at));

    let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    records.serialize(&mut serializer)?;
    writer.flush()?;

    Ok(path)
}
