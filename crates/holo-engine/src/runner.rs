use crate::io::fetch::{fetch_all, HttpPageSource, PageSource};
use crate::io::snapshot::write_snapshot;
use crate::plan::{Plan, ProcessingStatistics};
use crate::spec::{ExtractSpec, PipelineSpec};
use chrono::{DateTime, Local, TimeZone};
use holo_sdk::{OperatorRegistry, Result};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::info;

/// Registry with every built-in operator.
pub fn default_registry() -> Result<OperatorRegistry> {
    let mut registry = OperatorRegistry::new();
    holo_operators::register_all(&mut registry)?;
    Ok(registry)
}

pub fn run_pipeline(spec: PipelineSpec, registry: &OperatorRegistry) -> Result<ProcessingStatistics> {
    let plan = Plan::compile(spec, registry)?.with_progress(true);
    plan.execute()
}

/// Pull every record from the configured API into a timestamped raw snapshot.
pub fn run_extract(extract: &ExtractSpec) -> Result<PathBuf> {
    let source = HttpPageSource::new()?;
    extract_with(&source, extract, &Local::now())
}

pub fn extract_with<Tz: TimeZone>(
    source: &dyn PageSource,
    extract: &ExtractSpec,
    at: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz::Offset: Display,
{
    let records = fetch_all(source, &extract.url)?;
    let path = write_snapshot(Path::new(&extract.output_dir), &records, at)?;
    info!(path = %path.display(), records = records.len(), "wrote raw snapshot");
    Ok(path)
}
