use std::path::{Path, PathBuf};

use crate::spec::{SinkKind, SinkSpec, SourceKind};

// Reader trait and implementations
pub mod reader;

pub use reader::{json::JsonArrayReader, jsonl::JsonlReader, multi_file::MultiFileReader, Reader};

// Writer trait and implementations
pub mod writer;

pub use writer::{csv::CsvWriter, jsonl::JsonlWriter, Writer};

// Collaborators around the pipeline: discovery, extraction, raw snapshots
pub mod discover;
pub mod fetch;
pub mod snapshot;

/// Factory for creating readers based on source configuration
pub struct ReaderFactory;

impl ReaderFactory {
    pub fn create_one(kind: SourceKind, path: &Path) -> anyhow::Result<Box<dyn Reader>> {
        let reader: Box<dyn Reader> = match kind {
            SourceKind::Json => Box::new(JsonArrayReader::new(path)?),
            SourceKind::Jsonl => Box::new(JsonlReader::new(path)?),
        };
        Ok(reader)
    }

    /// One reader over all `paths`, read back to back in the given order
    pub fn create(kind: SourceKind, paths: &[PathBuf]) -> anyhow::Result<Box<dyn Reader>> {
        match paths {
            [single] => Self::create_one(kind, single),
            _ => {
                let readers = paths
                    .iter()
                    .map(|p| Self::create_one(kind, p))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                Ok(Box::new(MultiFileReader::new(readers)?))
            }
        }
    }
}

/// Factory for creating writers based on sink configuration
pub struct WriterFactory;

impl WriterFactory {
    pub fn create(
        kind: SinkKind,
        path: &Path,
        columns: Vec<String>,
    ) -> anyhow::Result<Box<dyn Writer>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let writer: Box<dyn Writer> = match kind {
            SinkKind::Csv => Box::new(CsvWriter::new(path, columns)?),
            SinkKind::Jsonl => Box::new(JsonlWriter::new(path, columns)?),
        };
        Ok(writer)
    }
}

/// Where the sink writes for a given input. A uri ending in the sink's
/// extension is used as-is; anything else is a directory that receives
/// `<input stem>.<ext>`.
pub fn output_path(sink: &SinkSpec, input: &Path) -> PathBuf {
    let ext = sink.kind.extension();
    if sink.uri.ends_with(&format!(".{}", ext)) {
        return PathBuf::from(&sink.uri);
    }
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    Path::new(&sink.uri).join(format!("{}.{}", stem, ext))
}
