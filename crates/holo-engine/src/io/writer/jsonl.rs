use super::Writer;
use anyhow::Context;
use holo_sdk::Sample;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct JsonlWriter {
    writer: BufWriter<File>,
    columns: Vec<String>,
    buffer: Vec<Sample>,
    partition_size: usize,
    path: PathBuf,          // Store path for potential deletion
    samples_written: usize, // Track number of samples written
}

impl JsonlWriter {
    /// An empty `columns` list writes every key of each sample as-is.
    pub fn new(path: &Path, columns: Vec<String>) -> anyhow::Result<Self> {
        let output_file =
            File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
        Ok(Self {
            writer: BufWriter::new(output_file),
            columns,
            buffer: Vec::new(),
            partition_size: 50000,
            path: path.to_path_buf(),
            samples_written: 0,
        })
    }

    fn project(&self, sample: &Sample) -> serde_json::Value {
        if self.columns.is_empty() {
            return sample.as_value().clone();
        }
        let mut projected = Sample::new();
        for col in &self.columns {
            let value = sample.get(col).cloned().unwrap_or_default();
            projected.set_value(col.as_str(), value);
        }
        projected.into_value()
    }

    /// Flush buffer to disk
    fn flush(&mut self) -> anyhow::Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        // One write call per buffer instead of one per sample
        let mut output = String::with_capacity(self.buffer.len() * 200);
        for sample in &self.buffer {
            let json_str = serde_json::to_string(&self.project(sample))?;
            output.push_str(&json_str);
            output.push('\n');
        }

        self.writer.write_all(output.as_bytes())?;
        self.samples_written += self.buffer.len();
        self.buffer.clear();
        Ok(())
    }
}

impl Writer for JsonlWriter {
    fn write_sample(&mut self, sample: Sample) -> anyhow::Result<()> {
        self.buffer.push(sample);

        if self.buffer.len() >= self.partition_size {
            self.flush()?;
        }

        Ok(())
    }

    fn close(mut self: Box<Self>) -> anyhow::Result<bool> {
        self.flush()?;
        self.writer.flush()?;
        let has_data = self.samples_written > 0;

        // If no data was written, delete the file
        if !has_data {
            drop(self.writer);
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!(path = %self.path.display(), "failed to remove empty output: {}", e);
            }
        }

        Ok(has_data)
    }
}
