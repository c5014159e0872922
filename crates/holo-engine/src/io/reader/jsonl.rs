use super::Reader;
use anyhow::Context;
use holo_sdk::Sample;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

pub struct JsonlReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_no: usize,
}

impl JsonlReader {
    pub fn new(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_no: 0,
        })
    }
}

impl Iterator for JsonlReader {
    type Item = anyhow::Result<Sample>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(anyhow::anyhow!("Failed to read line: {}", e))),
            };
            self.line_no += 1;

            // Blank lines carry no record
            if line.trim().is_empty() {
                continue;
            }

            return Some(
                serde_json::from_str::<Value>(&line)
                    .map(Sample)
                    .with_context(|| {
                        format!("Failed to parse JSON at {:?} line {}", self.path, self.line_no)
                    }),
            );
        }
    }
}

impl Reader for JsonlReader {}
