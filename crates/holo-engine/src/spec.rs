use anyhow::{Context, Result};
use holo_operators::person::TransformOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_EXTRACT_URL: &str = "https://swapi.dev/api/people/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    pub name: String,
    pub source: SourceSpec,
    #[serde(default)]
    pub transform: TransformOptions,
    pub sink: SinkSpec,
    #[serde(default)]
    pub extract: Option<ExtractSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A single JSON array of records
    Json,
    /// One JSON record per line
    Jsonl,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub kind: SourceKind,
    /// File paths or glob patterns
    pub uris: Vec<String>,
    /// Only read the most recently modified match
    #[serde(default)]
    pub latest: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Csv,
    Jsonl,
}

impl SinkKind {
    pub fn extension(self) -> &'static str {
        match self {
            SinkKind::Csv => "csv",
            SinkKind::Jsonl => "jsonl",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkSpec {
    pub kind: SinkKind,
    /// Output file, or a directory to write `<input stem>.<ext>` into
    pub uri: String,
    /// Also write the samples each filter removed under `<dir>/trace/step_XX/`
    #[serde(default)]
    pub trace: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractSpec {
    #[serde(default = "default_extract_url")]
    pub url: String,
    pub output_dir: String,
}

fn default_extract_url() -> String {
    DEFAULT_EXTRACT_URL.to_string()
}

impl PipelineSpec {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let spec: PipelineSpec =
            serde_yaml::from_str(content).context("Failed to parse YAML configuration")?;

        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.uris.is_empty() {
            anyhow::bail!("Pipeline '{}' has no source uris", self.name);
        }
        if let Some(blank) = self.source.uris.iter().find(|u| u.trim().is_empty()) {
            anyhow::bail!("Pipeline '{}' has a blank source uri: {:?}", self.name, blank);
        }
        if self.sink.uri.trim().is_empty() {
            anyhow::bail!("Pipeline '{}' has no sink uri", self.name);
        }
        if let Some(extract) = &self.extract {
            if extract.output_dir.trim().is_empty() {
                anyhow::bail!("Pipeline '{}' has an extract block without output_dir", self.name);
            }
        }
        self.transform
            .validate()
            .with_context(|| format!("Invalid transform options in pipeline '{}'", self.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_operators::person::{GenderMatching, MassColumn};

    const FULL: &str = r#"
name: swapi-people
source:
  kind: json
  uris: ["local_output/raw/*.json"]
  latest: true
transform:
  sentinels: ["unknown", "n/a", "none"]
  gender_matching: case_sensitive
  mass_column: numeric
  max_mass: 500
  completeness_threshold: 2
sink:
  kind: csv
  uri: local_output/processed/
  trace: true
extract:
  output_dir: local_output/raw
"#;

    #[test]
    fn parses_full_spec() {
        let spec = PipelineSpec::from_yaml_str(FULL).unwrap();
        assert_eq!(spec.source.kind, SourceKind::Json);
        assert!(spec.source.latest);
        assert_eq!(spec.transform.sentinels.len(), 3);
        assert_eq!(spec.transform.gender_matching, GenderMatching::CaseSensitive);
        assert_eq!(spec.transform.mass_column, MassColumn::Numeric);
        assert_eq!(spec.transform.max_mass, 500.0);
        assert_eq!(spec.transform.completeness_threshold, 2);
        assert_eq!(spec.sink.kind, SinkKind::Csv);
        assert!(spec.sink.trace);
        assert_eq!(spec.extract.unwrap().url, DEFAULT_EXTRACT_URL);
    }

    #[test]
    fn transform_defaults_to_canonical_behavior() {
        let spec = PipelineSpec::from_yaml_str(
            "name: p\nsource: {kind: jsonl, uris: [in.jsonl]}\nsink: {kind: csv, uri: out.csv}\n",
        )
        .unwrap();
        assert_eq!(spec.transform, TransformOptions::default());
        assert!(!spec.source.latest);
        assert!(!spec.sink.trace);
        assert!(spec.extract.is_none());
    }

    #[test]
    fn rejects_empty_sources_and_bad_options() {
        let no_uris = "name: p\nsource: {kind: json, uris: []}\nsink: {kind: csv, uri: out.csv}\n";
        assert!(PipelineSpec::from_yaml_str(no_uris).is_err());

        let bad_threshold = "name: p\nsource: {kind: json, uris: [a.json]}\n\
                             transform: {completeness_threshold: 9}\n\
                             sink: {kind: csv, uri: out.csv}\n";
        assert!(PipelineSpec::from_yaml_str(bad_threshold).is_err());

        let unknown_kind = "name: p\nsource: {kind: xml, uris: [a.xml]}\nsink: {kind: csv, uri: o}\n";
        assert!(PipelineSpec::from_yaml_str(unknown_kind).is_err());
    }
}
