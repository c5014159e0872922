use anyhow::Context;
use holo_sdk::{impl_annotator_operator, BaseAnnotator, Result, Sample};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "completeness_annotator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessConfig {
    pub columns: Vec<String>,
    #[serde(default = "default_output_col")]
    pub output_col: String,
}

fn default_output_col() -> String {
    "missing_field_count".to_string()
}

/// Counts how many of `columns` are absent or null.
pub struct CompletenessAnnotator {
    config: CompletenessConfig,
}

impl CompletenessAnnotator {
    pub fn new(config: CompletenessConfig) -> Self {
        Self { config }
    }
}

pub fn count_missing(sample: &Sample, columns: &[String]) -> usize {
    columns
        .iter()
        .filter(|col| sample.get(col).map_or(true, |v| v.is_null()))
        .count()
}

impl BaseAnnotator for CompletenessAnnotator {
    fn annotate(&self, sample: &mut Sample) -> Result<()> {
        let missing = count_missing(sample, &self.config.columns);
        sample.set_i64(&self.config.output_col, missing as i64);
        Ok(())
    }
}

impl_annotator_operator!(CompletenessAnnotator);

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: CompletenessConfig = serde_yaml::from_value(config.clone())
            .with_context(|| format!("Invalid {} config", NAME))?;
        Ok(Box::new(CompletenessAnnotator::new(config)))
    });
}
