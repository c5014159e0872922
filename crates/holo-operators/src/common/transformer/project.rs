use anyhow::{anyhow, Context};
use holo_sdk::{Operator, Result, Sample};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NAME: &str = "project";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Output columns, in order
    pub columns: Vec<String>,
    /// Output column -> source column, for columns filled from another field
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Builds a fresh sample holding exactly the configured columns.
pub struct ProjectTransformer {
    config: ProjectConfig,
}

impl ProjectTransformer {
    pub fn new(config: ProjectConfig) -> Self {
        Self { config }
    }
}

impl Operator for ProjectTransformer {
    fn process(&self, sample: Sample) -> Result<Option<Sample>> {
        let mut projected = Sample::new();
        for col in &self.config.columns {
            let source = self.config.aliases.get(col).unwrap_or(col);
            let value = sample
                .get(source)
                .ok_or_else(|| anyhow!("Projection source column not found: {}", source))?;
            projected.set_value(col.as_str(), value.clone());
        }
        Ok(Some(projected))
    }
}

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: ProjectConfig = serde_yaml::from_value(config.clone())
            .with_context(|| format!("Invalid {} config", NAME))?;
        if config.columns.is_empty() {
            anyhow::bail!("{} needs at least one column", NAME);
        }
        Ok(Box::new(ProjectTransformer::new(config)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_configured_columns_in_order() {
        let op = ProjectTransformer::new(ProjectConfig {
            columns: vec!["b".into(), "a".into()],
            aliases: BTreeMap::new(),
        });
        let sample = Sample::from_value(json!({"a": 1, "b": null, "scratch": 3})).unwrap();

        let out = op.process(sample).unwrap().unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["b", "a"]);
        assert!(out.get("scratch").is_none());
    }

    #[test]
    fn aliases_pull_values_from_another_column() {
        let op = ProjectTransformer::new(ProjectConfig {
            columns: vec!["mass".into()],
            aliases: BTreeMap::from([("mass".to_string(), "mass_numeric".to_string())]),
        });
        let sample = Sample::from_value(json!({"mass": "1,358", "mass_numeric": 1358.0})).unwrap();

        let out = op.process(sample).unwrap().unwrap();
        assert_eq!(out.get_f64("mass"), Some(1358.0));
    }

    #[test]
    fn absent_source_column_is_an_error() {
        let op = ProjectTransformer::new(ProjectConfig {
            columns: vec!["name".into()],
            aliases: BTreeMap::new(),
        });
        assert!(op.process(Sample::new()).is_err());
    }
}
