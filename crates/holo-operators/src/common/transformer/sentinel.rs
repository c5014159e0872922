use anyhow::Context;
use holo_sdk::{Operator, Result, Sample};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "sentinel_normalize";

pub const DEFAULT_SENTINELS: [&str; 2] = ["unknown", "n/a"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentinelConfig {
    pub columns: Vec<String>,
    #[serde(default = "default_sentinels")]
    pub sentinels: Vec<String>,
}

pub fn default_sentinels() -> Vec<String> {
    DEFAULT_SENTINELS.iter().map(|s| s.to_string()).collect()
}

/// Replaces placeholder strings with null. Matching is exact: no trimming,
/// no case folding.
pub struct SentinelNormalizer {
    config: SentinelConfig,
}

impl SentinelNormalizer {
    pub fn new(config: SentinelConfig) -> Self {
        Self { config }
    }

    pub fn is_sentinel(&self, value: &str) -> bool {
        self.config.sentinels.iter().any(|s| s == value)
    }
}

impl Operator for SentinelNormalizer {
    fn process(&self, mut sample: Sample) -> Result<Option<Sample>> {
        for col in &self.config.columns {
            let hit = sample.get_str(col).is_some_and(|v| self.is_sentinel(v));
            if hit {
                sample.set_null(col.as_str());
            }
        }
        Ok(Some(sample))
    }
}

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: SentinelConfig = serde_yaml::from_value(config.clone())
            .with_context(|| format!("Invalid {} config", NAME))?;
        Ok(Box::new(SentinelNormalizer::new(config)))
    });
}
