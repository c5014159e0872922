use anyhow::{anyhow, Context};
use holo_sdk::{impl_filter_operator, BaseFilter, Field, Result, Sample};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "numeric_range_filter";

/// What to do with a sample whose column holds no number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Missing never satisfies the bound.
    Drop,
    #[default]
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericRangeConfig {
    pub col: String,
    pub upper_bound: f64,
    #[serde(default = "default_true")]
    pub upper_inclusive: bool,
    #[serde(default)]
    pub missing: MissingPolicy,
}

fn default_true() -> bool {
    true
}

pub struct NumericRangeFilter {
    config: NumericRangeConfig,
}

impl NumericRangeFilter {
    pub fn new(config: NumericRangeConfig) -> Self {
        Self { config }
    }

    /// NaN never passes.
    fn in_range(&self, value: f64) -> bool {
        if self.config.upper_inclusive {
            value <= self.config.upper_bound
        } else {
            value < self.config.upper_bound
        }
    }
}

impl BaseFilter for NumericRangeFilter {
    fn keep(&self, sample: &Sample) -> Result<bool> {
        let value = match sample.field_f64(&self.config.col) {
            Field::Value(v) => v,
            Field::Missing => {
                return match self.config.missing {
                    MissingPolicy::Drop => Ok(false),
                    MissingPolicy::Error => {
                        Err(anyhow!("Missing numeric field: {}", self.config.col))
                    }
                }
            }
        };

        Ok(self.in_range(value))
    }
}

impl_filter_operator!(NumericRangeFilter);

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: NumericRangeConfig = serde_yaml::from_value(config.clone())
            .with_context(|| format!("Invalid {} config", NAME))?;
        Ok(Box::new(NumericRangeFilter::new(config)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_sdk::Operator;
    use serde_json::json;

    fn filter(upper: f64, inclusive: bool, missing: MissingPolicy) -> NumericRangeFilter {
        NumericRangeFilter::new(NumericRangeConfig {
            col: "x".to_string(),
            upper_bound: upper,
            upper_inclusive: inclusive,
            missing,
        })
    }

    fn sample(value: serde_json::Value) -> Sample {
        Sample::from_value(json!({ "x": value })).unwrap()
    }

    #[test]
    fn inclusive_upper_bound_keeps_the_boundary() {
        let f = filter(1000.0, true, MissingPolicy::Drop);
        assert!(f.process(sample(json!(1000.0))).unwrap().is_some());
        assert!(f.process(sample(json!(1000.5))).unwrap().is_none());
    }

    #[test]
    fn exclusive_upper_bound_drops_the_boundary() {
        let f = filter(3.0, false, MissingPolicy::Drop);
        assert!(f.process(sample(json!(2))).unwrap().is_some());
        assert!(f.process(sample(json!(3))).unwrap().is_none());
    }

    #[test]
    fn missing_policy_decides_null_values() {
        let null = || sample(serde_json::Value::Null);
        assert!(filter(1.0, true, MissingPolicy::Drop)
            .process(null())
            .unwrap()
            .is_none());
        assert!(filter(1.0, true, MissingPolicy::Error).process(null()).is_err());
    }

    #[test]
    fn infinities_compare_against_the_bound() {
        let f = filter(1000.0, true, MissingPolicy::Drop);
        assert!(f.process(sample(json!("-inf"))).unwrap().is_some());
        assert!(f.process(sample(json!("inf"))).unwrap().is_none());
    }

    #[test]
    fn bound_is_required() {
        let config: serde_yaml::Value = serde_yaml::from_str("col: x").unwrap();
        let mut registry = holo_sdk::OperatorRegistry::new();
        register(&mut registry);
        assert!(registry.build(NAME, &config).is_err());
    }

    #[test]
    fn registers_from_yaml() {
        let mut registry = holo_sdk::OperatorRegistry::new();
        register(&mut registry);
        let config: serde_yaml::Value =
            serde_yaml::from_str("col: x\nupper_bound: 1000\nmissing: drop").unwrap();
        let op = registry.build(NAME, &config).unwrap();
        assert!(op.process(sample(json!(77))).unwrap().is_some());
        assert!(op.process(sample(json!(1358))).unwrap().is_none());
    }
}
