use anyhow::Context;
use holo_sdk::{impl_annotator_operator, BaseAnnotator, Field, Result, Sample};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "birth_year_annotator";

/// Before the Battle of Yavin. The only unit the deriver understands.
pub const BBY: &str = "BBY";

/// Absolute year that "0BBY" maps to.
pub const EPOCH_YEAR: f64 = 2000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthYearConfig {
    #[serde(default = "default_input_col")]
    pub input_col: String,
    #[serde(default = "default_output_col")]
    pub output_col: String,
}

fn default_input_col() -> String {
    super::BIRTH_YEAR.to_string()
}

fn default_output_col() -> String {
    super::NORMALIZED_BIRTH_YEAR.to_string()
}

impl Default for BirthYearConfig {
    fn default() -> Self {
        Self {
            input_col: default_input_col(),
            output_col: default_output_col(),
        }
    }
}

/// `"19BBY"` -> `1981.0`. Anything without the `BBY` marker, or whose
/// remainder is not a number, is missing.
pub fn normalize_birth_year(raw: Field<&str>) -> Field<f64> {
    raw.and_then(|text| {
        if !text.contains(BBY) {
            return Field::Missing;
        }
        Field::<f64>::parse_f64(&text.replace(BBY, "")).map(|years| EPOCH_YEAR - years)
    })
}

pub struct BirthYearAnnotator {
    config: BirthYearConfig,
}

impl BirthYearAnnotator {
    pub fn new(config: BirthYearConfig) -> Self {
        Self { config }
    }
}

impl BaseAnnotator for BirthYearAnnotator {
    fn annotate(&self, sample: &mut Sample) -> Result<()> {
        let year = normalize_birth_year(sample.field_str(&self.config.input_col));
        sample.set_field_f64(&self.config.output_col, year);
        Ok(())
    }
}

impl_annotator_operator!(BirthYearAnnotator);

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: BirthYearConfig = if config.is_null() {
            BirthYearConfig::default()
        } else {
            serde_yaml::from_value(config.clone())
                .with_context(|| format!("Invalid {} config", NAME))?
        };
        Ok(Box::new(BirthYearAnnotator::new(config)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_sdk::Operator;
    use serde_json::json;

    #[test]
    fn converts_bby_years() {
        assert_eq!(normalize_birth_year(Field::Value("19BBY")), Field::Value(1981.0));
        assert_eq!(normalize_birth_year(Field::Value("0BBY")), Field::Value(2000.0));
        assert_eq!(normalize_birth_year(Field::Value("896BBY")), Field::Value(1104.0));
        let frac = normalize_birth_year(Field::Value("41.9BBY")).into_option().unwrap();
        assert!((frac - 1958.1).abs() < 1e-9);
    }

    #[test]
    fn implausible_years_pass_through() {
        assert_eq!(
            normalize_birth_year(Field::Value("2500BBY")),
            Field::Value(-500.0)
        );
    }

    #[test]
    fn infinite_years_are_not_range_checked() {
        assert_eq!(
            normalize_birth_year(Field::Value("-infBBY")),
            Field::Value(f64::INFINITY)
        );
        let op = BirthYearAnnotator::new(BirthYearConfig::default());
        let sample = Sample::from_value(json!({"birth_year": "-infBBY"})).unwrap();
        let out = op.process(sample).unwrap().unwrap();
        assert_eq!(out.get_str("normalized_birth_year"), Some("inf"));
        assert_eq!(out.get_f64("normalized_birth_year"), Some(f64::INFINITY));
    }

    #[test]
    fn missing_or_foreign_units_are_missing() {
        assert_eq!(normalize_birth_year(Field::Missing), Field::Missing);
        assert_eq!(normalize_birth_year(Field::Value("19")), Field::Missing);
        assert_eq!(normalize_birth_year(Field::Value("5ABY")), Field::Missing);
        assert_eq!(normalize_birth_year(Field::Value("bby")), Field::Missing);
    }

    #[test]
    fn unparseable_remainder_is_missing() {
        assert_eq!(normalize_birth_year(Field::Value("BBY")), Field::Missing);
        assert_eq!(normalize_birth_year(Field::Value("about 19BBY")), Field::Missing);
    }

    #[test]
    fn annotator_writes_null_for_missing_years() {
        let op = BirthYearAnnotator::new(BirthYearConfig::default());
        let sample = Sample::from_value(json!({"birth_year": null})).unwrap();
        let out = op.process(sample).unwrap().unwrap();
        assert_eq!(out.get("normalized_birth_year"), Some(&serde_json::Value::Null));

        let sample = Sample::from_value(json!({"birth_year": "19BBY"})).unwrap();
        let out = op.process(sample).unwrap().unwrap();
        assert_eq!(out.get_f64("normalized_birth_year"), Some(1981.0));
    }
}
