use anyhow::Context;
use holo_sdk::{impl_annotator_operator, BaseAnnotator, Field, Result, Sample};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "mass_annotator";

/// Kilogram to pound factor. Kept at five decimals so output matches the
/// published datasets byte for byte.
pub const LB_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassConfig {
    #[serde(default = "default_input_col")]
    pub input_col: String,
    #[serde(default = "default_numeric_col")]
    pub numeric_col: String,
    #[serde(default = "default_output_col")]
    pub output_col: String,
}

fn default_input_col() -> String {
    super::MASS.to_string()
}

fn default_numeric_col() -> String {
    super::MASS_NUMERIC.to_string()
}

fn default_output_col() -> String {
    super::MASS_LB.to_string()
}

impl Default for MassConfig {
    fn default() -> Self {
        Self {
            input_col: default_input_col(),
            numeric_col: default_numeric_col(),
            output_col: default_output_col(),
        }
    }
}

/// `"1,358"` -> `1358.0`. Commas are thousands separators only.
pub fn parse_mass(raw: Field<&str>) -> Field<f64> {
    raw.and_then(|text| Field::<f64>::parse_f64(&text.replace(',', "")))
}

pub fn to_pounds(kg: f64) -> f64 {
    kg * LB_PER_KG
}

/// Writes the parsed mass and its pound conversion. The source column is
/// left untouched.
pub struct MassAnnotator {
    config: MassConfig,
}

impl MassAnnotator {
    pub fn new(config: MassConfig) -> Self {
        Self { config }
    }
}

impl BaseAnnotator for MassAnnotator {
    fn annotate(&self, sample: &mut Sample) -> Result<()> {
        let numeric = parse_mass(sample.field_str(&self.config.input_col));
        sample.set_field_f64(&self.config.numeric_col, numeric);
        sample.set_field_f64(&self.config.output_col, numeric.map(to_pounds));
        Ok(())
    }
}

impl_annotator_operator!(MassAnnotator);

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: MassConfig = if config.is_null() {
            MassConfig::default()
        } else {
            serde_yaml::from_value(config.clone())
                .with_context(|| format!("Invalid {} config", NAME))?
        };
        Ok(Box::new(MassAnnotator::new(config)))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use holo_sdk::Operator;
    use serde_json::{json, Value};

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_mass(Field::Value("1,358")), Field::Value(1358.0));
        assert_eq!(parse_mass(Field::Value("78.2")), Field::Value(78.2));
    }

    #[test]
    fn garbage_and_missing_stay_missing() {
        assert_eq!(parse_mass(Field::Missing), Field::Missing);
        assert_eq!(parse_mass(Field::Value("heavy")), Field::Missing);
        assert_eq!(parse_mass(Field::Value("")), Field::Missing);
    }

    #[test]
    fn infinite_masses_parse() {
        assert_eq!(parse_mass(Field::Value("-inf")), Field::Value(f64::NEG_INFINITY));
        assert_eq!(parse_mass(Field::Value("-1e400")), Field::Value(f64::NEG_INFINITY));
        assert_eq!(parse_mass(Field::Value("1,000e400")), Field::Value(f64::INFINITY));
    }

    #[test]
    fn pounds_use_the_fixed_factor() {
        for kg in [0.0, 1.0, 77.0, 136.0, 1358.0] {
            assert_eq!(to_pounds(kg), kg * 2.20462);
        }
        assert!((to_pounds(77.0) - 169.75574).abs() < 1e-9);
    }

    #[test]
    fn annotator_keeps_raw_mass_and_adds_derived_columns() {
        let op = MassAnnotator::new(MassConfig::default());
        let sample = Sample::from_value(json!({"mass": "1,358"})).unwrap();
        let out = op.process(sample).unwrap().unwrap();
        assert_eq!(out.get_str("mass"), Some("1,358"));
        assert_eq!(out.get_f64("mass_numeric"), Some(1358.0));
        assert_eq!(out.get_f64("mass_lb"), Some(1358.0 * LB_PER_KG));

        let sample = Sample::from_value(json!({"mass": null})).unwrap();
        let out = op.process(sample).unwrap().unwrap();
        assert_eq!(out.get("mass_numeric"), Some(&Value::Null));
        assert_eq!(out.get("mass_lb"), Some(&Value::Null));
    }
}
