//! Person records: the eight required string fields, the columns derived
//! from them, and the fixed stage order that turns one into the other.

pub mod birth_year;
pub mod gender;
pub mod mass;

use crate::common::annotator::completeness::{self, CompletenessConfig};
use crate::common::filter::numeric_range_filter::{self, MissingPolicy, NumericRangeConfig};
use crate::common::transformer::project::{self, ProjectConfig};
use crate::common::transformer::sentinel::{self, SentinelConfig};
use anyhow::Context;
use holo_sdk::{OperatorRegistry, RecordSchema, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use gender::GenderMatching;

pub const NAME: &str = "name";
pub const HEIGHT: &str = "height";
pub const MASS: &str = "mass";
pub const HAIR_COLOR: &str = "hair_color";
pub const SKIN_COLOR: &str = "skin_color";
pub const EYE_COLOR: &str = "eye_color";
pub const BIRTH_YEAR: &str = "birth_year";
pub const GENDER: &str = "gender";

pub const NORMALIZED_BIRTH_YEAR: &str = "normalized_birth_year";
pub const MASS_NUMERIC: &str = "mass_numeric";
pub const MASS_LB: &str = "mass_lb";
pub const GENDER_ID: &str = "gender_id";
pub const MISSING_FIELD_COUNT: &str = "missing_field_count";

pub const REQUIRED_FIELDS: [&str; 8] = [
    NAME, HEIGHT, MASS, HAIR_COLOR, SKIN_COLOR, EYE_COLOR, BIRTH_YEAR, GENDER,
];

pub const OUTPUT_COLUMNS: [&str; 11] = [
    NAME,
    HEIGHT,
    MASS,
    HAIR_COLOR,
    SKIN_COLOR,
    EYE_COLOR,
    BIRTH_YEAR,
    GENDER,
    NORMALIZED_BIRTH_YEAR,
    MASS_LB,
    GENDER_ID,
];

pub fn schema() -> RecordSchema {
    RecordSchema::new(REQUIRED_FIELDS)
}

/// Which value the emitted `mass` column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassColumn {
    /// The post-normalization source string, e.g. `"1,358"`.
    #[default]
    Raw,
    /// The parsed number, e.g. `1358.0`.
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformOptions {
    #[serde(default = "sentinel::default_sentinels")]
    pub sentinels: Vec<String>,
    #[serde(default)]
    pub gender_matching: GenderMatching,
    #[serde(default)]
    pub mass_column: MassColumn,
    #[serde(default = "default_max_mass")]
    pub max_mass: f64,
    /// Records with this many missing required fields or more are dropped.
    #[serde(default = "default_completeness_threshold")]
    pub completeness_threshold: usize,
}

fn default_max_mass() -> f64 {
    1000.0
}

fn default_completeness_threshold() -> usize {
    3
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            sentinels: sentinel::default_sentinels(),
            gender_matching: GenderMatching::default(),
            mass_column: MassColumn::default(),
            max_mass: default_max_mass(),
            completeness_threshold: default_completeness_threshold(),
        }
    }
}

impl TransformOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.max_mass.is_finite() {
            anyhow::bail!("max_mass must be a finite number, got {}", self.max_mass);
        }
        if self.completeness_threshold == 0 || self.completeness_threshold > REQUIRED_FIELDS.len()
        {
            anyhow::bail!(
                "completeness_threshold must be between 1 and {}, got {}",
                REQUIRED_FIELDS.len(),
                self.completeness_threshold
            );
        }
        Ok(())
    }
}

/// One step of the pipeline: a display name, the registry operator that
/// implements it, and that operator's config.
#[derive(Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: &'static str,
    pub operator: &'static str,
    pub config: serde_yaml::Value,
}

impl Stage {
    fn new<C: Serialize>(name: &'static str, operator: &'static str, config: &C) -> Result<Self> {
        let config = serde_yaml::to_value(config)
            .with_context(|| format!("Failed to encode config for stage {}", name))?;
        Ok(Self {
            name,
            operator,
            config,
        })
    }
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// The canonical stage list. Order matters: the mass filter must run before
/// completeness is counted, and projection always runs last.
pub fn stages(options: &TransformOptions) -> Result<Vec<Stage>> {
    options.validate()?;

    let mut aliases = BTreeMap::new();
    if options.mass_column == MassColumn::Numeric {
        aliases.insert(MASS.to_string(), MASS_NUMERIC.to_string());
    }

    Ok(vec![
        Stage::new(
            "sentinel_normalize",
            sentinel::NAME,
            &SentinelConfig {
                columns: columns(&REQUIRED_FIELDS),
                sentinels: options.sentinels.clone(),
            },
        )?,
        Stage::new(
            "birth_year",
            birth_year::NAME,
            &birth_year::BirthYearConfig::default(),
        )?,
        Stage::new("mass", mass::NAME, &mass::MassConfig::default())?,
        Stage::new(
            "gender_id",
            gender::NAME,
            &gender::GenderConfig {
                input_col: GENDER.to_string(),
                output_col: GENDER_ID.to_string(),
                matching: options.gender_matching,
            },
        )?,
        Stage::new(
            "mass_validity",
            numeric_range_filter::NAME,
            &NumericRangeConfig {
                col: MASS_NUMERIC.to_string(),
                upper_bound: options.max_mass,
                upper_inclusive: true,
                missing: MissingPolicy::Drop,
            },
        )?,
        Stage::new(
            "missing_field_count",
            completeness::NAME,
            &CompletenessConfig {
                columns: columns(&REQUIRED_FIELDS),
                output_col: MISSING_FIELD_COUNT.to_string(),
            },
        )?,
        Stage::new(
            "completeness",
            numeric_range_filter::NAME,
            &NumericRangeConfig {
                col: MISSING_FIELD_COUNT.to_string(),
                upper_bound: options.completeness_threshold as f64,
                upper_inclusive: false,
                missing: MissingPolicy::Error,
            },
        )?,
        Stage::new(
            "project",
            project::NAME,
            &ProjectConfig {
                columns: columns(&OUTPUT_COLUMNS),
                aliases,
            },
        )?,
    ])
}

pub fn register(registry: &mut OperatorRegistry) {
    birth_year::register(registry);
    mass::register(registry);
    gender::register(registry);
}
