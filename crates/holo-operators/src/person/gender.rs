use anyhow::Context;
use holo_sdk::{impl_annotator_operator, BaseAnnotator, Field, Result, Sample};
use serde::{Deserialize, Serialize};

pub const NAME: &str = "gender_annotator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenderId {
    Male,
    Female,
    /// Anything that is not male or female, including missing.
    Neither,
}

impl GenderId {
    pub fn code(self) -> &'static str {
        match self {
            GenderId::Male => "M",
            GenderId::Female => "F",
            GenderId::Neither => "N",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderMatching {
    #[default]
    CaseInsensitive,
    /// Exact match only; `"MALE"` classifies as `N`.
    CaseSensitive,
}

pub fn classify(raw: Field<&str>, matching: GenderMatching) -> GenderId {
    let text = match raw {
        Field::Value(text) => text,
        Field::Missing => return GenderId::Neither,
    };
    let is = |label: &str| match matching {
        GenderMatching::CaseInsensitive => text.eq_ignore_ascii_case(label),
        GenderMatching::CaseSensitive => text == label,
    };
    if is("male") {
        GenderId::Male
    } else if is("female") {
        GenderId::Female
    } else {
        GenderId::Neither
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderConfig {
    #[serde(default = "default_input_col")]
    pub input_col: String,
    #[serde(default = "default_output_col")]
    pub output_col: String,
    #[serde(default)]
    pub matching: GenderMatching,
}

fn default_input_col() -> String {
    super::GENDER.to_string()
}

fn default_output_col() -> String {
    super::GENDER_ID.to_string()
}

impl Default for GenderConfig {
    fn default() -> Self {
        Self {
            input_col: default_input_col(),
            output_col: default_output_col(),
            matching: GenderMatching::default(),
        }
    }
}

pub struct GenderAnnotator {
    config: GenderConfig,
}

impl GenderAnnotator {
    pub fn new(config: GenderConfig) -> Self {
        Self { config }
    }
}

impl BaseAnnotator for GenderAnnotator {
    fn annotate(&self, sample: &mut Sample) -> Result<()> {
        let id = classify(sample.field_str(&self.config.input_col), self.config.matching);
        sample.set_str(&self.config.output_col, id.code());
        Ok(())
    }
}

impl_annotator_operator!(GenderAnnotator);

pub fn register(registry: &mut holo_sdk::OperatorRegistry) {
    registry.register_fn(NAME, |config: &serde_yaml::Value| {
        let config: GenderConfig = if config.is_null() {
            GenderConfig::default()
        } else {
            serde_yaml::from_value(config.clone())
                .with_context(|| format!("Invalid {} config", NAME))?
        };
        Ok(Box::new(GenderAnnotator::new(config)))
    });
}
