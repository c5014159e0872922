use crate::Sample;
use serde_json::Value;
use thiserror::Error;

/// Structural problems with an input record. Unlike parse failures inside
/// a field, these mean the source itself is malformed and abort the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("record {index} is not a JSON object")]
    NotAnObject { index: usize },
    #[error("record {index} is missing required field `{field}`")]
    MissingField { index: usize, field: String },
    #[error("record {index} has field `{field}` of type {found}, expected a string or null")]
    InvalidType {
        index: usize,
        field: String,
        found: &'static str,
    },
}

impl SchemaError {
    pub fn index(&self) -> usize {
        match self {
            SchemaError::NotAnObject { index }
            | SchemaError::MissingField { index, .. }
            | SchemaError::InvalidType { index, .. } => *index,
        }
    }
}

/// The set of keys every record must carry. Values may be strings or null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    required: Vec<String>,
}

impl RecordSchema {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn validate(&self, index: usize, sample: &Sample) -> Result<(), SchemaError> {
        let map = sample
            .as_object()
            .ok_or(SchemaError::NotAnObject { index })?;

        for field in &self.required {
            match map.get(field) {
                None => {
                    return Err(SchemaError::MissingField {
                        index,
                        field: field.clone(),
                    })
                }
                Some(Value::String(_)) | Some(Value::Null) => {}
                Some(other) => {
                    return Err(SchemaError::InvalidType {
                        index,
                        field: field.clone(),
                        found: json_type_name(other),
                    })
                }
            }
        }

        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> RecordSchema {
        RecordSchema::new(["name", "mass"])
    }

    #[test]
    fn accepts_strings_and_nulls() {
        let sample = Sample::from_value(json!({"name": "R2-D2", "mass": null})).unwrap();
        assert_eq!(schema().validate(0, &sample), Ok(()));
    }

    #[test]
    fn absent_key_is_a_schema_error() {
        let sample = Sample::from_value(json!({"name": "R2-D2"})).unwrap();
        let err = schema().validate(4, &sample).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                index: 4,
                field: "mass".to_string()
            }
        );
        assert_eq!(err.to_string(), "record 4 is missing required field `mass`");
        assert_eq!(err.index(), 4);
    }

    #[test]
    fn non_string_values_are_rejected() {
        let sample = Sample::from_value(json!({"name": "R2-D2", "mass": 32})).unwrap();
        let err = schema().validate(1, &sample).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidType { found: "number", .. }
        ));
    }

    #[test]
    fn non_objects_are_rejected() {
        let sample = Sample(json!([1, 2, 3]));
        assert_eq!(
            schema().validate(2, &sample),
            Err(SchemaError::NotAnObject { index: 2 })
        );
    }
}
