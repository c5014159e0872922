use crate::Field;
use serde_json::{Map, Number, Value};

const POS_INF: &str = "inf";
const NEG_INF: &str = "-inf";

/// Sample is a wrapper around serde_json::Value
/// It represents a JSON object (one record of the batch)
#[derive(Clone, Debug, PartialEq)]
pub struct Sample(pub Value);

impl Sample {
    /// Create a new empty JSON object
    pub fn new() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Create from a JSON Value, rejecting anything that is not an object
    pub fn from_value(value: Value) -> Option<Self> {
        if value.is_object() {
            Some(Sample(value))
        } else {
            None
        }
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    pub fn contains_key(&self, k: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(k))
    }

    // --- getters ---
    pub fn get(&self, k: &str) -> Option<&Value> {
        self.0.get(k)
    }

    pub fn get_str(&self, k: &str) -> Option<&str> {
        self.0.get(k)?.as_str()
    }

    pub fn get_i64(&self, k: &str) -> Option<i64> {
        self.0.get(k)?.as_i64()
    }

    /// Numbers, plus the `"inf"` / `"-inf"` markers written by `set_f64`.
    pub fn get_f64(&self, k: &str) -> Option<f64> {
        match self.0.get(k)? {
            Value::String(s) if s == POS_INF => Some(f64::INFINITY),
            Value::String(s) if s == NEG_INF => Some(f64::NEG_INFINITY),
            other => other.as_f64(),
        }
    }

    /// String field; null, absent and non-string values are all missing.
    pub fn field_str(&self, k: &str) -> Field<&str> {
        self.get_str(k).into()
    }

    pub fn field_f64(&self, k: &str) -> Field<f64> {
        self.get_f64(k).into()
    }

    // --- setters ---
    pub fn set_str(&mut self, k: impl Into<String>, v: impl Into<String>) {
        self.set_value(k, Value::String(v.into()));
    }

    pub fn set_i64(&mut self, k: impl Into<String>, v: i64) {
        self.set_value(k, Value::Number(v.into()));
    }

    /// JSON has no infinities, so they are stored as `"inf"` / `"-inf"`
    /// strings. NaN is stored as null.
    pub fn set_f64(&mut self, k: impl Into<String>, v: f64) {
        let value = match Number::from_f64(v) {
            Some(n) => Value::Number(n),
            None if v == f64::INFINITY => Value::String(POS_INF.to_string()),
            None if v == f64::NEG_INFINITY => Value::String(NEG_INF.to_string()),
            None => Value::Null,
        };
        self.set_value(k, value);
    }

    pub fn set_null(&mut self, k: impl Into<String>) {
        self.set_value(k, Value::Null);
    }

    pub fn set_field_str(&mut self, k: impl Into<String>, v: Field<&str>) {
        match v {
            Field::Value(s) => self.set_str(k, s),
            Field::Missing => self.set_null(k),
        }
    }

    pub fn set_field_f64(&mut self, k: impl Into<String>, v: Field<f64>) {
        match v {
            Field::Value(f) => self.set_f64(k, f),
            Field::Missing => self.set_null(k),
        }
    }

    pub fn set_value(&mut self, k: impl Into<String>, v: Value) {
        if let Value::Object(ref mut map) = self.0 {
            map.insert(k.into(), v);
        }
    }

    pub fn remove(&mut self, k: &str) -> Option<Value> {
        if let Value::Object(ref mut map) = self.0 {
            map.remove(k)
        } else {
            None
        }
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Map<String, Value>> for Sample {
    fn from(map: Map<String, Value>) -> Self {
        Sample(Value::Object(map))
    }
}
