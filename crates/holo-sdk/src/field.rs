/// A value that is either present or explicitly missing.
///
/// Records coming out of the source use `null` and sentinel strings for
/// absent data. Every stage reads and writes through `Field` so that the
/// missing branch is always handled by a visible match instead of a silent
/// coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field<T> {
    Missing,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Field::Missing)
    }

    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Missing => Field::Missing,
            Field::Value(v) => Field::Value(v),
        }
    }

    pub fn map<U, F>(self, f: F) -> Field<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Field::Missing => Field::Missing,
            Field::Value(v) => Field::Value(f(v)),
        }
    }

    pub fn and_then<U, F>(self, f: F) -> Field<U>
    where
        F: FnOnce(T) -> Field<U>,
    {
        match self {
            Field::Missing => Field::Missing,
            Field::Value(v) => f(v),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Missing => None,
            Field::Value(v) => Some(v),
        }
    }
}

impl Field<f64> {
    /// Parse a float, treating failures as missing. `"inf"`, `"nan"` and
    /// overflowing literals such as `"-1e400"` parse to non-finite values.
    pub fn parse_f64(text: &str) -> Field<f64> {
        match text.trim().parse::<f64>() {
            Ok(v) => Field::Value(v),
            Err(_) => Field::Missing,
        }
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Missing,
        }
    }
}

impl<T> From<Field<T>> for Option<T> {
    fn from(value: Field<T>) -> Self {
        value.into_option()
    }
}
