//! Runtime kind classification for raw JSON values

use std::fmt;

use serde_json::Value;

/// Primitive kind of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl Kind {
    /// Kind of a concrete value
    ///
    /// Arrays are always `Array`, never `Object`, so object-typed settings
    /// can't accept a list by accident.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of checking a value against a required kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub matches: bool,
    pub actual: Kind,
    pub required: Kind,
}

/// Classify `value` against `required`
pub fn classify(required: Kind, value: &Value) -> Classification {
    let actual = Kind::of(value);
    Classification {
        matches: actual == required,
        actual,
        required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_matching_kinds() {
        assert!(classify(Kind::String, &json!("./")).matches);
        assert!(classify(Kind::Number, &json!(7)).matches);
        assert!(classify(Kind::Number, &json!(1.5)).matches);
        assert!(classify(Kind::Boolean, &json!(false)).matches);
        assert!(classify(Kind::Array, &json!(["red", "red"])).matches);
        assert!(classify(Kind::Object, &json!({"info": 1})).matches);
    }

    #[test]
    fn test_array_is_not_an_object() {
        let result = classify(Kind::Object, &json!([1, 2]));
        assert!(!result.matches);
        assert_eq!(result.actual, Kind::Array);
        assert_eq!(result.required, Kind::Object);
    }

    #[test]
    fn test_object_is_not_an_array() {
        let result = classify(Kind::Array, &json!({"0": "red"}));
        assert!(!result.matches);
        assert_eq!(result.actual, Kind::Object);
    }

    #[test]
    fn test_numeric_string_is_a_string() {
        let result = classify(Kind::Number, &json!("7"));
        assert!(!result.matches);
        assert_eq!(result.actual, Kind::String);
    }
}
