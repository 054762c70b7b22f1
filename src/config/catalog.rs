//! Declaration of every recognized setting
//!
//! Each entry carries the setting's kind, allowed values, numeric bounds, a
//! short tutorial string and the structural check the validator runs once the
//! kind is known to match.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::error::ConfigError;
use super::kind::Kind;
use super::Config;
use crate::color::TermColor;

/// Level names every level table must define
pub const CANONICAL_LEVELS: [&str; 3] = ["info", "warn", "error"];

/// Names of the recognized settings, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Logging,
    Dir,
    Level,
    DefaultLevel,
    Levels,
    DeletionInterval,
    Date,
    Colors,
    Loggers,
}

impl SettingKey {
    pub const ALL: [SettingKey; 9] = [
        SettingKey::Logging,
        SettingKey::Dir,
        SettingKey::Level,
        SettingKey::DefaultLevel,
        SettingKey::Levels,
        SettingKey::DeletionInterval,
        SettingKey::Date,
        SettingKey::Colors,
        SettingKey::Loggers,
    ];

    /// Key as written in the config file
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Logging => "logging",
            SettingKey::Dir => "dir",
            SettingKey::Level => "level",
            SettingKey::DefaultLevel => "defaultLevel",
            SettingKey::Levels => "levels",
            SettingKey::DeletionInterval => "deletion_interval",
            SettingKey::Date => "date",
            SettingKey::Colors => "colors",
            SettingKey::Loggers => "loggers",
        }
    }

    /// Catalog entry for this key
    pub fn spec(&self) -> &'static SettingSpec {
        // CATALOG is laid out in the same order as ALL
        &CATALOG[*self as usize]
    }

    /// Position in file order
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

/// Structural check run after the kind check; may repair the value
pub type Check = fn(&SettingSpec, Value) -> Result<Value, ConfigError>;

/// Static description of one setting
pub struct SettingSpec {
    pub key: SettingKey,
    /// Required JSON kind
    pub kind: Kind,
    /// Literal values the setting may take
    pub allowed: Option<&'static [&'static str]>,
    /// Inclusive numeric bounds
    pub range: Option<(i64, i64)>,
    /// Tutorial text shown when the value is missing
    pub hint: Option<&'static str>,
    check: Check,
}

impl SettingSpec {
    /// Default value for this setting
    pub fn default_value(&self) -> Value {
        Config::default().field_value(self.key)
    }

    /// Run the key-specific structural check
    pub fn check(&self, value: Value) -> Result<Value, ConfigError> {
        (self.check)(self, value)
    }

    /// Allowed values as owned strings, for error messages
    pub fn allowed_list(&self) -> Vec<String> {
        self.allowed
            .unwrap_or_default()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn key_name(&self) -> String {
        self.key.as_str().to_string()
    }
}

/// Every setting, in file order
pub static CATALOG: [SettingSpec; 9] = [
    SettingSpec {
        key: SettingKey::Logging,
        kind: Kind::Boolean,
        allowed: None,
        range: None,
        hint: None,
        check: accept,
    },
    SettingSpec {
        key: SettingKey::Dir,
        kind: Kind::String,
        allowed: None,
        range: None,
        hint: Some("this value is your root dir"),
        check: accept,
    },
    SettingSpec {
        key: SettingKey::Level,
        kind: Kind::String,
        allowed: Some(&CANONICAL_LEVELS),
        range: None,
        hint: Some("this value is the level of logging"),
        check: accept,
    },
    SettingSpec {
        key: SettingKey::DefaultLevel,
        kind: Kind::String,
        allowed: Some(&CANONICAL_LEVELS),
        range: None,
        hint: Some("this value is the level used when a message names none"),
        check: accept,
    },
    SettingSpec {
        key: SettingKey::Levels,
        kind: Kind::Object,
        allowed: None,
        range: None,
        hint: Some("this value shows the possible logging levels and their weights"),
        check: check_levels,
    },
    SettingSpec {
        key: SettingKey::DeletionInterval,
        kind: Kind::Number,
        allowed: None,
        range: Some((0, 31)),
        hint: Some(
            "this value is a whole number of days (0, 1, 2...) after which a log file is deleted",
        ),
        check: check_range,
    },
    SettingSpec {
        key: SettingKey::Date,
        kind: Kind::Boolean,
        allowed: None,
        range: None,
        hint: None,
        check: accept,
    },
    SettingSpec {
        key: SettingKey::Colors,
        kind: Kind::Array,
        allowed: None,
        range: None,
        hint: Some(
            "this value is a tuple of two colors, first - logger name color, second - text color",
        ),
        check: check_colors,
    },
    SettingSpec {
        key: SettingKey::Loggers,
        kind: Kind::Object,
        allowed: None,
        range: None,
        hint: Some("these are your loggers, you don't have to touch them"),
        check: check_loggers,
    },
];

fn accept(_spec: &SettingSpec, value: Value) -> Result<Value, ConfigError> {
    Ok(value)
}

fn check_colors(spec: &SettingSpec, value: Value) -> Result<Value, ConfigError> {
    validate_color_pair(&value).map_err(|violation| match violation {
        PairViolation::Arity(len) => ConfigError::ColorArity {
            key: spec.key_name(),
            len,
        },
        PairViolation::Unknown(color) => ConfigError::UnknownColor {
            key: spec.key_name(),
            color,
        },
    })?;
    Ok(value)
}

fn check_loggers(spec: &SettingSpec, value: Value) -> Result<Value, ConfigError> {
    let entries = match value {
        Value::Object(entries) => entries,
        other => return Ok(other),
    };

    let logger_error = |logger: &str, reason: String| ConfigError::LoggerColor {
        key: spec.key_name(),
        logger: logger.to_string(),
        reason,
    };

    let mut repaired = Map::with_capacity(entries.len());
    for (logger, entry) in entries {
        let mut fields = match entry {
            Value::Object(fields) => fields,
            other => {
                return Err(logger_error(
                    &logger,
                    format!(
                        "expected an object with name and colors, got {}",
                        Kind::of(&other)
                    ),
                ));
            }
        };

        let colors = fields.get("colors").cloned().unwrap_or(Value::Null);
        match validate_color_pair(&colors) {
            Ok(()) => {}
            Err(PairViolation::Arity(len)) => {
                return Err(logger_error(
                    &logger,
                    format!("colors must hold exactly two colors, got {}", len),
                ));
            }
            Err(PairViolation::Unknown(color)) => {
                return Err(logger_error(
                    &logger,
                    format!("{} is not a known color", color),
                ));
            }
        }

        if !fields.get("name").map(Value::is_string).unwrap_or(false) {
            fields.insert("name".to_string(), Value::String(logger.clone()));
        }

        repaired.insert(logger, Value::Object(fields));
    }

    Ok(Value::Object(repaired))
}

fn check_levels(spec: &SettingSpec, value: Value) -> Result<Value, ConfigError> {
    let level_error = |reason: String| ConfigError::LevelTable {
        key: spec.key_name(),
        reason,
    };

    let Some(table) = value.as_object() else {
        return Ok(value);
    };

    let missing: Vec<&str> = CANONICAL_LEVELS
        .iter()
        .copied()
        .filter(|level| !table.contains_key(*level))
        .collect();
    if table.len() < CANONICAL_LEVELS.len() || !missing.is_empty() {
        return Err(level_error(format!(
            "must include at least {} (missing: {})",
            CANONICAL_LEVELS.join(", "),
            missing.join(", ")
        )));
    }

    for (level, weight) in table {
        if weight.as_i64().is_none() {
            return Err(level_error(format!(
                "weight of level \"{}\" must be a whole number, got {}",
                level, weight
            )));
        }
    }

    Ok(value)
}

fn check_range(spec: &SettingSpec, value: Value) -> Result<Value, ConfigError> {
    let Some((min, max)) = spec.range else {
        return Ok(value);
    };

    let out_of_range = || ConfigError::Range {
        key: spec.key_name(),
        min,
        max,
        actual: value.clone(),
    };

    match value.as_i64() {
        Some(n) if (min..=max).contains(&n) => Ok(value),
        Some(_) => Err(out_of_range()),
        // u64 beyond i64::MAX
        None if value.is_u64() => Err(out_of_range()),
        None => {
            let n = value.as_f64().unwrap_or(f64::NAN);
            if n < min as f64 || n > max as f64 {
                Err(out_of_range())
            } else {
                Err(ConfigError::NotInteger {
                    key: spec.key_name(),
                    value,
                })
            }
        }
    }
}

enum PairViolation {
    Arity(usize),
    Unknown(Value),
}

fn validate_color_pair(value: &Value) -> Result<(), PairViolation> {
    let Some(items) = value.as_array() else {
        return Err(PairViolation::Arity(0));
    };

    if items.len() != 2 {
        return Err(PairViolation::Arity(items.len()));
    }

    for item in items {
        let known = item.as_str().map(TermColor::is_member).unwrap_or(false);
        if !known {
            return Err(PairViolation::Unknown(item.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_order_matches_keys() {
        for (index, key) in SettingKey::ALL.iter().enumerate() {
            assert_eq!(CATALOG[index].key, *key);
            assert_eq!(key.position(), index);
        }
    }

    #[test]
    fn test_key_from_str() {
        assert_eq!(
            "deletion_interval".parse::<SettingKey>(),
            Ok(SettingKey::DeletionInterval)
        );
        assert_eq!("defaultLevel".parse::<SettingKey>(), Ok(SettingKey::DefaultLevel));
        assert!("unknownKey".parse::<SettingKey>().is_err());
    }

    #[test]
    fn test_defaults_pass_their_own_checks() {
        for spec in CATALOG.iter() {
            let default = spec.default_value();
            assert_eq!(spec.check(default.clone()).unwrap(), default, "{}", spec.key);
        }
    }

    #[test]
    fn test_check_colors_arity() {
        let spec = SettingKey::Colors.spec();
        for value in [json!([]), json!(["red"]), json!(["red", "red", "red"])] {
            assert!(matches!(
                spec.check(value),
                Err(ConfigError::ColorArity { .. })
            ));
        }
    }

    #[test]
    fn test_check_colors_unknown_member() {
        let spec = SettingKey::Colors.spec();
        let err = spec.check(json!(["red", "purple"])).unwrap_err();
        match err {
            ConfigError::UnknownColor { color, .. } => assert_eq!(color, json!("purple")),
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            spec.check(json!(["red", 3])),
            Err(ConfigError::UnknownColor { .. })
        ));
    }

    #[test]
    fn test_check_loggers_rejects_bad_tuples() {
        let spec = SettingKey::Loggers.spec();
        let bad = [
            json!({"Api": {"name": "Api", "colors": ["red"]}}),
            json!({"Api": {"name": "Api", "colors": ["red", "nope"]}}),
            json!({"Api": {"name": "Api"}}),
            json!({"Api": 3}),
        ];
        for value in bad {
            assert!(matches!(
                spec.check(value),
                Err(ConfigError::LoggerColor { .. })
            ));
        }
    }

    #[test]
    fn test_check_loggers_fills_missing_name() {
        let spec = SettingKey::Loggers.spec();
        let value = spec
            .check(json!({"Api": {"colors": ["red", "green"]}}))
            .unwrap();
        assert_eq!(value["Api"]["name"], json!("Api"));
    }

    #[test]
    fn test_check_levels() {
        let spec = SettingKey::Levels.spec();
        assert!(spec
            .check(json!({"info": 1, "warn": 2, "error": 3, "fatal": 4}))
            .is_ok());
        assert!(matches!(
            spec.check(json!({"info": 1, "warn": 2})),
            Err(ConfigError::LevelTable { .. })
        ));
        assert!(matches!(
            spec.check(json!({"info": 1, "warn": 2, "fatal": 3})),
            Err(ConfigError::LevelTable { .. })
        ));
        assert!(matches!(
            spec.check(json!({"info": 1, "warn": "2", "error": 3})),
            Err(ConfigError::LevelTable { .. })
        ));
    }

    #[test]
    fn test_check_range_bounds() {
        let spec = SettingKey::DeletionInterval.spec();
        for n in [0, 1, 15, 31] {
            assert_eq!(spec.check(json!(n)).unwrap(), json!(n));
        }
        for n in [-1, 32, 1000] {
            assert!(matches!(
                spec.check(json!(n)),
                Err(ConfigError::Range { min: 0, max: 31, .. })
            ));
        }
        assert!(matches!(
            spec.check(json!(u64::MAX)),
            Err(ConfigError::Range { .. })
        ));
        assert!(matches!(
            spec.check(json!(40.5)),
            Err(ConfigError::Range { .. })
        ));
        assert!(matches!(
            spec.check(json!(2.5)),
            Err(ConfigError::NotInteger { .. })
        ));
    }
}
