//! Configuration for tintlog
//!
//! The typed [`Config`] mirrors the settings catalog one field per key. Values
//! only ever reach it through the [`Validator`], driven by the
//! [`Configurator`].

pub mod catalog;
pub mod configurator;
pub mod error;
pub mod kind;
pub mod remediation;
pub mod validator;

pub use catalog::{SettingKey, SettingSpec, CANONICAL_LEVELS, CATALOG};
pub use configurator::Configurator;
pub use error::ConfigError;
pub use kind::{classify, Classification, Kind};
pub use remediation::{Diagnostic, DiagnosticPrinter, SilentPrinter, StderrPrinter};
pub use validator::Validator;

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::color::{ColorPair, DEFAULT_COLORS};

/// Name of the unified config file inside the root directory
pub const CONFIG_FILE_NAME: &str = ".loggercfg";

/// Name of the standalone logger registry file
pub const LOGGERS_FILE_NAME: &str = "loggers.json";

/// Root directory used when nothing else fixes one
pub const DEFAULT_ROOT_DIR: &str = "./";

/// Days a log file is kept before the retention sweep removes it
pub const DEFAULT_DELETION_INTERVAL: u32 = 7;

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            other => Err(format!(
                "unknown level \"{}\", expected one of: {}",
                other,
                CANONICAL_LEVELS.join(", ")
            )),
        }
    }
}

/// One remembered logger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerEntry {
    pub name: String,
    pub colors: ColorPair,
}

impl LoggerEntry {
    pub fn new(name: impl Into<String>, colors: ColorPair) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }
}

/// Logger name → entry, in insertion order
pub type LoggerNames = IndexMap<String, LoggerEntry>;

/// Flags that steer the configurator but are never written to the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraneousConfig {
    /// Write the config file when it doesn't exist yet
    pub create_file: bool,
    /// Merge the in-memory config into an existing file on start
    pub overwrite_file: bool,
}

impl ExtraneousConfig {
    /// Override keys that land here instead of in [`Config`]
    pub const KEYS: [&'static str; 2] = ["create_file", "overwrite_file"];

    /// Set a flag by its override key; returns false for unknown keys
    pub(crate) fn set(&mut self, key: &str, value: bool) -> bool {
        match key {
            "create_file" => self.create_file = value,
            "overwrite_file" => self.overwrite_file = value,
            _ => return false,
        }
        true
    }
}

/// Validated logger configuration
///
/// Field order is the order keys are written to the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Mirror messages to log files
    pub logging: bool,

    /// Root directory holding the config file and the `log/` folder; after
    /// loading it always names the root in use, whatever the file says
    pub dir: String,

    /// Minimum level printed to the console
    pub level: Level,

    /// Level used for messages that don't name one
    #[serde(rename = "defaultLevel")]
    pub default_level: Level,

    /// Level weights; a message is printed when its weight is at least the
    /// weight of `level`
    pub levels: IndexMap<String, i64>,

    /// Days before a log file is deleted (0..=31)
    pub deletion_interval: u32,

    /// Prefix console lines with a timestamp
    pub date: bool,

    /// Fallback colors for loggers without their own
    pub colors: ColorPair,

    /// Remembered loggers
    pub loggers: LoggerNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: true,
            dir: DEFAULT_ROOT_DIR.to_string(),
            level: Level::Info,
            default_level: Level::Info,
            levels: default_levels(),
            deletion_interval: DEFAULT_DELETION_INTERVAL,
            date: true,
            colors: DEFAULT_COLORS,
            loggers: default_loggers(),
        }
    }
}

fn default_levels() -> IndexMap<String, i64> {
    CANONICAL_LEVELS
        .iter()
        .zip(1..)
        .map(|(name, weight)| (name.to_string(), weight))
        .collect()
}

fn default_loggers() -> LoggerNames {
    ["Fail", "Success"]
        .iter()
        .map(|name| (name.to_string(), LoggerEntry::new(*name, DEFAULT_COLORS)))
        .collect()
}

impl Config {
    /// Current value of one setting as JSON
    pub fn field_value(&self, key: SettingKey) -> Value {
        match key {
            SettingKey::Logging => json!(self.logging),
            SettingKey::Dir => json!(self.dir),
            SettingKey::Level => json!(self.level),
            SettingKey::DefaultLevel => json!(self.default_level),
            SettingKey::Levels => json!(self.levels),
            SettingKey::DeletionInterval => json!(self.deletion_interval),
            SettingKey::Date => json!(self.date),
            SettingKey::Colors => json!(self.colors),
            SettingKey::Loggers => json!(self.loggers),
        }
    }

    /// Store an already validated value into its field
    pub(crate) fn assign(&mut self, key: SettingKey, value: Value) -> Result<(), ConfigError> {
        match key {
            SettingKey::Logging => self.logging = serde_json::from_value(value)?,
            SettingKey::Dir => self.dir = serde_json::from_value(value)?,
            SettingKey::Level => self.level = serde_json::from_value(value)?,
            SettingKey::DefaultLevel => self.default_level = serde_json::from_value(value)?,
            SettingKey::Levels => self.levels = serde_json::from_value(value)?,
            SettingKey::DeletionInterval => self.deletion_interval = serde_json::from_value(value)?,
            SettingKey::Date => self.date = serde_json::from_value(value)?,
            SettingKey::Colors => self.colors = serde_json::from_value(value)?,
            SettingKey::Loggers => self.loggers = serde_json::from_value(value)?,
        }
        Ok(())
    }

    /// All settings as a JSON object in file order
    pub fn to_map(&self) -> Map<String, Value> {
        SettingKey::ALL
            .iter()
            .map(|key| (key.as_str().to_string(), self.field_value(*key)))
            .collect()
    }

    /// Weight of a level name, if the table defines it
    pub fn weight(&self, level: &str) -> Option<i64> {
        self.levels.get(level).copied()
    }

    /// Whether a message at `level` passes the configured threshold
    pub fn should_print(&self, level: Level) -> bool {
        match (self.weight(self.level.as_str()), self.weight(level.as_str())) {
            (Some(threshold), Some(weight)) => threshold <= weight,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TermColor;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.logging);
        assert_eq!(config.dir, "./");
        assert_eq!(config.level, Level::Info);
        assert_eq!(config.deletion_interval, 7);
        assert_eq!(config.levels.get("error"), Some(&3));
        assert!(config.loggers.contains_key("Fail"));
        assert!(config.loggers.contains_key("Success"));
    }

    #[test]
    fn test_to_map_is_in_catalog_order() {
        let map = Config::default().to_map();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "logging",
                "dir",
                "level",
                "defaultLevel",
                "levels",
                "deletion_interval",
                "date",
                "colors",
                "loggers"
            ]
        );
    }

    #[test]
    fn test_serialized_config_matches_to_map() {
        let config = Config::default();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value, Value::Object(config.to_map()));
        let parsed: Config = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_assign_typed_fields() {
        let mut config = Config::default();
        config
            .assign(SettingKey::Colors, json!(["red", "brightGreen"]))
            .unwrap();
        config.assign(SettingKey::Level, json!("warn")).unwrap();
        config.assign(SettingKey::DeletionInterval, json!(0)).unwrap();

        assert_eq!(
            config.colors,
            ColorPair::new(TermColor::Red, TermColor::BrightGreen)
        );
        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.deletion_interval, 0);
    }

    #[test]
    fn test_should_print_respects_weights() {
        let mut config = Config::default();
        config.level = Level::Warn;
        assert!(!config.should_print(Level::Info));
        assert!(config.should_print(Level::Warn));
        assert!(config.should_print(Level::Error));

        config.levels.insert("info".to_string(), 10);
        assert!(config.should_print(Level::Info));
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("error".parse::<Level>(), Ok(Level::Error));
        assert!("err".parse::<Level>().is_err());
    }

    #[test]
    fn test_extraneous_set() {
        let mut extra = ExtraneousConfig::default();
        assert!(extra.set("create_file", true));
        assert!(!extra.set("dir", true));
        assert!(extra.create_file);
        assert!(!extra.overwrite_file);
    }
}
