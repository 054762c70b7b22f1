//! Loading, merging and persisting the config file
//!
//! Construction runs one linear pipeline: apply overrides, resolve the root
//! directory, optionally create or merge the file, then read and validate it.
//! Precedence is defaults < file < explicit overrides.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::catalog::SettingKey;
use super::error::ConfigError;
use super::kind::Kind;
use super::remediation::{Diagnostic, DiagnosticPrinter};
use super::validator::Validator;
use super::{Config, ExtraneousConfig, CONFIG_FILE_NAME, DEFAULT_ROOT_DIR};
use crate::context::Context;

/// Label used in remediation reports for caller-supplied overrides
const OVERRIDES_ORIGIN: &str = "the options passed to the configurator";

/// A loaded and validated configuration plus where it lives
#[derive(Debug, Clone)]
pub struct Configurator {
    config: Config,
    extra: ExtraneousConfig,
    root_dir: PathBuf,
    path: PathBuf,
    /// Validated overrides, re-applied on top of the file
    overrides: Vec<(SettingKey, Value)>,
}

impl Configurator {
    /// Load the config without overrides
    pub fn load(ctx: &Context) -> Result<Self, ConfigError> {
        Self::new(ctx, Value::Null)
    }

    /// Load the config, applying `overrides` (a JSON object or `null`)
    ///
    /// Besides setting keys, overrides may carry `create_file` and
    /// `overwrite_file`. Any other key is rejected before a file is touched.
    pub fn new(ctx: &Context, overrides: Value) -> Result<Self, ConfigError> {
        let (overrides, extra) = parse_overrides(ctx.printer(), overrides)?;

        let mut config = Config::default();
        for (key, value) in &overrides {
            config.assign(*key, value.clone())?;
        }

        let dir_overridden = overrides.iter().any(|(key, _)| *key == SettingKey::Dir);
        let root_dir = if dir_overridden {
            PathBuf::from(&config.dir)
        } else {
            ctx.root_dir()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR))
        };
        ctx.set_root_dir(&root_dir);
        config.dir = root_dir.to_string_lossy().into_owned();

        let path = root_dir.join(CONFIG_FILE_NAME);
        let mut configurator = Self {
            config,
            extra,
            root_dir,
            path,
            overrides,
        };

        if !configurator.path.exists() && configurator.extra.create_file {
            configurator.save()?;
            tracing::info!("Created config file at {}", configurator.path.display());
        }

        if configurator.extra.overwrite_file && configurator.path.exists() {
            configurator.merge_into_file()?;
        }

        configurator.recover_empty_file()?;

        if configurator.has_permissions() {
            configurator.read(ctx.printer())?;
        }

        Ok(configurator)
    }

    /// The validated configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the configurator, keeping only the configuration
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Process-only flags taken from the overrides
    pub fn extra(&self) -> ExtraneousConfig {
        self.extra
    }

    /// Directory holding the config file
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Path of the config file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the in-memory configuration to the config file
    pub fn save(&self) -> Result<(), ConfigError> {
        self.write_map(&self.config.to_map())
    }

    /// Reading is allowed when we may create the file or it already exists
    fn has_permissions(&self) -> bool {
        self.extra.create_file || self.path.exists()
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.root_dir)
            .map_err(|e| ConfigError::create_dir(&self.root_dir, e))?;

        let content = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, content).map_err(|e| ConfigError::write_file(&self.path, e))
    }

    fn read_text(&self) -> Result<String, ConfigError> {
        fs::read_to_string(&self.path).map_err(|e| ConfigError::read_file(&self.path, e))
    }

    /// Merge the overrides into the existing file, keeping everything else
    ///
    /// Catalog keys come first in catalog order, followed by any keys the file
    /// carries that the catalog doesn't know.
    fn merge_into_file(&self) -> Result<(), ConfigError> {
        let text = self.read_text()?;
        let mut on_disk = if text.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return Err(ConfigError::NotAnObject { path: self.path.clone() }),
                Err(e) => return Err(ConfigError::parse(&self.path, e)),
            }
        };

        let mut merged = Map::with_capacity(on_disk.len().max(SettingKey::ALL.len()));
        for key in SettingKey::ALL {
            let overridden = self
                .overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.clone());
            // Only explicit overrides beat the file; the rest keeps hand edits
            let value = match overridden {
                Some(value) => value,
                None => on_disk
                    .remove(key.as_str())
                    .unwrap_or_else(|| self.config.field_value(key)),
            };
            merged.insert(key.as_str().to_string(), value);
        }
        for (key, value) in on_disk {
            if !merged.contains_key(&key) {
                merged.insert(key, value);
            }
        }

        self.write_map(&merged)?;
        tracing::debug!("Merged configuration into {}", self.path.display());
        Ok(())
    }

    /// Replace a blank or `{}` config file with the in-memory configuration
    fn recover_empty_file(&self) -> Result<(), ConfigError> {
        if !self.path.exists() {
            return Ok(());
        }

        let text = self.read_text()?;
        let empty = text.trim().is_empty()
            || matches!(serde_json::from_str::<Value>(&text), Ok(Value::Object(map)) if map.is_empty());
        if !empty {
            return Ok(());
        }

        tracing::warn!(
            "Config file {} is empty, restoring defaults",
            self.path.display()
        );
        fs::remove_file(&self.path).map_err(|e| ConfigError::remove_file(&self.path, e))?;
        self.save()
    }

    /// Read the file, validate every setting and re-apply the overrides
    fn read(&mut self, printer: &dyn DiagnosticPrinter) -> Result<(), ConfigError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(ConfigError::read_file(&self.path, e)),
        };

        let file = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => return Err(ConfigError::NotAnObject { path: self.path.clone() }),
            // Deleted between the existence check and the read
            Err(_) if !self.path.exists() => return Ok(()),
            Err(e) => return Err(ConfigError::parse(&self.path, e)),
        };

        let compact = serde_json::to_string(&file)?;
        let validator = Validator::new(printer, CONFIG_FILE_NAME);

        let mut config = Config::default();
        for key in SettingKey::ALL {
            let value = validator.validate(key, file.get(key.as_str()), &compact)?;
            config.assign(key, value)?;
        }
        for (key, value) in &self.overrides {
            config.assign(*key, value.clone())?;
        }
        // `dir` always names the root actually in use
        config.dir = self.root_dir.to_string_lossy().into_owned();

        self.config = config;
        Ok(())
    }
}

/// Split overrides into validated settings and process flags
fn parse_overrides(
    printer: &dyn DiagnosticPrinter,
    overrides: Value,
) -> Result<(Vec<(SettingKey, Value)>, ExtraneousConfig), ConfigError> {
    let overrides = match overrides {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(ConfigError::InvalidOverrides {
                actual: Kind::of(&other),
            })
        }
    };

    let text = serde_json::to_string_pretty(&overrides)?;
    let validator = Validator::new(printer, OVERRIDES_ORIGIN);

    let mut settings = Vec::new();
    let mut extra = ExtraneousConfig::default();

    for (key, value) in &overrides {
        if value.is_null() {
            continue;
        }

        if ExtraneousConfig::KEYS.contains(&key.as_str()) {
            let flag = value.as_bool().ok_or_else(|| ConfigError::TypeMismatch {
                key: key.clone(),
                actual: Kind::of(value),
                required: Kind::Boolean,
                value: value.clone(),
            })?;
            extra.set(key, flag);
            continue;
        }

        match key.parse::<SettingKey>() {
            Ok(setting) => {
                let validated = validator.validate(setting, Some(value), &text)?;
                settings.push((setting, validated));
            }
            Err(()) => {
                printer.print(&Diagnostic::remediation(
                    key,
                    value,
                    Vec::new(),
                    OVERRIDES_ORIGIN,
                    &text,
                ));
                return Err(ConfigError::UnknownKey {
                    key: key.clone(),
                    known: known_keys(),
                });
            }
        }
    }

    Ok((settings, extra))
}

fn known_keys() -> Vec<String> {
    SettingKey::ALL
        .iter()
        .map(|k| k.as_str())
        .chain(ExtraneousConfig::KEYS)
        .map(str::to_string)
        .collect()
}
