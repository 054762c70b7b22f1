//! Persistent logger name → colors registry
//!
//! Names live either in the `loggers` key of `.loggercfg` or in a standalone
//! `loggers.json`. The context keeps a cache of the last merged state so that
//! lookups still work when no file may be written.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::color::ColorPair;
use crate::config::{LoggerEntry, LoggerNames, CONFIG_FILE_NAME, LOGGERS_FILE_NAME};
use crate::context::Context;

/// Which file backs the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFile {
    /// The `loggers` key of the config file
    Unified,
    /// A file holding only logger names
    Standalone,
}

/// Entry as found on disk; older files may omit the name
#[derive(Debug, Deserialize)]
struct StoredEntry {
    #[serde(default)]
    name: Option<String>,
    colors: ColorPair,
}

/// Reads and updates the logger registry
#[derive(Debug, Clone)]
pub struct LoggerNameRegistry {
    ctx: Context,
    path: PathBuf,
    file: RegistryFile,
    create_file: bool,
}

impl LoggerNameRegistry {
    /// Open the registry in `dir`
    ///
    /// Prefers `.loggercfg`, then `loggers.json`. When neither exists and
    /// `create_file` is set, `loggers.json` is written from the context cache.
    pub fn new(ctx: &Context, dir: impl AsRef<Path>, create_file: bool) -> Result<Self> {
        let dir = dir.as_ref();
        let unified = dir.join(CONFIG_FILE_NAME);

        let (path, file) = if unified.exists() {
            (unified, RegistryFile::Unified)
        } else {
            (dir.join(LOGGERS_FILE_NAME), RegistryFile::Standalone)
        };

        let registry = Self {
            ctx: ctx.clone(),
            path,
            file,
            create_file,
        };

        if registry.path.exists() {
            let stored = registry.read()?;
            registry.ctx.remember(&stored);
        } else if create_file {
            registry.write(&registry.ctx.names())?;
            tracing::debug!("Created logger registry at {}", registry.path.display());
        }

        Ok(registry)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> RegistryFile {
        self.file
    }

    /// Current names; the context cache when the file is gone
    pub fn get(&self) -> Result<LoggerNames> {
        if !self.path.exists() {
            return Ok(self.ctx.names());
        }
        self.read()
    }

    /// Merge `names` into the registry and return them unchanged
    ///
    /// An incoming entry replaces a stored one only if its colors differ from
    /// the default pair. Nothing is written when the file is missing and may
    /// not be created.
    pub fn set(&self, names: LoggerNames) -> Result<LoggerNames> {
        let stored = self.get()?;
        let merged = merge(&names, &stored);

        self.ctx.remember(&merged);

        if self.path.exists() || self.create_file {
            self.write(&merged)?;
        }

        Ok(names)
    }

    fn read(&self) -> Result<LoggerNames> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read logger registry {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(LoggerNames::new());
        }

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse logger registry {}", self.path.display()))?;

        let loggers = match self.file {
            // A config file without a registry yet starts from the cache
            RegistryFile::Unified => match value.get("loggers") {
                Some(loggers) if !loggers.is_null() => loggers.clone(),
                _ => return Ok(self.ctx.names()),
            },
            RegistryFile::Standalone => value,
        };
        if loggers.is_null() {
            return Ok(LoggerNames::new());
        }

        let stored: IndexMap<String, StoredEntry> =
            serde_json::from_value(loggers).context("Failed to parse logger entries")?;

        Ok(stored
            .into_iter()
            .map(|(key, entry)| {
                let name = entry.name.filter(|n| !n.is_empty()).unwrap_or_else(|| key.clone());
                (key, LoggerEntry::new(name, entry.colors))
            })
            .collect())
    }

    fn write(&self, names: &LoggerNames) -> Result<()> {
        let loggers = serde_json::to_value(names).context("Failed to serialize logger names")?;

        let document = match self.file {
            RegistryFile::Standalone => loggers,
            RegistryFile::Unified => {
                let mut config = self.read_config_map()?;
                config.insert("loggers".to_string(), loggers);
                Value::Object(config)
            }
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create directory for logger registry")?;
        }

        let content =
            serde_json::to_string_pretty(&document).context("Failed to serialize logger registry")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write logger registry {}", self.path.display()))?;

        Ok(())
    }

    /// The whole config file, so that only `loggers` gets replaced
    fn read_config_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = std::fs::read_to_string(&self.path).context("Failed to read config file")?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content).context("Failed to parse config file")? {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("Config file {} is not a JSON object", self.path.display()),
        }
    }
}

/// Incoming entries first; stored entries survive unless the incoming one
/// carries non-default colors
fn merge(incoming: &LoggerNames, stored: &LoggerNames) -> LoggerNames {
    let mut merged = incoming.clone();
    for (name, entry) in stored {
        match incoming.get(name) {
            Some(new) if !new.colors.is_default() => {}
            _ => {
                merged.insert(name.clone(), entry.clone());
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{TermColor, DEFAULT_COLORS};
    use crate::config::SilentPrinter;
    use serde_json::json;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn ctx() -> Context {
        Context::with_printer(Arc::new(SilentPrinter))
    }

    fn names(entries: &[(&str, ColorPair)]) -> LoggerNames {
        entries
            .iter()
            .map(|(name, colors)| (name.to_string(), LoggerEntry::new(*name, *colors)))
            .collect()
    }

    #[test]
    fn test_creates_standalone_file_from_seed() {
        let temp_dir = TempDir::new().unwrap();
        let registry = LoggerNameRegistry::new(&ctx(), temp_dir.path(), true).unwrap();

        assert_eq!(registry.file(), RegistryFile::Standalone);
        assert_eq!(registry.path(), temp_dir.path().join(LOGGERS_FILE_NAME));

        let stored = registry.get().unwrap();
        assert_eq!(
            stored["Success"].colors,
            ColorPair::new(TermColor::Red, TermColor::Green)
        );
        assert_eq!(
            stored["Fail"].colors,
            ColorPair::new(TermColor::Red, TermColor::Red)
        );
    }

    #[test]
    fn test_no_file_without_permission() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = ctx();
        let registry = LoggerNameRegistry::new(&ctx, temp_dir.path(), false).unwrap();
        assert!(!registry.path().exists());

        let api = names(&[("Api", ColorPair::new(TermColor::Cyan, TermColor::White))]);
        registry.set(api).unwrap();

        assert!(!registry.path().exists());
        // Falls back to the cache
        assert!(registry.get().unwrap().contains_key("Api"));
        assert!(ctx.name("Api").is_some());
    }

    #[test]
    fn test_prefers_unified_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(LOGGERS_FILE_NAME), "{}").unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            r#"{"level": "warn", "loggers": {"Db": {"name": "Db", "colors": ["blue", "white"]}}}"#,
        )
        .unwrap();

        let ctx = ctx();
        let registry = LoggerNameRegistry::new(&ctx, temp_dir.path(), false).unwrap();
        assert_eq!(registry.file(), RegistryFile::Unified);
        assert!(registry.get().unwrap().contains_key("Db"));
        assert!(ctx.name("Db").is_some());
    }

    #[test]
    fn test_unified_set_replaces_only_loggers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"level": "warn", "date": false, "loggers": {}}"#).unwrap();

        let registry = LoggerNameRegistry::new(&ctx(), temp_dir.path(), false).unwrap();
        registry
            .set(names(&[("Api", ColorPair::new(TermColor::Cyan, TermColor::White))]))
            .unwrap();

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["level"], json!("warn"));
        assert_eq!(value["date"], json!(false));
        assert_eq!(
            value["loggers"]["Api"],
            json!({"name": "Api", "colors": ["cyan", "white"]})
        );
    }

    #[test]
    fn test_merge_law() {
        let stored = names(&[
            ("Api", ColorPair::new(TermColor::Cyan, TermColor::White)),
            ("Db", ColorPair::new(TermColor::Blue, TermColor::White)),
        ]);
        let incoming = names(&[
            ("Api", DEFAULT_COLORS),
            ("Db", ColorPair::new(TermColor::Yellow, TermColor::Black)),
            ("Web", DEFAULT_COLORS),
        ]);

        let merged = merge(&incoming, &stored);

        // Default colors never overwrite a stored entry
        assert_eq!(merged["Api"].colors, stored["Api"].colors);
        // Explicit colors do
        assert_eq!(merged["Db"].colors, incoming["Db"].colors);
        // New names are added
        assert_eq!(merged["Web"].colors, DEFAULT_COLORS);

        let order: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["Api", "Db", "Web"]);
    }

    #[test]
    fn test_set_returns_input_and_persists_merge() {
        let temp_dir = TempDir::new().unwrap();
        let registry = LoggerNameRegistry::new(&ctx(), temp_dir.path(), true).unwrap();

        let incoming = names(&[("Success", DEFAULT_COLORS)]);
        let returned = registry.set(incoming.clone()).unwrap();
        assert_eq!(returned, incoming);

        let stored = registry.get().unwrap();
        assert_eq!(
            stored["Success"].colors,
            ColorPair::new(TermColor::Red, TermColor::Green)
        );
        assert!(stored.contains_key("Fail"));
    }

    #[test]
    fn test_unified_file_without_loggers_uses_seed() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"level": "warn"}"#).unwrap();

        let registry = LoggerNameRegistry::new(&ctx(), temp_dir.path(), false).unwrap();
        let stored = registry.get().unwrap();

        assert_eq!(
            stored["Success"].colors,
            ColorPair::new(TermColor::Red, TermColor::Green)
        );
        assert_eq!(
            stored["Fail"].colors,
            ColorPair::new(TermColor::Red, TermColor::Red)
        );
    }

    #[test]
    fn test_get_falls_back_to_cache_after_file_removed() {
        let temp_dir = TempDir::new().unwrap();
        let registry = LoggerNameRegistry::new(&ctx(), temp_dir.path(), true).unwrap();

        let api = ColorPair::new(TermColor::Cyan, TermColor::White);
        registry.set(names(&[("Api", api)])).unwrap();
        fs::remove_file(registry.path()).unwrap();

        let cached = registry.get().unwrap();
        assert_eq!(cached["Api"].colors, api);
        assert!(cached.contains_key("Success"));
        assert!(cached.contains_key("Fail"));
    }

    #[test]
    fn test_missing_names_are_repaired() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(LOGGERS_FILE_NAME),
            r#"{"Api": {"colors": ["cyan", "white"]}}"#,
        )
        .unwrap();

        let registry = LoggerNameRegistry::new(&ctx(), temp_dir.path(), false).unwrap();
        assert_eq!(registry.get().unwrap()["Api"].name, "Api");
    }

    #[test]
    fn test_corrupted_registry_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(LOGGERS_FILE_NAME), "{ nope").unwrap();
        assert!(LoggerNameRegistry::new(&ctx(), temp_dir.path(), false).is_err());
    }
}
