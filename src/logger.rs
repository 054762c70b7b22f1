//! Named, colorized loggers
//!
//! A [`Logger`] loads the configuration through the shared [`Context`],
//! remembers its colors in the registry and mirrors messages to the daily log
//! file.

use std::error::Error;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::color::{paint, ColorPair, TermColor};
use crate::config::{Config, Configurator, Level, LoggerEntry, LoggerNames};
use crate::context::Context;
use crate::logging::LogFile;
use crate::registry::LoggerNameRegistry;

/// Construction options; everything unset falls back to the config
#[derive(Debug, Clone, Default)]
pub struct LoggerOptions {
    /// `[name color, text color]`
    pub colors: Option<ColorPair>,
    /// Write to this file instead of the dated one under `log/`
    pub file_path: Option<PathBuf>,
    /// Prefix for dated log file names
    pub prefix: Option<String>,
    /// Root directory, passed to the configurator as the `dir` override
    pub dir: Option<PathBuf>,
    /// Level of messages that don't name one
    pub level: Option<Level>,
    /// Mirror messages to the log file
    pub write: Option<bool>,
}

/// Per-message options
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    pub color: Option<TermColor>,
    pub level: Option<Level>,
    pub write: Option<bool>,
}

/// One rendered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Text with terminal colors applied
    pub colored: String,
    /// Text as written to the log file
    pub plain: String,
}

#[derive(Debug)]
pub struct Logger {
    name: String,
    colors: ColorPair,
    config: Config,
    root_dir: PathBuf,
    prefix: Option<String>,
    file_path: Option<PathBuf>,
    level: Level,
    write: bool,
    log: Option<LogFile>,
}

impl Logger {
    pub fn new(ctx: &Context, name: impl Into<String>, options: LoggerOptions) -> Result<Self> {
        let name = name.into();

        let mut overrides = Map::new();
        if let Some(dir) = &options.dir {
            overrides.insert(
                "dir".to_string(),
                Value::String(dir.to_string_lossy().into_owned()),
            );
        }
        let configurator = Configurator::new(ctx, Value::Object(overrides))
            .context("Failed to load logger configuration")?;

        // Remember colors across runs whenever logging to disk is enabled
        let registry = LoggerNameRegistry::new(
            ctx,
            configurator.root_dir(),
            configurator.extra().create_file || configurator.config().logging,
        )?;

        let colors = match options.colors {
            Some(colors) => colors,
            None => registry
                .get()?
                .get(&name)
                .map(|entry| entry.colors)
                .unwrap_or(configurator.config().colors),
        };

        let mut entry = LoggerNames::new();
        entry.insert(name.clone(), LoggerEntry::new(name.clone(), colors));
        registry.set(entry)?;

        let root_dir = configurator.root_dir().to_path_buf();
        let config = configurator.into_config();
        let level = options.level.unwrap_or(config.default_level);
        let write = options.write.unwrap_or(config.logging);

        let log = if write {
            Some(LogFile::open(
                &root_dir,
                options.prefix.as_deref(),
                options.file_path.as_deref(),
                config.deletion_interval,
            )?)
        } else {
            None
        };

        tracing::debug!(logger = %name, colors = %colors, "logger ready");

        Ok(Self {
            name,
            colors,
            config,
            root_dir,
            prefix: options.prefix,
            file_path: options.file_path,
            level,
            write,
            log,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn colors(&self) -> ColorPair {
        self.colors
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the log file, if one is open
    pub fn log_path(&self) -> Option<&std::path::Path> {
        self.log.as_ref().map(LogFile::path)
    }

    /// Print (subject to the level threshold) and log one message
    pub fn execute(&self, text: &str, options: ExecuteOptions) -> Result<Line> {
        let line = self.render(text, options.color);
        let level = options.level.unwrap_or(self.level);

        if self.config.should_print(level) {
            println!("{}{} {}", self.date_prefix(), self.label(), line.colored);
        }

        if options.write.unwrap_or(self.write) {
            self.log_file()?.append(&line.plain)?;
        }

        Ok(line)
    }

    /// Print several values on one console line and log each separately
    ///
    /// Strings are used as is; anything else is pretty-printed JSON.
    pub fn execute_lines(&self, values: &[Value], options: ExecuteOptions) -> Result<Vec<Line>> {
        let lines = values
            .iter()
            .map(|value| {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => serde_json::to_string_pretty(other)?,
                };
                Ok(self.render(&text, options.color))
            })
            .collect::<Result<Vec<_>>>()?;

        let level = options.level.unwrap_or(self.level);
        if self.config.should_print(level) {
            let joined: Vec<&str> = lines.iter().map(|l| l.colored.as_str()).collect();
            println!("{}{} {}", self.date_prefix(), self.label(), joined.join(" "));
        }

        if options.write.unwrap_or(self.write) {
            let log = self.log_file()?;
            for line in &lines {
                log.append(&line.plain)?;
            }
        }

        Ok(lines)
    }

    /// Log an error and its sources at error level
    pub fn error(&self, err: &dyn Error) -> Result<Line> {
        let mut text = format!("{}\n{}", ERROR_BANNER, err);
        let mut source = err.source();
        while let Some(cause) = source {
            text.push_str(&format!("\nCaused by: {}", cause));
            source = cause.source();
        }
        text.push('\n');
        text.push_str(ERROR_BANNER);

        self.execute(
            &text,
            ExecuteOptions {
                color: Some(TermColor::Red),
                level: Some(Level::Error),
                write: None,
            },
        )
    }

    fn render(&self, text: &str, color: Option<TermColor>) -> Line {
        let color = color.unwrap_or(self.colors.text());
        Line {
            colored: paint(text, color),
            plain: text.to_string(),
        }
    }

    fn label(&self) -> String {
        format!("{}:", paint(&self.name, self.colors.name()))
    }

    fn date_prefix(&self) -> String {
        if self.config.date {
            format!("[{}] ", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
        } else {
            String::new()
        }
    }

    /// The open log file, or a freshly opened one for a per-message write
    fn log_file(&self) -> Result<LogFile> {
        match &self.log {
            Some(log) => Ok(log.clone()),
            None => LogFile::open(
                &self.root_dir,
                self.prefix.as_deref(),
                self.file_path.as_deref(),
                self.config.deletion_interval,
            ),
        }
    }
}

const ERROR_BANNER: &str = "==================== ERROR ====================";
