//! tintlog - Colorized named loggers driven by a validated JSON config
//!
//! This library provides the config pipeline (catalog, validator,
//! configurator), the logger-name registry and the logger front-end.

pub mod color;
pub mod config;
pub mod context;
pub mod logger;
pub mod logging;
pub mod registry;

pub use color::{paint, ColorPair, TermColor, DEFAULT_COLORS};
pub use config::{Config, ConfigError, Configurator, Level};
pub use context::Context;
pub use logger::{ExecuteOptions, Line, Logger, LoggerOptions};
pub use registry::LoggerNameRegistry;
