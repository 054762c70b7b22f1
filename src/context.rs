//! Process-wide state shared by configurators, registries and loggers
//!
//! A [`Context`] is created once by the application and handed to every
//! constructor. Cloning it is cheap and every clone sees the same state.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::color::{ColorPair, TermColor};
use crate::config::{DiagnosticPrinter, LoggerEntry, LoggerNames, StderrPrinter};

#[derive(Debug)]
struct ContextState {
    /// Root directory fixed by the first configurator
    root_dir: Option<PathBuf>,
    /// Last known logger → colors mapping
    names: LoggerNames,
}

/// Shared handle to the sticky root directory, the logger-name cache and the
/// diagnostic printer
#[derive(Clone)]
pub struct Context {
    state: Arc<RwLock<ContextState>>,
    printer: Arc<dyn DiagnosticPrinter>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("root_dir", &self.root_dir())
            .field("names", &self.names())
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Create a context that prints diagnostics to stderr
    pub fn new() -> Self {
        Self::with_printer(Arc::new(StderrPrinter))
    }

    /// Create a context with a custom diagnostic printer
    pub fn with_printer(printer: Arc<dyn DiagnosticPrinter>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ContextState {
                root_dir: None,
                names: seed_names(),
            })),
            printer,
        }
    }

    /// Printer for validation notices
    pub fn printer(&self) -> &dyn DiagnosticPrinter {
        self.printer.as_ref()
    }

    /// Root directory fixed by an earlier configurator, if any
    pub fn root_dir(&self) -> Option<PathBuf> {
        self.state.read().ok().and_then(|s| s.root_dir.clone())
    }

    /// Fix the root directory for later configurators
    pub fn set_root_dir(&self, dir: &Path) {
        if let Ok(mut state) = self.state.write() {
            state.root_dir = Some(dir.to_path_buf());
        }
    }

    /// Snapshot of the logger-name cache
    pub fn names(&self) -> LoggerNames {
        self.state
            .read()
            .map(|s| s.names.clone())
            .unwrap_or_default()
    }

    /// Remembered entry for one logger
    pub fn name(&self, name: &str) -> Option<LoggerEntry> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.names.get(name).cloned())
    }

    /// Insert or replace cache entries
    pub fn remember(&self, names: &LoggerNames) {
        if let Ok(mut state) = self.state.write() {
            for (name, entry) in names {
                state.names.insert(name.clone(), entry.clone());
            }
        }
    }
}

/// Entries the cache starts with before any file is read
fn seed_names() -> LoggerNames {
    [
        ("Success", ColorPair::new(TermColor::Red, TermColor::Green)),
        ("Fail", ColorPair::new(TermColor::Red, TermColor::Red)),
    ]
    .into_iter()
    .map(|(name, colors)| (name.to_string(), LoggerEntry::new(name, colors)))
    .collect()
}
