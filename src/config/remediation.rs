//! Human-oriented notices printed while validating a config
//!
//! Two kinds exist: a notice that a value was missing and got its default, and
//! a remediation report that points at the offending span of the file. Both go
//! through a [`DiagnosticPrinter`] owned by the [`Context`](crate::Context), so
//! embedding applications (and tests) can redirect them.

use std::fmt;
use std::ops::Range;

use serde_json::Value;

use crate::color::{paint, TermColor};

/// Something worth telling the person who edits the config file
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A setting was absent and fell back to its default
    MissingValue {
        key: String,
        default: Value,
        allowed: Vec<String>,
        hint: Option<&'static str>,
    },
    /// A setting was rejected; shows where it sits in the source text
    Remediation {
        key: String,
        value: Value,
        allowed: Vec<String>,
        /// Where the text came from (a file name or "configurator overrides")
        origin: String,
        text: String,
        span: Option<Range<usize>>,
    },
}

impl Diagnostic {
    /// Build a remediation report, locating `key` and `value` inside `text`
    pub fn remediation(
        key: &str,
        value: &Value,
        allowed: Vec<String>,
        origin: &str,
        text: &str,
    ) -> Self {
        Diagnostic::Remediation {
            key: key.to_string(),
            value: value.clone(),
            allowed,
            origin: origin.to_string(),
            text: text.to_string(),
            span: locate(text, key, value),
        }
    }

    /// The highlighted excerpt, if the offending span was found
    pub fn highlighted_text(&self) -> Option<&str> {
        match self {
            Diagnostic::Remediation {
                text,
                span: Some(span),
                ..
            } => text.get(span.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingValue {
                key,
                default,
                allowed,
                hint,
            } => {
                writeln!(f, "Value at key \"{}\" is not defined", key)?;
                writeln!(f, "This value can be: {}", default)?;
                if !allowed.is_empty() {
                    writeln!(f, "Or other allowed values: {}", allowed.join(", "))?;
                }
                if let Some(hint) = hint {
                    writeln!(f, "{}", hint)?;
                }
                write!(f, "(Do not worry, the default value is used)")
            }
            Diagnostic::Remediation {
                key,
                value,
                allowed,
                origin,
                text,
                span,
            } => {
                writeln!(f, "To fix this error:")?;
                writeln!(f, "Open {}", origin)?;
                match allowed.first() {
                    Some(first) => writeln!(
                        f,
                        "Find key \"{}\" and replace your value ({}) with \"{}\" (or another: {})",
                        key,
                        value,
                        first,
                        allowed.join(", ")
                    )?,
                    None => writeln!(f, "Find key \"{}\" and replace your value ({})", key, value)?,
                }

                let banner = paint(
                    "The part with the error is highlighted in magenta",
                    TermColor::BgMagenta,
                );
                writeln!(f, "{}", banner)?;
                writeln!(f, "See your file:")?;
                match span {
                    Some(span) if text.get(span.clone()).is_some() => {
                        let marked = paint(&text[span.clone()], TermColor::BgBrightMagenta);
                        writeln!(f, "{}{}{}", &text[..span.start], marked, &text[span.end..])?;
                    }
                    _ => writeln!(f, "{}", text)?,
                }
                write!(f, "{}", banner)
            }
        }
    }
}

/// Find the byte range covering `"key"` through its value inside `text`
///
/// Falls back to the end of the key's line when the value isn't written in
/// compact form (pretty-printed arrays and objects).
pub fn locate(text: &str, key: &str, value: &Value) -> Option<Range<usize>> {
    let start = text.find(&format!("\"{}\"", key))?;
    let rest = &text[start..];

    let compact = value.to_string();
    let end = match rest.find(&compact) {
        Some(pos) => start + pos + compact.len(),
        None => start + rest.find('\n').unwrap_or(rest.len()),
    };

    Some(start..end)
}

/// Sink for diagnostics
pub trait DiagnosticPrinter: Send + Sync {
    fn print(&self, diagnostic: &Diagnostic);
}

/// Writes diagnostics to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrPrinter;

impl DiagnosticPrinter for StderrPrinter {
    fn print(&self, diagnostic: &Diagnostic) {
        eprintln!("{}", diagnostic);
    }
}

/// Discards diagnostics
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPrinter;

impl DiagnosticPrinter for SilentPrinter {
    fn print(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps every diagnostic in memory
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingPrinter {
    seen: std::sync::Mutex<Vec<Diagnostic>>,
}

#[cfg(test)]
impl RecordingPrinter {
    pub(crate) fn seen(&self) -> Vec<Diagnostic> {
        self.seen.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl DiagnosticPrinter for RecordingPrinter {
    fn print(&self, diagnostic: &Diagnostic) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(diagnostic.clone());
        }
    }
}
