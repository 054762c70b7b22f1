//! Per-setting validation
//!
//! Absent values degrade to the catalog default; everything else is either
//! accepted (possibly repaired) or rejected with a typed error.

use serde_json::Value;

use super::catalog::SettingKey;
use super::error::ConfigError;
use super::kind::classify;
use super::remediation::{Diagnostic, DiagnosticPrinter};

/// Validates raw values against the settings catalog
pub struct Validator<'a> {
    printer: &'a dyn DiagnosticPrinter,
    /// Label for the text being validated, shown in remediation reports
    origin: &'a str,
}

impl<'a> Validator<'a> {
    pub fn new(printer: &'a dyn DiagnosticPrinter, origin: &'a str) -> Self {
        Self { printer, origin }
    }

    /// Validate one setting
    ///
    /// `text` is the serialized source the value was read from; it is only
    /// used to point at the offending span when a value is rejected.
    pub fn validate(
        &self,
        key: SettingKey,
        raw: Option<&Value>,
        text: &str,
    ) -> Result<Value, ConfigError> {
        let spec = key.spec();

        let value = match raw {
            Some(value) if !is_absent(value) => value,
            _ => {
                let default = spec.default_value();
                tracing::debug!(key = key.as_str(), "setting missing, using default");
                self.printer.print(&Diagnostic::MissingValue {
                    key: key.as_str().to_string(),
                    default: default.clone(),
                    allowed: spec.allowed_list(),
                    hint: spec.hint,
                });
                return Ok(default);
            }
        };

        let classification = classify(spec.kind, value);
        if !classification.matches {
            return Err(ConfigError::TypeMismatch {
                key: key.as_str().to_string(),
                actual: classification.actual,
                required: classification.required,
                value: value.clone(),
            });
        }

        if let Some(allowed) = spec.allowed {
            let permitted = value
                .as_str()
                .map(|s| allowed.contains(&s))
                .unwrap_or(false);
            if !permitted {
                return Err(self.reject(
                    ConfigError::NotAllowed {
                        key: key.as_str().to_string(),
                        value: value.clone(),
                        allowed: spec.allowed_list(),
                    },
                    value,
                    text,
                ));
            }
        }

        spec.check(value.clone())
            .map_err(|err| self.reject(err, value, text))
    }

    /// Print the remediation report for `err` (when useful) and hand it back
    fn reject(&self, err: ConfigError, value: &Value, text: &str) -> ConfigError {
        if err.wants_remediation() {
            if let Some(key) = err.key() {
                let allowed = match &err {
                    ConfigError::NotAllowed { allowed, .. } => allowed.clone(),
                    _ => Vec::new(),
                };
                self.printer.print(&Diagnostic::remediation(
                    key,
                    value,
                    allowed,
                    self.origin,
                    text,
                ));
            }
        }
        err
    }
}

/// Missing, `null` and empty strings count as "not set"; `false` and `0` don't
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
