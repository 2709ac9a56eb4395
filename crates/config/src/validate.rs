//! Semantic checks on a loaded configuration.
//!
//! Parsing already rejects malformed documents; these checks flag values that
//! parse but are likely mistakes or unsafe.

use {secrecy::ExposeSecret, std::fmt};

use crate::schema::RosterConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted path, e.g. "auth.master_key"
    pub path: &'static str,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.path, self.message)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(&mut self, severity: Severity, path: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity,
            path,
            message: message.into(),
        });
    }
}

pub fn validate(config: &RosterConfig) -> ValidationResult {
    let mut result = ValidationResult::default();

    if config.server.bind.trim().is_empty() {
        result.push(Severity::Error, "server.bind", "bind address is empty");
    }
    if config.server.port == 0 {
        result.push(
            Severity::Warning,
            "server.port",
            "port 0 binds an ephemeral port chosen by the OS",
        );
    }

    match &config.auth.master_key {
        Some(key) if key.expose_secret().trim().is_empty() => {
            result.push(Severity::Error, "auth.master_key", "master key is empty");
        },
        Some(key) if key.expose_secret().contains("${") => {
            result.push(
                Severity::Warning,
                "auth.master_key",
                "master key still contains an unresolved ${...} placeholder",
            );
        },
        None if !config.server.is_loopback() => {
            result.push(
                Severity::Warning,
                "auth.master_key",
                format!(
                    "no master key set while listening on {}; every request is accepted",
                    config.server.bind
                ),
            );
        },
        _ => {},
    }

    result
}
