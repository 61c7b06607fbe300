// Error types for the fixture suite generator
//
// This module defines the error kinds raised while scanning a corpus,
// synthesizing identifiers, rendering suites and checking for drift, with
// stable error codes so CLI wrappers and generated suites report them the
// same way.

use std::fmt;

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent reporting from both the
/// generator CLI and the generated suites.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Log a suite error with structured context
///
/// Emits one error-level event carrying these fields:
/// - error_code: Numeric error code for programmatic handling
/// - component: The component where the error occurred
/// - context: The operation that failed
///
/// The human-readable message is the event message. Subscribers that only
/// see text (the `log` bridge included) still get every field in it.
pub fn log_suite_error(err: &SuiteError, context: &str) {
    tracing::error!(
        error_code = err.code(),
        component = err.component(),
        context,
        "Suite error in {}: code={}, component={}, message={}",
        context,
        err.code(),
        err.component(),
        err.message()
    );
}

/// Errors raised by the generator and the drift guard
///
/// Error code ranges: 3001-3007
#[derive(Debug, Clone, PartialEq)]
pub enum SuiteError {
    /// Corpus root (or a directory below it) could not be read
    CorpusUnreadable {
        path: String,
        pattern: String,
        details: String,
    },

    /// Match rule pattern does not compile
    InvalidPattern { pattern: String, details: String },

    /// Identifier disambiguation ran out of candidates
    NameCollision {
        group: String,
        identifier: String,
        fixtures: Vec<String>,
    },

    /// Live corpus diverged from the generated suite
    Drift { report: DriftReport },

    /// Suite configuration is malformed
    InvalidConfig { reason: String },

    /// Rendered suite could not be written
    OutputWrite { path: String, details: String },

    /// Committed suite differs from a fresh render
    StaleOutput { path: String },
}

impl SuiteError {
    /// Component name used in structured logs.
    pub fn component(&self) -> &'static str {
        match self {
            SuiteError::CorpusUnreadable { .. } | SuiteError::InvalidPattern { .. } => {
                "CorpusScanner"
            }
            SuiteError::NameCollision { .. } => "IdentifierSynthesizer",
            SuiteError::Drift { .. } => "DriftGuard",
            SuiteError::InvalidConfig { .. } => "Config",
            SuiteError::OutputWrite { .. } | SuiteError::StaleOutput { .. } => "SuiteEmitter",
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        SuiteError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl ErrorCode for SuiteError {
    fn code(&self) -> i32 {
        match self {
            SuiteError::CorpusUnreadable { .. } => 3001,
            SuiteError::InvalidPattern { .. } => 3002,
            SuiteError::NameCollision { .. } => 3003,
            SuiteError::Drift { .. } => 3004,
            SuiteError::InvalidConfig { .. } => 3005,
            SuiteError::OutputWrite { .. } => 3006,
            SuiteError::StaleOutput { .. } => 3007,
        }
    }

    fn message(&self) -> String {
        match self {
            SuiteError::CorpusUnreadable {
                path,
                pattern,
                details,
            } => {
                format!(
                    "Cannot read corpus at {} (pattern {}): {}",
                    path, pattern, details
                )
            }
            SuiteError::InvalidPattern { pattern, details } => {
                format!("Invalid fixture pattern {}: {}", pattern, details)
            }
            SuiteError::NameCollision {
                group,
                identifier,
                fixtures,
            } => {
                format!(
                    "Cannot derive a unique identifier from {} in group {}: {}",
                    identifier,
                    if group.is_empty() { "<root>" } else { group },
                    fixtures.join(", ")
                )
            }
            SuiteError::Drift { report } => report.to_string(),
            SuiteError::InvalidConfig { reason } => format!("Invalid configuration: {}", reason),
            SuiteError::OutputWrite { path, details } => {
                format!("Failed to write {}: {}", path, details)
            }
            SuiteError::StaleOutput { path } => {
                format!("{} is out of date; run `suitegen generate`", path)
            }
        }
    }
}

impl fmt::Display for SuiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiteError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for SuiteError {}

/// Divergence between the live corpus and one generated group.
///
/// `missing` keys were generated but are gone from disk, `unexpected` keys
/// exist on disk but have no generated counterpart. Both lists are sorted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DriftReport {
    pub suite: String,
    pub group: String,
    pub missing: Vec<String>,
    pub unexpected: Vec<String>,
}

impl DriftReport {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.unexpected.is_empty()
    }
}

impl fmt::Display for DriftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group = if self.group.is_empty() {
            "<root>"
        } else {
            self.group.as_str()
        };
        writeln!(
            f,
            "Fixture corpus for suite {} drifted in group {}; regenerate the suite or update its exclusions.",
            self.suite, group
        )?;
        for path in &self.missing {
            writeln!(f, "  missing:    {}", path)?;
        }
        for path in &self.unexpected {
            writeln!(f, "  unexpected: {}", path)?;
        }
        Ok(())
    }
}
