//! Rendering of planned suites into committed artifacts.
//!
//! Emitters only see a [`SuitePlan`]; identifiers and ordering are settled
//! before rendering starts, so every emitter is deterministic by
//! construction.

use serde::{Deserialize, Serialize};

use crate::error::SuiteError;

pub mod manifest;
pub mod plan;
pub mod rust;

pub use manifest::ManifestEmitter;
pub use plan::{CompletenessCheck, GeneratedTest, PlannedGroup, SuitePlan};
pub use rust::RustEmitter;

/// Output format selected per suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Rust test module (the default).
    #[default]
    Rust,
    /// Pretty JSON manifest of the plan.
    Manifest,
}

/// Renders a suite plan to text.
pub trait SuiteEmitter {
    fn emit(&self, plan: &SuitePlan) -> Result<String, SuiteError>;
}

/// Emitter for a configured output format.
pub fn emitter_for(format: OutputFormat) -> Box<dyn SuiteEmitter> {
    match format {
        OutputFormat::Rust => Box::new(RustEmitter),
        OutputFormat::Manifest => Box::new(ManifestEmitter),
    }
}
