//! JSON manifest of a suite plan for reporting layers.

use super::{SuiteEmitter, SuitePlan};
use crate::error::SuiteError;

pub struct ManifestEmitter;

impl SuiteEmitter for ManifestEmitter {
    fn emit(&self, plan: &SuitePlan) -> Result<String, SuiteError> {
        let mut json =
            serde_json::to_string_pretty(plan).map_err(|err| SuiteError::OutputWrite {
                path: plan.name.clone(),
                details: format!("failed to serialize manifest: {err}"),
            })?;
        json.push('\n');
        Ok(json)
    }
}
