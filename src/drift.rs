//! Runtime completeness check for generated suites.
//!
//! A generated group bakes in the set of keys it knew about at generation
//! time. The guard re-scans the live corpus with the same rule, projects what
//! it finds onto the group's level and reports the symmetric difference. It
//! never reads generator output; the known keys are all it gets.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::corpus::{normalize_relative, CorpusScanner, FixtureEntry, MatchRule};
use crate::error::{DriftReport, SuiteError};

/// Key a fixture contributes to the completeness check of `group_dir`.
///
/// Fixtures directly in the group keep their locator path; deeper fixtures
/// collapse onto the child group directory they live under (`a/sub/`).
pub fn level_key(group_dir: &str, entry: &FixtureEntry) -> String {
    let depth = group_dir.split('/').filter(|part| !part.is_empty()).count();
    match entry.parent_group_path.get(depth) {
        None => entry.locator_path(),
        Some(child) if depth == 0 => format!("{child}/"),
        Some(child) => format!("{group_dir}/{child}/"),
    }
}

/// Completeness check for one group of one suite.
pub struct DriftGuard<'a> {
    suite: &'a str,
    corpus_root: PathBuf,
    group_dir: String,
    rule: &'a MatchRule,
}

impl<'a> DriftGuard<'a> {
    pub fn new(
        suite: &'a str,
        corpus_root: impl Into<PathBuf>,
        group_dir: &str,
        rule: &'a MatchRule,
    ) -> Self {
        Self {
            suite,
            corpus_root: corpus_root.into(),
            group_dir: normalize_relative(group_dir),
            rule,
        }
    }

    /// Level keys present on disk right now.
    pub fn observe(&self) -> Result<BTreeSet<String>, SuiteError> {
        let scanner = CorpusScanner::new(&self.corpus_root, self.rule).within(&self.group_dir);
        let mut observed = BTreeSet::new();
        for entry in scanner.entries()? {
            observed.insert(level_key(&self.group_dir, &entry?));
        }
        Ok(observed)
    }

    /// Compare the live corpus with the keys known at generation time.
    pub fn compare<I, S>(&self, known: I) -> Result<DriftReport, SuiteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let known: BTreeSet<String> = known
            .into_iter()
            .map(|key| key.as_ref().to_string())
            .collect();
        let observed = self.observe()?;
        Ok(DriftReport {
            suite: self.suite.to_string(),
            group: self.group_dir.clone(),
            missing: known.difference(&observed).cloned().collect(),
            unexpected: observed.difference(&known).cloned().collect(),
        })
    }

    /// Fail with [`SuiteError::Drift`] when the corpus diverged.
    pub fn check<I, S>(&self, known: I) -> Result<(), SuiteError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let report = self.compare(known)?;
        if report.is_empty() {
            return Ok(());
        }
        tracing::warn!(
            "[DriftGuard] Suite {} group {:?}: {} missing, {} unexpected",
            report.suite,
            report.group,
            report.missing.len(),
            report.unexpected.len()
        );
        Err(SuiteError::Drift { report })
    }
}
