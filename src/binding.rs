//! Runtime surface of generated suites.
//!
//! Every generated file declares one `static SUITE: SuiteBinding` and routes
//! its tests through it: fixture tests call [`SuiteBinding::run`], the
//! per-group completeness tests call [`SuiteBinding::assert_complete`].
//! Relative corpus roots resolve against the working directory of the test
//! process, which is the package root under `cargo test`.

use anyhow::Context;

use crate::corpus::{MatchRule, RuleOptions};
use crate::drift::DriftGuard;
use crate::error::{log_suite_error, SuiteError};
use crate::runner::{Descriptor, FixtureRunner};

/// Everything a generated suite needs at run time.
pub struct SuiteBinding<'a> {
    pub name: &'a str,
    pub corpus_root: &'a str,
    pub pattern: &'a str,
    pub excluded: &'a [&'a str],
    pub options: RuleOptions,
    pub descriptor: &'a [(&'a str, &'a str)],
    pub runner: fn() -> &'static dyn FixtureRunner,
}

impl SuiteBinding<'_> {
    /// Compile the rule the suite was generated with.
    pub fn match_rule(&self) -> Result<MatchRule, SuiteError> {
        Ok(MatchRule::new(self.pattern, self.options)?.with_excluded(self.excluded))
    }

    pub fn descriptor(&self) -> Descriptor<'_> {
        Descriptor::new(self.descriptor)
    }

    /// Corpus root joined with a fixture's relative path.
    pub fn fixture_path(&self, relative_path: &str) -> String {
        let root = self.corpus_root.trim_end_matches('/');
        if root.is_empty() {
            relative_path.to_string()
        } else {
            format!("{root}/{relative_path}")
        }
    }

    /// Hand one fixture to the suite's runner.
    pub fn try_run(&self, relative_path: &str) -> anyhow::Result<()> {
        let fixture_path = self.fixture_path(relative_path);
        (self.runner)()
            .run_fixture(&fixture_path, self.descriptor())
            .with_context(|| format!("suite {} fixture {}", self.name, fixture_path))
    }

    /// Run one fixture, panicking with the runner's error chain on failure.
    pub fn run(&self, relative_path: &str) {
        if let Err(err) = self.try_run(relative_path) {
            panic!("{err:#}");
        }
    }

    /// Re-scan `group_dir` and compare it with the keys baked in at
    /// generation time.
    pub fn check_complete(&self, group_dir: &str, known: &[&str]) -> Result<(), SuiteError> {
        let rule = self.match_rule()?;
        DriftGuard::new(self.name, self.corpus_root, group_dir, &rule).check(known.iter().copied())
    }

    /// Completeness test body: panics with every divergent path.
    pub fn assert_complete(&self, group_dir: &str, known: &[&str]) {
        match self.check_complete(group_dir, known) {
            Ok(()) => {}
            Err(SuiteError::Drift { report }) => panic!("{report}"),
            Err(err) => {
                log_suite_error(&err, "assert_complete");
                panic!("{err}");
            }
        }
    }
}
