//! Generation pipeline: scan, build the hierarchy, plan, render, write.
//!
//! Every selected suite is rendered in memory before anything touches the
//! output tree, so a scan or render failure writes nothing. Changed files are
//! then staged next to their targets and renamed into place only once every
//! one of them was staged. A failed rename can still leave earlier suites
//! replaced and later ones untouched, but no output is ever half-written.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{GeneratorConfig, SuiteConfig};
use crate::corpus::CorpusScanner;
use crate::emit::{emitter_for, SuitePlan};
use crate::error::SuiteError;
use crate::hierarchy::HierarchyBuilder;

/// A rendered suite waiting to be written or compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSuite {
    pub name: String,
    pub path: PathBuf,
    pub contents: String,
}

/// Result of writing rendered suites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

/// Scan a suite's corpus and plan it.
pub fn plan_suite(suite: &SuiteConfig, config: &GeneratorConfig) -> Result<SuitePlan, SuiteError> {
    let rule = suite.match_rule()?;
    let root = config.resolve(&suite.corpus_root);
    let entries = CorpusScanner::new(&root, &rule).collect_sorted()?;
    let tree = HierarchyBuilder::from_entries(&suite.name, entries);
    let plan = SuitePlan::build_with_root(&tree, suite, &config.runtime_corpus_root(suite)?)?;
    tracing::info!(
        "[Generator] Planned suite {}: {} tests in {} groups",
        plan.name,
        plan.test_count(),
        plan.group_count()
    );
    Ok(plan)
}

/// Render every suite (or only `only`), failing before any write.
pub fn render_all(
    config: &GeneratorConfig,
    only: Option<&str>,
) -> Result<Vec<RenderedSuite>, SuiteError> {
    let selected: Vec<&SuiteConfig> = match only {
        Some(name) => vec![config
            .suite(name)
            .ok_or_else(|| SuiteError::config(format!("unknown suite: {name}")))?],
        None => config.suites.iter().collect(),
    };

    selected
        .into_iter()
        .map(|suite| {
            let plan = plan_suite(suite, config)?;
            let contents = emitter_for(suite.format).emit(&plan)?;
            Ok(RenderedSuite {
                name: suite.name.clone(),
                path: config.resolve(&suite.output),
                contents,
            })
        })
        .collect()
}

/// Write rendered suites, skipping files whose contents are unchanged.
///
/// Nothing is replaced until every changed file has been staged.
pub fn write_all(rendered: &[RenderedSuite]) -> Result<WriteSummary, SuiteError> {
    let mut summary = WriteSummary::default();
    let mut pending = Vec::new();
    for suite in rendered {
        if read_existing(&suite.path).as_deref() == Some(suite.contents.as_str()) {
            tracing::debug!("[Generator] {} is up to date", suite.path.display());
            summary.unchanged.push(suite.path.clone());
            continue;
        }
        match stage(suite) {
            Ok(staged) => pending.push((suite, staged)),
            Err(err) => {
                discard(pending.iter().map(|(_, staged)| staged));
                return Err(err);
            }
        }
    }

    for (index, (suite, staged)) in pending.iter().enumerate() {
        if let Err(err) = fs::rename(staged, &suite.path) {
            discard(pending[index..].iter().map(|(_, staged)| staged));
            return Err(write_error(&suite.path, err));
        }
        tracing::info!(
            "[Generator] Wrote suite {} to {}",
            suite.name,
            suite.path.display()
        );
        summary.written.push(suite.path.clone());
    }
    Ok(summary)
}

/// Write a suite to a sibling temp file and return its path.
fn stage(suite: &RenderedSuite) -> Result<PathBuf, SuiteError> {
    if let Some(parent) = suite.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| write_error(&suite.path, err))?;
    }
    let mut staged = suite.path.clone().into_os_string();
    staged.push(".suitegen.tmp");
    let staged = PathBuf::from(staged);
    fs::write(&staged, &suite.contents).map_err(|err| write_error(&suite.path, err))?;
    Ok(staged)
}

fn discard<'a>(staged: impl Iterator<Item = &'a PathBuf>) {
    for path in staged {
        if let Err(err) = fs::remove_file(path) {
            tracing::warn!("[Generator] Could not remove {}: {}", path.display(), err);
        }
    }
}

/// Compare rendered suites with what is on disk; returns one
/// [`SuiteError::StaleOutput`] per out-of-date file.
pub fn check_all(rendered: &[RenderedSuite]) -> Vec<SuiteError> {
    rendered
        .iter()
        .filter(|suite| read_existing(&suite.path).as_deref() != Some(suite.contents.as_str()))
        .map(|suite| {
            tracing::warn!("[Generator] {} is stale", suite.path.display());
            SuiteError::StaleOutput {
                path: suite.path.display().to_string(),
            }
        })
        .collect()
}

/// Render and write in one step.
pub fn generate(config: &GeneratorConfig, only: Option<&str>) -> Result<WriteSummary, SuiteError> {
    let rendered = render_all(config, only)?;
    write_all(&rendered)
}

fn read_existing(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok()
}

fn write_error(path: &Path, err: std::io::Error) -> SuiteError {
    SuiteError::OutputWrite {
        path: path.display().to_string(),
        details: err.to_string(),
    }
}
