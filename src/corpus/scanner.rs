//! Filesystem walk producing [`FixtureEntry`] values for one corpus root.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{normalize_relative, EntryKind, FixtureEntry, MatchRule};
use crate::error::SuiteError;

/// Walks a corpus root and yields fixtures matching a [`MatchRule`].
///
/// The scanner holds no state between scans: every call to
/// [`CorpusScanner::entries`] walks the filesystem again.
pub struct CorpusScanner<'a> {
    root: PathBuf,
    scope: String,
    rule: &'a MatchRule,
}

impl<'a> CorpusScanner<'a> {
    pub fn new<P: Into<PathBuf>>(root: P, rule: &'a MatchRule) -> Self {
        Self {
            root: root.into(),
            scope: String::new(),
            rule,
        }
    }

    /// Restrict the walk to `group_dir` below the root. Relative paths stay
    /// relative to the corpus root.
    pub fn within(mut self, group_dir: &str) -> Self {
        self.scope = normalize_relative(group_dir);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn rule(&self) -> &MatchRule {
        self.rule
    }

    /// Start a fresh walk.
    ///
    /// Fails when the corpus root cannot be read. A scope directory that no
    /// longer exists yields an empty sequence.
    pub fn entries(&self) -> Result<ScanIter<'a>, SuiteError> {
        fs::read_dir(&self.root).map_err(|err| self.unreadable(&self.root, err.to_string()))?;

        let start = if self.scope.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&self.scope)
        };
        if !start.is_dir() {
            tracing::debug!(
                "[Scanner] Scope {} missing under {}",
                self.scope,
                self.root.display()
            );
            return Ok(ScanIter {
                root: self.root.clone(),
                rule: self.rule,
                walker: None,
            });
        }

        let mut walk = WalkDir::new(&start).min_depth(1).sort_by_file_name();
        if !self.rule.options().recursive {
            walk = walk.max_depth(1);
        }
        Ok(ScanIter {
            root: self.root.clone(),
            rule: self.rule,
            walker: Some(walk.into_iter()),
        })
    }

    /// Scan everything and return entries sorted by relative path.
    ///
    /// This is the single deterministic merge point before a hierarchy is
    /// built; any walk error aborts the whole scan.
    pub fn collect_sorted(&self) -> Result<Vec<FixtureEntry>, SuiteError> {
        let mut entries = self.entries()?.collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        tracing::debug!(
            "[Scanner] {} fixtures under {} match {}",
            entries.len(),
            self.root.display(),
            self.rule.pattern()
        );
        Ok(entries)
    }

    fn unreadable(&self, path: &Path, details: String) -> SuiteError {
        SuiteError::CorpusUnreadable {
            path: path.display().to_string(),
            pattern: self.rule.pattern().to_string(),
            details,
        }
    }
}

/// Lazy sequence of fixtures from one walk.
pub struct ScanIter<'a> {
    root: PathBuf,
    rule: &'a MatchRule,
    walker: Option<walkdir::IntoIter>,
}

impl Iterator for ScanIter<'_> {
    type Item = Result<FixtureEntry, SuiteError>;

    fn next(&mut self) -> Option<Self::Item> {
        let match_directories = self.rule.options().match_directories;
        loop {
            let walker = self.walker.as_mut()?;
            let entry = match walker.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    // A failed walk is not resumable.
                    self.walker = None;
                    return Some(Err(SuiteError::CorpusUnreadable {
                        path: path.display().to_string(),
                        pattern: self.rule.pattern().to_string(),
                        details: err.to_string(),
                    }));
                }
            };

            let relative = relative_path(&self.root, entry.path());
            let file_name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_dir();

            if self.rule.is_excluded(&file_name, &relative) {
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            if is_dir {
                if match_directories {
                    if let Some(name) = self.rule.test_name(&file_name, &relative) {
                        walker.skip_current_dir();
                        return Some(Ok(FixtureEntry::new(relative, name, EntryKind::Directory)));
                    }
                }
                continue;
            }

            if match_directories || !entry.path().is_file() {
                continue;
            }
            if let Some(name) = self.rule.test_name(&file_name, &relative) {
                return Some(Ok(FixtureEntry::new(relative, name, EntryKind::File)));
            }
        }
    }
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
