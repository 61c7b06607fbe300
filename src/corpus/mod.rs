//! Corpus model: the match rule that decides which files are fixtures and the
//! entries a scan yields.
//!
//! A [`MatchRule`] is compiled once per suite and shared by the offline
//! generator and the runtime drift guard, so both sides agree on what a
//! fixture is. Matching only looks at names and paths, never at content.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::SuiteError;

pub mod scanner;

pub use scanner::{CorpusScanner, ScanIter};

/// Switches that refine how a pattern is applied to the corpus.
///
/// All fields are plain booleans so generated suites can spell the value out
/// as a `static` initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Compare pattern and exclusions with exact ASCII case.
    pub case_sensitive: bool,
    /// Match the pattern against the relative path instead of the file name.
    pub full_path: bool,
    /// Descend into subdirectories of the corpus root.
    pub recursive: bool,
    /// Treat matching directories (not files) as fixtures.
    pub match_directories: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            full_path: false,
            recursive: true,
            match_directories: false,
        }
    }
}

/// Compiled fixture rule: pattern, exclusions and options.
#[derive(Debug, Clone)]
pub struct MatchRule {
    pattern: String,
    regex: Regex,
    excluded: BTreeSet<String>,
    options: RuleOptions,
}

impl MatchRule {
    /// Compile `pattern` with the given options.
    pub fn new(pattern: &str, options: RuleOptions) -> Result<Self, SuiteError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(!options.case_sensitive)
            .build()
            .map_err(|err| SuiteError::InvalidPattern {
                pattern: pattern.to_string(),
                details: err.to_string(),
            })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
            excluded: BTreeSet::new(),
            options,
        })
    }

    /// Add exclusions, each either a bare name or a path relative to the
    /// corpus root.
    pub fn with_excluded<I, S>(mut self, excluded: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for item in excluded {
            let normalized = normalize_relative(item.as_ref());
            if !normalized.is_empty() {
                self.excluded.insert(normalized);
            }
        }
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn options(&self) -> RuleOptions {
        self.options
    }

    /// Normalized exclusions in sorted order.
    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.excluded.iter().map(String::as_str)
    }

    /// Returns true when the entry is excluded by name or by relative path.
    pub fn is_excluded(&self, file_name: &str, relative_path: &str) -> bool {
        if self.options.case_sensitive {
            return self.excluded.contains(file_name) || self.excluded.contains(relative_path);
        }
        self.excluded.iter().any(|item| {
            item.eq_ignore_ascii_case(file_name) || item.eq_ignore_ascii_case(relative_path)
        })
    }

    /// Apply the pattern to an entry and return the extracted test name.
    ///
    /// The first capture group is the name when the pattern has one (and the
    /// pattern runs against the file name); otherwise the file name itself.
    pub fn test_name(&self, file_name: &str, relative_path: &str) -> Option<TestName> {
        let subject = if self.options.full_path {
            relative_path
        } else {
            file_name
        };
        let captures = self.regex.captures(subject)?;
        if !self.options.full_path {
            if let Some(stem) = captures.get(1).filter(|m| !m.as_str().is_empty()) {
                return Some(TestName::Captured(stem.as_str().to_string()));
            }
        }
        Some(TestName::FileName(file_name.to_string()))
    }
}

/// Name extracted from a fixture by the match rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TestName {
    /// Capture group text; already free of the fixture extension.
    Captured(String),
    /// Whole file name; the extension still has to be stripped.
    FileName(String),
}

impl TestName {
    pub fn as_str(&self) -> &str {
        match self {
            TestName::Captured(name) | TestName::FileName(name) => name,
        }
    }
}

/// Whether a fixture is a file or a whole directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// A single fixture found by a scan. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureEntry {
    /// `/`-separated path relative to the corpus root.
    pub relative_path: String,
    pub file_name: String,
    /// Directory names between the corpus root and the fixture.
    pub parent_group_path: Vec<String>,
    pub test_name: TestName,
    pub kind: EntryKind,
}

impl FixtureEntry {
    pub fn new(relative_path: String, test_name: TestName, kind: EntryKind) -> Self {
        let mut parts: Vec<String> = relative_path.split('/').map(str::to_string).collect();
        let file_name = parts.pop().unwrap_or_default();
        Self {
            relative_path,
            file_name,
            parent_group_path: parts,
            test_name,
            kind,
        }
    }

    /// Path handed to runners and baked into completeness checks; directory
    /// fixtures carry a trailing slash.
    pub fn locator_path(&self) -> String {
        match self.kind {
            EntryKind::File => self.relative_path.clone(),
            EntryKind::Directory => format!("{}/", self.relative_path),
        }
    }

    /// Directory of the group holding this fixture (`""` for the root).
    pub fn group_dir(&self) -> String {
        self.parent_group_path.join("/")
    }

    /// True when the identifier synthesizer still has to drop an extension.
    pub fn needs_extension_strip(&self) -> bool {
        self.kind == EntryKind::File && matches!(self.test_name, TestName::FileName(_))
    }
}

/// Normalize a user-supplied relative path to the `/`-separated form used
/// for entries.
pub fn normalize_relative(path: &str) -> String {
    let unified = path.trim().replace('\\', "/");
    unified
        .split('/')
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}
