//! Suite configuration loaded from JSON
//!
//! A generator config lists every suite to keep in sync with its corpus:
//! where the fixtures live, which files count as fixtures, where the
//! generated source goes, and which runner the generated tests call.
//! Relative paths are resolved against the directory holding the config
//! file. Generated suites run with the package root as working directory, so
//! the corpus root they carry is rebased onto it.

use std::collections::{BTreeMap, HashSet};
use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::corpus::{MatchRule, RuleOptions};
use crate::emit::OutputFormat;
use crate::error::SuiteError;

/// Complete generator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratorConfig {
    pub version: u32,
    /// Package whose tests include the generated suites. Defaults to the
    /// nearest ancestor of the config directory holding a `Cargo.toml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_root: Option<String>,
    pub suites: Vec<SuiteConfig>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// One generated suite: a corpus root and the rule selecting its fixtures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteConfig {
    pub name: String,
    /// Corpus root, relative to the config directory unless absolute.
    pub corpus_root: String,
    /// Destination of the generated file.
    pub output: String,
    /// Regex over file names (or relative paths in `full_path` mode).
    pub pattern: String,
    #[serde(default)]
    pub excluded: Vec<String>,
    #[serde(flatten)]
    pub options: RuleOptions,
    /// Path of a `fn() -> &'static dyn FixtureRunner` in the consuming crate.
    pub runner: String,
    /// Opaque descriptor passed unchanged to every runner call.
    #[serde(default)]
    pub descriptor: BTreeMap<String, String>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl SuiteConfig {
    /// Compile the suite's match rule.
    pub fn match_rule(&self) -> Result<MatchRule, SuiteError> {
        Ok(MatchRule::new(&self.pattern, self.options)?.with_excluded(&self.excluded))
    }

    fn validate(&self) -> Result<(), SuiteError> {
        if self.name.trim().is_empty() {
            return Err(SuiteError::config("suite name cannot be empty"));
        }
        if self.corpus_root.trim().is_empty() {
            return Err(SuiteError::config(format!(
                "suite {} must declare a corpus_root",
                self.name
            )));
        }
        if self.output.trim().is_empty() {
            return Err(SuiteError::config(format!(
                "suite {} must declare an output path",
                self.name
            )));
        }
        if self.pattern.is_empty() {
            return Err(SuiteError::config(format!(
                "suite {} must declare a fixture pattern",
                self.name
            )));
        }
        self.match_rule()?;
        if !is_rust_path(&self.runner) {
            return Err(SuiteError::config(format!(
                "suite {} runner must be a Rust path, got {:?}",
                self.name, self.runner
            )));
        }
        Ok(())
    }
}

impl GeneratorConfig {
    /// Load and validate a configuration file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SuiteError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| {
            SuiteError::config(format!("failed to read {}: {}", path.display(), err))
        })?;
        let mut base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        if base_dir.is_relative() {
            let cwd = env::current_dir().map_err(|err| {
                SuiteError::config(format!("cannot resolve {}: {}", path.display(), err))
            })?;
            base_dir = cwd.join(base_dir);
        }
        let config = Self::from_json(&contents, base_dir)?;
        log::info!(
            "[Config] Loaded {} suites from {:?}",
            config.suites.len(),
            path
        );
        Ok(config)
    }

    /// Parse configuration JSON and validate invariants.
    pub fn from_json(data: &str, base_dir: impl Into<PathBuf>) -> Result<Self, SuiteError> {
        let mut config: GeneratorConfig = serde_json::from_str(data)
            .map_err(|err| SuiteError::config(format!("failed to parse config JSON: {err}")))?;
        config.base_dir = base_dir.into();
        config.validate()?;
        Ok(config)
    }

    /// Return a single suite by name, if present.
    pub fn suite(&self, name: &str) -> Option<&SuiteConfig> {
        self.suites.iter().find(|suite| suite.name == name)
    }

    /// Resolve a configured path against the config directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base_dir.join(candidate)
        }
    }

    /// Directory generated suites resolve their corpus root against.
    pub fn package_dir(&self) -> PathBuf {
        match &self.package_root {
            Some(root) => lexical_normalize(&self.resolve(root)),
            None => {
                let base = lexical_normalize(&self.base_dir);
                base.ancestors()
                    .find(|dir| dir.join("Cargo.toml").is_file())
                    .map(Path::to_path_buf)
                    .unwrap_or(base)
            }
        }
    }

    /// Corpus root as spelled in the generated suite: relative to
    /// [`GeneratorConfig::package_dir`], or verbatim when configured absolute.
    pub fn runtime_corpus_root(&self, suite: &SuiteConfig) -> Result<String, SuiteError> {
        let configured = suite.corpus_root.trim_end_matches('/');
        if Path::new(configured).is_absolute() {
            return Ok(configured.to_string());
        }
        let corpus = lexical_normalize(&self.resolve(configured));
        let package = self.package_dir();
        let relative = pathdiff::diff_paths(&corpus, &package).ok_or_else(|| {
            SuiteError::config(format!(
                "suite {} corpus_root {} cannot be expressed relative to package root {}",
                suite.name,
                suite.corpus_root,
                package.display()
            ))
        })?;
        let parts: Vec<String> = relative
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect();
        if parts.is_empty() {
            Ok(".".to_string())
        } else {
            Ok(parts.join("/"))
        }
    }

    fn validate(&self) -> Result<(), SuiteError> {
        if self.version == 0 {
            return Err(SuiteError::config("config version must be > 0"));
        }
        if self.suites.is_empty() {
            return Err(SuiteError::config("config must contain at least one suite"));
        }

        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for suite in &self.suites {
            suite.validate()?;
            self.runtime_corpus_root(suite)?;
            if !names.insert(suite.name.as_str()) {
                return Err(SuiteError::config(format!(
                    "duplicate suite name detected: {}",
                    suite.name
                )));
            }
            if !outputs.insert(self.resolve(&suite.output)) {
                return Err(SuiteError::config(format!(
                    "suite {} writes to an output already used by another suite: {}",
                    suite.name, suite.output
                )));
            }
        }
        Ok(())
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }
    parts.iter().collect()
}

fn is_rust_path(candidate: &str) -> bool {
    match Regex::new(r"^(::)?[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$") {
        Ok(re) => re.is_match(candidate),
        Err(_) => false,
    }
}
