//! Emitter-independent form of one suite.
//!
//! Planning is where identifiers are claimed. Fixtures are claimed in
//! relative-path order, child groups in name order; only afterwards are tests
//! and children sorted by identifier for emission.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::SuiteConfig;
use crate::corpus::{normalize_relative, EntryKind, FixtureEntry, RuleOptions};
use crate::error::SuiteError;
use crate::hierarchy::GroupNode;
use crate::identifier::{sanitize, Identifier, IdentifierScope};

/// Name of the static every generated suite binds its runtime to.
pub const SUITE_BINDING: &str = "SUITE";

/// Prefix of the per-group completeness check method.
pub const COMPLETENESS_PREFIX: &str = "AllFilesPresentIn";

/// One suite ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuitePlan {
    pub name: String,
    pub corpus_root: String,
    pub pattern: String,
    pub excluded: Vec<String>,
    pub options: RuleOptions,
    pub runner: String,
    pub descriptor: BTreeMap<String, String>,
    pub root: PlannedGroup,
}

/// One generated group (a `mod` in Rust output).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedGroup {
    pub identifier: String,
    /// Directory relative to the corpus root, `""` for the root group.
    pub dir_path: String,
    pub completeness: CompletenessCheck,
    /// Sorted by method name.
    pub tests: Vec<GeneratedTest>,
    /// Sorted by identifier.
    pub children: Vec<PlannedGroup>,
}

/// The drift check emitted once per group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletenessCheck {
    pub method_name: String,
    /// Level keys known at generation time, sorted.
    pub known: Vec<String>,
}

/// One fixture test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedTest {
    pub identifier: Identifier,
    pub method_name: String,
    /// Corpus root joined with the locator.
    pub fixture_path: String,
    /// Path relative to the corpus root; directories end with `/`.
    pub locator: String,
    pub kind: EntryKind,
    /// Descriptor handed to the runner for this test.
    pub metadata: BTreeMap<String, String>,
}

impl SuitePlan {
    /// Plan a suite from its group tree, emitting the corpus root as configured.
    pub fn build(tree: &GroupNode, suite: &SuiteConfig) -> Result<Self, SuiteError> {
        Self::build_with_root(tree, suite, &suite.corpus_root)
    }

    /// Plan a suite whose generated code reaches the corpus through `corpus_root`.
    pub fn build_with_root(
        tree: &GroupNode,
        suite: &SuiteConfig,
        corpus_root: &str,
    ) -> Result<Self, SuiteError> {
        let corpus_root = corpus_root.trim_end_matches('/').to_string();
        let planner = Planner {
            corpus_root: &corpus_root,
            descriptor: &suite.descriptor,
        };
        let root_identifier = sanitize(&suite.name, false);
        let root = planner.group(tree, root_identifier)?;

        let mut excluded: Vec<String> = suite
            .excluded
            .iter()
            .map(|item| normalize_relative(item))
            .filter(|item| !item.is_empty())
            .collect();
        excluded.sort();
        excluded.dedup();

        Ok(Self {
            name: suite.name.clone(),
            corpus_root,
            pattern: suite.pattern.clone(),
            excluded,
            options: suite.options,
            runner: suite.runner.clone(),
            descriptor: suite.descriptor.clone(),
            root,
        })
    }

    /// Number of fixture tests in the whole plan.
    pub fn test_count(&self) -> usize {
        self.root.test_count()
    }

    /// Number of groups, the root included.
    pub fn group_count(&self) -> usize {
        self.root.group_count()
    }
}

impl PlannedGroup {
    pub fn test_count(&self) -> usize {
        self.tests.len()
            + self
                .children
                .iter()
                .map(PlannedGroup::test_count)
                .sum::<usize>()
    }

    pub fn group_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(PlannedGroup::group_count)
            .sum::<usize>()
    }

    /// Follow a `/`-separated directory path down the plan.
    pub fn find(&self, dir_path: &str) -> Option<&PlannedGroup> {
        let target = normalize_relative(dir_path);
        if target == self.dir_path {
            return Some(self);
        }
        self.children.iter().find_map(|child| {
            let prefix = format!("{}/", child.dir_path);
            if target == child.dir_path || target.starts_with(&prefix) {
                child.find(&target)
            } else {
                None
            }
        })
    }
}

struct Planner<'a> {
    corpus_root: &'a str,
    descriptor: &'a BTreeMap<String, String>,
}

impl Planner<'_> {
    fn group(&self, node: &GroupNode, identifier: String) -> Result<PlannedGroup, SuiteError> {
        let completeness_ident = format!("{COMPLETENESS_PREFIX}{identifier}");
        let mut fixture_scope = IdentifierScope::new(node.dir_path.clone());
        fixture_scope.reserve(&completeness_ident, "<completeness check>");
        let mut group_scope = IdentifierScope::new(node.dir_path.clone());
        group_scope.reserve(SUITE_BINDING, "<suite binding>");

        let mut fixtures: Vec<&FixtureEntry> = node.fixtures.iter().collect();
        fixtures.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        let mut tests = Vec::with_capacity(fixtures.len());
        for entry in fixtures {
            let identifier = fixture_scope.claim(
                entry.test_name.as_str(),
                entry.needs_extension_strip(),
                &entry.relative_path,
            )?;
            tests.push(self.test(entry, identifier));
        }
        tests.sort_by(|a, b| a.method_name.cmp(&b.method_name));

        let mut children_nodes: Vec<&GroupNode> = node.children.iter().collect();
        children_nodes.sort_by(|a, b| a.name.cmp(&b.name));
        let mut children = Vec::with_capacity(children_nodes.len());
        for child in children_nodes {
            let identifier = group_scope.claim(&child.name, false, &child.dir_path)?;
            children.push(self.group(child, identifier.disambiguated)?);
        }
        children.sort_by(|a, b| a.identifier.cmp(&b.identifier));

        let mut known: Vec<String> = tests
            .iter()
            .map(|test| test.locator.clone())
            .chain(children.iter().map(|child| format!("{}/", child.dir_path)))
            .collect();
        known.sort();

        Ok(PlannedGroup {
            identifier,
            dir_path: node.dir_path.clone(),
            completeness: CompletenessCheck {
                method_name: format!("test{completeness_ident}"),
                known,
            },
            tests,
            children,
        })
    }

    fn test(&self, entry: &FixtureEntry, identifier: Identifier) -> GeneratedTest {
        let locator = entry.locator_path();
        let fixture_path = if self.corpus_root.is_empty() {
            locator.clone()
        } else {
            format!("{}/{}", self.corpus_root, locator)
        };
        GeneratedTest {
            method_name: format!("test{}", identifier.as_str()),
            identifier,
            fixture_path,
            locator,
            kind: entry.kind,
            metadata: self.descriptor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::TestName;
    use crate::emit::OutputFormat;
    use crate::hierarchy::HierarchyBuilder;

    fn suite_config() -> SuiteConfig {
        SuiteConfig {
            name: "parser".to_string(),
            corpus_root: "testData/parser/".to_string(),
            output: "tests/parser.rs".to_string(),
            pattern: r"^(.+)\.kt$".to_string(),
            excluded: vec!["./broken.kt".to_string()],
            options: RuleOptions::default(),
            runner: "crate::runners::parser".to_string(),
            descriptor: BTreeMap::from([("frontend".to_string(), "fir".to_string())]),
            format: OutputFormat::Rust,
        }
    }

    fn entry(path: &str) -> FixtureEntry {
        let file_name = path.rsplit('/').next().unwrap();
        let stem = file_name
            .strip_suffix(".kt")
            .unwrap_or(file_name)
            .to_string();
        FixtureEntry::new(path.to_string(), TestName::Captured(stem), EntryKind::File)
    }

    fn plan(paths: &[&str]) -> SuitePlan {
        let tree = HierarchyBuilder::from_entries("parser", paths.iter().map(|p| entry(p)));
        SuitePlan::build(&tree, &suite_config()).unwrap()
    }

    fn method_names(group: &PlannedGroup) -> Vec<&str> {
        group.tests.iter().map(|t| t.method_name.as_str()).collect()
    }

    #[test]
    fn plans_nested_groups() {
        let plan = plan(&["a/X.kt", "a/Y.kt", "b/sub/Z.kt"]);
        assert_eq!(plan.corpus_root, "testData/parser");
        assert_eq!(plan.excluded, vec!["broken.kt"]);
        assert_eq!(plan.root.identifier, "Parser");
        assert_eq!(
            plan.root.completeness.method_name,
            "testAllFilesPresentInParser"
        );
        assert_eq!(plan.root.completeness.known, vec!["a/", "b/"]);
        assert_eq!(plan.test_count(), 3);
        assert_eq!(plan.group_count(), 4);

        let a = plan.root.find("a").unwrap();
        assert_eq!(a.identifier, "A");
        assert_eq!(method_names(a), vec!["testX", "testY"]);
        assert_eq!(a.completeness.known, vec!["a/X.kt", "a/Y.kt"]);
        assert_eq!(a.tests[0].fixture_path, "testData/parser/a/X.kt");
        assert_eq!(a.tests[0].metadata["frontend"], "fir");

        let b = plan.root.find("b").unwrap();
        assert!(b.tests.is_empty());
        assert_eq!(b.completeness.known, vec!["b/sub/"]);
        let sub = plan.root.find("b/sub").unwrap();
        assert_eq!(sub.identifier, "Sub");
        assert_eq!(sub.completeness.method_name, "testAllFilesPresentInSub");
        assert_eq!(sub.completeness.known, vec!["b/sub/Z.kt"]);
    }

    #[test]
    fn case_variants_get_distinct_identifiers() {
        let plan = plan(&["Foo.kt", "foo.kt"]);
        assert_eq!(method_names(&plan.root), vec!["testFoo", "testFoo__2"]);
        let second = &plan.root.tests[1];
        assert_eq!(second.locator, "foo.kt");
        assert!(second.identifier.was_disambiguated());
    }

    #[test]
    fn literal_suffixes_are_not_disambiguation() {
        let plan = plan(&["kt19747.kt", "kt19747_2.kt"]);
        assert_eq!(
            method_names(&plan.root),
            vec!["testKt19747", "testKt19747_2"]
        );
    }

    #[test]
    fn completeness_name_is_reserved() {
        let plan = plan(&["AllFilesPresentInParser.kt", "x.kt"]);
        assert_eq!(
            method_names(&plan.root),
            vec!["testAllFilesPresentInParser__2", "testX"]
        );
    }

    #[test]
    fn suite_binding_name_is_reserved_for_groups() {
        let plan = plan(&["SUITE/a.kt"]);
        assert_eq!(plan.root.children[0].identifier, "SUITE__2");
    }

    #[test]
    fn adding_a_fixture_elsewhere_keeps_identifiers() {
        let before = plan(&["a/Foo.kt", "a/foo.kt", "b/x.kt"]);
        let after = plan(&["a/Foo.kt", "a/foo.kt", "b/Foo.kt", "b/x.kt", "c/foo.kt"]);
        assert_eq!(before.root.find("a"), after.root.find("a"));
        assert_eq!(
            method_names(after.root.find("b").unwrap()),
            vec!["testFoo", "testX"]
        );
    }

    #[test]
    fn directory_fixtures_keep_trailing_slash() {
        let tree = HierarchyBuilder::from_entries(
            "abi",
            [FixtureEntry::new(
                "addEnumEntry".to_string(),
                TestName::FileName("addEnumEntry".to_string()),
                EntryKind::Directory,
            )],
        );
        let plan = SuitePlan::build(&tree, &suite_config()).unwrap();
        let test = &plan.root.tests[0];
        assert_eq!(test.method_name, "testAddEnumEntry");
        assert_eq!(test.locator, "addEnumEntry/");
        assert_eq!(plan.root.completeness.known, vec!["addEnumEntry/"]);
    }

    #[test]
    fn tests_sort_by_method_name_not_path() {
        let tree = HierarchyBuilder::from_entries(
            "s",
            [
                FixtureEntry::new(
                    "b.kt".into(),
                    TestName::Captured("zeta".into()),
                    EntryKind::File,
                ),
                FixtureEntry::new(
                    "a.kt".into(),
                    TestName::Captured("alpha".into()),
                    EntryKind::File,
                ),
            ],
        );
        let plan = SuitePlan::build(&tree, &suite_config()).unwrap();
        assert_eq!(method_names(&plan.root), vec!["testAlpha", "testZeta"]);
    }
}
