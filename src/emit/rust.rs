//! Rust test-module emitter.
//!
//! Layout of a generated file:
//!
//! ```text
//! // @generated header
//! #![allow(non_snake_case)]
//! static SUITE: SuiteBinding = ...;   // rule, runner, descriptor
//! #[test] fn testAllFilesPresentIn<Root>() { SUITE.assert_complete(..) }
//! #[test] fn test<Fixture>() { SUITE.run(..) }
//! mod <Group> { use super::SUITE; ... }
//! ```
//!
//! Library items are spelled with absolute `::fixture_suitegen::` paths so
//! generated module names can never shadow them.

use std::fmt::Write;

use super::plan::{PlannedGroup, SuitePlan, SUITE_BINDING};
use super::SuiteEmitter;

const INDENT: &str = "    ";
const LIB: &str = "::fixture_suitegen";

pub struct RustEmitter;

impl SuiteEmitter for RustEmitter {
    fn emit(&self, plan: &SuitePlan) -> Result<String, crate::error::SuiteError> {
        let mut out = SourceWriter::default();
        out.line(&format!(
            "// @generated by suitegen from suite {:?}. DO NOT EDIT.",
            plan.name
        ));
        out.line(&format!(
            "// Corpus: {} (pattern {:?}). Regenerate with `suitegen generate`.",
            plan.corpus_root, plan.pattern
        ));
        out.blank();
        out.line("#![allow(non_snake_case)]");
        out.blank();
        write_binding(&mut out, plan);
        write_group_body(&mut out, &plan.root);
        Ok(out.finish())
    }
}

fn write_binding(out: &mut SourceWriter, plan: &SuitePlan) {
    out.open(&format!(
        "static {SUITE_BINDING}: {LIB}::binding::SuiteBinding<'static> = {LIB}::binding::SuiteBinding {{"
    ));
    out.line(&format!("name: {:?},", plan.name));
    out.line(&format!("corpus_root: {:?},", plan.corpus_root));
    out.line(&format!("pattern: {:?},", plan.pattern));
    out.line(&format!("excluded: &[{}],", quoted_list(&plan.excluded)));
    out.open(&format!("options: {LIB}::corpus::RuleOptions {{"));
    out.line(&format!("case_sensitive: {},", plan.options.case_sensitive));
    out.line(&format!("full_path: {},", plan.options.full_path));
    out.line(&format!("recursive: {},", plan.options.recursive));
    out.line(&format!(
        "match_directories: {},",
        plan.options.match_directories
    ));
    out.close("},");
    if plan.descriptor.is_empty() {
        out.line("descriptor: &[],");
    } else {
        out.open("descriptor: &[");
        for (key, value) in &plan.descriptor {
            out.line(&format!("({key:?}, {value:?}),"));
        }
        out.close("],");
    }
    out.line(&format!("runner: {},", plan.runner));
    out.close("};");
}

/// Functions of a group (completeness check included) sorted by name,
/// followed by child modules in identifier order.
fn write_group_body(out: &mut SourceWriter, group: &PlannedGroup) {
    let mut functions: Vec<(&str, Function<'_>)> = group
        .tests
        .iter()
        .map(|test| {
            (
                test.method_name.as_str(),
                Function::Fixture {
                    fixture_path: &test.fixture_path,
                    locator: &test.locator,
                },
            )
        })
        .collect();
    functions.push((
        group.completeness.method_name.as_str(),
        Function::Completeness(group),
    ));
    functions.sort_by(|a, b| a.0.cmp(b.0));

    for (name, function) in functions {
        out.blank();
        out.line("#[test]");
        match function {
            Function::Fixture {
                fixture_path,
                locator,
            } => {
                let doc = format!("fixture: {fixture_path}");
                out.line(&format!("#[doc = {doc:?}]"));
                out.open(&format!("fn {name}() {{"));
                out.line(&format!("{SUITE_BINDING}.run({locator:?});"));
                out.close("}");
            }
            Function::Completeness(group) => {
                out.open(&format!("fn {name}() {{"));
                write_completeness_call(out, group);
                out.close("}");
            }
        }
    }

    for child in &group.children {
        out.blank();
        out.open(&format!("mod {} {{", child.identifier));
        out.line(&format!("use super::{SUITE_BINDING};"));
        write_group_body(out, child);
        out.close("}");
    }
}

fn write_completeness_call(out: &mut SourceWriter, group: &PlannedGroup) {
    out.open(&format!("{SUITE_BINDING}.assert_complete("));
    out.line(&format!("{:?},", group.dir_path));
    if group.completeness.known.is_empty() {
        out.line("&[],");
    } else {
        out.open("&[");
        for key in &group.completeness.known {
            out.line(&format!("{key:?},"));
        }
        out.close("],");
    }
    out.close(");");
}

fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("{item:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

enum Function<'a> {
    Fixture {
        fixture_path: &'a str,
        locator: &'a str,
    },
    Completeness(&'a PlannedGroup),
}

/// Line-oriented writer with four-space indentation.
#[derive(Default)]
struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT);
        }
        let _ = writeln!(self.buf, "{text}");
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    fn finish(self) -> String {
        self.buf
    }
}
