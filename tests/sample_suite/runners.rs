use std::fs;

use anyhow::{bail, Context};
use fixture_suitegen::{Descriptor, FixtureRunner};

/// Accepts fixtures that declare a `box()` returning `"OK"`.
struct BoxRunner;

impl FixtureRunner for BoxRunner {
    fn run_fixture(&self, fixture_path: &str, descriptor: Descriptor<'_>) -> anyhow::Result<()> {
        if descriptor.get("frontend") != Some("fir") {
            bail!("sample suite expects the fir frontend, got {descriptor:?}");
        }
        let source =
            fs::read_to_string(fixture_path).with_context(|| format!("reading {fixture_path}"))?;
        if !source.trim_start().starts_with("fun box()") || !source.contains("\"OK\"") {
            bail!("{fixture_path} does not return OK from box()");
        }
        Ok(())
    }
}

pub fn sample() -> &'static dyn FixtureRunner {
    static RUNNER: BoxRunner = BoxRunner;
    &RUNNER
}
