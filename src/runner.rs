//! Runner capability reached by generated tests.
//!
//! The generator never executes fixtures itself. Each test category
//! (parsing, analysis, code generation, ABI checks, ...) provides a
//! [`FixtureRunner`]; generated suites name an accessor for it and call it
//! once per fixture with the suite's descriptor.

use std::fmt;

/// Opaque per-suite configuration handed to every runner call.
///
/// Keys and values are whatever the runner understands (frontend kind,
/// module kind, session mode, ...). The generator only copies them.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Descriptor<'a> {
    entries: &'a [(&'a str, &'a str)],
}

impl<'a> Descriptor<'a> {
    pub const fn new(entries: &'a [(&'a str, &'a str)]) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == key)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Descriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Executes one fixture against the subsystem under test.
pub trait FixtureRunner: Send + Sync {
    /// `fixture_path` is the corpus root joined with the fixture's relative
    /// path; directory fixtures end with `/`.
    fn run_fixture(&self, fixture_path: &str, descriptor: Descriptor<'_>) -> anyhow::Result<()>;
}

impl<F> FixtureRunner for F
where
    F: Fn(&str, Descriptor<'_>) -> anyhow::Result<()> + Send + Sync,
{
    fn run_fixture(&self, fixture_path: &str, descriptor: Descriptor<'_>) -> anyhow::Result<()> {
        self(fixture_path, descriptor)
    }
}
