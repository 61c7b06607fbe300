// Fixture Suite Generator
// Keeps nested fixture corpora and generated test suites in lockstep

// Module declarations
pub mod binding;
pub mod config;
pub mod corpus;
pub mod drift;
pub mod emit;
pub mod error;
pub mod generate;
pub mod hierarchy;
pub mod identifier;
pub mod runner;

// Re-exports for convenience
pub use binding::SuiteBinding;
pub use config::{GeneratorConfig, SuiteConfig};
pub use corpus::{CorpusScanner, EntryKind, FixtureEntry, MatchRule, RuleOptions};
pub use drift::DriftGuard;
pub use emit::{OutputFormat, SuiteEmitter, SuitePlan};
pub use error::{DriftReport, ErrorCode, SuiteError};
pub use generate::{check_all, generate, render_all, write_all, RenderedSuite};
pub use hierarchy::{GroupNode, HierarchyBuilder};
pub use identifier::{Identifier, IdentifierScope};
pub use runner::{Descriptor, FixtureRunner};
