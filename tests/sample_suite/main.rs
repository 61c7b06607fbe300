//! Generated suite compiled and run as part of this package's tests.
//!
//! `generated.rs` is produced from `suitegen.json` next to it; the
//! `sample_suite_is_up_to_date` test in `tests/generation.rs` fails when it
//! no longer matches the generator.

#[rustfmt::skip]
mod generated;
mod runners;
