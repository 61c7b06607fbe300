//! Identifier synthesis for generated tests and groups.
//!
//! Raw fixture and directory names are turned into upper-camel-case Rust
//! identifiers. Collisions inside one enclosing group are resolved by claim
//! order: callers claim names in stable path order, the first claimant keeps
//! the plain name and later ones get a `__N` suffix. Because suffixes only
//! depend on earlier claims in the same scope, adding a fixture elsewhere
//! never renames an existing one.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::SuiteError;

/// Highest `__N` suffix tried before giving up on a name.
pub const MAX_DISAMBIGUATION_SUFFIX: usize = 99;

/// Name given to inputs without a single alphanumeric character.
const UNNAMED: &str = "Unnamed";

/// Rust keywords, strict and reserved, including the 2018+ additions.
const RESERVED_WORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// A synthesized identifier with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    /// Name as found on disk (or extracted by the match rule).
    pub raw: String,
    /// Legal identifier before collision handling.
    pub sanitized: String,
    /// Final, unique identifier within the enclosing scope.
    pub disambiguated: String,
}

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.disambiguated
    }

    pub fn was_disambiguated(&self) -> bool {
        self.sanitized != self.disambiguated
    }
}

/// Turn a raw name into a legal upper-camel-case identifier.
///
/// `strip_extension` drops the text after the last dot first; pass it for
/// whole file names, not for names a pattern already cut down to a stem.
pub fn sanitize(raw: &str, strip_extension: bool) -> String {
    let base = if strip_extension {
        strip_fixture_extension(raw)
    } else {
        raw
    };

    let mut out = String::with_capacity(base.len());
    for segment in base.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_')) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
        }
    }

    if !out.chars().any(|c| c.is_ascii_alphanumeric()) {
        return UNNAMED.to_string();
    }
    escape(out)
}

fn strip_fixture_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn escape(name: String) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    if RESERVED_WORDS.contains(&name.as_str()) {
        return format!("{name}_");
    }
    name
}

/// Claimed identifiers within one enclosing group.
///
/// Each generated group owns two scopes: one for test functions and one for
/// nested group modules.
#[derive(Debug, Clone, Default)]
pub struct IdentifierScope {
    group: String,
    taken: BTreeMap<String, String>,
}

impl IdentifierScope {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            taken: BTreeMap::new(),
        }
    }

    /// Reserve a name for something that is not a fixture (the
    /// completeness check, the suite binding).
    pub fn reserve(&mut self, name: &str, owner: &str) {
        self.taken
            .entry(name.to_string())
            .or_insert_with(|| owner.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.taken.contains_key(name)
    }

    /// Claim an identifier for `owner` (a relative path, used in errors).
    pub fn claim(
        &mut self,
        raw: &str,
        strip_extension: bool,
        owner: &str,
    ) -> Result<Identifier, SuiteError> {
        self.claim_with_limit(raw, strip_extension, owner, MAX_DISAMBIGUATION_SUFFIX)
    }

    fn claim_with_limit(
        &mut self,
        raw: &str,
        strip_extension: bool,
        owner: &str,
        limit: usize,
    ) -> Result<Identifier, SuiteError> {
        let sanitized = sanitize(raw, strip_extension);
        let mut candidate = sanitized.clone();
        let mut suffix = 1;
        while self.taken.contains_key(&candidate) {
            suffix += 1;
            if suffix > limit {
                return Err(self.collision(&sanitized, owner));
            }
            candidate = format!("{sanitized}__{suffix}");
        }

        if suffix > 1 {
            tracing::debug!(
                "[Identifier] {} renamed to {} in group {}",
                owner,
                candidate,
                self.group
            );
        }
        self.taken.insert(candidate.clone(), owner.to_string());
        Ok(Identifier {
            raw: raw.to_string(),
            sanitized,
            disambiguated: candidate,
        })
    }

    fn collision(&self, sanitized: &str, owner: &str) -> SuiteError {
        let prefix = format!("{sanitized}__");
        let mut fixtures: Vec<String> = self
            .taken
            .iter()
            .filter(|(name, _)| name.as_str() == sanitized || name.starts_with(&prefix))
            .map(|(_, claimed_by)| claimed_by.clone())
            .collect();
        fixtures.push(owner.to_string());
        fixtures.sort();
        fixtures.dedup();
        SuiteError::NameCollision {
            group: self.group.clone(),
            identifier: sanitized.to_string(),
            fixtures,
        }
    }
}

#[cfg(test)]
mod tests;
