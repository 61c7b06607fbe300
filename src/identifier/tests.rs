use super::*;
use proptest::prelude::*;

#[test]
fn literal_numeric_suffix_is_kept() {
    assert_eq!(sanitize("kt19747_2", false), "Kt19747_2");
    assert_eq!(sanitize("kt19747", false), "Kt19747");
    assert_eq!(sanitize("kt19747_2.kt", true), "Kt19747_2");
}

#[test]
fn separators_become_camel_case() {
    assert_eq!(sanitize("sealed-inline-class", false), "SealedInlineClass");
    assert_eq!(
        sanitize("extensionLambdasAndArrow.fir", false),
        "ExtensionLambdasAndArrowFir"
    );
    assert_eq!(
        sanitize("localDelegatedPropertyNoExplicitType.kts", true),
        "LocalDelegatedPropertyNoExplicitType"
    );
    assert_eq!(sanitize("with space", false), "WithSpace");
}

#[test]
fn only_the_last_extension_is_stripped() {
    assert_eq!(sanitize("supercall.fir.kt", true), "SupercallFir");
    assert_eq!(sanitize(".hidden", true), "Hidden");
    assert_eq!(sanitize("noExtension", true), "NoExtension");
}

#[test]
fn illegal_leading_characters_are_escaped() {
    assert_eq!(sanitize("123abc", false), "_123abc");
    assert_eq!(sanitize("1", false), "_1");
    assert_eq!(sanitize("---", false), "Unnamed");
    assert_eq!(sanitize("__", false), "Unnamed");
}

#[test]
fn reserved_words_are_escaped() {
    assert_eq!(sanitize("self", false), "Self_");
    assert_eq!(sanitize("Self.kt", true), "Self_");
    assert_eq!(sanitize("type", false), "Type");
}

#[test]
fn case_collision_yields_distinct_identifiers() {
    let mut scope = IdentifierScope::new("a");
    let upper = scope.claim("Foo", false, "a/Foo.kt").unwrap();
    let lower = scope.claim("foo", false, "a/foo.kt").unwrap();
    assert_eq!(upper.disambiguated, "Foo");
    assert_eq!(lower.disambiguated, "Foo__2");
    assert_eq!(lower.sanitized, "Foo");
    assert!(lower.was_disambiguated());
    assert!(!upper.was_disambiguated());
}

#[test]
fn disambiguation_never_reuses_literal_names() {
    let mut scope = IdentifierScope::new("");
    scope.claim("foo", false, "foo.kt").unwrap();
    let literal = scope.claim("foo__2", false, "foo__2.kt").unwrap();
    let twin = scope.claim("Foo", false, "Foo.kt").unwrap();
    assert_eq!(literal.disambiguated, "Foo__2");
    assert_eq!(twin.disambiguated, "Foo__3");
}

#[test]
fn reserved_names_push_fixtures_aside() {
    let mut scope = IdentifierScope::new("a");
    scope.reserve("AllFilesPresentInA", "<completeness check>");
    let fixture = scope
        .claim("allFilesPresentInA", false, "a/allFilesPresentInA.kt")
        .unwrap();
    assert_eq!(fixture.disambiguated, "AllFilesPresentInA__2");
    assert!(scope.contains("AllFilesPresentInA"));
}

#[test]
fn earlier_claims_are_stable_when_later_fixtures_appear() {
    let mut before = IdentifierScope::new("a");
    let first = before.claim("Foo", false, "a/Foo.kt").unwrap();

    let mut after = IdentifierScope::new("a");
    let first_again = after.claim("Foo", false, "a/Foo.kt").unwrap();
    after.claim("foo", false, "a/foo.kt").unwrap();
    after.claim("zeta", false, "a/zeta.kt").unwrap();

    assert_eq!(first, first_again);
}

#[test]
fn exhausted_disambiguation_reports_every_claimant() {
    let mut scope = IdentifierScope::new("a");
    scope.claim_with_limit("Foo", false, "a/Foo.kt", 2).unwrap();
    scope.claim_with_limit("foo", false, "a/foo.kt", 2).unwrap();
    let err = scope
        .claim_with_limit("foo-", false, "a/foo-.kt", 2)
        .unwrap_err();
    match err {
        SuiteError::NameCollision {
            group,
            identifier,
            fixtures,
        } => {
            assert_eq!(group, "a");
            assert_eq!(identifier, "Foo");
            assert_eq!(
                fixtures,
                vec![
                    "a/Foo.kt".to_string(),
                    "a/foo-.kt".to_string(),
                    "a/foo.kt".to_string()
                ]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!scope.contains("Foo__3"));
}

fn is_legal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    first_ok
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.chars().any(|c| c.is_ascii_alphanumeric())
        && !RESERVED_WORDS.contains(&name)
}

proptest! {
    #[test]
    fn sanitized_names_are_always_legal(raw in ".{0,40}", strip in any::<bool>()) {
        let name = sanitize(&raw, strip);
        prop_assert!(is_legal_identifier(&name), "{raw:?} -> {name:?}");
    }

    #[test]
    fn sanitize_is_deterministic(raw in "[a-zA-Z0-9_.\\-]{1,24}") {
        prop_assert_eq!(sanitize(&raw, true), sanitize(&raw, true));
    }

    #[test]
    fn claims_in_one_scope_are_unique(names in prop::collection::vec("[a-cA-C_.]{1,3}", 1..30)) {
        let mut scope = IdentifierScope::new("g");
        let mut seen = std::collections::BTreeSet::new();
        for (idx, raw) in names.iter().enumerate() {
            let owner = format!("g/{idx}");
            let id = scope.claim(raw, false, &owner).unwrap();
            prop_assert!(seen.insert(id.disambiguated.clone()));
        }
    }
}
