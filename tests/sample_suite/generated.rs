// @generated by suitegen from suite "sample". DO NOT EDIT.
// Corpus: tests/data/sample (pattern "^(.+)\\.kt$"). Regenerate with `suitegen generate`.

#![allow(non_snake_case)]

static SUITE: ::fixture_suitegen::binding::SuiteBinding<'static> = ::fixture_suitegen::binding::SuiteBinding {
    name: "sample",
    corpus_root: "tests/data/sample",
    pattern: "^(.+)\\.kt$",
    excluded: &["broken.kt"],
    options: ::fixture_suitegen::corpus::RuleOptions {
        case_sensitive: true,
        full_path: false,
        recursive: true,
        match_directories: false,
    },
    descriptor: &[
        ("frontend", "fir"),
    ],
    runner: crate::runners::sample,
};

#[test]
fn testAllFilesPresentInSample() {
    SUITE.assert_complete(
        "",
        &[
            "a/",
            "b/",
            "top-level.kt",
        ],
    );
}

#[test]
#[doc = "fixture: tests/data/sample/top-level.kt"]
fn testTopLevel() {
    SUITE.run("top-level.kt");
}

mod A {
    use super::SUITE;

    #[test]
    fn testAllFilesPresentInA() {
        SUITE.assert_complete(
            "a",
            &[
                "a/X.kt",
                "a/Y.kt",
            ],
        );
    }

    #[test]
    #[doc = "fixture: tests/data/sample/a/X.kt"]
    fn testX() {
        SUITE.run("a/X.kt");
    }

    #[test]
    #[doc = "fixture: tests/data/sample/a/Y.kt"]
    fn testY() {
        SUITE.run("a/Y.kt");
    }
}

mod B {
    use super::SUITE;

    #[test]
    fn testAllFilesPresentInB() {
        SUITE.assert_complete(
            "b",
            &[
                "b/sub/",
            ],
        );
    }

    mod Sub {
        use super::SUITE;

        #[test]
        fn testAllFilesPresentInSub() {
            SUITE.assert_complete(
                "b/sub",
                &[
                    "b/sub/Z.kt",
                ],
            );
        }

        #[test]
        #[doc = "fixture: tests/data/sample/b/sub/Z.kt"]
        fn testZ() {
            SUITE.run("b/sub/Z.kt");
        }
    }
}
