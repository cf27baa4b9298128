//! Raised-error checks: any error, tagged kinds, and the matching policy.
//!
//! Coverage:
//! - `Err` and panics both count as raised; `Ok` and `()` do not
//! - exact kind, ancestor kind, unrelated kind
//! - "no error", "wrong kind" and "panic" are reported distinctly
//! - `KindMatch::Exact` rejects ancestors

#[cfg(test)]
mod tests {
    use crate::assert::tests::helpers::outcome;
    use crate::assert::{ErrorKind, KindMatch, check_raises, check_raises_kind, panic_message};

    #[derive(Debug)]
    enum ParseError {
        Empty,
        Overflow,
    }

    impl ErrorKind for ParseError {
        fn kind(&self) -> &'static str {
            match self {
                Self::Empty => "Empty",
                Self::Overflow => "Overflow",
            }
        }

        fn ancestors(&self) -> &'static [&'static str] {
            match self {
                Self::Empty => &["ParseError"],
                Self::Overflow => &["RangeError", "ParseError"],
            }
        }
    }

    fn parse(text: &str) -> Result<u8, ParseError> {
        if text.is_empty() {
            return Err(ParseError::Empty);
        }
        text.parse().map_err(|_| ParseError::Overflow)
    }

    // ----------------------------------------------------------------
    // Any error
    // ----------------------------------------------------------------

    #[test]
    fn err_counts_as_raised() {
        let (failed, _) = outcome(|| {
            assert!(check_raises("e.rs", 1, || parse("")));
        });
        assert!(!failed);
    }

    #[test]
    fn panic_counts_as_raised() {
        let (failed, _) = outcome(|| {
            assert!(check_raises("e.rs", 2, || -> Result<(), ParseError> { panic!("Unnamed") }));
        });
        assert!(!failed);
    }

    #[test]
    fn success_is_reported_as_no_error() {
        let (failed, text) = outcome(|| {
            assert!(!check_raises("e.rs", 3, || parse("12")));
        });
        assert!(failed);
        assert_eq!(
            text,
            "\nAssertion failed at e.rs:3\n  expected: any error raised\n    actual: no error raised\n"
        );

        let (failed, _) = outcome(|| {
            assert!(!check_raises("e.rs", 4, || {}));
        });
        assert!(failed);
    }

    // ----------------------------------------------------------------
    // Tagged kinds
    // ----------------------------------------------------------------

    #[test]
    fn exact_kind_matches_under_both_policies() {
        let (failed, _) = outcome(|| {
            assert!(check_raises_kind("e.rs", 5, || parse(""), "Empty", KindMatch::Ancestor));
            assert!(check_raises_kind("e.rs", 6, || parse(""), "Empty", KindMatch::Exact));
        });
        assert!(!failed);
    }

    #[test]
    fn ancestor_kind_matches_only_when_allowed() {
        let (failed, _) = outcome(|| {
            assert!(check_raises_kind("e.rs", 7, || parse("999"), "ParseError", KindMatch::Ancestor));
            assert!(check_raises_kind("e.rs", 8, || parse("999"), "RangeError", KindMatch::Ancestor));
        });
        assert!(!failed);

        let (failed, text) = outcome(|| {
            assert!(!check_raises_kind("e.rs", 9, || parse("999"), "ParseError", KindMatch::Exact));
        });
        assert!(failed);
        assert!(text.contains("  expected: error of kind ParseError\n"));
        assert!(text.contains("    actual: error of kind Overflow raised\n"));
    }

    #[test]
    fn unrelated_kind_is_wrong_error() {
        let (failed, text) = outcome(|| {
            assert!(!check_raises_kind("e.rs", 10, || parse(""), "RangeError", KindMatch::Ancestor));
        });
        assert!(failed);
        assert!(text.contains("    actual: error of kind Empty raised\n"));
    }

    #[test]
    fn missing_error_is_reported_distinctly() {
        let (failed, text) = outcome(|| {
            assert!(!check_raises_kind("e.rs", 11, || parse("1"), "Empty", KindMatch::Ancestor));
        });
        assert!(failed);
        assert!(text.contains("    actual: no error raised\n"));
    }

    #[test]
    fn panic_is_not_a_tagged_error() {
        let (failed, text) = outcome(|| {
            assert!(!check_raises_kind(
                "e.rs",
                12,
                || -> Result<(), ParseError> { panic!("boom") },
                "Empty",
                KindMatch::Ancestor
            ));
        });
        assert!(failed);
        assert!(text.contains("    actual: panic raised: boom\n"));
    }

    #[test]
    fn policy_defaults_to_ancestor() {
        assert_eq!(KindMatch::default(), KindMatch::Ancestor);
        assert!(KindMatch::Exact.accepts(&ParseError::Overflow, "Overflow"));
        assert!(!KindMatch::Exact.accepts(&ParseError::Overflow, "RangeError"));
    }

    #[test]
    fn panic_payload_messages() {
        let static_payload = std::panic::catch_unwind(|| -> u8 { panic!("static") }).unwrap_err();
        assert_eq!(panic_message(static_payload.as_ref()), Some("static"));

        let formatted = std::panic::catch_unwind(|| -> u8 { panic!("code {}", 7) }).unwrap_err();
        assert_eq!(panic_message(formatted.as_ref()), Some("code 7"));

        let opaque = std::panic::catch_unwind(|| -> u8 { std::panic::panic_any(42u8) }).unwrap_err();
        assert_eq!(panic_message(opaque.as_ref()), None);
    }
}
