//! Integration tests for the identifier policy

use proptest::prelude::*;
use schemata_foundation::{canonical, eq_ignore_case, ident::reserved_words, is_reserved};

#[test]
fn reserved_in_every_case() {
    for name in ["where", "Where", "WHERE", "wHeRe"] {
        assert!(is_reserved(name), "{name} should be reserved");
    }
}

#[test]
fn common_names_are_allowed() {
    for name in ["user", "session", "email", "name", "id", "comment", "post"] {
        assert!(!is_reserved(name), "{name} should be allowed");
    }
}

#[test]
fn canonical_is_upper_case() {
    assert_eq!(canonical("userSession"), "USERSESSION");
    assert!(eq_ignore_case("Bar", "bAR"));
}

proptest! {
    #[test]
    fn reserved_check_ignores_case(index in 0usize..64, mask in any::<u64>()) {
        let words: Vec<&str> = reserved_words().collect();
        let word = words[index % words.len()];
        let mixed: String = word
            .chars()
            .enumerate()
            .map(|(i, c)| if (mask >> (i % 64)) & 1 == 1 { c.to_ascii_uppercase() } else { c })
            .collect();
        prop_assert!(is_reserved(&mixed));
    }

    #[test]
    fn prefixed_names_are_never_reserved(suffix in "[a-z]{1,12}") {
        let name = format!("zz_{suffix}");
        prop_assert!(!is_reserved(&name));
    }
}
