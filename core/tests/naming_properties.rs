//! Property tests for action name resolution

use mvc_dispatch_core::naming::{resolve_candidates, to_camel_case, DEFAULT_FALLBACK_ACTION};
use mvc_dispatch_testing::properties::{action_token, http_method};
use proptest::prelude::*;

proptest! {
    #[test]
    fn resolution_yields_three_non_empty_candidates(
        method in http_method(),
        token in action_token(),
    ) {
        let candidates = resolve_candidates(&method, &token, DEFAULT_FALLBACK_ACTION);

        prop_assert_eq!(candidates.iter().count(), 3);
        prop_assert!(candidates.iter().all(|name| !name.is_empty()));
        prop_assert_eq!(candidates.fallback(), DEFAULT_FALLBACK_ACTION);
    }

    #[test]
    fn fallback_is_taken_verbatim(
        method in http_method(),
        token in action_token(),
        fallback in "[a-zA-Z]{1,12}",
    ) {
        let candidates = resolve_candidates(&method, &token, &fallback);
        prop_assert_eq!(candidates.fallback(), fallback.as_str());
    }

    #[test]
    fn most_specific_candidate_starts_with_lowercased_method(
        method in http_method(),
        token in action_token(),
    ) {
        let candidates = resolve_candidates(&method, &token, DEFAULT_FALLBACK_ACTION);
        prop_assert!(candidates.most_specific().starts_with(&method.to_ascii_lowercase()));
    }

    #[test]
    fn camel_case_output_has_no_separators(token in action_token()) {
        let camel = to_camel_case(&token);
        prop_assert!(camel.chars().all(|c| c.is_ascii_alphanumeric()));
        prop_assert_eq!(to_camel_case(&camel), camel.to_ascii_lowercase());
    }

    #[test]
    fn generic_candidate_falls_back_when_token_has_no_words(token in action_token()) {
        let candidates = resolve_candidates("GET", &token, DEFAULT_FALLBACK_ACTION);
        let camel = to_camel_case(&token);
        if camel.is_empty() {
            prop_assert_eq!(candidates.generic(), DEFAULT_FALLBACK_ACTION);
        } else {
            prop_assert_eq!(candidates.generic(), camel.as_str());
        }
    }

    #[test]
    fn resolution_is_deterministic(method in http_method(), token in action_token()) {
        prop_assert_eq!(
            resolve_candidates(&method, &token, DEFAULT_FALLBACK_ACTION),
            resolve_candidates(&method, &token, DEFAULT_FALLBACK_ACTION)
        );
    }
}
