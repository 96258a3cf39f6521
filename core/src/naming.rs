//! Action name resolution.
//!
//! Maps an HTTP method and a raw action token to the ordered list of member
//! names the selector probes on a controller:
//!
//! ```text
//! GET /home/my-page
//!   1. getMyPage   (method + action)
//!   2. myPage      (action alone)
//!   3. catchAll    (fallback)
//! ```

use std::fmt;

/// Default name of the lowest-priority candidate.
pub const DEFAULT_FALLBACK_ACTION: &str = "catchAll";

/// Convert a token to camelCase.
///
/// The input is split on every run of non-alphanumeric ASCII characters. The
/// first segment is lower-cased entirely; every following segment gets an
/// upper-case first letter and a lower-cased remainder. A leading separator
/// produces an empty first segment, so `"-foo"` becomes `"Foo"`.
///
/// # Examples
///
/// ```
/// use mvc_dispatch_core::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("get Index"), "getIndex");
/// assert_eq!(to_camel_case("about"), "about");
/// assert_eq!(to_camel_case("my-custom-action"), "myCustomAction");
/// ```
#[must_use]
pub fn to_camel_case(input: &str) -> String {
    let mut segments = input.split(|c: char| !c.is_ascii_alphanumeric());
    let mut out = String::with_capacity(input.len());

    if let Some(first) = segments.next() {
        out.push_str(&first.to_ascii_lowercase());
    }

    for segment in segments.filter(|s| !s.is_empty()) {
        let (head, tail) = segment.split_at(1);
        out.push_str(&head.to_ascii_uppercase());
        out.push_str(&tail.to_ascii_lowercase());
    }

    out
}

/// The three action names probed for a request, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCandidates([String; 3]);

impl ActionCandidates {
    /// Candidate built from the method and the action token (`getIndex`).
    #[must_use]
    pub fn most_specific(&self) -> &str {
        &self.0[0]
    }

    /// Candidate built from the action token alone (`index`).
    #[must_use]
    pub fn generic(&self) -> &str {
        &self.0[1]
    }

    /// The configured fallback name (`catchAll`).
    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.0[2]
    }

    /// Iterate candidates in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Borrow the candidates as an array.
    #[must_use]
    pub const fn as_array(&self) -> &[String; 3] {
        &self.0
    }
}

impl fmt::Display for ActionCandidates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

/// Compute the ordered candidate names for `method` and `action_token`.
///
/// Pure and total: the result always has three entries and the last one is
/// always `fallback`. A candidate that camel-cases to nothing (a token made
/// only of separators) is replaced by `fallback`, so no entry is empty as long
/// as `fallback` is not.
#[must_use]
pub fn resolve_candidates(method: &str, action_token: &str, fallback: &str) -> ActionCandidates {
    let or_fallback = |name: String| {
        if name.is_empty() {
            fallback.to_string()
        } else {
            name
        }
    };
    ActionCandidates([
        or_fallback(to_camel_case(&format!("{method} {action_token}"))),
        or_fallback(to_camel_case(action_token)),
        fallback.to_string(),
    ])
}
