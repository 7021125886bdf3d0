//! Property-based tests for path template matching.
//!
//! Success Criteria:
//! 1. A parameter captures any single non-empty segment verbatim
//! 2. A parameter never captures across `/`
//! 3. Trailing slashes never change the match outcome
//! 4. Reversing captured parameters yields a path the template matches again

use proptest::prelude::*;
use rstest::rstest;
use waymark_pattern::{Params, PathPattern};

fn segment() -> impl Strategy<Value = String> {
	"[A-Za-z0-9_-]{1,16}"
}

proptest! {
	#[test]
	fn prop_param_captures_segment(value in segment()) {
		let pattern = PathPattern::new("/blog/:id").unwrap();

		let params = pattern.matches(&format!("/blog/{}", value)).unwrap();

		prop_assert_eq!(params.get("id"), Some(&value));
	}

	#[test]
	fn prop_param_never_crosses_slash(a in segment(), b in segment()) {
		let pattern = PathPattern::new("/blog/:id").unwrap();

		let path = format!("/blog/{}/{}", a, b);

		prop_assert!(pattern.matches(&path).is_none());
	}

	#[test]
	fn prop_trailing_slash_is_insignificant(a in segment(), b in segment()) {
		let pattern = PathPattern::new("/users/:user/posts/:post").unwrap();
		let path = format!("/users/{}/posts/{}", a, b);
		let with_slash = format!("{}/", path);

		prop_assert_eq!(pattern.matches(&path), pattern.matches(&with_slash));
	}

	#[test]
	fn prop_reverse_matches_again(value in "[^/]{1,12}") {
		let pattern = PathPattern::new("/tags/:tag").unwrap();
		let mut params = Params::new();
		params.insert("tag".to_string(), value.clone());

		let path = pattern.reverse(&params).unwrap();
		let matched = pattern.matches(&path).unwrap();

		prop_assert_eq!(matched.get("tag"), Some(&value));
	}
}

/// First literal segment differs, so no parameter value can rescue the match.
#[rstest]
#[case("/posts/1")]
#[case("/blogs/1")]
#[case("/")]
fn test_literal_prefix_must_match(#[case] path: &str) {
	let pattern = PathPattern::new("/blog/:id").unwrap();
	assert!(!pattern.is_match(path));
}
