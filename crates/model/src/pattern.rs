//! Name-pattern matching shared by category directives and exposing rules.

/// Matches `name` against a literal pattern or a trailing-`*` prefix
/// wildcard.
///
/// `text*` matches every name starting with `text`; a lone `*` matches
/// everything. There is no other wildcard position.
pub fn name_matches(pattern: &str, name: &str) -> bool {
	match pattern.strip_suffix('*') {
		Some(prefix) => name.starts_with(prefix),
		None => name == pattern,
	}
}

#[cfg(test)]
mod tests {
	use super::name_matches;

	#[test]
	fn literal_patterns_match_exactly() {
		assert!(name_matches("text", "text"));
		assert!(!name_matches("text", "textColor"));
	}

	#[test]
	fn trailing_wildcard_matches_prefix() {
		assert!(name_matches("text*", "text"));
		assert!(name_matches("text*", "textColor"));
		assert!(!name_matches("text*", "title"));
		assert!(name_matches("*", "anything"));
	}
}
