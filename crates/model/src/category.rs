//! Property categories.

use std::fmt;

/// Visibility category of a property in the builder's property sheet.
///
/// Ordered from least to most prominent; `Ord` follows that order so
/// consumers can sort properties by prominence.
#[derive(
	Debug,
	Clone,
	Copy,
	Default,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Hash,
	serde::Serialize,
	serde::Deserialize,
)]
pub enum PropertyCategory {
	/// Never shown.
	Hidden,
	/// Shown only in the expanded/advanced view.
	Advanced,
	/// Shown in the regular list.
	#[default]
	Normal,
	/// Shown first and in the compact view.
	Preferred,
}

impl PropertyCategory {
	/// Parses a document category token; `None` for unknown tokens.
	///
	/// Unknown tokens are a rule-application error at the call site, not
	/// a silent default.
	pub fn parse(token: &str) -> Option<Self> {
		match token {
			"hidden" => Some(Self::Hidden),
			"advanced" => Some(Self::Advanced),
			"normal" => Some(Self::Normal),
			"preferred" => Some(Self::Preferred),
			_ => None,
		}
	}
}

impl fmt::Display for PropertyCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let s = match self {
			Self::Hidden => "hidden",
			Self::Advanced => "advanced",
			Self::Normal => "normal",
			Self::Preferred => "preferred",
		};
		f.write_str(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ordering_matches_prominence() {
		assert!(PropertyCategory::Hidden < PropertyCategory::Advanced);
		assert!(PropertyCategory::Advanced < PropertyCategory::Normal);
		assert!(PropertyCategory::Normal < PropertyCategory::Preferred);
	}

	#[test]
	fn parse_rejects_unknown_tokens() {
		assert_eq!(PropertyCategory::parse("preferred"), Some(PropertyCategory::Preferred));
		assert_eq!(PropertyCategory::parse("shiny"), None);
	}
}
