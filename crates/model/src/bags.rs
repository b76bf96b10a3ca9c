//! Insertion-ordered string maps for tags and parameters.

use rustc_hash::FxHashMap;

/// An insertion-ordered string-to-string map with overwrite-by-name
/// semantics.
///
/// Used for both descriptor tag bags and parameter bags: inserting a name
/// that already exists replaces the value in place (keeping the original
/// position), which is exactly the hierarchy-merge rule for both bags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringBag {
	entries: Vec<(String, String)>,
	index: FxHashMap<String, usize>,
}

impl StringBag {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or overwrites `name`.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		let value = value.into();
		match self.index.get(&name) {
			Some(&at) => self.entries[at].1 = value,
			None => {
				self.index.insert(name.clone(), self.entries.len());
				self.entries.push((name, value));
			}
		}
	}

	/// Looks up a value by name.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.index.get(name).map(|&at| self.entries[at].1.as_str())
	}

	/// True iff `name` is present with the literal value `"true"`.
	pub fn is_true(&self, name: &str) -> bool {
		self.get(name) == Some("true")
	}

	/// Copies every entry of `other` into this bag, overwriting same-name
	/// entries.
	pub fn merge_from(&mut self, other: &Self) {
		for (name, value) in &other.entries {
			self.insert(name.clone(), value.clone());
		}
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when the bag holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for StringBag {
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		let mut bag = Self::new();
		for (n, v) in iter {
			bag.insert(n, v);
		}
		bag
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_overwrites_in_place() {
		let mut bag = StringBag::new();
		bag.insert("a", "1");
		bag.insert("b", "2");
		bag.insert("a", "3");

		let entries: Vec<_> = bag.iter().collect();
		assert_eq!(entries, vec![("a", "3"), ("b", "2")]);
	}

	#[test]
	fn merge_overwrites_same_names() {
		let mut base: StringBag = [("x", "1"), ("y", "2")].into_iter().collect();
		let child: StringBag = [("y", "9"), ("z", "3")].into_iter().collect();
		base.merge_from(&child);

		assert_eq!(base.get("x"), Some("1"));
		assert_eq!(base.get("y"), Some("9"));
		assert_eq!(base.get("z"), Some("3"));
	}

	#[test]
	fn is_true_requires_literal_true() {
		let bag: StringBag = [("on", "true"), ("off", "yes")].into_iter().collect();
		assert!(bag.is_true("on"));
		assert!(!bag.is_true("off"));
		assert!(!bag.is_true("missing"));
	}
}
