//! Version-sensitive resource resolution.
//!
//! Hosts register [`VersionProviderFactory`] instances that describe, per
//! type, which descriptor-resource versions apply to the current project
//! context. Resolution tries the most specific version first and falls
//! back through earlier versions; the unversioned resource only
//! participates when no axis supplies a version list at all.

use std::sync::Arc;

use armature_model::{ResourceOrigin, TypeName};

use crate::error::DocResult;
use crate::resource::{ResourceLocator, versioned};

/// Supplies the active and available versions for one logical axis.
pub trait VersionProvider: Send + Sync {
	/// The version active in the current project context.
	fn current(&self) -> String;

	/// Every known version, in the provider's declared order.
	fn all(&self) -> Vec<String>;
}

/// Fixed version list, the common host implementation.
pub struct StaticVersions {
	current: String,
	all: Vec<String>,
}

impl StaticVersions {
	/// Creates a provider with a fixed list and current version.
	pub fn new(current: impl Into<String>, all: Vec<String>) -> Self {
		Self { current: current.into(), all }
	}
}

impl VersionProvider for StaticVersions {
	fn current(&self) -> String {
		self.current.clone()
	}

	fn all(&self) -> Vec<String> {
		self.all.clone()
	}
}

/// One named version axis for a type.
///
/// A `None` provider is a deliberate signal: the axis participates in
/// defaulting only, and the base (unversioned) resource is loaded.
pub struct VersionAxis {
	/// Axis name, e.g. a library or platform identifier.
	pub name: String,
	/// The provider, or `None` for defaulting-only axes.
	pub provider: Option<Arc<dyn VersionProvider>>,
}

/// Extension point: computes the version axes that apply to a type.
pub trait VersionProviderFactory: Send + Sync {
	/// Axes for `ty`, given where the type was loaded from.
	fn axes(&self, ty: &TypeName, origin: &ResourceOrigin) -> Vec<VersionAxis>;
}

/// Expands a relative path into the ordered candidate list.
///
/// Per axis with a usable provider: the current version first, then all
/// versions declared before it, in declared order. The unversioned path
/// is the sole candidate only when no axis yields a non-empty list.
pub fn candidate_paths(axes: &[VersionAxis], rel_path: &str) -> Vec<String> {
	let mut out = Vec::new();

	for axis in axes {
		let Some(provider) = &axis.provider else {
			continue;
		};
		let all = provider.all();
		if all.is_empty() {
			continue;
		}
		let current = provider.current();
		out.push(versioned(&current, rel_path));
		for version in all.iter().take_while(|v| **v != current) {
			out.push(versioned(version, rel_path));
		}
	}

	if out.is_empty() {
		out.push(rel_path.to_string());
	}
	out
}

/// Iterates candidates in order and returns the first that both locates
/// and parses successfully.
///
/// Absent candidates are skipped; malformed non-final candidates are
/// logged and skipped; a malformed final candidate propagates. `None`
/// means no candidate located at all — not an error, the type simply has
/// no document.
pub fn resolve_first_valid<T>(
	locator: &ResourceLocator,
	axes: &[VersionAxis],
	rel_path: &str,
	parse: impl Fn(&str, &str) -> DocResult<T>,
) -> DocResult<Option<(T, ResourceOrigin)>> {
	let candidates = candidate_paths(axes, rel_path);
	let last = candidates.len() - 1;

	for (i, path) in candidates.iter().enumerate() {
		let Some((text, origin)) = locator.find(path) else {
			continue;
		};
		match parse(&text, path) {
			Ok(parsed) => return Ok(Some((parsed, origin))),
			Err(error) if i < last => {
				tracing::warn!(path = %path, error = %error, "skipping invalid descriptor resource");
			}
			Err(error) => return Err(error),
		}
	}
	Ok(None)
}
