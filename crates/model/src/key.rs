//! Descriptor identity keys.

use std::fmt;
use std::sync::Arc;

use crate::error::KeyError;
use crate::types::TypeName;

/// Immutable identity of a descriptor: a component type plus an optional
/// (host, suffix) pair naming an exposed sub-object of the host.
///
/// Host and suffix always travel together: a sub-object is only
/// addressable through the key of the component exposing it. Keys are
/// structural — two keys are equal iff type, host and suffix all match —
/// and serve both as cache identity and as the basis of nested resource
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorKey {
	component: TypeName,
	host: Option<Arc<DescriptorKey>>,
	suffix: Option<String>,
}

impl DescriptorKey {
	/// Creates a key, validating the host/suffix pairing.
	pub fn new(
		component: TypeName,
		host: Option<Arc<DescriptorKey>>,
		suffix: Option<String>,
	) -> Result<Self, KeyError> {
		if host.is_some() != suffix.is_some() {
			return Err(KeyError::HostSuffixMismatch {
				component: component.qualified().to_string(),
			});
		}
		Ok(Self { component, host, suffix })
	}

	/// Creates a pure component key (no host).
	pub fn component(component: TypeName) -> Self {
		Self { component, host: None, suffix: None }
	}

	/// Creates a key for a sub-object `suffix` exposed by `host`.
	pub fn exposed(component: TypeName, host: Arc<DescriptorKey>, suffix: impl Into<String>) -> Self {
		Self { component, host: Some(host), suffix: Some(suffix.into()) }
	}

	/// The component type this key describes.
	pub fn component_type(&self) -> &TypeName {
		&self.component
	}

	/// The hosting key, if this names an exposed sub-object.
	pub fn host(&self) -> Option<&DescriptorKey> {
		self.host.as_deref()
	}

	/// The exposure suffix, if this names an exposed sub-object.
	pub fn suffix(&self) -> Option<&str> {
		self.suffix.as_deref()
	}

	/// True for keys without a host.
	pub fn is_pure(&self) -> bool {
		self.host.is_none()
	}

	/// Deterministic display name: the qualified type name for pure keys,
	/// the host name chained with `.suffix` for nested keys.
	pub fn name(&self) -> String {
		match (&self.host, &self.suffix) {
			(Some(host), Some(suffix)) => format!("{}.{suffix}", host.name()),
			_ => self.component.qualified().to_string(),
		}
	}

	/// Relative resource path of this key's descriptor document, without
	/// extension: the host path with the suffix chain appended for nested
	/// keys.
	pub fn resource_stem(&self) -> String {
		match (&self.host, &self.suffix) {
			(Some(host), Some(suffix)) => format!("{}.{suffix}", host.resource_stem()),
			_ => self.component.resource_path(),
		}
	}
}

impl fmt::Display for DescriptorKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ty(name: &str) -> TypeName {
		TypeName::from(name)
	}

	#[test]
	fn pure_key_name_is_qualified_type() {
		let key = DescriptorKey::component(ty("toolkit.Button"));
		assert!(key.is_pure());
		assert_eq!(key.name(), "toolkit.Button");
	}

	#[test]
	fn host_requires_suffix_and_vice_versa() {
		let host = Arc::new(DescriptorKey::component(ty("toolkit.Frame")));

		let err = DescriptorKey::new(ty("toolkit.Panel"), Some(host.clone()), None).unwrap_err();
		assert!(matches!(err, KeyError::HostSuffixMismatch { .. }));

		let err =
			DescriptorKey::new(ty("toolkit.Panel"), None, Some("contentPane".into())).unwrap_err();
		assert!(matches!(err, KeyError::HostSuffixMismatch { .. }));

		assert!(
			DescriptorKey::new(ty("toolkit.Panel"), Some(host), Some("contentPane".into())).is_ok()
		);
	}

	#[test]
	fn nested_names_chain_suffixes() {
		let frame = Arc::new(DescriptorKey::component(ty("toolkit.Frame")));
		let pane = Arc::new(DescriptorKey::exposed(ty("toolkit.Panel"), frame, "contentPane"));
		let layout = DescriptorKey::exposed(ty("toolkit.Layout"), pane, "layout");

		assert_eq!(layout.name(), "toolkit.Frame.contentPane.layout");
		assert_eq!(layout.resource_stem(), "toolkit/Frame.contentPane.layout");
	}

	#[test]
	fn equality_is_structural() {
		let a = DescriptorKey::component(ty("toolkit.Button"));
		let b = DescriptorKey::component(ty("toolkit.Button"));
		assert_eq!(a, b);

		let host = Arc::new(a.clone());
		let nested = DescriptorKey::exposed(ty("toolkit.Button"), host, "inner");
		assert_ne!(b, nested);
	}
}
