//! Resource layers and descriptor resource paths.
//!
//! A locator searches an ordered list of layers: project-local layers
//! first (user overrides), then library layers in registration order.
//! The first layer that can produce a resource wins. Layers are dumb
//! string stores; all path conventions live here.

use std::path::PathBuf;
use std::sync::Arc;

use armature_model::{DescriptorKey, ResourceOrigin, Signature, TypeName};
use rustc_hash::FxHashMap;

/// File extension of descriptor documents.
pub const DESCRIPTOR_EXT: &str = ".component.kdl";

/// File extension of icon resources.
pub const ICON_EXT: &str = ".png";

/// File name of package-level documents.
pub const PACKAGE_DOC: &str = "package.kdl";

/// One source of raw resources.
pub trait ResourceLayer: Send + Sync {
	/// Where resources from this layer come from.
	fn origin(&self) -> &ResourceOrigin;

	/// Loads a resource as text, `None` when absent.
	fn load(&self, rel_path: &str) -> Option<String>;

	/// Cheap existence probe; used for icons, which are never decoded
	/// here.
	fn exists(&self, rel_path: &str) -> bool {
		self.load(rel_path).is_some()
	}
}

/// Filesystem-backed layer rooted at a directory.
pub struct DirLayer {
	root: PathBuf,
	origin: ResourceOrigin,
}

impl DirLayer {
	/// Creates a layer reading from `root`.
	pub fn new(root: impl Into<PathBuf>, origin: ResourceOrigin) -> Self {
		Self { root: root.into(), origin }
	}
}

impl ResourceLayer for DirLayer {
	fn origin(&self) -> &ResourceOrigin {
		&self.origin
	}

	fn load(&self, rel_path: &str) -> Option<String> {
		std::fs::read_to_string(self.root.join(rel_path)).ok()
	}

	fn exists(&self, rel_path: &str) -> bool {
		self.root.join(rel_path).exists()
	}
}

/// In-memory layer, for embedded resources and tests.
pub struct MemoryLayer {
	origin: ResourceOrigin,
	files: FxHashMap<String, String>,
}

impl MemoryLayer {
	/// Creates an empty layer with the given origin.
	pub fn new(origin: ResourceOrigin) -> Self {
		Self { origin, files: FxHashMap::default() }
	}

	/// Adds a resource.
	pub fn insert(&mut self, rel_path: impl Into<String>, text: impl Into<String>) -> &mut Self {
		self.files.insert(rel_path.into(), text.into());
		self
	}

	/// Builder-style [`Self::insert`].
	pub fn with(mut self, rel_path: impl Into<String>, text: impl Into<String>) -> Self {
		self.insert(rel_path, text);
		self
	}
}

impl ResourceLayer for MemoryLayer {
	fn origin(&self) -> &ResourceOrigin {
		&self.origin
	}

	fn load(&self, rel_path: &str) -> Option<String> {
		self.files.get(rel_path).cloned()
	}

	fn exists(&self, rel_path: &str) -> bool {
		self.files.contains_key(rel_path)
	}
}

/// Ordered search path over resource layers.
pub struct ResourceLocator {
	layers: Vec<Arc<dyn ResourceLayer>>,
}

impl ResourceLocator {
	/// Creates a locator; project layers are moved ahead of library
	/// layers, preserving relative order within each group.
	pub fn new(layers: Vec<Arc<dyn ResourceLayer>>) -> Self {
		let (project, library): (Vec<_>, Vec<_>) =
			layers.into_iter().partition(|l| l.origin().is_project());
		let mut ordered = project;
		ordered.extend(library);
		Self { layers: ordered }
	}

	/// Loads the first matching resource, with its origin.
	pub fn find(&self, rel_path: &str) -> Option<(String, ResourceOrigin)> {
		self.layers
			.iter()
			.find_map(|layer| layer.load(rel_path).map(|text| (text, layer.origin().clone())))
	}

	/// Probes for the first layer holding `rel_path`.
	pub fn probe(&self, rel_path: &str) -> Option<ResourceOrigin> {
		self.layers
			.iter()
			.find(|layer| layer.exists(rel_path))
			.map(|layer| layer.origin().clone())
	}
}

/// Relative path of a key's descriptor document.
pub fn descriptor_path(key: &DescriptorKey) -> String {
	format!("{}{DESCRIPTOR_EXT}", key.resource_stem())
}

/// Relative path of a per-method descriptor document.
pub fn method_doc_path(key: &DescriptorKey, signature: &Signature) -> String {
	format!("{}.{}{DESCRIPTOR_EXT}", key.resource_stem(), signature.encoded())
}

/// Relative path of a per-parameter descriptor document.
pub fn parameter_doc_path(key: &DescriptorKey, signature: &Signature, index: usize) -> String {
	format!("{}.{}.{index}{DESCRIPTOR_EXT}", key.resource_stem(), signature.encoded())
}

/// Relative path of a package-level document.
pub fn package_doc_path(package: &str) -> String {
	if package.is_empty() {
		PACKAGE_DOC.to_string()
	} else {
		format!("{}/{PACKAGE_DOC}", package.replace('.', "/"))
	}
}

/// Relative path of a type's own icon resource.
pub fn icon_path(ty: &TypeName) -> String {
	format!("{}{ICON_EXT}", ty.resource_path())
}

/// Relative path of a creation variant's icon resource.
pub fn creation_icon_path(ty: &TypeName, creation_id: &str) -> String {
	format!("{}.{creation_id}{ICON_EXT}", ty.resource_path())
}

/// Prefixes a relative path with a version-name subdirectory.
pub fn versioned(version: &str, rel_path: &str) -> String {
	format!("{version}/{rel_path}")
}

#[cfg(test)]
mod tests {
	use super::*;

	fn key(ty: &str) -> DescriptorKey {
		DescriptorKey::component(TypeName::from(ty))
	}

	#[test]
	fn path_conventions() {
		let k = key("toolkit.widgets.Button");
		assert_eq!(descriptor_path(&k), "toolkit/widgets/Button.component.kdl");
		assert_eq!(icon_path(k.component_type()), "toolkit/widgets/Button.png");
		assert_eq!(package_doc_path("toolkit.widgets"), "toolkit/widgets/package.kdl");
		assert_eq!(versioned("2.0", "toolkit/widgets/Button.component.kdl"), "2.0/toolkit/widgets/Button.component.kdl");

		let sig = Signature::parse("setText(java.lang.String)").unwrap();
		assert_eq!(
			method_doc_path(&k, &sig),
			"toolkit/widgets/Button.setText_java.lang.String_.component.kdl"
		);
		assert_eq!(
			parameter_doc_path(&k, &sig, 0),
			"toolkit/widgets/Button.setText_java.lang.String_.0.component.kdl"
		);
	}

	#[test]
	fn project_layers_searched_first() {
		let project = MemoryLayer::new(ResourceOrigin::Project).with("a.kdl", "project");
		let library =
			MemoryLayer::new(ResourceOrigin::Library("toolkit".into())).with("a.kdl", "library");

		// Registered library-first; the locator still prefers project.
		let locator = ResourceLocator::new(vec![Arc::new(library), Arc::new(project)]);
		let (text, origin) = locator.find("a.kdl").unwrap();
		assert_eq!(text, "project");
		assert_eq!(origin, ResourceOrigin::Project);
	}

	#[test]
	fn library_order_is_registration_order() {
		let lib_a = MemoryLayer::new(ResourceOrigin::Library("a".into())).with("x", "from-a");
		let lib_b = MemoryLayer::new(ResourceOrigin::Library("b".into())).with("x", "from-b");
		let locator = ResourceLocator::new(vec![Arc::new(lib_a), Arc::new(lib_b)]);
		assert_eq!(locator.find("x").unwrap().0, "from-a");
	}
}
