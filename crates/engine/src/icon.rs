//! Hierarchy-aware icon resolution.
//!
//! Separate from the descriptor-field icon (which inherits strictly down
//! the merge order): this resolver answers "what icon should the palette
//! show for this type" and walks declared interfaces before the
//! superclass at every level, using the first icon resource found. A
//! type whose winning resource lives in a project layer is re-resolved
//! on every request — the user can repaint the icon without triggering a
//! type reload, so presentation-level caching must stay off for it.

use armature_model::{IconRef, TypeName};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::introspect::Introspector;
use crate::resource::{ResourceLocator, icon_path};

/// Per-type icon cache and hierarchy walker.
#[derive(Default)]
pub struct IconResolver {
	cache: Mutex<FxHashMap<TypeName, IconRef>>,
}

impl IconResolver {
	/// Creates an empty resolver.
	pub fn new() -> Self {
		Self::default()
	}

	/// Resolves the icon for `ty`, consulting the cache when permitted.
	///
	/// `cacheable` is false for types whose icons must be rebuilt every
	/// session (the root type under the default policy).
	pub fn resolve(
		&self,
		ty: &TypeName,
		introspector: &dyn Introspector,
		locator: &ResourceLocator,
		cacheable: bool,
	) -> IconRef {
		if let Some(cached) = self.cache.lock().get(ty).cloned() {
			return cached;
		}

		let mut visited = FxHashSet::default();
		let icon = resolve_walk(ty, introspector, locator, &mut visited)
			.unwrap_or_else(IconRef::placeholder);

		// Project-layer icons are user-editable mid-session; never admit
		// them to the presentation cache.
		if cacheable && !icon.origin.is_project() {
			self.cache.lock().insert(ty.clone(), icon.clone());
		}
		icon
	}

	/// True when a cached icon would be served for `ty`.
	pub fn is_cached(&self, ty: &TypeName) -> bool {
		self.cache.lock().contains_key(ty)
	}

	/// Drops a single cached icon.
	pub fn forget(&self, ty: &TypeName) {
		self.cache.lock().remove(ty);
	}

	/// Clears the cache entirely.
	pub fn clear(&self) {
		self.cache.lock().clear();
	}
}

/// Finds the type's own icon resource, if any layer holds one.
pub fn own_icon(ty: &TypeName, locator: &ResourceLocator) -> Option<IconRef> {
	let path = icon_path(ty);
	locator.probe(&path).map(|origin| IconRef {
		owner: Some(ty.clone()),
		path: Some(path),
		origin,
	})
}

fn resolve_walk(
	ty: &TypeName,
	introspector: &dyn Introspector,
	locator: &ResourceLocator,
	visited: &mut FxHashSet<TypeName>,
) -> Option<IconRef> {
	if !visited.insert(ty.clone()) {
		return None;
	}
	if let Some(icon) = own_icon(ty, locator) {
		return Some(icon);
	}

	let model = introspector.type_model(ty)?;
	for interface in &model.interfaces {
		if let Some(icon) = resolve_walk(interface, introspector, locator, visited) {
			return Some(icon);
		}
	}
	let supertype = model.supertype.as_ref()?;
	resolve_walk(supertype, introspector, locator, visited)
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use armature_model::ResourceOrigin;

	use super::*;
	use crate::introspect::{TypeModel, TypeOrigin};
	use crate::resource::{MemoryLayer, ResourceLayer};

	struct Universe {
		types: FxHashMap<TypeName, Arc<TypeModel>>,
	}

	impl Universe {
		fn new(entries: &[(&str, Option<&str>, &[&str])]) -> Self {
			let mut types = FxHashMap::default();
			for (name, supertype, interfaces) in entries {
				let ty = TypeName::from(*name);
				types.insert(
					ty.clone(),
					Arc::new(TypeModel {
						name: ty,
						origin: TypeOrigin::Library("toolkit".into()),
						supertype: supertype.map(TypeName::from),
						interfaces: interfaces.iter().map(|i| TypeName::from(*i)).collect(),
						fields: Vec::new(),
						methods: Vec::new(),
						constructors: Vec::new(),
						preferred_hints: Vec::new(),
					}),
				);
			}
			Self { types }
		}
	}

	impl Introspector for Universe {
		fn type_model(&self, ty: &TypeName) -> Option<Arc<TypeModel>> {
			self.types.get(ty).cloned()
		}

		fn static_value(&self, _owner: &TypeName, _field: &str) -> Option<armature_model::Value> {
			None
		}
	}

	fn library_layer(icons: &[&str]) -> Arc<dyn ResourceLayer> {
		let mut layer = MemoryLayer::new(ResourceOrigin::Library("toolkit".into()));
		for icon in icons {
			layer.insert(*icon, "\u{89}PNG");
		}
		Arc::new(layer)
	}

	#[test]
	fn interfaces_win_over_superclass() {
		let universe = Universe::new(&[
			("toolkit.Fancy", Some("toolkit.Plain"), &["toolkit.Iconed"]),
			("toolkit.Plain", None, &[]),
			("toolkit.Iconed", None, &[]),
		]);
		let locator = ResourceLocator::new(vec![library_layer(&[
			"toolkit/Iconed.png",
			"toolkit/Plain.png",
		])]);

		let resolver = IconResolver::new();
		let icon = resolver.resolve(&TypeName::from("toolkit.Fancy"), &universe, &locator, true);
		assert_eq!(icon.owner, Some(TypeName::from("toolkit.Iconed")));
	}

	#[test]
	fn own_icon_wins_outright() {
		let universe = Universe::new(&[("toolkit.Fancy", None, &["toolkit.Iconed"])]);
		let locator = ResourceLocator::new(vec![library_layer(&[
			"toolkit/Fancy.png",
			"toolkit/Iconed.png",
		])]);

		let resolver = IconResolver::new();
		let icon = resolver.resolve(&TypeName::from("toolkit.Fancy"), &universe, &locator, true);
		assert_eq!(icon.owner, Some(TypeName::from("toolkit.Fancy")));
	}

	#[test]
	fn placeholder_when_nothing_found() {
		let universe = Universe::new(&[("toolkit.Bare", None, &[])]);
		let locator = ResourceLocator::new(vec![library_layer(&[])]);

		let resolver = IconResolver::new();
		let icon = resolver.resolve(&TypeName::from("toolkit.Bare"), &universe, &locator, true);
		assert!(icon.is_placeholder());
	}

	#[test]
	fn project_icons_are_not_cached() {
		let universe = Universe::new(&[("app.Panel", None, &[])]);
		let project =
			Arc::new(MemoryLayer::new(ResourceOrigin::Project).with("app/Panel.png", "png"));
		let locator = ResourceLocator::new(vec![project]);

		let resolver = IconResolver::new();
		let ty = TypeName::from("app.Panel");
		let icon = resolver.resolve(&ty, &universe, &locator, true);
		assert_eq!(icon.origin, ResourceOrigin::Project);
		assert!(!resolver.is_cached(&ty));

		let library = Universe::new(&[("toolkit.Button", None, &[])]);
		let locator = ResourceLocator::new(vec![library_layer(&["toolkit/Button.png"])]);
		let ty = TypeName::from("toolkit.Button");
		resolver.resolve(&ty, &library, &locator, true);
		assert!(resolver.is_cached(&ty));
	}
}
