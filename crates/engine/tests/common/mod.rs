//! Shared test fixtures: a small toolkit type universe and layer
//! helpers.
#![allow(dead_code)] // each integration suite uses a different subset
//!
//! The hierarchy mirrors the shapes the engine has to handle:
//!
//! ```text
//! core.Object (root, library "core")
//!  └─ toolkit.Component (library "toolkit")
//!      ├─ toolkit.Button  [implements toolkit.Iconed]
//!      │   └─ toolkit.ToggleButton
//!      └─ app.LoginPanel  (project-local)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use armature_engine::introspect::{
	FieldModel, Introspector, MethodModel, TypeModel, TypeOrigin,
};
use armature_engine::resource::{MemoryLayer, ResourceLayer};
use armature_engine::{DescriptorEngine, EnginePolicy};
use armature_model::{ResourceOrigin, Signature, TypeName, Value};

pub fn ty(name: &str) -> TypeName {
	TypeName::from(name)
}

pub fn sig(text: &str) -> Signature {
	Signature::parse(text).expect("fixture signature")
}

fn method(text: &str, return_type: Option<&str>) -> MethodModel {
	MethodModel {
		signature: sig(text),
		return_type: return_type.map(TypeName::from),
		is_public: true,
		is_static: false,
	}
}

fn field(name: &str, ty_name: &str) -> FieldModel {
	FieldModel {
		name: name.to_string(),
		ty: ty(ty_name),
		is_public: true,
		is_static: false,
		is_synthetic: false,
	}
}

/// Fixture reflection universe.
pub struct TestUniverse {
	types: HashMap<TypeName, Arc<TypeModel>>,
	statics: HashMap<(String, String), Value>,
}

impl TestUniverse {
	/// The standard hierarchy used by most tests.
	pub fn standard() -> Self {
		let mut universe = Self { types: HashMap::new(), statics: HashMap::new() };

		universe.add(TypeModel {
			name: ty("core.Object"),
			origin: TypeOrigin::Library("core".into()),
			supertype: None,
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: vec![method("toString()", Some("java.lang.String"))],
			constructors: vec![Signature::constructor(Vec::new())],
			preferred_hints: Vec::new(),
		});

		universe.add(TypeModel {
			name: ty("toolkit.Iconed"),
			origin: TypeOrigin::Library("toolkit".into()),
			supertype: None,
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: Vec::new(),
			constructors: Vec::new(),
			preferred_hints: Vec::new(),
		});

		let component_methods = vec![
			method("toString()", Some("java.lang.String")),
			method("setEnabled(boolean)", None),
			method("isEnabled()", Some("boolean")),
			method("setName(java.lang.String)", None),
			method("getName()", Some("java.lang.String")),
		];
		universe.add(TypeModel {
			name: ty("toolkit.Component"),
			origin: TypeOrigin::Library("toolkit".into()),
			supertype: Some(ty("core.Object")),
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: component_methods.clone(),
			constructors: vec![Signature::constructor(Vec::new())],
			preferred_hints: Vec::new(),
		});

		let mut button_methods = component_methods.clone();
		button_methods.extend([
			method("setText(java.lang.String)", None),
			method("setText(java.lang.Object)", None),
			method("getText()", Some("java.lang.String")),
			method("addItem(java.lang.String)", None),
			method("addSeparator()", None),
			method("removeAll()", None),
		]);
		universe.add(TypeModel {
			name: ty("toolkit.Button"),
			origin: TypeOrigin::Library("toolkit".into()),
			supertype: Some(ty("toolkit.Component")),
			interfaces: vec![ty("toolkit.Iconed")],
			fields: vec![field("text", "java.lang.String")],
			methods: button_methods.clone(),
			constructors: vec![
				Signature::constructor(Vec::new()),
				Signature::constructor(vec![ty("java.lang.String")]),
			],
			preferred_hints: Vec::new(),
		});

		universe.add(TypeModel {
			name: ty("toolkit.ToggleButton"),
			origin: TypeOrigin::Library("toolkit".into()),
			supertype: Some(ty("toolkit.Button")),
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: button_methods,
			constructors: vec![Signature::constructor(Vec::new())],
			preferred_hints: Vec::new(),
		});

		let mut panel_methods = component_methods;
		panel_methods.extend([
			method("setUser(java.lang.String)", None),
			method("getUser()", Some("java.lang.String")),
		]);
		universe.add(TypeModel {
			name: ty("app.LoginPanel"),
			origin: TypeOrigin::Project,
			supertype: Some(ty("toolkit.Component")),
			interfaces: Vec::new(),
			fields: Vec::new(),
			methods: panel_methods,
			constructors: vec![Signature::constructor(Vec::new())],
			preferred_hints: Vec::new(),
		});

		universe.statics.insert(
			("toolkit.Alignment".to_string(), "RIGHT".to_string()),
			Value::Int(4),
		);

		universe
	}

	fn add(&mut self, model: TypeModel) {
		self.types.insert(model.name.clone(), Arc::new(model));
	}
}

impl Introspector for TestUniverse {
	fn type_model(&self, ty: &TypeName) -> Option<Arc<TypeModel>> {
		self.types.get(ty).cloned()
	}

	fn static_value(&self, owner: &TypeName, field: &str) -> Option<Value> {
		self.statics.get(&(owner.qualified().to_string(), field.to_string())).cloned()
	}
}

/// A library layer named "toolkit" holding the given resources.
pub fn toolkit_layer(files: &[(&str, &str)]) -> Arc<dyn ResourceLayer> {
	let mut layer = MemoryLayer::new(ResourceOrigin::Library("toolkit".into()));
	for (path, text) in files {
		layer.insert(*path, *text);
	}
	Arc::new(layer)
}

/// A project-local layer holding the given resources.
pub fn project_layer(files: &[(&str, &str)]) -> Arc<dyn ResourceLayer> {
	let mut layer = MemoryLayer::new(ResourceOrigin::Project);
	for (path, text) in files {
		layer.insert(*path, *text);
	}
	Arc::new(layer)
}

/// The package document opting the `toolkit` package into caching.
pub const TOOLKIT_PACKAGE: (&str, &str) =
	("toolkit/package.kdl", "package { cache-descriptors }");

/// An engine over the standard universe and the given layers.
pub fn engine_with(layers: Vec<Arc<dyn ResourceLayer>>) -> DescriptorEngine {
	engine_with_policy(layers, EnginePolicy::default())
}

/// An engine with an explicit policy.
pub fn engine_with_policy(
	layers: Vec<Arc<dyn ResourceLayer>>,
	policy: EnginePolicy,
) -> DescriptorEngine {
	let mut builder =
		DescriptorEngine::builder(Arc::new(TestUniverse::standard())).policy(policy);
	for layer in layers {
		builder = builder.layer(layer);
	}
	builder.build()
}
