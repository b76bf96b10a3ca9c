//! The descriptor engine facade.
//!
//! Owns every collaborator — introspector, resource layers, version
//! factories, the rule pipeline, dynamic post-processors, the cache and
//! the icon resolver — and drives the resolution control flow: cache
//! check, recursive ancestor merge, document location and validation,
//! rule application, post-processing, finalization, cache admission.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use armature_model::{
	COMPONENT_PLACEHOLDER, Descriptor, DescriptorKey, EvalError, IconRef, PropertyDescriptor,
	ResourceOrigin, TypeName, Value,
};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::cache::{CacheOutcome, CacheTier, DescriptorCache};
use crate::document::{parse_descriptor_doc, parse_package_doc};
use crate::error::{LoadError, Result};
use crate::eval::Evaluator;
use crate::icon::{IconResolver, own_icon};
use crate::introspect::{Introspector, TypeModel, TypeOrigin};
use crate::merge::DescriptorBuilder;
use crate::resource::{
	ResourceLayer, ResourceLocator, creation_icon_path, descriptor_path, package_doc_path,
};
use crate::rules::{Rule, RuleCtx, apply_document, pipeline};
use crate::version::{VersionAxis, VersionProviderFactory, resolve_first_valid};

/// Tunable resolution policy.
#[derive(Debug, Clone)]
pub struct EnginePolicy {
	/// Whether the hierarchy root's descriptor (and icon) may be cached
	/// across sessions. Off by default: the root is rebuilt every
	/// session.
	pub cache_root: bool,
}

impl Default for EnginePolicy {
	fn default() -> Self {
		Self { cache_root: false }
	}
}

/// Post-processes every resolved descriptor before it is published.
///
/// Registration and deregistration take effect for subsequent
/// resolutions only; already-cached descriptors are not revisited.
pub trait DescriptorProcessor: Send + Sync {
	/// Mutates the builder after documents and introspection have been
	/// applied.
	fn process(&self, ty: &TypeName, builder: &mut DescriptorBuilder) -> Result<()>;
}

/// Handle for deregistering a [`DescriptorProcessor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorId(u64);

/// Builder for [`DescriptorEngine`].
pub struct EngineBuilder {
	introspector: Arc<dyn Introspector>,
	layers: Vec<Arc<dyn ResourceLayer>>,
	version_factories: Vec<Arc<dyn VersionProviderFactory>>,
	policy: EnginePolicy,
}

impl EngineBuilder {
	/// Adds a resource layer.
	pub fn layer(mut self, layer: Arc<dyn ResourceLayer>) -> Self {
		self.layers.push(layer);
		self
	}

	/// Adds a version-provider factory.
	pub fn version_factory(mut self, factory: Arc<dyn VersionProviderFactory>) -> Self {
		self.version_factories.push(factory);
		self
	}

	/// Overrides the default policy.
	pub fn policy(mut self, policy: EnginePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Builds the engine.
	pub fn build(self) -> DescriptorEngine {
		DescriptorEngine {
			introspector: self.introspector,
			locator: ResourceLocator::new(self.layers),
			version_factories: RwLock::new(self.version_factories),
			processors: RwLock::new(Vec::new()),
			next_processor: AtomicU64::new(0),
			rules: pipeline(),
			cache: DescriptorCache::new(),
			icons: IconResolver::new(),
			policy: self.policy,
		}
	}
}

/// The component descriptor resolution engine.
pub struct DescriptorEngine {
	introspector: Arc<dyn Introspector>,
	locator: ResourceLocator,
	version_factories: RwLock<Vec<Arc<dyn VersionProviderFactory>>>,
	processors: RwLock<Vec<(u64, Arc<dyn DescriptorProcessor>)>>,
	next_processor: AtomicU64,
	rules: Vec<Box<dyn Rule>>,
	cache: DescriptorCache,
	icons: IconResolver,
	policy: EnginePolicy,
}

impl DescriptorEngine {
	/// Starts building an engine around a reflection capability.
	pub fn builder(introspector: Arc<dyn Introspector>) -> EngineBuilder {
		EngineBuilder {
			introspector,
			layers: Vec::new(),
			version_factories: Vec::new(),
			policy: EnginePolicy::default(),
		}
	}

	/// Resolves the descriptor for a component type.
	pub fn resolve(&self, ty: &TypeName) -> Result<Arc<Descriptor>> {
		self.resolve_key(DescriptorKey::component(ty.clone()))
	}

	/// Resolves by qualified name; returns the identical cached instance
	/// as [`Self::resolve`] within a session.
	pub fn resolve_named(&self, name: &str) -> Result<Arc<Descriptor>> {
		self.resolve(&TypeName::from(name))
	}

	/// Resolves the descriptor of a sub-object `suffix` exposed by
	/// `host`.
	pub fn resolve_exposed(
		&self,
		host: Arc<DescriptorKey>,
		suffix: &str,
		ty: &TypeName,
	) -> Result<Arc<Descriptor>> {
		self.resolve_key(DescriptorKey::exposed(ty.clone(), host, suffix))
	}

	/// Resolves an arbitrary descriptor key.
	pub fn resolve_key(&self, key: DescriptorKey) -> Result<Arc<Descriptor>> {
		match self.cache.get_or_begin(&key) {
			CacheOutcome::Hit(descriptor) => Ok(descriptor),
			CacheOutcome::MustResolve => match self.build_descriptor(&key) {
				Ok((descriptor, tier)) => {
					self.cache.fulfill(&key, descriptor.clone(), tier);
					Ok(descriptor)
				}
				Err(error) => {
					self.cache.abort(&key);
					Err(error)
				}
			},
		}
	}

	/// Resolves the palette icon for a type (interfaces before
	/// superclass at each level, placeholder when nothing is found).
	pub fn icon(&self, ty: &TypeName) -> IconRef {
		let cacheable = match self.introspector.type_model(ty) {
			Some(model) => !(model.is_root() && !self.policy.cache_root),
			None => true,
		};
		self.icons.resolve(ty, &*self.introspector, &self.locator, cacheable)
	}

	/// Starts a new editing session: session-tier descriptors are
	/// dropped and will be recomputed on first request.
	pub fn begin_session(&self) {
		self.cache.begin_session();
	}

	/// Registers a post-processor; affects subsequent resolutions only.
	pub fn register_processor(&self, processor: Arc<dyn DescriptorProcessor>) -> ProcessorId {
		let id = self.next_processor.fetch_add(1, Ordering::Relaxed);
		self.processors.write().push((id, processor));
		ProcessorId(id)
	}

	/// Deregisters a post-processor; `false` when the id is unknown.
	pub fn deregister_processor(&self, id: ProcessorId) -> bool {
		let mut processors = self.processors.write();
		let before = processors.len();
		processors.retain(|(pid, _)| *pid != id.0);
		processors.len() != before
	}

	/// Registers an additional version-provider factory; affects
	/// subsequent resolutions only.
	pub fn register_version_factory(&self, factory: Arc<dyn VersionProviderFactory>) {
		self.version_factories.write().push(factory);
	}

	/// Reads a property's default value, evaluating its expression on
	/// first access.
	///
	/// `None` means the property declares no default expression — the
	/// consumer falls back to asking the runtime accessor. When an
	/// expression is declared it always wins, errors included.
	pub fn property_default(
		&self,
		property: &PropertyDescriptor,
	) -> Option<std::result::Result<Value, EvalError>> {
		let lazy = property.default.as_ref()?;
		Some(lazy.get_or_eval(|expr| Evaluator::new(&*self.introspector).evaluate(expr)))
	}

	/// Evaluates a free-standing expression.
	pub fn evaluate(&self, expr: &str) -> std::result::Result<Value, EvalError> {
		Evaluator::new(&*self.introspector).evaluate(expr)
	}

	/// Evaluates a creation/invocation argument expression for
	/// `component`, substituting the component placeholder first.
	pub fn evaluate_argument(
		&self,
		expr: &str,
		component: &TypeName,
	) -> std::result::Result<Value, EvalError> {
		let substituted = expr.replace(COMPONENT_PLACEHOLDER, component.qualified());
		Evaluator::new(&*self.introspector).evaluate(&substituted)
	}

	fn build_descriptor(&self, key: &DescriptorKey) -> Result<(Arc<Descriptor>, CacheTier)> {
		let ty = key.component_type();
		let model = self
			.introspector
			.type_model(ty)
			.ok_or_else(|| LoadError::UnknownType { ty: ty.clone() })?;

		self.check_hierarchy(ty, &model)?;

		// Ancestor first: the supertype for pure keys, the pure component
		// descriptor for exposed sub-objects.
		let ancestor_key = if key.is_pure() {
			model.supertype.clone().map(DescriptorKey::component)
		} else {
			Some(DescriptorKey::component(ty.clone()))
		};
		let ancestor = ancestor_key.map(|k| self.resolve_key(k)).transpose()?;

		let mut builder = match &ancestor {
			Some(ancestor) => DescriptorBuilder::inheriting(key.clone(), ancestor),
			None => DescriptorBuilder::new(key.clone()),
		};
		if key.is_pure() {
			builder.apply_introspection(&model);
		}

		let axes = self.version_axes(ty, &model.origin);
		let located = resolve_first_valid(
			&self.locator,
			&axes,
			&descriptor_path(key),
			parse_descriptor_doc,
		)?;
		if let Some((doc, _)) = located {
			let ctx =
				RuleCtx { ty, model: &model, key, locator: &self.locator, axes: &axes };
			apply_document(&self.rules, &doc, &mut builder, &ctx)?;
		}
		builder.apply_category_directives();

		for (_, processor) in self.processors.read().iter() {
			processor.process(ty, &mut builder)?;
		}

		if let Some(icon) = own_icon(ty, &self.locator) {
			builder.icon = Some(icon);
		}
		let icon = builder.icon.clone().unwrap_or_else(IconRef::placeholder);
		self.attach_creation_icons(&mut builder, ty);

		let tier = self.cache_tier(&model, &builder);
		let presentation_cached = !icon.origin.is_project();
		let descriptor = builder.finalize(icon, tier == CacheTier::Cached, presentation_cached);
		Ok((Arc::new(descriptor), tier))
	}

	fn check_hierarchy(&self, ty: &TypeName, model: &TypeModel) -> Result<()> {
		let mut seen = FxHashSet::default();
		seen.insert(ty.clone());
		let mut cursor = model.supertype.clone();
		while let Some(current) = cursor {
			if !seen.insert(current.clone()) {
				return Err(LoadError::HierarchyCycle { ty: ty.clone() });
			}
			cursor = self
				.introspector
				.type_model(&current)
				.and_then(|m| m.supertype.clone());
		}
		Ok(())
	}

	fn version_axes(&self, ty: &TypeName, origin: &TypeOrigin) -> Vec<VersionAxis> {
		let origin = match origin {
			TypeOrigin::Library(name) => ResourceOrigin::Library(name.clone()),
			TypeOrigin::Project => ResourceOrigin::Project,
		};
		self.version_factories
			.read()
			.iter()
			.flat_map(|factory| factory.axes(ty, &origin))
			.collect()
	}

	fn attach_creation_icons(&self, builder: &mut DescriptorBuilder, ty: &TypeName) {
		for creation in &mut builder.creations {
			if creation.icon.is_some() {
				continue;
			}
			let Some(id) = &creation.id else {
				continue;
			};
			let path = creation_icon_path(ty, id);
			if let Some(origin) = self.locator.probe(&path) {
				creation.icon =
					Some(IconRef { owner: Some(ty.clone()), path: Some(path), origin });
			}
		}
	}

	fn cache_tier(&self, model: &TypeModel, builder: &DescriptorBuilder) -> CacheTier {
		if model.origin.is_project() {
			return CacheTier::Session;
		}
		if builder.params.is_true("no-cache") {
			return CacheTier::Session;
		}
		if model.is_root() {
			return if self.policy.cache_root { CacheTier::Cached } else { CacheTier::Session };
		}
		if self.package_opts_in(model.name.package()) {
			CacheTier::Cached
		} else {
			CacheTier::Session
		}
	}

	fn package_opts_in(&self, package: &str) -> bool {
		let path = package_doc_path(package);
		let Some((text, _)) = self.locator.find(&path) else {
			return false;
		};
		match parse_package_doc(&text, &path) {
			Ok(doc) => doc.cache_descriptors,
			Err(error) => {
				tracing::warn!(path = %path, error = %error, "ignoring invalid package document");
				false
			}
		}
	}
}
