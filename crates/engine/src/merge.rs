//! The mutable descriptor builder used during hierarchy merge.
//!
//! Merging is build-then-publish: the ancestor's descriptor is an
//! immutable snapshot, [`DescriptorBuilder::inheriting`] copies its
//! state into a fresh builder, the current level's introspection and
//! rules mutate the copy, and [`DescriptorBuilder::finalize`] publishes
//! a new immutable descriptor. A cached ancestor is never aliased by a
//! child resolution.

use armature_model::{
	ConstructorDescriptor, CreationDescriptor, Descriptor, DescriptorKey, ExposingRule, IconRef,
	MethodDescriptor, ParameterDescriptor, PropertyCategory, PropertyDescriptor, PropertySource,
	Signature, StringBag, TypeName, name_matches,
};

use crate::introspect::{TypeModel, standard_properties};

/// In-progress descriptor state for one hierarchy level.
#[derive(Debug)]
pub struct DescriptorBuilder {
	/// Identity being built.
	pub key: DescriptorKey,
	/// Model class; child documents override.
	pub model_type: Option<TypeName>,
	/// Toolkit id; child documents override.
	pub toolkit: Option<String>,
	/// Description; child documents override.
	pub description: Option<String>,
	/// Icon inherited from the ancestor, replaced when this level has its
	/// own icon resource.
	pub icon: Option<IconRef>,
	/// Properties in contribution order.
	pub properties: Vec<PropertyDescriptor>,
	/// Methods in contribution order.
	pub methods: Vec<MethodDescriptor>,
	/// Constructors in contribution order.
	pub constructors: Vec<ConstructorDescriptor>,
	/// Creation variants in contribution order.
	pub creations: Vec<CreationDescriptor>,
	/// Morph targets in contribution order.
	pub morph_targets: Vec<TypeName>,
	/// Parameter bag.
	pub params: StringBag,
	/// Tag bag.
	pub tags: StringBag,
	/// Exposing rules in contribution order.
	pub exposing_rules: Vec<ExposingRule>,
	/// Bulk category directives collected at this level; applied in
	/// document order after every individual assignment.
	pending_categories: Vec<(PropertyCategory, Vec<String>)>,
}

impl DescriptorBuilder {
	/// An empty builder for a hierarchy root.
	pub fn new(key: DescriptorKey) -> Self {
		Self {
			key,
			model_type: None,
			toolkit: None,
			description: None,
			icon: None,
			properties: Vec::new(),
			methods: Vec::new(),
			constructors: Vec::new(),
			creations: Vec::new(),
			morph_targets: Vec::new(),
			params: StringBag::new(),
			tags: StringBag::new(),
			exposing_rules: Vec::new(),
			pending_categories: Vec::new(),
		}
	}

	/// A builder seeded with a copy of the ancestor's resolved state.
	pub fn inheriting(key: DescriptorKey, ancestor: &Descriptor) -> Self {
		Self {
			key,
			model_type: ancestor.model_type.clone(),
			toolkit: ancestor.toolkit.clone(),
			description: ancestor.description.clone(),
			icon: if ancestor.icon.is_placeholder() { None } else { Some(ancestor.icon.clone()) },
			properties: ancestor.properties.clone(),
			methods: ancestor.methods.clone(),
			constructors: ancestor.constructors.clone(),
			creations: ancestor.creations.clone(),
			morph_targets: ancestor.morph_targets.clone(),
			params: ancestor.params.clone(),
			tags: ancestor.tags.clone(),
			exposing_rules: ancestor.exposing_rules.clone(),
			pending_categories: Vec::new(),
		}
	}

	/// Adds this level's standard-introspection members: candidate
	/// properties and public constructors. Entries whose selector (or
	/// signature) is already present — inherited and possibly customized
	/// — are left alone.
	pub fn apply_introspection(&mut self, model: &TypeModel) {
		for candidate in standard_properties(model) {
			let selector = candidate.selector();
			if !self.properties.iter().any(|p| p.selector() == selector) {
				self.properties.push(candidate);
			}
		}
		for signature in &model.constructors {
			if self.constructor_position(signature.params()).is_none() {
				self.constructors.push(ConstructorDescriptor {
					signature: signature.clone(),
					parameters: signature
						.params()
						.iter()
						.map(|ty| ParameterDescriptor { ty: Some(ty.clone()), ..Default::default() })
						.collect(),
				});
			}
		}
	}

	/// Mutable property lookup with the same selector semantics as
	/// [`Descriptor::property`].
	pub fn property_mut(&mut self, selector: &str) -> Option<&mut PropertyDescriptor> {
		let position = self.property_position(selector)?;
		Some(&mut self.properties[position])
	}

	fn property_position(&self, selector: &str) -> Option<usize> {
		if let Some(rest) = selector.strip_prefix("f:") {
			return self
				.properties
				.iter()
				.position(|p| matches!(p.source, PropertySource::Field(_)) && p.id == rest);
		}
		if let Some(rest) = selector.strip_prefix("m:") {
			return self.setter_position(rest);
		}
		if selector.contains('(') {
			return self.setter_position(selector);
		}
		self.properties
			.iter()
			.position(|p| matches!(p.source, PropertySource::Setter(_)) && p.id == selector)
			.or_else(|| {
				self.properties
					.iter()
					.position(|p| matches!(p.source, PropertySource::Declared) && p.id == selector)
			})
			.or_else(|| self.properties.iter().position(|p| p.id == selector))
	}

	fn setter_position(&self, selector: &str) -> Option<usize> {
		if selector.contains('(') {
			let sig = Signature::parse(selector).ok()?;
			self.properties.iter().position(|p| p.setter() == Some(&sig))
		} else {
			self.properties
				.iter()
				.position(|p| matches!(p.source, PropertySource::Setter(_)) && p.id == selector)
		}
	}

	/// Adds a property, replacing an existing one with the same selector.
	pub fn upsert_property(&mut self, property: PropertyDescriptor) -> &mut PropertyDescriptor {
		let selector = property.selector();
		match self.properties.iter().position(|p| p.selector() == selector) {
			Some(at) => {
				self.properties[at] = property;
				&mut self.properties[at]
			}
			None => {
				let at = self.properties.len();
				self.properties.push(property);
				&mut self.properties[at]
			}
		}
	}

	/// Mutable method lookup by canonical signature.
	pub fn method_mut(&mut self, signature: &Signature) -> Option<&mut MethodDescriptor> {
		self.methods.iter_mut().find(|m| &m.signature == signature)
	}

	/// Adds a method entry if its signature is not already present, and
	/// returns the (new or existing) entry.
	pub fn ensure_method(&mut self, method: MethodDescriptor) -> &mut MethodDescriptor {
		match self.methods.iter().position(|m| m.signature == method.signature) {
			Some(at) => &mut self.methods[at],
			None => {
				let at = self.methods.len();
				self.methods.push(method);
				&mut self.methods[at]
			}
		}
	}

	/// Removes a method by canonical signature; `false` when absent.
	pub fn remove_method(&mut self, signature: &Signature) -> bool {
		let before = self.methods.len();
		self.methods.retain(|m| &m.signature != signature);
		self.methods.len() != before
	}

	/// Removes every method whose signature text matches `matches`.
	pub fn remove_methods_where(&mut self, matches: impl Fn(&str) -> bool) {
		self.methods.retain(|m| !matches(&m.signature.to_string()));
	}

	fn constructor_position(&self, params: &[TypeName]) -> Option<usize> {
		self.constructors.iter().position(|c| c.signature.params() == params)
	}

	/// Mutable constructor lookup by parameter types.
	pub fn constructor_mut(&mut self, params: &[TypeName]) -> Option<&mut ConstructorDescriptor> {
		let position = self.constructor_position(params)?;
		Some(&mut self.constructors[position])
	}

	/// Mutable creation-variant lookup; adds an empty variant when the id
	/// is new.
	pub fn ensure_creation(&mut self, id: Option<String>) -> &mut CreationDescriptor {
		match self.creations.iter().position(|c| c.id == id) {
			Some(at) => &mut self.creations[at],
			None => {
				let at = self.creations.len();
				self.creations.push(CreationDescriptor::empty(id));
				&mut self.creations[at]
			}
		}
	}

	/// Clears inherited morph targets (the `noInherit` marker).
	pub fn clear_morph_targets(&mut self) {
		self.morph_targets.clear();
	}

	/// Appends a morph target, keeping the list duplicate-free.
	pub fn add_morph_target(&mut self, target: TypeName) {
		if !self.morph_targets.contains(&target) {
			self.morph_targets.push(target);
		}
	}

	/// Queues a bulk category directive for this level.
	pub fn queue_category_directive(&mut self, category: PropertyCategory, patterns: Vec<String>) {
		self.pending_categories.push((category, patterns));
	}

	/// Applies queued bulk directives, in document order, after all
	/// individual property-level assignments; a later directive wins for
	/// properties matched by several.
	pub fn apply_category_directives(&mut self) {
		let directives = std::mem::take(&mut self.pending_categories);
		for (category, patterns) in directives {
			for property in &mut self.properties {
				if patterns.iter().any(|p| name_matches(p, &property.id)) {
					property.category = category;
				}
			}
		}
	}

	/// Publishes the immutable descriptor.
	///
	/// The default creation variant is synthesized when absent, and every
	/// variant's icon/description falls back to the owning descriptor's.
	pub fn finalize(mut self, icon: IconRef, cached: bool, presentation_cached: bool) -> Descriptor {
		if !self.creations.iter().any(|c| c.id.is_none()) {
			self.creations.insert(0, CreationDescriptor::empty(None));
		}
		for creation in &mut self.creations {
			if creation.icon.is_none() {
				creation.icon = Some(icon.clone());
			}
			if creation.description.is_none() {
				creation.description = self.description.clone();
			}
		}

		Descriptor {
			key: self.key,
			model_type: self.model_type,
			toolkit: self.toolkit,
			description: self.description,
			icon,
			properties: self.properties,
			methods: self.methods,
			constructors: self.constructors,
			creations: self.creations,
			morph_targets: self.morph_targets,
			params: self.params,
			tags: self.tags,
			exposing_rules: self.exposing_rules,
			cached,
			presentation_cached,
		}
	}
}

#[cfg(test)]
mod tests {
	use armature_model::{LazyValue, TypeName};

	use super::*;
	use crate::introspect::{FieldModel, MethodModel, TypeOrigin};

	fn ty(name: &str) -> TypeName {
		TypeName::from(name)
	}

	fn button_model() -> TypeModel {
		TypeModel {
			name: ty("toolkit.Button"),
			origin: TypeOrigin::Library("toolkit".into()),
			supertype: Some(ty("toolkit.Component")),
			interfaces: Vec::new(),
			fields: vec![FieldModel {
				name: "columns".into(),
				ty: ty("int"),
				is_public: true,
				is_static: false,
				is_synthetic: false,
			}],
			methods: vec![
				MethodModel {
					signature: Signature::parse("setText(java.lang.String)").unwrap(),
					return_type: None,
					is_public: true,
					is_static: false,
				},
				MethodModel {
					signature: Signature::parse("getText()").unwrap(),
					return_type: Some(ty("java.lang.String")),
					is_public: true,
					is_static: false,
				},
			],
			constructors: vec![Signature::constructor(vec![ty("java.lang.String")])],
			preferred_hints: Vec::new(),
		}
	}

	fn finalize(builder: DescriptorBuilder) -> Descriptor {
		builder.finalize(IconRef::placeholder(), false, true)
	}

	#[test]
	fn introspection_skips_inherited_selectors() {
		let mut base = DescriptorBuilder::new(DescriptorKey::component(ty("toolkit.Component")));
		base.apply_introspection(&button_model());
		let base_text = base.property_mut("text").unwrap();
		base_text.default = Some(LazyValue::new("\"inherited\""));
		let base_text_default = base_text.default.clone();
		let parent = finalize(base);

		let mut child =
			DescriptorBuilder::inheriting(DescriptorKey::component(ty("toolkit.Button")), &parent);
		child.apply_introspection(&button_model());

		// Same setter introspected again: the customized inherited entry
		// survives, no duplicate appears.
		let selectors: Vec<_> = child.properties.iter().map(|p| p.selector()).collect();
		let text_count = selectors.iter().filter(|s| *s == "setText(java.lang.String)").count();
		assert_eq!(text_count, 1);
		assert_eq!(child.property_mut("text").unwrap().default, base_text_default);
	}

	#[test]
	fn category_directives_apply_after_individual_and_in_order() {
		let mut builder = DescriptorBuilder::new(DescriptorKey::component(ty("toolkit.Button")));
		builder.apply_introspection(&button_model());

		// Individual assignment first, then two overlapping directives.
		builder.property_mut("text").unwrap().category = PropertyCategory::Hidden;
		builder.queue_category_directive(PropertyCategory::Preferred, vec!["text*".into()]);
		builder.queue_category_directive(PropertyCategory::Advanced, vec!["text".into()]);
		builder.apply_category_directives();

		let descriptor = finalize(builder);
		assert_eq!(descriptor.property("text").unwrap().category, PropertyCategory::Advanced);
	}

	#[test]
	fn finalize_synthesizes_default_creation() {
		let builder = DescriptorBuilder::new(DescriptorKey::component(ty("toolkit.Button")));
		let descriptor = finalize(builder);
		assert!(descriptor.creation(None).is_some());
	}

	#[test]
	fn creation_fallbacks_use_owning_descriptor() {
		let mut builder = DescriptorBuilder::new(DescriptorKey::component(ty("toolkit.Button")));
		builder.description = Some("A button".into());
		builder.ensure_creation(Some("styled".into()));

		let descriptor = finalize(builder);
		let styled = descriptor.creation(Some("styled")).unwrap();
		assert_eq!(styled.description.as_deref(), Some("A button"));
		assert_eq!(styled.icon.as_ref().unwrap(), &descriptor.icon);
	}

	#[test]
	fn morph_targets_deduplicate() {
		let mut builder = DescriptorBuilder::new(DescriptorKey::component(ty("toolkit.Button")));
		builder.add_morph_target(ty("toolkit.ToggleButton"));
		builder.add_morph_target(ty("toolkit.ToggleButton"));
		assert_eq!(builder.morph_targets.len(), 1);
	}
}
