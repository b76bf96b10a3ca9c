//! The resolved descriptor aggregate and its sub-descriptors.

use crate::bags::StringBag;
use crate::category::PropertyCategory;
use crate::key::DescriptorKey;
use crate::lazy::LazyValue;
use crate::pattern::name_matches;
use crate::types::{ResourceOrigin, Signature, TypeName};

/// Placeholder token in creation source templates replaced by the fully
/// qualified component type name.
pub const COMPONENT_PLACEHOLDER: &str = "%component%";

/// Reference to a resolved icon resource.
///
/// The engine never decodes images; it hands the consumer the winning
/// resource path and where it came from. The placeholder stands in when
/// no icon exists anywhere in the type's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRef {
	/// The type whose resource won the hierarchy walk, if any.
	pub owner: Option<TypeName>,
	/// Relative resource path of the icon.
	pub path: Option<String>,
	/// Which layer supplied the icon.
	pub origin: ResourceOrigin,
}

impl IconRef {
	/// The generic placeholder icon.
	pub fn placeholder() -> Self {
		Self { owner: None, path: None, origin: ResourceOrigin::Builtin }
	}

	/// True for the generic placeholder.
	pub fn is_placeholder(&self) -> bool {
		self.path.is_none()
	}
}

/// Which member a property was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertySource {
	/// A single-argument setter (with matching getter).
	Setter(Signature),
	/// A public instance field.
	Field(String),
	/// Declared purely in a descriptor document (`add-property`).
	Declared,
}

/// One configurable property of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
	/// Short id, e.g. `text` for `setText(..)` or a field named `text`.
	pub id: String,
	/// Display title shown in the property sheet.
	pub title: String,
	/// Visibility category.
	pub category: PropertyCategory,
	/// Declared value type.
	pub value_type: Option<TypeName>,
	/// Editor id, resolved by the property-sheet UI.
	pub editor: Option<String>,
	/// Explicit default-value expression; when present the runtime
	/// accessor is never consulted.
	pub default: Option<LazyValue>,
	/// Tag bag.
	pub tags: StringBag,
	/// Backing member.
	pub source: PropertySource,
}

impl PropertyDescriptor {
	/// Canonical unique selector for this property within its descriptor.
	///
	/// Field-backed properties are addressed as `f:id`, setter-backed ones
	/// by bare id (or by full signature, which always works for
	/// overloads), declared ones by bare id.
	pub fn selector(&self) -> String {
		match &self.source {
			PropertySource::Field(_) => format!("f:{}", self.id),
			PropertySource::Setter(sig) => sig.to_string(),
			PropertySource::Declared => self.id.clone(),
		}
	}

	/// The setter signature, for setter-backed properties.
	pub fn setter(&self) -> Option<&Signature> {
		match &self.source {
			PropertySource::Setter(sig) => Some(sig),
			_ => None,
		}
	}
}

/// One invokable (or metadata-only) method of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDescriptor {
	/// Canonical signature.
	pub signature: Signature,
	/// The type that declared the method.
	pub declaring_type: TypeName,
	/// Return type, if not void.
	pub return_type: Option<TypeName>,
	/// Non-executable methods are used for metadata only and never
	/// invoked by the builder.
	pub executable: bool,
	/// Tag bag.
	pub tags: StringBag,
	/// Ordered parameter descriptors.
	pub parameters: Vec<ParameterDescriptor>,
}

/// One parameter of a method or constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterDescriptor {
	/// Parameter type.
	pub ty: Option<TypeName>,
	/// Override name from a descriptor document.
	pub name: Option<String>,
	/// Dedicated editor for this parameter.
	pub editor: Option<String>,
	/// The argument receives the child component.
	pub is_child: bool,
	/// The argument receives the parent component.
	pub is_parent: bool,
	/// Secondary child slot for multi-child methods.
	pub is_secondary_child: bool,
	/// Secondary parent slot for multi-child methods.
	pub is_secondary_parent: bool,
	/// Default argument-source expression.
	pub default_source: Option<String>,
}

/// One constructor of a component.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDescriptor {
	/// Constructor signature (`<init>` plus parameter types).
	pub signature: Signature,
	/// Ordered parameter descriptors.
	pub parameters: Vec<ParameterDescriptor>,
}

/// A generic type-parameter binding on a creation variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
	/// Placeholder name used in the source template, e.g. `T`.
	pub name: String,
	/// Upper bound the chosen argument must satisfy.
	pub bound: Option<TypeName>,
}

/// A post-construction invocation on a creation variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTemplate {
	/// Signature of the method to invoke.
	pub signature: Signature,
	/// Argument source text, placeholders included.
	pub arguments: String,
}

/// One named way to instantiate a component.
#[derive(Debug, Clone, PartialEq)]
pub struct CreationDescriptor {
	/// Variant id; `None` is the default variant.
	pub id: Option<String>,
	/// Display name; falls back to the type's simple name.
	pub name: Option<String>,
	/// Source template with `%component%` and type-parameter placeholders.
	pub source: Option<String>,
	/// Post-construction invocations, in declaration order.
	pub invocations: Vec<InvocationTemplate>,
	/// Parameter bag.
	pub params: StringBag,
	/// Tag bag.
	pub tags: StringBag,
	/// Variant icon; falls back to the owning descriptor's icon.
	pub icon: Option<IconRef>,
	/// Variant description; falls back to the owning descriptor's.
	pub description: Option<String>,
	/// Generic type-parameter bindings.
	pub type_parameters: Vec<TypeParameter>,
}

impl CreationDescriptor {
	/// An empty variant with the given id.
	pub fn empty(id: Option<String>) -> Self {
		Self {
			id,
			name: None,
			source: None,
			invocations: Vec::new(),
			params: StringBag::new(),
			tags: StringBag::new(),
			icon: None,
			description: None,
			type_parameters: Vec::new(),
		}
	}

	/// Display name, defaulting to the component's simple name.
	pub fn display_name(&self, component: &TypeName) -> String {
		self.name.clone().unwrap_or_else(|| component.simple_name().to_string())
	}

	/// Materializes the source template for `component`, substituting the
	/// component placeholder and any `%name%` type-parameter placeholders
	/// from `type_args` (placeholder name → chosen type argument).
	pub fn source_for(&self, component: &TypeName, type_args: &[(&str, &str)]) -> Option<String> {
		let template = self.source.as_ref()?;
		let mut out = template.replace(COMPONENT_PLACEHOLDER, component.qualified());
		for (name, arg) in type_args {
			out = out.replace(&format!("%{name}%"), arg);
		}
		Some(out)
	}
}

/// A single include/exclude pattern controlling which members of an
/// exposed sub-object are visible through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExposingRule {
	/// Include (`true`) or exclude (`false`) rule.
	pub include: bool,
	/// Literal name or trailing-`*` prefix pattern.
	pub pattern: String,
}

/// Resolved metadata for one component type (or type + host + suffix).
///
/// Built bottom-up by the engine's hierarchy merger and immutable once
/// published behind an `Arc`. All collections preserve contribution
/// order: inherited entries first, own entries after, which is what the
/// accumulation invariant promises consumers.
#[derive(Debug, Clone)]
pub struct Descriptor {
	/// Identity of this descriptor.
	pub key: DescriptorKey,
	/// The runtime behavior class the builder instantiates for this
	/// component.
	pub model_type: Option<TypeName>,
	/// Toolkit id from the document root.
	pub toolkit: Option<String>,
	/// Normalized free-text description.
	pub description: Option<String>,
	/// Resolved icon.
	pub icon: IconRef,
	/// Properties in contribution order.
	pub properties: Vec<PropertyDescriptor>,
	/// Methods in contribution order.
	pub methods: Vec<MethodDescriptor>,
	/// Constructors in contribution order.
	pub constructors: Vec<ConstructorDescriptor>,
	/// Creation variants; the default variant is always present after
	/// finalization.
	pub creations: Vec<CreationDescriptor>,
	/// Morph targets in contribution order.
	pub morph_targets: Vec<TypeName>,
	/// Parameter bag.
	pub params: StringBag,
	/// Tag bag.
	pub tags: StringBag,
	/// Exposing rules for sub-object visibility.
	pub exposing_rules: Vec<ExposingRule>,
	/// True when this descriptor was admitted to the cross-session cache.
	pub cached: bool,
	/// True when presentation data (icons) may be cached for this type.
	pub presentation_cached: bool,
}

impl Descriptor {
	/// The component type this descriptor describes.
	pub fn component(&self) -> &TypeName {
		self.key.component_type()
	}

	/// Looks up a property by selector.
	///
	/// `f:id` addresses the field-backed property, `m:id` (or `m:` plus a
	/// full signature) the setter-backed one, a full signature addresses a
	/// specific overload, and a bare id prefers the setter-backed property
	/// over declared and field-backed ones.
	pub fn property(&self, selector: &str) -> Option<&PropertyDescriptor> {
		if let Some(rest) = selector.strip_prefix("f:") {
			return self
				.properties
				.iter()
				.find(|p| matches!(p.source, PropertySource::Field(_)) && p.id == rest);
		}
		if let Some(rest) = selector.strip_prefix("m:") {
			return self.setter_property(rest);
		}
		if selector.contains('(') {
			return self.setter_property(selector);
		}

		self.properties
			.iter()
			.find(|p| matches!(p.source, PropertySource::Setter(_)) && p.id == selector)
			.or_else(|| {
				self.properties
					.iter()
					.find(|p| matches!(p.source, PropertySource::Declared) && p.id == selector)
			})
			.or_else(|| self.properties.iter().find(|p| p.id == selector))
	}

	fn setter_property(&self, selector: &str) -> Option<&PropertyDescriptor> {
		if selector.contains('(') {
			let sig = Signature::parse(selector).ok()?;
			self.properties.iter().find(|p| p.setter() == Some(&sig))
		} else {
			self.properties
				.iter()
				.find(|p| matches!(p.source, PropertySource::Setter(_)) && p.id == selector)
		}
	}

	/// Looks up a method by canonical signature.
	pub fn method(&self, signature: &Signature) -> Option<&MethodDescriptor> {
		self.methods.iter().find(|m| &m.signature == signature)
	}

	/// Looks up a method by name and parameter types, the form used when
	/// binding against a runtime member.
	pub fn method_named(&self, name: &str, params: &[TypeName]) -> Option<&MethodDescriptor> {
		self.methods
			.iter()
			.find(|m| m.signature.name() == name && m.signature.params() == params)
	}

	/// Looks up a constructor by parameter types.
	pub fn constructor(&self, params: &[TypeName]) -> Option<&ConstructorDescriptor> {
		self.constructors.iter().find(|c| c.signature.params() == params)
	}

	/// Looks up a creation variant; `None` addresses the default variant.
	pub fn creation(&self, id: Option<&str>) -> Option<&CreationDescriptor> {
		self.creations.iter().find(|c| c.id.as_deref() == id)
	}

	/// Looks up a parameter value.
	pub fn parameter(&self, name: &str) -> Option<&str> {
		self.params.get(name)
	}

	/// True iff `name` is a parameter with the literal value `"true"`.
	pub fn has_true_parameter(&self, name: &str) -> bool {
		self.params.is_true(name)
	}

	/// Looks up a tag value.
	pub fn tag(&self, name: &str) -> Option<&str> {
		self.tags.get(name)
	}

	/// True iff `name` is a tag with the literal value `"true"`.
	pub fn has_true_tag(&self, name: &str) -> bool {
		self.tags.is_true(name)
	}

	/// Whether a member of an exposed sub-object is visible through this
	/// descriptor's exposing rules.
	///
	/// With no include rules everything not excluded is visible; include
	/// rules whitelist, and an exclude match always wins.
	pub fn exposes(&self, member: &str) -> bool {
		let mut included = !self.exposing_rules.iter().any(|r| r.include);
		for rule in &self.exposing_rules {
			if name_matches(&rule.pattern, member) {
				if !rule.include {
					return false;
				}
				included = true;
			}
		}
		included
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::TypeName;

	fn ty(name: &str) -> TypeName {
		TypeName::from(name)
	}

	fn prop(id: &str, source: PropertySource) -> PropertyDescriptor {
		PropertyDescriptor {
			id: id.to_string(),
			title: id.to_string(),
			category: PropertyCategory::default(),
			value_type: None,
			editor: None,
			default: None,
			tags: StringBag::new(),
			source,
		}
	}

	fn descriptor_with(properties: Vec<PropertyDescriptor>) -> Descriptor {
		Descriptor {
			key: DescriptorKey::component(ty("toolkit.Button")),
			model_type: None,
			toolkit: None,
			description: None,
			icon: IconRef::placeholder(),
			properties,
			methods: Vec::new(),
			constructors: Vec::new(),
			creations: Vec::new(),
			morph_targets: Vec::new(),
			params: StringBag::new(),
			tags: StringBag::new(),
			exposing_rules: Vec::new(),
			cached: false,
			presentation_cached: false,
		}
	}

	#[test]
	fn bare_selector_prefers_setter_over_field() {
		let setter_sig = Signature::parse("setText(java.lang.String)").unwrap();
		let d = descriptor_with(vec![
			prop("text", PropertySource::Field("text".into())),
			prop("text", PropertySource::Setter(setter_sig.clone())),
		]);

		let picked = d.property("text").unwrap();
		assert_eq!(picked.setter(), Some(&setter_sig));

		let field = d.property("f:text").unwrap();
		assert!(matches!(field.source, PropertySource::Field(_)));

		let by_m = d.property("m:text").unwrap();
		assert_eq!(by_m.setter(), Some(&setter_sig));
	}

	#[test]
	fn signature_selector_picks_overload() {
		let a = Signature::parse("setText(java.lang.String)").unwrap();
		let b = Signature::parse("setText(java.lang.Object)").unwrap();
		let d = descriptor_with(vec![
			prop("text", PropertySource::Setter(a.clone())),
			prop("text", PropertySource::Setter(b.clone())),
		]);

		assert_eq!(d.property("setText(java.lang.Object)").unwrap().setter(), Some(&b));
		assert_eq!(d.property("m:setText(java.lang.String)").unwrap().setter(), Some(&a));
	}

	#[test]
	fn creation_source_substitutes_placeholders() {
		let mut creation = CreationDescriptor::empty(Some("with-text".into()));
		creation.source = Some("new %component%<%T%>(\"hi\")".to_string());
		creation.type_parameters =
			vec![TypeParameter { name: "T".into(), bound: Some(ty("java.lang.Object")) }];

		let src = creation.source_for(&ty("toolkit.ComboBox"), &[("T", "java.lang.String")]);
		assert_eq!(src.as_deref(), Some("new toolkit.ComboBox<java.lang.String>(\"hi\")"));
	}

	#[test]
	fn creation_display_name_falls_back_to_simple_name() {
		let creation = CreationDescriptor::empty(None);
		assert_eq!(creation.display_name(&ty("toolkit.widgets.Button")), "Button");
	}

	#[test]
	fn exposing_rules_whitelist_and_exclude() {
		let mut d = descriptor_with(Vec::new());
		assert!(d.exposes("anything"));

		d.exposing_rules = vec![ExposingRule { include: false, pattern: "internal*".into() }];
		assert!(d.exposes("text"));
		assert!(!d.exposes("internalState"));

		d.exposing_rules = vec![
			ExposingRule { include: true, pattern: "text*".into() },
			ExposingRule { include: false, pattern: "textSecret".into() },
		];
		assert!(d.exposes("text"));
		assert!(d.exposes("textColor"));
		assert!(!d.exposes("textSecret"));
		assert!(!d.exposes("title"));
	}
}
