//! Reflection capability boundary.
//!
//! The engine never touches host reflection directly. The host supplies
//! an [`Introspector`] that answers three questions: what does a type
//! look like ([`TypeModel`]), what is the runtime value of a static
//! field (for default-value expressions), and which loader generation is
//! current (project types change identity across reloads). Everything
//! downstream of this trait is reflection-agnostic.

use std::sync::Arc;

use armature_model::{
	PropertyCategory, PropertyDescriptor, PropertySource, Signature, StringBag, TypeName, Value,
};

/// Where a type was loaded from.
///
/// Library types are stable for an entire session; project types may be
/// reloaded with a different identity after any user edit, which is why
/// they are never cache-eligible across sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOrigin {
	/// Loaded from a named library.
	Library(String),
	/// Compiled from project-local sources.
	Project,
}

impl TypeOrigin {
	/// True for project-local types.
	pub fn is_project(&self) -> bool {
		matches!(self, Self::Project)
	}

	/// The library name, if any.
	pub fn library(&self) -> Option<&str> {
		match self {
			Self::Library(name) => Some(name),
			Self::Project => None,
		}
	}
}

/// A public field as reported by host reflection.
#[derive(Debug, Clone)]
pub struct FieldModel {
	/// Field name.
	pub name: String,
	/// Field type.
	pub ty: TypeName,
	/// Public visibility.
	pub is_public: bool,
	/// Static fields never become properties.
	pub is_static: bool,
	/// Compiler-synthesized fields never become properties.
	pub is_synthetic: bool,
}

/// A method as reported by host reflection.
#[derive(Debug, Clone)]
pub struct MethodModel {
	/// Canonical signature.
	pub signature: Signature,
	/// Return type, if not void.
	pub return_type: Option<TypeName>,
	/// Public visibility.
	pub is_public: bool,
	/// Static methods never participate in introspection.
	pub is_static: bool,
}

/// Structural description of one type, as the host's reflection sees it.
#[derive(Debug, Clone)]
pub struct TypeModel {
	/// Qualified type name.
	pub name: TypeName,
	/// Where the type was loaded from.
	pub origin: TypeOrigin,
	/// Direct supertype; `None` for the root type.
	pub supertype: Option<TypeName>,
	/// Declared interfaces, in declaration order.
	pub interfaces: Vec<TypeName>,
	/// Accessible fields, declared and inherited.
	pub fields: Vec<FieldModel>,
	/// Accessible methods, declared and inherited. Document rules may
	/// reference inherited signatures, so the model must list them.
	pub methods: Vec<MethodModel>,
	/// Public constructor signatures.
	pub constructors: Vec<Signature>,
	/// Property ids hinted as preferred by auxiliary type metadata.
	pub preferred_hints: Vec<String>,
}

impl TypeModel {
	/// True for the hierarchy root (no supertype).
	pub fn is_root(&self) -> bool {
		self.supertype.is_none()
	}

	/// Finds a public method by canonical signature.
	pub fn method(&self, signature: &Signature) -> Option<&MethodModel> {
		self.methods.iter().find(|m| &m.signature == signature)
	}

	/// True when a public constructor with the given signature exists.
	pub fn has_constructor(&self, signature: &Signature) -> bool {
		self.constructors.iter().any(|c| c == signature)
	}
}

/// Host reflection capability.
pub trait Introspector: Send + Sync {
	/// Structural model of `ty`, or `None` for unknown types.
	fn type_model(&self, ty: &TypeName) -> Option<Arc<TypeModel>>;

	/// Runtime value of a public static field, resolved against the
	/// type's own loading context.
	fn static_value(&self, owner: &TypeName, field: &str) -> Option<Value>;

	/// Current loader generation; bumps whenever project types reload.
	fn generation(&self) -> u64 {
		0
	}
}

/// Decapitalizes an accessor tail the way bean-style introspection does:
/// `Text` becomes `text`, but an all-caps prefix like `URL` is kept.
pub fn decapitalize(name: &str) -> String {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return String::new();
	};
	// Two leading capitals: leave the name alone (URL, UIScale).
	if chars.clone().next().is_some_and(char::is_uppercase) {
		return name.to_string();
	}
	let mut out: String = first.to_lowercase().collect();
	out.push_str(chars.as_str());
	out
}

/// Derives the standard-introspection property candidates of one type:
/// every public single-argument setter with a matching getter (or
/// boolean `is` getter), and every public non-static, non-synthesized
/// field. Overloaded setters each yield a distinct candidate.
pub fn standard_properties(model: &TypeModel) -> Vec<PropertyDescriptor> {
	let mut out = Vec::new();

	for method in &model.methods {
		if !method.is_public || method.is_static {
			continue;
		}
		let Some(tail) = method.signature.name().strip_prefix("set") else {
			continue;
		};
		if tail.is_empty() || method.signature.params().len() != 1 {
			continue;
		}
		if !has_matching_getter(model, tail) {
			continue;
		}

		let id = decapitalize(tail);
		let category = if model.preferred_hints.iter().any(|h| h == &id) {
			PropertyCategory::Preferred
		} else {
			PropertyCategory::Normal
		};
		out.push(PropertyDescriptor {
			id: id.clone(),
			title: id,
			category,
			value_type: method.signature.params().first().cloned(),
			editor: None,
			default: None,
			tags: StringBag::new(),
			source: PropertySource::Setter(method.signature.clone()),
		});
	}

	for field in &model.fields {
		if !field.is_public || field.is_static || field.is_synthetic {
			continue;
		}
		let category = if model.preferred_hints.iter().any(|h| h == &field.name) {
			PropertyCategory::Preferred
		} else {
			PropertyCategory::Normal
		};
		out.push(PropertyDescriptor {
			id: field.name.clone(),
			title: field.name.clone(),
			category,
			value_type: Some(field.ty.clone()),
			editor: None,
			default: None,
			tags: StringBag::new(),
			source: PropertySource::Field(field.name.clone()),
		});
	}

	out
}

fn has_matching_getter(model: &TypeModel, tail: &str) -> bool {
	model.methods.iter().any(|m| {
		if !m.is_public || m.is_static || !m.signature.params().is_empty() {
			return false;
		}
		if let Some(getter_tail) = m.signature.name().strip_prefix("get") {
			return getter_tail == tail;
		}
		if let Some(getter_tail) = m.signature.name().strip_prefix("is") {
			let boolean_return = m
				.return_type
				.as_ref()
				.is_some_and(|t| matches!(t.qualified(), "boolean" | "bool"));
			return getter_tail == tail && boolean_return;
		}
		false
	})
}
