//! Type names, member signatures and evaluated values.

use std::fmt;
use std::sync::Arc;

use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::SignatureError;

/// Fully qualified, dot-separated name of a component type.
///
/// Cheap to clone; the backing string is shared. Used as the canonical
/// identity of a type everywhere in the model and the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName(Arc<str>);

impl TypeName {
	/// Creates a type name from its qualified dotted form.
	pub fn new(qualified: impl AsRef<str>) -> Self {
		Self(Arc::from(qualified.as_ref()))
	}

	/// The full dotted name, e.g. `toolkit.widgets.Button`.
	pub fn qualified(&self) -> &str {
		&self.0
	}

	/// The segment after the last dot, e.g. `Button`.
	pub fn simple_name(&self) -> &str {
		self.0.rsplit('.').next().unwrap_or(&self.0)
	}

	/// The dotted package prefix, empty for an unqualified name.
	pub fn package(&self) -> &str {
		match self.0.rfind('.') {
			Some(idx) => &self.0[..idx],
			None => "",
		}
	}

	/// The name with dots replaced by path separators, for resource lookup.
	pub fn resource_path(&self) -> String {
		self.0.replace('.', "/")
	}
}

impl fmt::Display for TypeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TypeName {
	fn from(s: &str) -> Self {
		Self::new(s)
	}
}

impl From<String> for TypeName {
	fn from(s: String) -> Self {
		Self(Arc::from(s.as_str()))
	}
}

impl Serialize for TypeName {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for TypeName {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		Ok(Self::from(s))
	}
}

/// Canonical member signature: a name plus an ordered parameter-type list.
///
/// The textual form is `name(p1,p2)` with no spaces; constructors use the
/// fixed name `<init>`. Signatures are what disambiguate overloaded
/// members throughout a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Signature {
	name: String,
	params: Vec<TypeName>,
}

/// Member name used for constructor signatures.
pub const CONSTRUCTOR_NAME: &str = "<init>";

impl Signature {
	/// Creates a signature from a member name and parameter types.
	pub fn new(name: impl Into<String>, params: Vec<TypeName>) -> Self {
		Self { name: name.into(), params }
	}

	/// Creates a constructor signature for the given parameter types.
	pub fn constructor(params: Vec<TypeName>) -> Self {
		Self::new(CONSTRUCTOR_NAME, params)
	}

	/// The member name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The ordered parameter types.
	pub fn params(&self) -> &[TypeName] {
		&self.params
	}

	/// True for constructor signatures.
	pub fn is_constructor(&self) -> bool {
		self.name == CONSTRUCTOR_NAME
	}

	/// Parses the canonical `name(p1,p2)` form.
	pub fn parse(text: &str) -> Result<Self, SignatureError> {
		let open = text
			.find('(')
			.ok_or_else(|| SignatureError::MissingParameterList(text.to_string()))?;
		let close = text
			.rfind(')')
			.filter(|close| *close > open)
			.ok_or_else(|| SignatureError::MissingParameterList(text.to_string()))?;

		let name = text[..open].trim();
		if name.is_empty() {
			return Err(SignatureError::MissingName(text.to_string()));
		}

		let inner = text[open + 1..close].trim();
		let params = if inner.is_empty() {
			Vec::new()
		} else {
			inner
				.split(',')
				.map(|p| {
					let p = p.trim();
					if p.is_empty() {
						Err(SignatureError::EmptyParameter(text.to_string()))
					} else {
						Ok(TypeName::from(p))
					}
				})
				.collect::<Result<_, _>>()?
		};

		Ok(Self::new(name, params))
	}

	/// Filesystem-safe encoding used for per-method descriptor resources:
	/// `(`, `)` and `,` each become `_`.
	pub fn encoded(&self) -> String {
		self.to_string().replace(['(', ')', ','], "_")
	}
}

impl fmt::Display for Signature {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}(", self.name)?;
		for (i, p) in self.params.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			f.write_str(p.qualified())?;
		}
		f.write_str(")")
	}
}

/// Where a resource (descriptor document, icon) was loaded from.
///
/// Project resources are user-editable within a session; library
/// resources are immutable for the session's lifetime. Cache eligibility
/// depends on this distinction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ResourceOrigin {
	/// Bundled with the engine itself (e.g. the placeholder icon).
	Builtin,
	/// Loaded from a library layer.
	Library(String),
	/// Loaded from a project-local layer.
	Project,
}

impl ResourceOrigin {
	/// True for resources the user can edit without a type reload.
	pub fn is_project(&self) -> bool {
		matches!(self, Self::Project)
	}
}

impl fmt::Display for ResourceOrigin {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Builtin => f.write_str("builtin"),
			Self::Library(name) => write!(f, "library:{name}"),
			Self::Project => f.write_str("project"),
		}
	}
}

/// An evaluated expression result.
///
/// `Instance` is symbolic: the engine never constructs host objects, it
/// records the constructor call for the canvas to materialize.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
	/// The null literal.
	Null,
	/// Boolean value.
	Bool(bool),
	/// Integer value.
	Int(i64),
	/// Floating-point value.
	Float(f64),
	/// String value.
	Str(String),
	/// A symbolic constructor invocation.
	Instance {
		/// The constructed type.
		ty: TypeName,
		/// Evaluated constructor arguments.
		args: Vec<Value>,
	},
}

impl Value {
	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the integer value if this is an `Int` variant.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the float value, widening `Int` if necessary.
	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(v) => Some(*v),
			Self::Int(v) => Some(*v as f64),
			_ => None,
		}
	}

	/// Returns the string value if this is a `Str` variant.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(v) => Some(v),
			_ => None,
		}
	}

	/// True iff this is the boolean `true`.
	pub fn is_true(&self) -> bool {
		matches!(self, Self::Bool(true))
	}

	/// Returns the variant name of this value.
	pub fn type_name(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "string",
			Self::Instance { .. } => "instance",
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Self::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Self::Int(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Self::Float(v)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Self::Str(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Self::Str(v)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn type_name_components() {
		let ty = TypeName::from("toolkit.widgets.Button");
		assert_eq!(ty.qualified(), "toolkit.widgets.Button");
		assert_eq!(ty.simple_name(), "Button");
		assert_eq!(ty.package(), "toolkit.widgets");
		assert_eq!(ty.resource_path(), "toolkit/widgets/Button");
	}

	#[test]
	fn type_name_unqualified() {
		let ty = TypeName::from("Button");
		assert_eq!(ty.simple_name(), "Button");
		assert_eq!(ty.package(), "");
	}

	#[test]
	fn signature_round_trip() {
		let sig = Signature::parse("setText(java.lang.String)").unwrap();
		assert_eq!(sig.name(), "setText");
		assert_eq!(sig.params().len(), 1);
		assert_eq!(sig.to_string(), "setText(java.lang.String)");
	}

	#[test]
	fn signature_parse_normalizes_spacing() {
		let sig = Signature::parse("resize( int , int )").unwrap();
		assert_eq!(sig.to_string(), "resize(int,int)");
	}

	#[test]
	fn signature_parse_rejects_garbage() {
		assert!(Signature::parse("setText").is_err());
		assert!(Signature::parse("(int)").is_err());
		assert!(Signature::parse("f(int,,int)").is_err());
	}

	#[test]
	fn signature_encoding_is_path_safe() {
		let sig = Signature::parse("setBounds(int,int)").unwrap();
		assert_eq!(sig.encoded(), "setBounds_int_int_");
	}

	#[test]
	fn value_accessors() {
		assert_eq!(Value::from(3i64).as_int(), Some(3));
		assert_eq!(Value::from(3i64).as_float(), Some(3.0));
		assert!(Value::from(true).is_true());
		assert!(!Value::from("true").is_true());
	}
}
