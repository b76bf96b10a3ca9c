//! Descriptor document parsing and schema validation.
//!
//! Documents are KDL v2. This module turns a located resource into a
//! typed [`DescriptorDoc`] and rejects anything outside the fixed
//! schema; a rejection is a [`DocumentError`] tagged with the resource
//! path, which is what drives version fallback. Semantic validation
//! (does a signature exist on the type, is a category token known) is
//! the rule pipeline's job, not this module's.
//!
//! ```kdl
//! component toolkit="swing" model="armature.swing.ButtonModel" {
//!     description "A push button"
//!     methods {
//!         method "addItem(java.lang.String)" {
//!             parameter 0 name="item" child=#true
//!         }
//!         include regex="^add.*"
//!         exclude "removeAll()"
//!     }
//!     properties-preferred "text enabled*"
//!     property "text" default="\"Button\"" {
//!         tag "html.supported" "true"
//!     }
//!     creation id="styled" name="Styled Button" {
//!         source "new %component%(\"New\")"
//!     }
//! }
//! ```

use kdl::{KdlDocument, KdlNode, KdlValue};

use crate::error::{DocResult, DocumentError};

/// A parsed, schema-valid descriptor document.
#[derive(Debug, Clone)]
pub struct DescriptorDoc {
	/// Resource path the document was loaded from.
	pub path: String,
	/// Toolkit id from the root node.
	pub toolkit: Option<String>,
	/// Model class reference from the root node.
	pub model_type: Option<String>,
	/// Elements in document order.
	pub elements: Vec<DocElement>,
}

/// One schema element of a descriptor document, in document order.
#[derive(Debug, Clone)]
pub enum DocElement {
	/// Normalized free-text description.
	Description(String),
	/// The `methods` block, children in document order.
	Methods(Vec<MethodRule>),
	/// The `constructors` block.
	Constructors(Vec<ConstructorDecl>),
	/// A bulk category directive (`properties-*` or `category`).
	CategoryDirective {
		/// Raw category token; validated by the rule pipeline.
		token: String,
		/// Name patterns, trailing `*` = prefix wildcard.
		patterns: Vec<String>,
	},
	/// A `property` customization element.
	Property(PropertyDecl),
	/// A standalone `property-tag` element.
	PropertyTag {
		/// Property selector.
		selector: String,
		/// Tag name.
		name: String,
		/// Tag value.
		value: String,
	},
	/// A property backed by an arbitrary method.
	MethodProperty {
		/// Raw signature text.
		signature: String,
		/// Property id/title.
		title: String,
	},
	/// A property backed by a single-argument method without a getter.
	MethodSingleProperty {
		/// Raw signature text.
		signature: String,
		/// Optional explicit title; derived from the method name when
		/// absent.
		title: Option<String>,
	},
	/// A purely declarative property.
	AddProperty(AddPropertyDecl),
	/// A creation variant.
	Creation(CreationDecl),
	/// The `morphTargets` block.
	MorphTargets {
		/// Clears inherited targets before adding own ones.
		no_inherit: bool,
		/// Target type names in declaration order.
		targets: Vec<String>,
	},
	/// The `exposing-rules` block: (include?, pattern) in order.
	ExposingRules(Vec<(bool, String)>),
	/// The `parameters` block: (name, value) in order.
	Parameters(Vec<(String, String)>),
}

/// A child of the `methods` block.
#[derive(Debug, Clone)]
pub enum MethodRule {
	/// Declare (or customize an inherited) method.
	Declare(MethodDecl),
	/// Include model methods by literal signature or regex.
	Include(MethodPattern),
	/// Exclude descriptor methods by literal signature or regex.
	Exclude(MethodPattern),
}

/// Literal or regex method matcher.
#[derive(Debug, Clone)]
pub enum MethodPattern {
	/// Exact canonical signature.
	Literal(String),
	/// Regex over canonical signatures.
	Regex(String),
}

/// A `method` declaration.
#[derive(Debug, Clone)]
pub struct MethodDecl {
	/// Raw signature text.
	pub signature: String,
	/// Executable override; methods default to executable.
	pub executable: Option<bool>,
	/// Tags set on the method.
	pub tags: Vec<(String, String)>,
	/// Parameter customizations, index-keyed.
	pub parameters: Vec<ParameterDecl>,
}

/// A `constructor` declaration; the signature is the ordered parameter
/// type list.
#[derive(Debug, Clone)]
pub struct ConstructorDecl {
	/// Parameter declarations, type-keyed.
	pub parameters: Vec<ParameterDecl>,
}

/// A `parameter` customization.
///
/// Method and per-method-document parameters are keyed by index;
/// constructor parameters are keyed by type (which also defines the
/// constructor's signature).
#[derive(Debug, Clone, Default)]
pub struct ParameterDecl {
	/// Zero-based index, for method parameters.
	pub index: Option<usize>,
	/// Parameter type, for constructor parameters.
	pub ty: Option<String>,
	/// Override name.
	pub name: Option<String>,
	/// Dedicated editor id.
	pub editor: Option<String>,
	/// Receives the child component.
	pub child: bool,
	/// Receives the parent component.
	pub parent: bool,
	/// Secondary child slot.
	pub secondary_child: bool,
	/// Secondary parent slot.
	pub secondary_parent: bool,
	/// Default argument-source expression.
	pub default_source: Option<String>,
}

/// A `property` customization element.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
	/// Property selector (`id`, `f:id`, `m:id` or a full signature).
	pub selector: String,
	/// Category token override.
	pub category: Option<String>,
	/// Editor id override.
	pub editor: Option<String>,
	/// Default-value expression override.
	pub default: Option<String>,
	/// Tags added to the property.
	pub tags: Vec<(String, String)>,
}

/// An `add-property` element.
#[derive(Debug, Clone)]
pub struct AddPropertyDecl {
	/// Property id.
	pub id: String,
	/// Declared value type.
	pub value_type: Option<String>,
	/// Editor id.
	pub editor: Option<String>,
	/// Default-value expression.
	pub default: Option<String>,
	/// Category token.
	pub category: Option<String>,
}

/// A `creation` element.
#[derive(Debug, Clone, Default)]
pub struct CreationDecl {
	/// Variant id; absent = the default variant.
	pub id: Option<String>,
	/// Display name.
	pub name: Option<String>,
	/// Source template.
	pub source: Option<String>,
	/// Invocations: (signature text, argument source).
	pub invocations: Vec<(String, String)>,
	/// Parameter entries.
	pub params: Vec<(String, String)>,
	/// Tag entries.
	pub tags: Vec<(String, String)>,
	/// Normalized description.
	pub description: Option<String>,
	/// Type parameters: (placeholder name, optional bound).
	pub type_parameters: Vec<(String, Option<String>)>,
}

/// A parsed package-level document.
#[derive(Debug, Clone, Default)]
pub struct PackageDoc {
	/// The package opts its types into descriptor caching.
	pub cache_descriptors: bool,
}

/// A parsed per-method document: parameter customizations only.
#[derive(Debug, Clone, Default)]
pub struct MethodDoc {
	/// Parameter customizations, index-keyed.
	pub parameters: Vec<ParameterDecl>,
}

/// Collapses whitespace runs to single spaces, removing line breaks and
/// surrounding space. Applied to all free-text descriptions.
pub fn normalize_text(text: &str) -> String {
	text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses and validates a descriptor document.
pub fn parse_descriptor_doc(text: &str, path: &str) -> DocResult<DescriptorDoc> {
	let doc = parse_kdl(text, path)?;
	let root = single_root(&doc, "component", path)?;

	let toolkit = prop_str(root, "toolkit", path)?.map(str::to_string);
	let model_type = prop_str(root, "model", path)?.map(str::to_string);

	let mut elements = Vec::new();
	for node in child_nodes(root) {
		elements.push(parse_element(node, path)?);
	}

	Ok(DescriptorDoc { path: path.to_string(), toolkit, model_type, elements })
}

/// Parses and validates a package-level document.
pub fn parse_package_doc(text: &str, path: &str) -> DocResult<PackageDoc> {
	let doc = parse_kdl(text, path)?;
	let root = single_root(&doc, "package", path)?;

	let mut parsed = PackageDoc::default();
	for node in child_nodes(root) {
		match node.name().value() {
			"cache-descriptors" => parsed.cache_descriptors = true,
			other => {
				return Err(DocumentError::schema(
					path,
					format!("unknown package element '{other}'"),
				));
			}
		}
	}
	Ok(parsed)
}

/// Parses and validates a per-method document.
pub fn parse_method_doc(text: &str, path: &str) -> DocResult<MethodDoc> {
	let doc = parse_kdl(text, path)?;
	let root = single_root(&doc, "method", path)?;

	let mut parsed = MethodDoc::default();
	for node in child_nodes(root) {
		match node.name().value() {
			"parameter" => parsed.parameters.push(parse_indexed_parameter(node, path)?),
			other => {
				return Err(DocumentError::schema(path, format!("unknown method element '{other}'")));
			}
		}
	}
	Ok(parsed)
}

/// Parses and validates a per-parameter document into a single
/// customization.
pub fn parse_parameter_doc(text: &str, path: &str) -> DocResult<ParameterDecl> {
	let doc = parse_kdl(text, path)?;
	let root = single_root(&doc, "parameter", path)?;
	parse_parameter_props(root, ParameterDecl::default(), path)
}

fn parse_kdl(text: &str, path: &str) -> DocResult<KdlDocument> {
	text.parse::<KdlDocument>()
		.map_err(|source| DocumentError::Parse { path: path.to_string(), source })
}

fn single_root<'a>(doc: &'a KdlDocument, expected: &str, path: &str) -> DocResult<&'a KdlNode> {
	let nodes = doc.nodes();
	match nodes {
		[root] if root.name().value() == expected => Ok(root),
		[root] => Err(DocumentError::schema(
			path,
			format!("expected root element '{expected}', found '{}'", root.name().value()),
		)),
		_ => Err(DocumentError::schema(
			path,
			format!("expected exactly one root '{expected}' element"),
		)),
	}
}

fn parse_element(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	match node.name().value() {
		"description" => Ok(DocElement::Description(normalize_text(arg_str(node, 0, path)?))),
		"methods" => parse_methods(node, path),
		"constructors" => parse_constructors(node, path),
		"properties-preferred" => parse_category_shorthand(node, "preferred", path),
		"properties-advanced" => parse_category_shorthand(node, "advanced", path),
		"properties-hidden" => parse_category_shorthand(node, "hidden", path),
		"properties-normal" => parse_category_shorthand(node, "normal", path),
		"category" => parse_category_generic(node, path),
		"property" => parse_property(node, path),
		"property-tag" => Ok(DocElement::PropertyTag {
			selector: arg_str(node, 0, path)?.to_string(),
			name: arg_str(node, 1, path)?.to_string(),
			value: arg_str(node, 2, path)?.to_string(),
		}),
		"method-property" => Ok(DocElement::MethodProperty {
			signature: arg_str(node, 0, path)?.to_string(),
			title: require_prop_str(node, "title", path)?.to_string(),
		}),
		"method-single-property" => Ok(DocElement::MethodSingleProperty {
			signature: arg_str(node, 0, path)?.to_string(),
			title: prop_str(node, "title", path)?.map(str::to_string),
		}),
		"add-property" => Ok(DocElement::AddProperty(AddPropertyDecl {
			id: arg_str(node, 0, path)?.to_string(),
			value_type: prop_str(node, "type", path)?.map(str::to_string),
			editor: prop_str(node, "editor", path)?.map(str::to_string),
			default: prop_str(node, "default", path)?.map(str::to_string),
			category: prop_str(node, "category", path)?.map(str::to_string),
		})),
		"creation" => parse_creation(node, path),
		"morphTargets" => parse_morph_targets(node, path),
		"exposing-rules" => parse_exposing_rules(node, path),
		"parameters" => parse_parameters(node, path),
		other => Err(DocumentError::schema(path, format!("unknown element '{other}'"))),
	}
}

fn parse_methods(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut rules = Vec::new();
	for child in child_nodes(node) {
		match child.name().value() {
			"method" => {
				let mut decl = MethodDecl {
					signature: arg_str(child, 0, path)?.to_string(),
					executable: prop_bool(child, "executable", path)?,
					tags: Vec::new(),
					parameters: Vec::new(),
				};
				for inner in child_nodes(child) {
					match inner.name().value() {
						"tag" => decl.tags.push((
							arg_str(inner, 0, path)?.to_string(),
							arg_str(inner, 1, path)?.to_string(),
						)),
						"parameter" => decl.parameters.push(parse_indexed_parameter(inner, path)?),
						other => {
							return Err(DocumentError::schema(
								path,
								format!("unknown method child '{other}'"),
							));
						}
					}
				}
				rules.push(MethodRule::Declare(decl));
			}
			"include" => rules.push(MethodRule::Include(parse_method_pattern(child, path)?)),
			"exclude" => rules.push(MethodRule::Exclude(parse_method_pattern(child, path)?)),
			other => {
				return Err(DocumentError::schema(path, format!("unknown methods child '{other}'")));
			}
		}
	}
	Ok(DocElement::Methods(rules))
}

fn parse_method_pattern(node: &KdlNode, path: &str) -> DocResult<MethodPattern> {
	if let Some(regex) = prop_str(node, "regex", path)? {
		return Ok(MethodPattern::Regex(regex.to_string()));
	}
	Ok(MethodPattern::Literal(arg_str(node, 0, path)?.to_string()))
}

fn parse_constructors(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut decls = Vec::new();
	for child in child_nodes(node) {
		match child.name().value() {
			"constructor" => {
				let mut parameters = Vec::new();
				for inner in child_nodes(child) {
					if inner.name().value() != "parameter" {
						return Err(DocumentError::schema(
							path,
							format!("unknown constructor child '{}'", inner.name().value()),
						));
					}
					let base = ParameterDecl {
						ty: Some(arg_str(inner, 0, path)?.to_string()),
						..ParameterDecl::default()
					};
					parameters.push(parse_parameter_props(inner, base, path)?);
				}
				decls.push(ConstructorDecl { parameters });
			}
			other => {
				return Err(DocumentError::schema(
					path,
					format!("unknown constructors child '{other}'"),
				));
			}
		}
	}
	Ok(DocElement::Constructors(decls))
}

fn parse_category_shorthand(node: &KdlNode, token: &str, path: &str) -> DocResult<DocElement> {
	let mut patterns = Vec::new();
	for value in positional_args(node) {
		let text = value_str(value, node, path)?;
		patterns.extend(text.split_whitespace().map(str::to_string));
	}
	if patterns.is_empty() {
		return Err(DocumentError::schema(
			path,
			format!("'{}' requires at least one property pattern", node.name().value()),
		));
	}
	Ok(DocElement::CategoryDirective { token: token.to_string(), patterns })
}

fn parse_category_generic(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let token = arg_str(node, 0, path)?.to_string();
	let mut patterns = Vec::new();
	for value in positional_args(node).skip(1) {
		let text = value_str(value, node, path)?;
		patterns.extend(text.split_whitespace().map(str::to_string));
	}
	if patterns.is_empty() {
		return Err(DocumentError::schema(path, "'category' requires at least one pattern"));
	}
	Ok(DocElement::CategoryDirective { token, patterns })
}

fn parse_property(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut decl = PropertyDecl {
		selector: arg_str(node, 0, path)?.to_string(),
		category: prop_str(node, "category", path)?.map(str::to_string),
		editor: prop_str(node, "editor", path)?.map(str::to_string),
		default: prop_str(node, "default", path)?.map(str::to_string),
		tags: Vec::new(),
	};
	for child in child_nodes(node) {
		match child.name().value() {
			"tag" => decl
				.tags
				.push((arg_str(child, 0, path)?.to_string(), arg_str(child, 1, path)?.to_string())),
			other => {
				return Err(DocumentError::schema(path, format!("unknown property child '{other}'")));
			}
		}
	}
	Ok(DocElement::Property(decl))
}

fn parse_creation(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut decl = CreationDecl {
		id: prop_str(node, "id", path)?.map(str::to_string),
		name: prop_str(node, "name", path)?.map(str::to_string),
		..CreationDecl::default()
	};
	for child in child_nodes(node) {
		match child.name().value() {
			"source" => decl.source = Some(arg_str(child, 0, path)?.to_string()),
			"invocation" => decl.invocations.push((
				arg_str(child, 0, path)?.to_string(),
				require_prop_str(child, "args", path)?.to_string(),
			)),
			"parameter" => decl
				.params
				.push((arg_str(child, 0, path)?.to_string(), arg_str(child, 1, path)?.to_string())),
			"tag" => decl
				.tags
				.push((arg_str(child, 0, path)?.to_string(), arg_str(child, 1, path)?.to_string())),
			"description" => decl.description = Some(normalize_text(arg_str(child, 0, path)?)),
			"typeParameters" => {
				for inner in child_nodes(child) {
					if inner.name().value() != "typeParameter" {
						return Err(DocumentError::schema(
							path,
							format!("unknown typeParameters child '{}'", inner.name().value()),
						));
					}
					decl.type_parameters.push((
						arg_str(inner, 0, path)?.to_string(),
						prop_str(inner, "bound", path)?.map(str::to_string),
					));
				}
			}
			other => {
				return Err(DocumentError::schema(path, format!("unknown creation child '{other}'")));
			}
		}
	}
	Ok(DocElement::Creation(decl))
}

fn parse_morph_targets(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut no_inherit = false;
	let mut targets = Vec::new();
	for child in child_nodes(node) {
		match child.name().value() {
			"noInherit" => no_inherit = true,
			"morphTarget" => targets.push(arg_str(child, 0, path)?.to_string()),
			other => {
				return Err(DocumentError::schema(
					path,
					format!("unknown morphTargets child '{other}'"),
				));
			}
		}
	}
	Ok(DocElement::MorphTargets { no_inherit, targets })
}

fn parse_exposing_rules(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut rules = Vec::new();
	for child in child_nodes(node) {
		match child.name().value() {
			"include" => rules.push((true, arg_str(child, 0, path)?.to_string())),
			"exclude" => rules.push((false, arg_str(child, 0, path)?.to_string())),
			other => {
				return Err(DocumentError::schema(
					path,
					format!("unknown exposing-rules child '{other}'"),
				));
			}
		}
	}
	Ok(DocElement::ExposingRules(rules))
}

fn parse_parameters(node: &KdlNode, path: &str) -> DocResult<DocElement> {
	let mut entries = Vec::new();
	for child in child_nodes(node) {
		match child.name().value() {
			"parameter" => entries
				.push((arg_str(child, 0, path)?.to_string(), arg_str(child, 1, path)?.to_string())),
			other => {
				return Err(DocumentError::schema(
					path,
					format!("unknown parameters child '{other}'"),
				));
			}
		}
	}
	Ok(DocElement::Parameters(entries))
}

fn parse_indexed_parameter(node: &KdlNode, path: &str) -> DocResult<ParameterDecl> {
	let index = match positional_args(node).next() {
		Some(KdlValue::Integer(i)) if *i >= 0 => Some(*i as usize),
		Some(_) => {
			return Err(DocumentError::schema(path, "parameter index must be a non-negative integer"));
		}
		None => return Err(DocumentError::schema(path, "parameter requires an index argument")),
	};
	parse_parameter_props(node, ParameterDecl { index, ..ParameterDecl::default() }, path)
}

fn parse_parameter_props(
	node: &KdlNode,
	mut decl: ParameterDecl,
	path: &str,
) -> DocResult<ParameterDecl> {
	decl.name = prop_str(node, "name", path)?.map(str::to_string);
	decl.editor = prop_str(node, "editor", path)?.map(str::to_string);
	decl.default_source = prop_str(node, "default", path)?.map(str::to_string);
	decl.child = prop_bool(node, "child", path)?.unwrap_or(false);
	decl.parent = prop_bool(node, "parent", path)?.unwrap_or(false);
	decl.secondary_child = prop_bool(node, "secondary-child", path)?.unwrap_or(false);
	decl.secondary_parent = prop_bool(node, "secondary-parent", path)?.unwrap_or(false);
	Ok(decl)
}

fn child_nodes(node: &KdlNode) -> impl Iterator<Item = &KdlNode> {
	node.children().map(KdlDocument::nodes).unwrap_or_default().iter()
}

fn positional_args(node: &KdlNode) -> impl Iterator<Item = &KdlValue> {
	node.entries().iter().filter(|e| e.name().is_none()).map(kdl::KdlEntry::value)
}

fn arg_str<'a>(node: &'a KdlNode, index: usize, path: &str) -> DocResult<&'a str> {
	let value = positional_args(node).nth(index).ok_or_else(|| {
		DocumentError::schema(
			path,
			format!("'{}' is missing argument {index}", node.name().value()),
		)
	})?;
	value_str(value, node, path)
}

fn value_str<'a>(value: &'a KdlValue, node: &KdlNode, path: &str) -> DocResult<&'a str> {
	value.as_string().ok_or_else(|| {
		DocumentError::schema(
			path,
			format!("'{}' expects string arguments", node.name().value()),
		)
	})
}

fn prop_str<'a>(node: &'a KdlNode, key: &str, path: &str) -> DocResult<Option<&'a str>> {
	let Some(entry) = node.entries().iter().find(|e| e.name().is_some_and(|n| n.value() == key))
	else {
		return Ok(None);
	};
	entry.value().as_string().map(Some).ok_or_else(|| {
		DocumentError::schema(
			path,
			format!("'{}' property '{key}' must be a string", node.name().value()),
		)
	})
}

fn require_prop_str<'a>(node: &'a KdlNode, key: &str, path: &str) -> DocResult<&'a str> {
	prop_str(node, key, path)?.ok_or_else(|| {
		DocumentError::schema(
			path,
			format!("'{}' requires a '{key}' property", node.name().value()),
		)
	})
}

fn prop_bool(node: &KdlNode, key: &str, path: &str) -> DocResult<Option<bool>> {
	let Some(entry) = node.entries().iter().find(|e| e.name().is_some_and(|n| n.value() == key))
	else {
		return Ok(None);
	};
	entry.value().as_bool().map(Some).ok_or_else(|| {
		DocumentError::schema(
			path,
			format!("'{}' property '{key}' must be a boolean", node.name().value()),
		)
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	const PATH: &str = "toolkit/Button.component.kdl";

	#[test]
	fn normalize_collapses_whitespace() {
		assert_eq!(normalize_text("  a\n\tb   c \n"), "a b c");
		assert_eq!(normalize_text(""), "");
	}

	#[test]
	fn parses_full_document() {
		let doc = parse_descriptor_doc(
			r#"
component toolkit="swing" model="armature.swing.ButtonModel" {
	description """
		A push
		button
		"""
	methods {
		method "addItem(java.lang.String)" executable=#false {
			parameter 0 name="item" child=#true
			tag "order" "first"
		}
		include regex="^add.*"
		exclude "removeAll()"
	}
	constructors {
		constructor {
			parameter "int" name="columns"
		}
	}
	properties-preferred "text enabled*"
	category "advanced" "autoscrolls"
	property "text" default="\"Button\"" category="preferred" {
		tag "html.supported" "true"
	}
	property-tag "text" "important" "true"
	method-property "setColumns(int)" title="columns"
	method-single-property "setRows(int)"
	add-property "customBorder" type="toolkit.Border" default="null"
	creation id="styled" name="Styled" {
		source "new %component%()"
		invocation "setDefault(boolean)" args="true"
		parameter "palette.order" "1"
		tag "palette.default" "true"
		description "A styled variant"
		typeParameters {
			typeParameter "E" bound="java.lang.Object"
		}
	}
	morphTargets {
		noInherit
		morphTarget "toolkit.ToggleButton"
	}
	exposing-rules {
		include "text*"
		exclude "textSecret"
	}
	parameters {
		parameter "layout.container" "true"
	}
}
"#,
			PATH,
		)
		.unwrap();

		assert_eq!(doc.toolkit.as_deref(), Some("swing"));
		assert_eq!(doc.model_type.as_deref(), Some("armature.swing.ButtonModel"));
		assert_eq!(doc.elements.len(), 14);

		assert!(matches!(&doc.elements[0], DocElement::Description(d) if d == "A push button"));
		let DocElement::Methods(rules) = &doc.elements[1] else {
			panic!("expected methods");
		};
		assert_eq!(rules.len(), 3);
		let MethodRule::Declare(decl) = &rules[0] else {
			panic!("expected declare");
		};
		assert_eq!(decl.executable, Some(false));
		assert_eq!(decl.parameters[0].index, Some(0));
		assert!(decl.parameters[0].child);
	}

	#[test]
	fn category_shorthand_splits_patterns() {
		let doc = parse_descriptor_doc(
			r#"component { properties-hidden "focusable autoscrolls*" }"#,
			PATH,
		)
		.unwrap();
		let DocElement::CategoryDirective { token, patterns } = &doc.elements[0] else {
			panic!("expected directive");
		};
		assert_eq!(token, "hidden");
		assert_eq!(patterns, &["focusable", "autoscrolls*"]);
	}

	#[test]
	fn unknown_element_is_schema_error() {
		let err = parse_descriptor_doc("component { frobnicate }", PATH).unwrap_err();
		assert!(matches!(err, DocumentError::Schema { .. }));
		assert!(err.to_string().contains("frobnicate"));
	}

	#[test]
	fn wrong_root_is_schema_error() {
		let err = parse_descriptor_doc("widget { }", PATH).unwrap_err();
		assert!(matches!(err, DocumentError::Schema { .. }));
	}

	#[test]
	fn malformed_kdl_is_parse_error() {
		let err = parse_descriptor_doc("component {", PATH).unwrap_err();
		assert!(matches!(err, DocumentError::Parse { .. }));
		assert!(err.to_string().contains(PATH));
	}

	#[test]
	fn missing_required_argument_is_schema_error() {
		let err = parse_descriptor_doc("component { property }", PATH).unwrap_err();
		assert!(matches!(err, DocumentError::Schema { .. }));
	}

	#[test]
	fn package_doc_cache_marker() {
		let pkg = parse_package_doc("package { cache-descriptors }", "toolkit/package.kdl").unwrap();
		assert!(pkg.cache_descriptors);

		let pkg = parse_package_doc("package { }", "toolkit/package.kdl").unwrap();
		assert!(!pkg.cache_descriptors);
	}

	#[test]
	fn method_doc_parses_indexed_parameters() {
		let parsed = parse_method_doc(
			r#"method { parameter 1 name="value" parent=#true }"#,
			"toolkit/Button.setValue_int_.component.kdl",
		)
		.unwrap();
		assert_eq!(parsed.parameters.len(), 1);
		assert_eq!(parsed.parameters[0].index, Some(1));
		assert!(parsed.parameters[0].parent);
	}
}
