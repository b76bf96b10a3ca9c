//! The ordered rule pipeline that applies document elements onto a
//! descriptor builder.
//!
//! Each rule matches one element shape and mutates the in-progress
//! builder; elements are applied strictly in document order. Rule
//! preconditions — a signature that does not exist on the type, an
//! unknown category token, an unknown property selector — are fatal
//! [`LoadError::Rule`] failures carrying the owning type and the
//! offending identifier. Constructor references are validated eagerly
//! against the type model.

use armature_model::{
	DescriptorKey, ExposingRule as ExposingRuleEntry, InvocationTemplate, LazyValue,
	MethodDescriptor, ParameterDescriptor, PropertyCategory, PropertyDescriptor, PropertySource,
	Signature, StringBag, TypeName, TypeParameter,
};

use crate::document::{
	ConstructorDecl, CreationDecl, DescriptorDoc, DocElement, MethodDecl, MethodPattern,
	MethodRule, ParameterDecl, parse_method_doc, parse_parameter_doc,
};
use crate::error::{LoadError, Result};
use crate::introspect::{TypeModel, decapitalize};
use crate::merge::DescriptorBuilder;
use crate::resource::{ResourceLocator, method_doc_path, parameter_doc_path};
use crate::version::{VersionAxis, resolve_first_valid};

/// Shared context for one level's rule application.
pub struct RuleCtx<'a> {
	/// The type whose descriptor is being built.
	pub ty: &'a TypeName,
	/// The type's structural model.
	pub model: &'a TypeModel,
	/// Identity being built; per-method resources are keyed off it.
	pub key: &'a DescriptorKey,
	/// Resource search path.
	pub locator: &'a ResourceLocator,
	/// Version axes in effect for this type.
	pub axes: &'a [VersionAxis],
}

/// One rule of the pipeline.
pub trait Rule: Send + Sync {
	/// Whether this rule handles `element`.
	fn matches(&self, element: &DocElement) -> bool;

	/// Applies `element` onto the builder.
	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()>;
}

/// The fixed, ordered rule pipeline.
pub fn pipeline() -> Vec<Box<dyn Rule>> {
	vec![
		Box::new(DescriptionRule),
		Box::new(MethodsRule),
		Box::new(ConstructorsRule),
		Box::new(CategoryRule),
		Box::new(PropertyRule),
		Box::new(PropertyTagRule),
		Box::new(MethodPropertyRule),
		Box::new(MethodSinglePropertyRule),
		Box::new(AddPropertyRule),
		Box::new(CreationRule),
		Box::new(MorphTargetsRule),
		Box::new(ExposingRulesRule),
		Box::new(ParametersRule),
	]
}

/// Applies every element of `doc` through the first matching rule.
pub fn apply_document(
	rules: &[Box<dyn Rule>],
	doc: &DescriptorDoc,
	builder: &mut DescriptorBuilder,
	ctx: &RuleCtx<'_>,
) -> Result<()> {
	if let Some(toolkit) = &doc.toolkit {
		builder.toolkit = Some(toolkit.clone());
	}
	if let Some(model_type) = &doc.model_type {
		builder.model_type = Some(TypeName::from(model_type.as_str()));
	}
	for element in &doc.elements {
		let rule = rules
			.iter()
			.find(|r| r.matches(element))
			.ok_or_else(|| LoadError::rule(ctx.ty, "no rule matches document element"))?;
		rule.apply(element, builder, ctx)?;
	}
	Ok(())
}

fn parse_signature(text: &str, ctx: &RuleCtx<'_>) -> Result<Signature> {
	Signature::parse(text).map_err(|e| LoadError::rule(ctx.ty, e.to_string()))
}

fn known_method(signature: &Signature, ctx: &RuleCtx<'_>) -> Result<()> {
	if ctx.model.method(signature).is_none() {
		return Err(LoadError::rule(ctx.ty, format!("unknown method signature '{signature}'")));
	}
	Ok(())
}

fn parse_category(token: &str, ctx: &RuleCtx<'_>) -> Result<PropertyCategory> {
	PropertyCategory::parse(token)
		.ok_or_else(|| LoadError::rule(ctx.ty, format!("unknown category '{token}'")))
}

fn apply_parameter_decl(target: &mut ParameterDescriptor, decl: &ParameterDecl) {
	if let Some(name) = &decl.name {
		target.name = Some(name.clone());
	}
	if let Some(editor) = &decl.editor {
		target.editor = Some(editor.clone());
	}
	if let Some(default) = &decl.default_source {
		target.default_source = Some(default.clone());
	}
	target.is_child |= decl.child;
	target.is_parent |= decl.parent;
	target.is_secondary_child |= decl.secondary_child;
	target.is_secondary_parent |= decl.secondary_parent;
}

struct DescriptionRule;

impl Rule for DescriptionRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::Description(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		_ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::Description(text) = element else {
			return Ok(());
		};
		builder.description = Some(text.clone());
		Ok(())
	}
}

struct MethodsRule;

impl MethodsRule {
	fn declare(
		&self,
		decl: &MethodDecl,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let signature = parse_signature(&decl.signature, ctx)?;
		known_method(&signature, ctx)?;

		let return_type =
			ctx.model.method(&signature).and_then(|m| m.return_type.clone());
		let entry = builder.ensure_method(blank_method(&signature, return_type, ctx.ty));
		if let Some(executable) = decl.executable {
			entry.executable = executable;
		}
		for (name, value) in &decl.tags {
			entry.tags.insert(name.clone(), value.clone());
		}
		for param in &decl.parameters {
			apply_indexed(entry, param, &signature, ctx)?;
		}

		// Per-method and per-parameter documents layer on top of the
		// inline declaration.
		let method_doc = resolve_first_valid(
			ctx.locator,
			ctx.axes,
			&method_doc_path(ctx.key, &signature),
			parse_method_doc,
		)?;
		if let Some((doc, _)) = method_doc {
			let entry = builder
				.method_mut(&signature)
				.ok_or_else(|| LoadError::rule(ctx.ty, "method entry vanished during merge"))?;
			for param in &doc.parameters {
				apply_indexed(entry, param, &signature, ctx)?;
			}
		}
		for index in 0..signature.params().len() {
			let param_doc = resolve_first_valid(
				ctx.locator,
				ctx.axes,
				&parameter_doc_path(ctx.key, &signature, index),
				parse_parameter_doc,
			)?;
			if let Some((decl, _)) = param_doc {
				let entry = builder
					.method_mut(&signature)
					.ok_or_else(|| LoadError::rule(ctx.ty, "method entry vanished during merge"))?;
				if let Some(target) = entry.parameters.get_mut(index) {
					apply_parameter_decl(target, &decl);
				}
			}
		}
		Ok(())
	}

	fn include(
		&self,
		pattern: &MethodPattern,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		match pattern {
			MethodPattern::Literal(text) => {
				let signature = parse_signature(text, ctx)?;
				known_method(&signature, ctx)?;
				let return_type =
					ctx.model.method(&signature).and_then(|m| m.return_type.clone());
				builder.ensure_method(blank_method(&signature, return_type, ctx.ty));
			}
			MethodPattern::Regex(source) => {
				let regex = compile_regex(source, ctx)?;
				let matching: Vec<_> = ctx
					.model
					.methods
					.iter()
					.filter(|m| m.is_public && !m.is_static)
					.filter(|m| regex.is_match(&m.signature.to_string()))
					.map(|m| (m.signature.clone(), m.return_type.clone()))
					.collect();
				for (signature, return_type) in matching {
					builder.ensure_method(blank_method(&signature, return_type, ctx.ty));
				}
			}
		}
		Ok(())
	}

	fn exclude(
		&self,
		pattern: &MethodPattern,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		match pattern {
			MethodPattern::Literal(text) => {
				let signature = parse_signature(text, ctx)?;
				if !builder.remove_method(&signature) {
					return Err(LoadError::rule(
						ctx.ty,
						format!("excluded method '{signature}' is not present"),
					));
				}
			}
			MethodPattern::Regex(source) => {
				let regex = compile_regex(source, ctx)?;
				builder.remove_methods_where(|sig| regex.is_match(sig));
			}
		}
		Ok(())
	}
}

fn blank_method(
	signature: &Signature,
	return_type: Option<TypeName>,
	declaring: &TypeName,
) -> MethodDescriptor {
	MethodDescriptor {
		signature: signature.clone(),
		declaring_type: declaring.clone(),
		return_type,
		executable: true,
		tags: StringBag::new(),
		parameters: signature
			.params()
			.iter()
			.map(|ty| ParameterDescriptor { ty: Some(ty.clone()), ..Default::default() })
			.collect(),
	}
}

fn apply_indexed(
	entry: &mut MethodDescriptor,
	decl: &ParameterDecl,
	signature: &Signature,
	ctx: &RuleCtx<'_>,
) -> Result<()> {
	let index = decl
		.index
		.ok_or_else(|| LoadError::rule(ctx.ty, "method parameter is missing an index"))?;
	let target = entry.parameters.get_mut(index).ok_or_else(|| {
		LoadError::rule(ctx.ty, format!("parameter index {index} out of range for '{signature}'"))
	})?;
	apply_parameter_decl(target, decl);
	Ok(())
}

fn compile_regex(source: &str, ctx: &RuleCtx<'_>) -> Result<regex::Regex> {
	regex::Regex::new(source)
		.map_err(|e| LoadError::rule(ctx.ty, format!("invalid signature regex '{source}': {e}")))
}

impl Rule for MethodsRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::Methods(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::Methods(rules) = element else {
			return Ok(());
		};
		for rule in rules {
			match rule {
				MethodRule::Declare(decl) => self.declare(decl, builder, ctx)?,
				MethodRule::Include(pattern) => self.include(pattern, builder, ctx)?,
				MethodRule::Exclude(pattern) => self.exclude(pattern, builder, ctx)?,
			}
		}
		Ok(())
	}
}

struct ConstructorsRule;

impl Rule for ConstructorsRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::Constructors(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::Constructors(decls) = element else {
			return Ok(());
		};
		for decl in decls {
			self.apply_decl(decl, builder, ctx)?;
		}
		Ok(())
	}
}

impl ConstructorsRule {
	fn apply_decl(
		&self,
		decl: &ConstructorDecl,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let params: Vec<TypeName> = decl
			.parameters
			.iter()
			.map(|p| {
				p.ty.as_deref().map(TypeName::from).ok_or_else(|| {
					LoadError::rule(ctx.ty, "constructor parameter is missing a type")
				})
			})
			.collect::<Result<_>>()?;
		let signature = Signature::constructor(params.clone());

		// Class (5): the referenced constructor must exist on the actual
		// type, checked eagerly at resolution time.
		if !ctx.model.has_constructor(&signature) {
			return Err(LoadError::ConstructorMismatch { ty: ctx.ty.clone(), signature });
		}

		let entry = builder
			.constructor_mut(&params)
			.ok_or_else(|| LoadError::rule(ctx.ty, "constructor entry vanished during merge"))?;
		for (target, param_decl) in entry.parameters.iter_mut().zip(&decl.parameters) {
			apply_parameter_decl(target, param_decl);
		}
		Ok(())
	}
}

struct CategoryRule;

impl Rule for CategoryRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::CategoryDirective { .. })
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::CategoryDirective { token, patterns } = element else {
			return Ok(());
		};
		let category = parse_category(token, ctx)?;
		builder.queue_category_directive(category, patterns.clone());
		Ok(())
	}
}

struct PropertyRule;

impl Rule for PropertyRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::Property(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::Property(decl) = element else {
			return Ok(());
		};
		let category =
			decl.category.as_deref().map(|token| parse_category(token, ctx)).transpose()?;
		let property = builder.property_mut(&decl.selector).ok_or_else(|| {
			LoadError::rule(ctx.ty, format!("unknown property '{}'", decl.selector))
		})?;

		if let Some(category) = category {
			property.category = category;
		}
		if let Some(editor) = &decl.editor {
			property.editor = Some(editor.clone());
		}
		if let Some(default) = &decl.default {
			property.default = Some(LazyValue::new(default.clone()));
		}
		for (name, value) in &decl.tags {
			property.tags.insert(name.clone(), value.clone());
		}
		Ok(())
	}
}

struct PropertyTagRule;

impl Rule for PropertyTagRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::PropertyTag { .. })
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::PropertyTag { selector, name, value } = element else {
			return Ok(());
		};
		let property = builder
			.property_mut(selector)
			.ok_or_else(|| LoadError::rule(ctx.ty, format!("unknown property '{selector}'")))?;
		property.tags.insert(name.clone(), value.clone());
		Ok(())
	}
}

struct MethodPropertyRule;

impl Rule for MethodPropertyRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::MethodProperty { .. })
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::MethodProperty { signature, title } = element else {
			return Ok(());
		};
		let signature = parse_signature(signature, ctx)?;
		known_method(&signature, ctx)?;
		builder.upsert_property(method_backed_property(title.clone(), signature));
		Ok(())
	}
}

struct MethodSinglePropertyRule;

impl Rule for MethodSinglePropertyRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::MethodSingleProperty { .. })
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::MethodSingleProperty { signature, title } = element else {
			return Ok(());
		};
		let signature = parse_signature(signature, ctx)?;
		known_method(&signature, ctx)?;
		if signature.params().len() != 1 {
			return Err(LoadError::rule(
				ctx.ty,
				format!("'{signature}' is not a single-argument method"),
			));
		}
		let title = title.clone().unwrap_or_else(|| {
			let name = signature.name();
			decapitalize(name.strip_prefix("set").unwrap_or(name))
		});
		builder.upsert_property(method_backed_property(title, signature));
		Ok(())
	}
}

fn method_backed_property(title: String, signature: Signature) -> PropertyDescriptor {
	PropertyDescriptor {
		id: title.clone(),
		title,
		category: PropertyCategory::Normal,
		value_type: signature.params().first().cloned(),
		editor: None,
		default: None,
		tags: StringBag::new(),
		source: PropertySource::Setter(signature),
	}
}

struct AddPropertyRule;

impl Rule for AddPropertyRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::AddProperty(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::AddProperty(decl) = element else {
			return Ok(());
		};
		let category = decl
			.category
			.as_deref()
			.map(|token| parse_category(token, ctx))
			.transpose()?
			.unwrap_or_default();
		builder.upsert_property(PropertyDescriptor {
			id: decl.id.clone(),
			title: decl.id.clone(),
			category,
			value_type: decl.value_type.as_deref().map(TypeName::from),
			editor: decl.editor.clone(),
			default: decl.default.as_deref().map(LazyValue::new),
			tags: StringBag::new(),
			source: PropertySource::Declared,
		});
		Ok(())
	}
}

struct CreationRule;

impl Rule for CreationRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::Creation(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::Creation(decl) = element else {
			return Ok(());
		};
		let invocations = self.parse_invocations(decl, ctx)?;

		let creation = builder.ensure_creation(decl.id.clone());
		if let Some(name) = &decl.name {
			creation.name = Some(name.clone());
		}
		if let Some(source) = &decl.source {
			creation.source = Some(source.clone());
		}
		if !invocations.is_empty() {
			creation.invocations = invocations;
		}
		for (name, value) in &decl.params {
			creation.params.insert(name.clone(), value.clone());
		}
		for (name, value) in &decl.tags {
			creation.tags.insert(name.clone(), value.clone());
		}
		if let Some(description) = &decl.description {
			creation.description = Some(description.clone());
		}
		if !decl.type_parameters.is_empty() {
			creation.type_parameters = decl
				.type_parameters
				.iter()
				.map(|(name, bound)| TypeParameter {
					name: name.clone(),
					bound: bound.as_deref().map(TypeName::from),
				})
				.collect();
		}
		Ok(())
	}
}

impl CreationRule {
	fn parse_invocations(
		&self,
		decl: &CreationDecl,
		ctx: &RuleCtx<'_>,
	) -> Result<Vec<InvocationTemplate>> {
		decl.invocations
			.iter()
			.map(|(sig_text, args)| {
				let signature = parse_signature(sig_text, ctx)?;
				known_method(&signature, ctx)?;
				Ok(InvocationTemplate { signature, arguments: args.clone() })
			})
			.collect()
	}
}

struct MorphTargetsRule;

impl Rule for MorphTargetsRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::MorphTargets { .. })
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		_ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::MorphTargets { no_inherit, targets } = element else {
			return Ok(());
		};
		if *no_inherit {
			builder.clear_morph_targets();
		}
		for target in targets {
			builder.add_morph_target(TypeName::from(target.as_str()));
		}
		Ok(())
	}
}

struct ExposingRulesRule;

impl Rule for ExposingRulesRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::ExposingRules(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		_ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::ExposingRules(rules) = element else {
			return Ok(());
		};
		for (include, pattern) in rules {
			builder
				.exposing_rules
				.push(ExposingRuleEntry { include: *include, pattern: pattern.clone() });
		}
		Ok(())
	}
}

struct ParametersRule;

impl Rule for ParametersRule {
	fn matches(&self, element: &DocElement) -> bool {
		matches!(element, DocElement::Parameters(_))
	}

	fn apply(
		&self,
		element: &DocElement,
		builder: &mut DescriptorBuilder,
		_ctx: &RuleCtx<'_>,
	) -> Result<()> {
		let DocElement::Parameters(entries) = element else {
			return Ok(());
		};
		for (name, value) in entries {
			builder.params.insert(name.clone(), value.clone());
		}
		Ok(())
	}
}
