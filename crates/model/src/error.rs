//! Error types for the descriptor data model.

use thiserror::Error;

/// Errors raised when constructing a [`crate::DescriptorKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
	/// A host was supplied without a suffix, or a suffix without a host.
	#[error("descriptor key for '{component}' must set host and suffix together")]
	HostSuffixMismatch {
		/// Qualified name of the component the key was built for.
		component: String,
	},
}

/// Errors raised when parsing a member signature from its canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
	/// The signature text is missing the parenthesized parameter list.
	#[error("signature '{0}' is missing a parameter list")]
	MissingParameterList(String),

	/// The signature text has no member name before the parameter list.
	#[error("signature '{0}' is missing a member name")]
	MissingName(String),

	/// A parameter type in the list is empty.
	#[error("signature '{0}' contains an empty parameter type")]
	EmptyParameter(String),
}

/// Failure to evaluate a default-value or argument expression.
///
/// Raised the first time a lazy value is read, and sticky: every later
/// read of the same [`crate::LazyValue`] re-surfaces the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot evaluate expression '{expr}': {message}")]
pub struct EvalError {
	/// The offending expression text.
	pub expr: String,
	/// What went wrong.
	pub message: String,
}

impl EvalError {
	/// Creates an evaluation error for `expr`.
	pub fn new(expr: impl Into<String>, message: impl Into<String>) -> Self {
		Self { expr: expr.into(), message: message.into() }
	}
}
