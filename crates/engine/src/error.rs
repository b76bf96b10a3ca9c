//! Error taxonomy for descriptor resolution.
//!
//! Two layers: [`DocumentError`] covers a single resource (parse or
//! schema failure) and drives version fallback — it is logged and
//! swallowed for non-final candidates. [`LoadError`] is what a
//! descriptor-request caller sees; rule-application, constructor and
//! hierarchy failures are never swallowed.

use armature_model::{EvalError, KeyError, Signature, TypeName};
use thiserror::Error;

/// Failure to parse or validate one descriptor resource.
#[derive(Debug, Error)]
pub enum DocumentError {
	/// The resource is not well-formed KDL.
	#[error("KDL parse error in {path}: {source}")]
	Parse {
		/// Resource path of the offending document.
		path: String,
		/// The underlying KDL error.
		#[source]
		source: kdl::KdlError,
	},

	/// The document violates the descriptor schema.
	#[error("invalid descriptor document {path}: {message}")]
	Schema {
		/// Resource path of the offending document.
		path: String,
		/// What the validator rejected.
		message: String,
	},
}

impl DocumentError {
	/// Creates a schema violation for `path`.
	pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Schema { path: path.into(), message: message.into() }
	}
}

/// Failure to resolve a descriptor, surfaced to the requesting caller.
#[derive(Debug, Error)]
pub enum LoadError {
	/// The introspector knows nothing about the requested type.
	#[error("unknown component type '{ty}'")]
	UnknownType {
		/// The unresolvable type.
		ty: TypeName,
	},

	/// The type's supertype chain loops back on itself.
	#[error("type hierarchy cycle while resolving '{ty}'")]
	HierarchyCycle {
		/// The type whose chain loops.
		ty: TypeName,
	},

	/// A rule's preconditions were violated while applying a document.
	#[error("descriptor rule failed for '{ty}': {detail}")]
	Rule {
		/// The type whose descriptor was being built.
		ty: TypeName,
		/// The offending signature/identifier and what was wrong with it.
		detail: String,
	},

	/// A document references a constructor the actual type does not have.
	#[error("'{ty}' has no constructor matching {signature}")]
	ConstructorMismatch {
		/// The type whose descriptor was being built.
		ty: TypeName,
		/// The missing constructor signature.
		signature: Signature,
	},

	/// The final resource candidate failed to parse or validate.
	#[error(transparent)]
	Document(#[from] DocumentError),

	/// An invalid descriptor key was constructed along the way.
	#[error(transparent)]
	Key(#[from] KeyError),
}

impl LoadError {
	/// Creates a rule-application error for `ty`.
	pub fn rule(ty: &TypeName, detail: impl Into<String>) -> Self {
		Self::Rule { ty: ty.clone(), detail: detail.into() }
	}
}

/// Result alias for resolution operations.
pub type Result<T> = std::result::Result<T, LoadError>;

/// Result alias for single-document operations.
pub type DocResult<T> = std::result::Result<T, DocumentError>;

// Re-exported so consumers handle evaluation failures without importing
// the model crate separately.
pub use armature_model::EvalError as EvaluationError;

/// Convenience alias for evaluation outcomes.
pub type EvalResult = std::result::Result<armature_model::Value, EvalError>;
