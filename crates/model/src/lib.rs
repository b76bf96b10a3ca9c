//! Descriptor data model for the Armature UI builder.
//!
//! This crate defines the resolved metadata types the builder works with:
//! [`Descriptor`] and its sub-descriptors (properties, methods,
//! constructors, creation variants), the [`DescriptorKey`] identity used
//! for caching and lookup, and the small value/category/tag carriers they
//! are built from.
//!
//! Everything here is plain data. Resolution — locating descriptor
//! documents, merging them down a type hierarchy, evaluating default
//! values — lives in `armature-engine`. A [`Descriptor`] is assembled by
//! the engine's builder and is immutable once published behind an `Arc`;
//! consumers only ever read it through the query surface on [`Descriptor`].

pub mod bags;
pub mod category;
pub mod descriptor;
pub mod error;
pub mod key;
pub mod lazy;
pub mod pattern;
pub mod types;

pub use bags::StringBag;
pub use category::PropertyCategory;
pub use descriptor::{
	COMPONENT_PLACEHOLDER, ConstructorDescriptor, CreationDescriptor, Descriptor, ExposingRule,
	IconRef, InvocationTemplate, MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
	PropertySource, TypeParameter,
};
pub use error::{EvalError, KeyError, SignatureError};
pub use key::DescriptorKey;
pub use lazy::LazyValue;
pub use pattern::name_matches;
pub use types::{ResourceOrigin, Signature, TypeName, Value};
