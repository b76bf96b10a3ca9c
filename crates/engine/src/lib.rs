//! Component descriptor resolution engine for the Armature UI builder.
//!
//! Given a component type (and optionally a hosting context), the engine
//! produces the fully merged [`armature_model::Descriptor`] describing
//! that type's constructors, properties, methods, creation variants and
//! auxiliary metadata. Resolution combines:
//!
//! - multi-layer resource location (project overrides before libraries),
//! - version-sensitive document selection with fallback,
//! - KDL document parsing and schema validation,
//! - an ordered rule pipeline applying document elements,
//! - hierarchy-aware merging with per-field semantics,
//! - lazy textual-expression evaluation for default values,
//! - a two-tier cache with per-type eligibility rules, and
//! - hierarchy-walking icon resolution.
//!
//! The host supplies reflection through [`introspect::Introspector`] and
//! resources through [`resource::ResourceLayer`]; everything else is
//! self-contained.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use armature_engine::{DescriptorEngine, resource::DirLayer};
//! # use armature_model::{ResourceOrigin, TypeName};
//! # fn introspector() -> Arc<dyn armature_engine::introspect::Introspector> { unimplemented!() }
//! let engine = DescriptorEngine::builder(introspector())
//! 	.layer(Arc::new(DirLayer::new("project/meta", ResourceOrigin::Project)))
//! 	.layer(Arc::new(DirLayer::new("toolkit/meta", ResourceOrigin::Library("toolkit".into()))))
//! 	.build();
//! let button = engine.resolve(&TypeName::from("toolkit.Button"))?;
//! # Ok::<(), armature_engine::LoadError>(())
//! ```

pub mod cache;
pub mod document;
pub mod engine;
pub mod error;
pub mod eval;
pub mod icon;
pub mod introspect;
pub mod merge;
pub mod resource;
pub mod rules;
pub mod version;

pub use cache::{CacheOutcome, CacheTier, DescriptorCache};
pub use engine::{DescriptorEngine, DescriptorProcessor, EngineBuilder, EnginePolicy, ProcessorId};
pub use error::{DocumentError, LoadError, Result};
pub use eval::Evaluator;
pub use icon::IconResolver;
pub use introspect::{FieldModel, Introspector, MethodModel, TypeModel, TypeOrigin};
pub use merge::DescriptorBuilder;
pub use resource::{DirLayer, MemoryLayer, ResourceLayer, ResourceLocator};
pub use version::{StaticVersions, VersionAxis, VersionProvider, VersionProviderFactory};
