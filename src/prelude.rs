//! # refasm Prelude
//!
//! Re-exports of the types needed to load a module, generate its reference form and write
//! it back.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all refasm operations
pub use crate::Error;

/// The result type used throughout refasm
pub use crate::Result;

// ================================================================================================
// Metadata Graph
// ================================================================================================

/// The loaded module and its assembly identity
pub use crate::metadata::module::{Assembly, AssemblyFlags, Module};

/// Type definitions
pub use crate::metadata::typesystem::{CilType, TypeAttributes};

/// Methods and method bodies
pub use crate::metadata::method::{Method, MethodAccessFlags, MethodBody, MethodModifiers};

/// Fields, properties and events
pub use crate::metadata::members::{Event, Field, FieldAttributes, Property};

/// Signatures
pub use crate::metadata::signatures::{MethodSignature, TypeSignature};

/// Custom attribute annotations
pub use crate::metadata::customattributes::CustomAttribute;

/// CLR header flags
pub use crate::metadata::cor20header::CorFlags;

// ================================================================================================
// Reference Generation
// ================================================================================================

/// Generator, configuration and the file to file job
pub use crate::refgen::{
    GenerationStats, GeneratorConfig, JobSummary, ReferenceGenerator, ReferenceJob, StubKind,
};
