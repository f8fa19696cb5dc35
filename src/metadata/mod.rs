//! Metadata graph of a module and the codec that loads and writes it.
//!
//! # Key Components
//!
//! - [`module::Module`] - Root of the graph: assembly identity, CLR flags and the type tree
//! - [`typesystem::CilType`] - Type definitions owning their members and nested types
//! - [`method`] - Methods, method body parsing and encoding, exception handlers
//! - [`members`] - Fields, properties and events
//! - [`signatures`] - Method, field and type signatures
//! - [`image`] - Reading and writing module images
//! - [`streams`] - The `#Strings` and `#Blob` heaps and the stream directory
//!
//! # Examples
//!
//! ```rust
//! use refasm::metadata::{
//!     module::Module,
//!     typesystem::{CilType, TypeAttributes},
//! };
//!
//! let mut module = Module::new("Lib.dll");
//! module.types.push(CilType::new("Lib", "Widget", TypeAttributes::PUBLIC));
//!
//! let bytes = module.to_bytes()?;
//! let loaded = Module::from_mem(bytes)?;
//! assert!(loaded.find_type("Lib.Widget").is_some());
//! # Ok::<(), refasm::Error>(())
//! ```

/// CLR header flags and VTable fixups
pub mod cor20header;
/// Custom attribute annotations
pub mod customattributes;
/// Module image reader and writer
pub mod image;
/// Fields, properties and events
pub mod members;
/// Methods and method bodies
pub mod method;
/// The loaded module
pub mod module;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of method and type signatures
pub mod signatures;
/// Metadata heaps and stream headers
pub mod streams;
/// Commonly used metadata token type
pub mod token;
/// Type definitions
pub mod typesystem;
