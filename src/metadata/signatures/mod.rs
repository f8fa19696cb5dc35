//! Method, field and type signatures (ECMA-335 II.23.2).
//!
//! Signatures are stored as blobs. Primitive types use the standard element type codes;
//! named types are written as `CLASS`/`VALUETYPE` followed by the `#Strings` index of their
//! fully-qualified name, so a loaded signature carries names rather than table tokens. This is
//! what lets the reference generator compare signature types against the set of removed types
//! without resolving anything.
//!
//! # Key Types
//!
//! - [`TypeSignature`] - A type inside a signature
//! - [`MethodSignature`] - Calling convention, return type and parameters
//! - [`SignatureParser`] - Decodes signature blobs
//! - [`encode_method_signature`], [`encode_field_signature`], [`encode_type_signature`] - Encoders
//!
//! # Examples
//!
//! ```rust
//! use refasm::metadata::{
//!     signatures::{encode_method_signature, MethodSignature, SignatureParser, TypeSignature},
//!     streams::{Strings, StringsBuilder},
//! };
//!
//! let sig = MethodSignature::new_static(TypeSignature::Void, vec![TypeSignature::class("Lib.A")]);
//!
//! let mut builder = StringsBuilder::new();
//! let blob = encode_method_signature(&sig, &mut builder)?;
//! let heap = builder.finish();
//!
//! let strings = Strings::from(&heap)?;
//! assert_eq!(SignatureParser::new(&blob, &strings).parse_method_signature()?, sig);
//! # Ok::<(), refasm::Error>(())
//! ```

mod encoder;
mod parser;
mod types;

pub use encoder::{encode_field_signature, encode_method_signature, encode_type_signature};
pub use parser::SignatureParser;
pub use types::*;
