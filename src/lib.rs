// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' and 'file/output.rs' use mmap to map files into memory

//! # refasm
//!
//! Generates reference modules from .NET metadata images.
//!
//! A reference module keeps the public API surface of a module (public types, their public
//! members and signatures) while removing non-public types and members and replacing every
//! method body with a minimal stub. The result stays structurally valid: no retained entity
//! references a type that was removed, so compilers can consume it in place of the original.
//!
//! Input and output are bare metadata images: a `BSJB` root with the record stream described
//! in [`metadata::image`]. PE containers are not read, so a compiled `.dll` has to have its
//! metadata extracted first.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use refasm::prelude::*;
//! use std::path::PathBuf;
//!
//! let job = ReferenceJob::new(PathBuf::from("Library.refmd"), GeneratorConfig::default());
//! let summary = job.run()?;
//!
//! println!("{}: {}", summary.output.display(), summary.stats);
//! # Ok::<(), refasm::Error>(())
//! ```
//!
//! ### Working on a loaded module
//!
//! ```rust
//! use refasm::prelude::*;
//!
//! let mut module = Module::new("Lib.dll");
//!
//! let mut api = CilType::new("Lib", "Api", TypeAttributes::PUBLIC);
//! let mut run = Method::new(
//!     "Run",
//!     MethodAccessFlags::PUBLIC.bits(),
//!     MethodSignature::new_instance(TypeSignature::Void, vec![]),
//! );
//! run.body = Some(MethodBody::from_code(vec![0x00, 0x00, 0x2A]));
//! api.methods.push(run);
//! module.types.push(api);
//!
//! let generator = ReferenceGenerator::new(GeneratorConfig::default());
//! let stats = generator.generate(&mut module);
//!
//! assert_eq!(stats.purged_bodies, 1);
//! let body = module.find_type("Lib.Api").unwrap().methods[0].body.as_ref().unwrap();
//! assert_eq!(body.code, [0x14, 0x7A]);
//! # Ok::<(), refasm::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - The module graph and the image codec that loads and writes it
//! - [`refgen`] - Type pruning, member filtering, body purging and header normalization
//! - [`file`] - Memory-mapped input, bounds-checked parsing and atomic output
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Image format
//!
//! Modules are stored as an ECMA-335 metadata root (`BSJB`) with a record stream, a
//! `#Strings` heap and a `#Blob` heap. Method bodies use the ECMA-335 tiny and fat method
//! header formats. See [`metadata::image`] for the layout.
//!
//! ## Logging
//!
//! The library logs through the [`log`] facade: one `debug` line per removed entity and per
//! purged or skipped method, `warn` for notable header changes, and an `info` summary per
//! generated module. Install any logger to see them.
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use refasm::prelude::*;
///
/// let config = GeneratorConfig::full();
/// assert!(config.keep_non_public);
/// ```
pub mod prelude;

/// Memory-mapped and in-memory file access, binary parsing and atomic output
pub mod file;

/// The metadata graph of a module and its on-disk image format
///
/// # Key Components
///
/// - [`metadata::module::Module`] - The loaded module, root of the graph
/// - [`metadata::typesystem::CilType`] - Type definitions and their members
/// - [`metadata::signatures`] - Method and type signatures
/// - [`metadata::image`] - Reading and writing module images
pub mod metadata;

/// Reference module generation
///
/// See [`refgen::ReferenceGenerator`] for the in-memory transformation and
/// [`refgen::ReferenceJob`] for the file to file workflow.
pub mod refgen;

/// `refasm` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use refasm::{metadata::module::Module, Result};
///
/// fn load(path: &str) -> Result<Module> {
///     Module::from_file(std::path::Path::new(path))
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `refasm` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use refasm::{refgen::{GeneratorConfig, ReferenceJob}, Error};
///
/// let job = ReferenceJob::new("Library.refmd".into(), GeneratorConfig::default());
/// match job.run() {
///     Ok(summary) => println!("Wrote {}", summary.output.display()),
///     Err(Error::OutputExists(path)) => println!("{} exists", path.display()),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

/// Metadata heaps of an image.
///
/// - [`Blob`] - Binary blob heap for signatures, method bodies and attribute values
/// - [`Strings`] - String heap for names and identifiers
/// - [`StreamHeader`] - Individual stream header information
pub use metadata::streams::{Blob, StreamHeader, Strings};

/// Low-level file and memory parsing utilities.
///
/// # Example
///
/// ```rust
/// use refasm::Parser;
///
/// let mut parser = Parser::new(&[0x81, 0x23]);
/// assert_eq!(parser.read_compressed_uint()?, 0x123);
/// # Ok::<(), refasm::Error>(())
/// ```
pub use file::{parser::Parser, File};
