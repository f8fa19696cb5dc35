//! Module image codec.
//!
//! An image is a metadata root (`BSJB`, see [`crate::metadata::root`]) followed by three
//! streams, each aligned to 4 bytes:
//!
//! | Stream     | Content                                                         |
//! |------------|-----------------------------------------------------------------|
//! | `#~`       | Record stream describing the module, its types and members      |
//! | `#Strings` | Identifiers and the full names of referenced types              |
//! | `#Blob`    | Signatures, method bodies, attribute values and the public key  |
//!
//! The record stream starts with an 8 byte header (reserved `u32`, major version `u8`, minor
//! version `u8`, reserved `u16`) followed by the module record. Counts and heap indices are
//! ECMA-335 compressed integers; tokens and flags are little-endian `u32`, versions and
//! VTable fixup fields use their natural width.
//!
//! ```text
//! module   := cor_flags name has_assembly [assembly] fixups attrs types
//! assembly := name major minor build revision flags public_key attrs
//! type     := token flags namespace name attrs methods fields properties events nested
//! method   := token flags impl_flags name signature body attrs
//! field    := token flags name signature attrs
//! property := token flags name accessor_mask [getter] [setter] attrs
//! event    := token flags name event_type accessor_mask [add] [remove] [invoke] others attrs
//! attrs    := count (attribute_type value)*
//! ```
//!
//! Method bodies are stored in the ECMA-335 method header format (II.25.4) including their
//! exception handling sections; a body index of 0 means the method has no body. Signatures use
//! ECMA-335 element types with named types referenced by full name through `#Strings`.
//!
//! Both heaps deduplicate their entries in first-use order, so writing the same graph always
//! produces the same bytes.

mod reader;
mod writer;

pub use reader::read;
pub use writer::write;

/// Name of the record stream
pub const RECORD_STREAM: &str = "#~";
/// Name of the identifier heap
pub const STRINGS_STREAM: &str = "#Strings";
/// Name of the blob heap
pub const BLOB_STREAM: &str = "#Blob";

/// Major version of the record stream layout
pub const RECORD_MAJOR_VERSION: u8 = 1;
/// Minor version of the record stream layout
pub const RECORD_MINOR_VERSION: u8 = 0;

/// Size of the record stream header
const RECORD_HEADER_SIZE: usize = 8;

/// Upper bound on the capacity reserved up front for a record list
const MAX_PREALLOCATED_RECORDS: usize = 1024;

/// Nesting depth after which nested type records are rejected
const MAX_NESTING_DEPTH: usize = 64;

/// Property accessor mask bits
const PROPERTY_HAS_GETTER: u8 = 0x01;
const PROPERTY_HAS_SETTER: u8 = 0x02;

/// Event accessor mask bits
const EVENT_HAS_ADD: u8 = 0x01;
const EVENT_HAS_REMOVE: u8 = 0x02;
const EVENT_HAS_INVOKE: u8 = 0x04;
