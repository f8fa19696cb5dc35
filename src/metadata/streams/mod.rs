//! Metadata streams of a module image.
//!
//! A module image carries three streams, each located through a [`StreamHeader`] in the
//! metadata root:
//!
//! - **`#~`** - The record stream describing the type tree and its members
//! - **`#Strings`** - UTF-8 identifiers, see [`Strings`] and [`StringsBuilder`]
//! - **`#Blob`** - Signatures, method bodies, custom attribute values and public keys, see
//!   [`Blob`] and [`BlobBuilder`]
//!
//! The heaps follow ECMA-335 II.24.2; both builders deduplicate their entries so that writing
//! the same module twice yields identical bytes.

mod blob;
mod streamheader;
mod strings;

pub use blob::{Blob, BlobBuilder};
pub use streamheader::{StreamHeader, VALID_STREAM_NAMES};
pub use strings::{Strings, StringsBuilder};
