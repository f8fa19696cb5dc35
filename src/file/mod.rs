//! Input and output access for metadata images.
//!
//! Input images are either memory-mapped from disk ([`physical`]) or owned in memory
//! ([`memory`]); both sit behind the [`Backend`] trait so the codec only ever sees a byte
//! slice. Output goes through [`output::Output`], which writes a sibling temporary file and
//! moves it onto the target once everything has been written.
//!
//! # Key Components
//!
//! - [`File`] - A loaded input image
//! - [`parser::Parser`] - Cursor based reader with compressed integer support
//! - [`io`] - Bounds-checked little-endian primitives
//! - [`output::Output`] - Atomic memory-mapped output file

pub mod io;
pub mod output;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{Error::Empty, Result};
use memory::Memory;
use physical::Physical;

/// Source of the raw bytes of a loaded image.
pub trait Backend: Send + Sync {
    /// Returns a bounds-checked slice of the data.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the complete data
    fn data(&self) -> &[u8];

    /// Returns the total length of the data
    fn len(&self) -> usize;
}

/// A loaded metadata image, backed either by a memory-mapped file or an owned buffer.
///
/// # Examples
///
/// ```rust,no_run
/// use refasm::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("library.refmd"))?;
/// println!("Loaded {} bytes", file.len());
/// # Ok::<(), refasm::Error>(())
/// ```
pub struct File {
    data: Box<dyn Backend>,
}

impl File {
    /// Memory-map an image from disk.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, or
    /// [`crate::Error::Empty`] if it has no content.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Take ownership of an in-memory image.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] if `data` is empty.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        Ok(File {
            data: Box::new(data),
        })
    }

    /// Total size of the image in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image is empty; never true for a successfully loaded file
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The raw bytes of the image
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// A bounds-checked slice of the image.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }
}
