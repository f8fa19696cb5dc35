//! Memory-mapped file backend.

use super::Backend;
use crate::{
    Error::{Error, FileError, OutOfBounds},
    Result,
};

use memmap2::Mmap;
use std::{fs, path::Path};

/// Read-only view of an image file mapped into memory.
///
/// The mapping is released when the value is dropped.
#[derive(Debug)]
pub struct Physical {
    data: Option<Mmap>,
}

impl Physical {
    /// Open and map `path`.
    ///
    /// Zero-length files are accepted and yield an empty backend, since mapping an empty
    /// file is not portable.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened or inspected, or
    /// [`crate::Error::Error`] if the mapping fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Physical> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(FileError(error)),
        };

        if file.metadata().map_err(FileError)?.len() == 0 {
            return Ok(Physical { data: None });
        }

        let mmap = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => mmap,
            Err(error) => return Err(Error(error.to_string())),
        };

        Ok(Physical { data: Some(mmap) })
    }
}

impl Backend for Physical {
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        let Some(offset_end) = offset.checked_add(len) else {
            return Err(OutOfBounds);
        };

        let data = self.data();
        if offset_end > data.len() {
            return Err(OutOfBounds);
        }

        Ok(&data[offset..offset_end])
    }

    fn data(&self) -> &[u8] {
        match &self.data {
            Some(mmap) => mmap.as_ref(),
            None => &[],
        }
    }

    fn len(&self) -> usize {
        self.data().len()
    }
}
