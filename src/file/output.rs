//! Atomic memory-mapped output file.
//!
//! [`Output`] creates a hidden sibling of the target (`.<name>.tmp`), maps it writable, and
//! only moves it onto the target inside [`Output::finalize`]. An `Output` that is dropped
//! without being finalized removes its temporary file, so a failed run never leaves a partial
//! module behind and never touches a pre-existing target.

use std::{
    fs,
    path::{Path, PathBuf},
};

use memmap2::{MmapMut, MmapOptions};

use crate::{Error, Result};

/// Writable output that becomes visible at its target path only on [`Output::finalize`].
///
/// # Examples
///
/// ```rust,no_run
/// use refasm::file::output::Output;
///
/// let bytes = b"BSJB";
/// let mut output = Output::create("out.refmd", bytes.len() as u64)?;
/// output.write_at(0, bytes)?;
/// output.finalize()?;
/// # Ok::<(), refasm::Error>(())
/// ```
pub struct Output {
    /// Writable mapping of the temporary file; taken before the rename
    mmap: Option<MmapMut>,

    /// Sibling temporary file receiving the writes
    temp_path: PathBuf,

    /// Final location of the output
    target_path: PathBuf,

    /// Set once the temporary file has been moved onto the target
    finalized: bool,
}

impl Output {
    /// Create a temporary sibling of `target_path` with `size` bytes and map it.
    ///
    /// # Errors
    /// Returns [`Error::WriteFailed`] if `size` is zero or the file cannot be created,
    /// resized or mapped.
    pub fn create<P: AsRef<Path>>(target_path: P, size: u64) -> Result<Self> {
        let target_path = target_path.as_ref().to_path_buf();
        if size == 0 {
            return Err(Error::WriteFailed {
                message: "Refusing to create an empty output".to_string(),
            });
        }

        let temp_path = Self::temp_path_for(&target_path)?;

        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| Error::WriteFailed {
                message: format!("Failed to create {}: {e}", temp_path.display()),
            })?;

        let mut output = Self {
            mmap: None,
            temp_path,
            target_path,
            finalized: false,
        };

        file.set_len(size).map_err(|e| Error::WriteFailed {
            message: format!("Failed to set file size: {e}"),
        })?;

        let mmap = unsafe {
            MmapOptions::new()
                .map_mut(&file)
                .map_err(|e| Error::WriteFailed {
                    message: format!("Failed to create memory mapping: {e}"),
                })?
        };

        output.mmap = Some(mmap);
        Ok(output)
    }

    fn temp_path_for(target_path: &Path) -> Result<PathBuf> {
        let Some(file_name) = target_path.file_name() else {
            return Err(Error::WriteFailed {
                message: format!("Output path has no file name: {}", target_path.display()),
            });
        };

        Ok(target_path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
    }

    fn mapping(&mut self) -> Result<&mut MmapMut> {
        self.mmap.as_mut().ok_or_else(|| Error::WriteFailed {
            message: "Output mapping is no longer available".to_string(),
        })
    }

    /// Copy `data` into the output at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::WriteFailed`] if the write would exceed the output size.
    pub fn write_at(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        let mmap = self.mapping()?;
        let end = offset.checked_add(data.len()).unwrap_or(usize::MAX);

        if end > mmap.len() {
            return Err(Error::WriteFailed {
                message: format!(
                    "Write would exceed file size: offset={}, len={}, file_size={}",
                    offset,
                    data.len(),
                    mmap.len()
                ),
            });
        }

        mmap[offset..end].copy_from_slice(data);
        Ok(())
    }

    /// Write a little-endian `u32` at `offset`.
    ///
    /// # Errors
    /// Returns [`Error::WriteFailed`] if the write would exceed the output size.
    pub fn write_u32_le_at(&mut self, offset: usize, value: u32) -> Result<()> {
        self.write_at(offset, &value.to_le_bytes())
    }

    /// Size of the output in bytes
    #[must_use]
    pub fn size(&self) -> usize {
        self.mmap.as_ref().map_or(0, |mmap| mmap.len())
    }

    /// Flush the mapping to disk.
    ///
    /// # Errors
    /// Returns [`Error::WriteFailed`] if flushing fails.
    pub fn flush(&mut self) -> Result<()> {
        self.mapping()?.flush().map_err(|e| Error::WriteFailed {
            message: format!("Failed to flush memory mapping: {e}"),
        })
    }

    /// Flush, unmap and move the temporary file onto the target path.
    ///
    /// # Errors
    /// Returns [`Error::WriteFailed`] if flushing or the rename fails. The temporary file is
    /// removed in that case.
    pub fn finalize(mut self) -> Result<()> {
        self.flush()?;
        drop(self.mmap.take());

        fs::rename(&self.temp_path, &self.target_path).map_err(|e| Error::WriteFailed {
            message: format!(
                "Failed to move output into place at {}: {e}",
                self.target_path.display()
            ),
        })?;

        self.finalized = true;
        Ok(())
    }

    /// Final location of the output
    #[must_use]
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    /// Location of the temporary file while the output is being written
    #[must_use]
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        if !self.finalized {
            // Unmap before removing so the handle is released on every platform
            drop(self.mmap.take());
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}
