//! Stream header entries of the metadata root directory (ECMA-335 II.24.2.2).

use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// Stream names a metadata root may declare
pub const VALID_STREAM_NAMES: [&str; 5] = ["#Strings", "#US", "#Blob", "#GUID", "#~"];

/// A single entry of the stream directory: where a stream lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream relative to the metadata root
    pub offset: u32,
    /// Size of the stream in bytes, a multiple of 4
    pub size: u32,
    /// Name of the stream
    pub name: String,
}

impl StreamHeader {
    /// Parse a stream header from the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is too short, or
    /// [`crate::Error::Malformed`] if the name is not a known stream name.
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let name_bytes = &data[8..std::cmp::min(data.len(), 8 + 32)];
        let Some(name_end) = name_bytes.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };

        let name = String::from_utf8_lossy(&name_bytes[..name_end]).into_owned();
        if !VALID_STREAM_NAMES.iter().any(|valid_name| name == *valid_name) {
            return Err(malformed_error!("Invalid stream header name - {}", name));
        }

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name,
        })
    }

    /// Size of this header once written: 8 bytes plus the terminated name padded to 4
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }

    /// Append the encoded header to `out`
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.offset.to_le_bytes());
        out.extend_from_slice(&self.size.to_le_bytes());
        out.extend_from_slice(self.name.as_bytes());

        let padded = (self.name.len() + 1 + 3) & !3;
        out.resize(out.len() + padded - self.name.len(), 0);
    }
}
