//! Blob Heap (`#Blob`)
//!
//! Length-prefixed binary values: signatures, method bodies, custom attribute values and
//! public keys. Each entry starts with a compressed length; index 0 is the empty blob.
//!
//! # Reference
//! - [ECMA-335 II.24.2.4](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::collections::HashMap;

use crate::{
    file::parser::{write_compressed_uint, Parser},
    Error::OutOfBounds,
    Result,
};

/// Read access to a `#Blob` heap.
///
/// # Examples
///
/// ```rust
/// use refasm::Blob;
///
/// let data = [0x00, 0x02, 0x2A, 0x2B];
/// let blob = Blob::from(&data)?;
/// assert_eq!(blob.get(1)?, &[0x2A, 0x2B]);
/// # Ok::<(), refasm::Error>(())
/// ```
pub struct Blob<'a> {
    data: &'a [u8],
}

impl<'a> Blob<'a> {
    /// Wrap the raw heap.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not start with a null byte.
    pub fn from(data: &'a [u8]) -> Result<Blob<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Invalid memory for #Blob heap"));
        }

        Ok(Blob { data })
    }

    /// Get the blob starting at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the index or the encoded length points past
    /// the heap.
    pub fn get(&self, index: usize) -> Result<&'a [u8]> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        let mut parser = Parser::new(&self.data[index..]);
        let len = parser.read_compressed_uint()? as usize;
        let skip = parser.pos();

        let Some(data_start) = index.checked_add(skip) else {
            return Err(OutOfBounds);
        };

        let Some(data_end) = data_start.checked_add(len) else {
            return Err(OutOfBounds);
        };

        if data_start > self.data.len() || data_end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(&self.data[data_start..data_end])
    }
}

/// Builds a `#Blob` heap, storing each distinct value once.
pub struct BlobBuilder {
    data: Vec<u8>,
    lookup: HashMap<Vec<u8>, u32>,
}

impl BlobBuilder {
    /// Create a heap holding only the leading empty blob
    #[must_use]
    pub fn new() -> Self {
        BlobBuilder {
            data: vec![0],
            lookup: HashMap::new(),
        }
    }

    /// Add `value` and return its index. The empty blob is always index 0.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `value` is too large for a compressed length or
    /// the heap outgrows 32-bit indices.
    pub fn add(&mut self, value: &[u8]) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }

        if let Some(index) = self.lookup.get(value) {
            return Ok(*index);
        }

        let index = u32::try_from(self.data.len())
            .map_err(|_| malformed_error!("#Blob heap exceeds 4GB"))?;
        let len = u32::try_from(value.len())
            .map_err(|_| malformed_error!("Blob too large - {} bytes", value.len()))?;

        write_compressed_uint(len, &mut self.data)?;
        self.data.extend_from_slice(value);
        self.lookup.insert(value.to_vec(), index);

        Ok(index)
    }

    /// Finish the heap, padded with null bytes to a multiple of 4
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        let padded = (self.data.len() + 3) & !3;
        self.data.resize(padded, 0);
        self.data
    }
}

impl Default for BlobBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        #[rustfmt::skip]
        let data = {
            let mut data = vec![0xCC; 2048];
            /* i - 0    - should always be 0    */ data[0]          = 0b_00000000_u8;

            /* i - 1    - len 10                */ data[1]          = 0b_00001010_u8;
            /* i - 1    - len 10                */ data[2..12]      .copy_from_slice(&[0x0A; 10]);

            /* i - 12   - len 5                 */ data[12]         = 0b_00000101_u8;
            /* i - 12   - len 5                 */ data[13..18]     .copy_from_slice(&[0xAB; 5]);

            /* i - 18   - len 0 - invalid       */ data[18]         = 0b_11111111_u8;

            /* i - 19   - len 257               */ data[19]         = 0b_10000001_u8;
            /* i - 19   - len 257               */ data[20]         = 0b_00000001_u8;
            /* i - 19   - len 257               */ data[21..278]    .copy_from_slice(&[0xBA; 257]);

            /* i - 278  - len 4096 - too long   */ data[278]        = 0b_10010000_u8;
            /* i - 278  - len 4096 - too long   */ data[279]        = 0b_00000000_u8;
            data
        };

        let blob = Blob::from(&data).unwrap();

        assert_eq!(blob.get(1).unwrap(), &[0x0A; 10]);
        assert_eq!(blob.get(12).unwrap(), &[0xAB; 5]);
        assert!(blob.get(18).is_err());
        assert_eq!(blob.get(19).unwrap(), &[0xBA; 257]);
        assert!(matches!(blob.get(278), Err(OutOfBounds)));
        assert!(matches!(blob.get(2048), Err(OutOfBounds)));
        assert!(blob.get(0).unwrap().is_empty());
    }

    #[test]
    fn builder_dedupes() {
        let mut builder = BlobBuilder::new();

        let first = builder.add(&[0x06, 0x08]).unwrap();
        let large = builder.add(&[0xEE; 200]).unwrap();
        assert_eq!(builder.add(&[0x06, 0x08]).unwrap(), first);
        assert_eq!(builder.add(&[]).unwrap(), 0);

        let data = builder.finish();
        assert_eq!(data.len() % 4, 0);

        let heap = Blob::from(&data).unwrap();
        assert_eq!(heap.get(first as usize).unwrap(), &[0x06, 0x08]);
        assert_eq!(heap.get(large as usize).unwrap(), &[0xEE; 200]);
    }
}
