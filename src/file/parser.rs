//! Cursor-based binary parser for metadata images, heaps and method bodies.
//!
//! [`Parser`] wraps a byte slice and a position. Besides fixed-size little-endian reads it
//! understands the ECMA-335 compressed integer encoding (II.23.2) used by blob lengths,
//! signatures and the `#~` record stream. The matching encoder lives in
//! [`write_compressed_uint`].

use crate::{
    file::io::{read_le_at, CilIO},
    Error::OutOfBounds,
    Result,
};

/// A generic binary data parser for reading structured data from byte slices.
///
/// # Examples
///
/// ```rust
/// use refasm::Parser;
///
/// let data = [0x81, 0x00, 0x2A];
/// let mut parser = Parser::new(&data);
///
/// assert_eq!(parser.read_compressed_uint()?, 0x100);
/// assert_eq!(parser.read_le::<u8>()?, 0x2A);
/// assert!(!parser.has_more_data());
/// # Ok::<(), refasm::Error>(())
/// ```
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser positioned at the start of `data`
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Total length of the underlying data
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying data is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Whether there are unread bytes left
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Move the cursor to an absolute position.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `pos` lies past the end of the data.
    pub fn seek(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(OutOfBounds);
        }

        self.position = pos;
        Ok(())
    }

    /// Advance the cursor by `step` bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the cursor would pass the end of the data.
    pub fn advance_by(&mut self, step: usize) -> Result<()> {
        self.position = self.calc_end_position(step)?;
        Ok(())
    }

    /// Current cursor position
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of unread bytes
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Read the next byte without consuming it.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] at the end of the data.
    pub fn peek_byte(&self) -> Result<u8> {
        self.data.get(self.position).copied().ok_or(OutOfBounds)
    }

    /// Read a little-endian value and advance.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left.
    pub fn read_le<T: CilIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer (ECMA-335 II.23.2).
    ///
    /// The value uses 1, 2 or 4 bytes depending on the high bits of the first byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on truncated data, or
    /// [`crate::Error::Malformed`] if the first byte carries an invalid prefix.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Compute the end position of a read of `length` bytes from the cursor.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] on overflow or if the end lies past the data.
    pub fn calc_end_position(&self, length: usize) -> Result<usize> {
        let end = self.position.checked_add(length).ok_or(OutOfBounds)?;
        if end > self.data.len() {
            return Err(OutOfBounds);
        }

        Ok(end)
    }

    /// Borrow the next `length` bytes and advance past them.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self.calc_end_position(length)?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }
}

/// Append `value` to `out` using the ECMA-335 compressed unsigned integer encoding.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for values above `0x1FFF_FFFF`, which cannot be encoded.
pub fn write_compressed_uint(value: u32, out: &mut Vec<u8>) -> Result<()> {
    #[allow(clippy::cast_possible_truncation)]
    match value {
        0..=0x7F => out.push(value as u8),
        0x80..=0x3FFF => {
            out.push(0x80 | (value >> 8) as u8);
            out.push(value as u8);
        }
        0x4000..=0x1FFF_FFFF => {
            out.push(0xC0 | (value >> 24) as u8);
            out.push((value >> 16) as u8);
            out.push((value >> 8) as u8);
            out.push(value as u8);
        }
        _ => return Err(malformed_error!("Value too large to compress - {}", value)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_uint() {
        #[rustfmt::skip]
        let data = [
            0x03,
            0x7F,
            0x80, 0x80,
            0xAE, 0x57,
            0xBF, 0xFF,
            0xC0, 0x00, 0x40, 0x00,
            0xDF, 0xFF, 0xFF, 0xFF,
        ];

        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x03);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x7F);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x80);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x2E57);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x3FFF);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x4000);
        assert_eq!(parser.read_compressed_uint().unwrap(), 0x1FFF_FFFF);
        assert!(!parser.has_more_data());
    }

    #[test]
    fn compressed_uint_invalid() {
        let data = [0xFF, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_compressed_uint(),
            Err(crate::Error::Malformed { .. })
        ));

        let truncated = [0xC0, 0x00];
        let mut parser = Parser::new(&truncated);
        assert!(matches!(parser.read_compressed_uint(), Err(OutOfBounds)));
    }

    #[test]
    fn write_compressed() {
        let mut out = Vec::new();
        write_compressed_uint(0x03, &mut out).unwrap();
        write_compressed_uint(0x2E57, &mut out).unwrap();
        write_compressed_uint(0x4000, &mut out).unwrap();
        assert_eq!(out, [0x03, 0xAE, 0x57, 0xC0, 0x00, 0x40, 0x00]);

        assert!(write_compressed_uint(0x2000_0000, &mut out).is_err());
    }

    #[test]
    fn read_bytes_and_seek() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut parser = Parser::new(&data);

        assert_eq!(parser.read_bytes(2).unwrap(), &[0x01, 0x02]);
        assert_eq!(parser.remaining(), 2);
        assert!(parser.read_bytes(3).is_err());
        assert_eq!(parser.pos(), 2);

        parser.seek(4).unwrap();
        assert!(!parser.has_more_data());
        assert!(parser.peek_byte().is_err());
        assert!(parser.seek(5).is_err());

        parser.seek(0).unwrap();
        parser.advance_by(3).unwrap();
        assert_eq!(parser.peek_byte().unwrap(), 0x04);
    }
}
