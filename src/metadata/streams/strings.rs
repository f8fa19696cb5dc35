//! String Heap (`#Strings`)
//!
//! Identifier strings in UTF-8, each terminated by a null byte. Index 0 always refers to the
//! empty string. [`Strings`] reads the heap, [`StringsBuilder`] produces one with every
//! distinct string stored once.
//!
//! # Reference
//! - [ECMA-335 II.24.2.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::{collections::HashMap, ffi::CStr};

use crate::{Error::OutOfBounds, Result};

/// Read access to a `#Strings` heap.
///
/// # Examples
///
/// ```rust
/// use refasm::Strings;
///
/// let data = [0x00, b'F', b'o', b'o', 0x00];
/// let strings = Strings::from(&data)?;
/// assert_eq!(strings.get(1)?, "Foo");
/// assert_eq!(strings.get(0)?, "");
/// # Ok::<(), refasm::Error>(())
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Wrap the raw heap.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the heap is empty or does not start with a null byte.
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Get the string starting at `index`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `index` lies outside the heap, or
    /// [`crate::Error::Malformed`] if the string is unterminated or not UTF-8.
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        match CStr::from_bytes_until_nul(&self.data[index..]) {
            Ok(result) => match result.to_str() {
                Ok(result) => Ok(result),
                Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
            },
            Err(_) => Err(malformed_error!("Invalid string at index - {}", index)),
        }
    }
}

/// Builds a `#Strings` heap, storing each distinct string once.
///
/// Indices are handed out in insertion order, so the same sequence of calls always produces
/// the same heap.
pub struct StringsBuilder {
    data: Vec<u8>,
    lookup: HashMap<String, u32>,
}

impl StringsBuilder {
    /// Create a heap holding only the leading empty string
    #[must_use]
    pub fn new() -> Self {
        StringsBuilder {
            data: vec![0],
            lookup: HashMap::new(),
        }
    }

    /// Add `value` and return its index. The empty string is always index 0.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `value` contains a null byte or the heap
    /// outgrows 32-bit indices.
    pub fn add(&mut self, value: &str) -> Result<u32> {
        if value.is_empty() {
            return Ok(0);
        }

        if let Some(index) = self.lookup.get(value) {
            return Ok(*index);
        }

        if value.as_bytes().contains(&0) {
            return Err(malformed_error!(
                "String contains an embedded null - {:?}",
                value
            ));
        }

        let index = u32::try_from(self.data.len())
            .map_err(|_| malformed_error!("#Strings heap exceeds 4GB"))?;
        self.data.extend_from_slice(value.as_bytes());
        self.data.push(0);
        self.lookup.insert(value.to_string(), index);

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

impl Default for StringsBuilder {
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
        let data : [u8; 47] = [
            0x00,
            0x3c, 0x4d, 0x61, 0x69, 0x6e, 0x3e, 0x24, 0x00,
            0x43, 0x5f, 0x53, 0x68, 0x61, 0x72, 0x70, 0x5f, 0x50, 0x4f, 0x43, 0x5f, 0x31, 0x00,
            0x3c, 0x4d, 0x6f, 0x64, 0x75, 0x6c, 0x65, 0x3e, 0x00,
            0x53, 0x79, 0x73, 0x74, 0x65, 0x6d, 0x2e, 0x43, 0x6f, 0x6e, 0x73, 0x6f, 0x6c, 0x65, 0x00,
        ];

        let str_view = Strings::from(&data).unwrap();

        assert_eq!(str_view.get(1).unwrap(), "<Main>$");
        assert_eq!(str_view.get(9).unwrap(), "C_Sharp_POC_1");
        assert_eq!(str_view.get(23).unwrap(), "<Module>");
        assert_eq!(str_view.get(32).unwrap(), "System.Console");
        assert!(str_view.get(47).is_err());
    }

    #[test]
    fn invalid_heap() {
        assert!(Strings::from(&[]).is_err());
        assert!(Strings::from(&[0x41, 0x00]).is_err());

        let unterminated = [0x00, 0x41, 0x42];
        let heap = Strings::from(&unterminated).unwrap();
        assert!(heap.get(1).is_err());
    }

    #[test]
    fn builder_dedupes() {
        let mut builder = StringsBuilder::new();

        let foo = builder.add("Foo").unwrap();
        let bar = builder.add("Bar").unwrap();
        assert_eq!(builder.add("Foo").unwrap(), foo);
        assert_eq!(builder.add("").unwrap(), 0);
        assert!(builder.add("Bad\0Name").is_err());

        let data = builder.finish();
        assert_eq!(data.len() % 4, 0);

        let heap = Strings::from(&data).unwrap();
        assert_eq!(heap.get(foo as usize).unwrap(), "Foo");
        assert_eq!(heap.get(bar as usize).unwrap(), "Bar");
        assert_eq!(heap.get(0).unwrap(), "");
    }
}
