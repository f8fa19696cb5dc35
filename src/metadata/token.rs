//! Metadata tokens identifying the entities of a module.
//!
//! A token packs the metadata table in its high byte and a 1-based row in the low 24 bits.
//! Tokens are carried through load and write unchanged, so entities keep their identity in
//! the reference module.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Table identifiers of the entity kinds stored in a module
#[allow(non_snake_case)]
pub mod TokenTable {
    /// Type definitions
    pub const TYPE_DEF: u8 = 0x02;
    /// Field definitions
    pub const FIELD: u8 = 0x04;
    /// Method definitions
    pub const METHOD_DEF: u8 = 0x06;
    /// Event definitions
    pub const EVENT: u8 = 0x14;
    /// Property definitions
    pub const PROPERTY: u8 = 0x17;
}

/// A metadata token: table id in the high byte, row in the low 24 bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Token(pub u32);

impl Token {
    /// Create a token from its raw value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Create a token from a table id and a row
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// The raw value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The table id
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The 1-based row
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Whether this is the null token
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn parts() {
        let token = Token::from_parts(TokenTable::METHOD_DEF, 1);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);

        let token = Token::from_parts(TokenTable::TYPE_DEF, 0x0100_0005);
        assert_eq!(token.value(), 0x0200_0005);
    }

    #[test]
    fn is_null() {
        assert!(Token::default().is_null());
        assert!(!Token(0x0600_0001).is_null());
    }

    #[test]
    fn conversion() {
        let value = 0x0600_0001_u32;
        let token: Token = value.into();
        assert_eq!(token.value(), value);

        let back_to_u32: u32 = token.into();
        assert_eq!(back_to_u32, value);
    }

    #[test]
    fn formatting() {
        let token = Token(0x0600_0001);
        assert_eq!(format!("{}", token), "0x06000001");

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn ordering_and_hash() {
        let token1 = Token(0x0600_0001);
        let token2 = Token(0x0600_0002);
        let token3 = Token(0x0700_0001);
        assert!(token1 < token2);
        assert!(token2 < token3);

        let mut map = HashMap::new();
        map.insert(token1, "Method1");
        map.insert(token2, "Method2");
        assert_eq!(map.get(&token1), Some(&"Method1"));
        assert_eq!(map.get(&token2), Some(&"Method2"));
    }
}
