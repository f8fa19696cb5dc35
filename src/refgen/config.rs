//! Generator configuration.

use strum::{Display, EnumString};

/// Instruction sequence that replaces the body of every retained method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StubKind {
    /// `ldnull; throw`, matching what compilers emit for reference assemblies
    #[default]
    Throw,
    /// `ret`
    Return,
}

/// `ldnull`
const OP_LDNULL: u8 = 0x14;
/// `throw`
const OP_THROW: u8 = 0x7A;
/// `ret`
const OP_RET: u8 = 0x2A;

impl StubKind {
    /// IL code of the stub
    #[must_use]
    pub fn code(self) -> &'static [u8] {
        match self {
            StubKind::Throw => &[OP_LDNULL, OP_THROW],
            StubKind::Return => &[OP_RET],
        }
    }
}

/// Options controlling what the generator removes and how bodies are replaced.
///
/// # Examples
///
/// ```rust
/// use refasm::refgen::{GeneratorConfig, StubKind};
///
/// let config = GeneratorConfig {
///     stub: StubKind::Return,
///     ..GeneratorConfig::default()
/// };
/// assert!(!config.keep_non_public);
/// assert_eq!(config.stub.to_string(), "return");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Keep non-public types and members; only cascades remove anything
    pub keep_non_public: bool,
    /// Replacement for method bodies
    pub stub: StubKind,
    /// Also remove methods whose return type references a removed type
    pub cascade_return_types: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            keep_non_public: false,
            stub: StubKind::Throw,
            cascade_return_types: false,
        }
    }
}

impl GeneratorConfig {
    /// Keep the full API surface, public or not, and only purge bodies
    #[must_use]
    pub fn full() -> Self {
        Self {
            keep_non_public: true,
            ..Self::default()
        }
    }

    /// Public surface only, with the return-type cascade enabled so that no retained signature
    /// mentions a removed type
    #[must_use]
    pub fn strict() -> Self {
        Self {
            cascade_return_types: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn stub_codes() {
        assert_eq!(StubKind::Throw.code(), [0x14, 0x7A]);
        assert_eq!(StubKind::Return.code(), [0x2A]);
    }

    #[test]
    fn stub_names() {
        assert_eq!(StubKind::from_str("throw").unwrap(), StubKind::Throw);
        assert_eq!(StubKind::from_str("return").unwrap(), StubKind::Return);
        assert!(StubKind::from_str("nop").is_err());
        assert_eq!(StubKind::default().to_string(), "throw");
    }

    #[test]
    fn presets() {
        let full = GeneratorConfig::full();
        assert!(full.keep_non_public);
        assert!(!full.cascade_return_types);

        let strict = GeneratorConfig::strict();
        assert!(!strict.keep_non_public);
        assert!(strict.cascade_return_types);
        assert_eq!(strict.stub, StubKind::Throw);
    }
}
