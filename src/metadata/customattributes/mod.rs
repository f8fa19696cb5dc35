//! Custom attribute annotations.
//!
//! Annotations are carried opaquely: the fully-qualified name of the attribute type and the
//! encoded value blob (ECMA-335 II.23.3). The generator only needs to know which type an
//! annotation refers to, so the blob is never decoded.

/// A custom attribute applied to a module, assembly, type or member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomAttribute {
    /// Fully-qualified name of the attribute type, e.g. `System.ObsoleteAttribute`
    pub attribute_type: String,
    /// Encoded constructor arguments and named arguments
    pub value: Vec<u8>,
}

impl CustomAttribute {
    /// Create an annotation of `attribute_type` with the given value blob
    #[must_use]
    pub fn new(attribute_type: &str, value: Vec<u8>) -> Self {
        CustomAttribute {
            attribute_type: attribute_type.to_string(),
            value,
        }
    }

    /// Create an annotation without arguments, the prolog `0x0001` and no named arguments
    #[must_use]
    pub fn marker(attribute_type: &str) -> Self {
        Self::new(attribute_type, vec![0x01, 0x00, 0x00, 0x00])
    }
}
