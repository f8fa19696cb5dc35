//! Method attribute and body flags.
//!
//! - [`MethodAccessFlags`], [`MethodModifiers`]: split views of the `MethodAttributes` word
//! - [`MethodImplCodeType`]: how the body is implemented
//! - [`MethodBodyFlags`], [`SectionFlags`]: body header and extra section flags

use bitflags::bitflags;

/// Bitmask for `CODE_TYPE` extraction
pub const METHOD_IMPL_CODE_TYPE_MASK: u32 = 0x0003;
/// Bitmask for member access extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    /// Method implementation code type
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodImplCodeType: u32 {
        /// Body is IL
        const IL = 0x0000;
        /// Body is native code
        const NATIVE = 0x0001;
        /// Reserved
        const OPTIL = 0x0002;
        /// Body is provided by the runtime
        const RUNTIME = 0x0003;
    }
}

impl MethodImplCodeType {
    /// Extract the code type from raw implementation flags
    #[must_use]
    pub fn from_impl_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_IMPL_CODE_TYPE_MASK)
    }
}

bitflags! {
    /// Member access levels. These are values of a 3-bit field, compare with `==` rather
    /// than `contains`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// `private`
        const PRIVATE = 0x0001;
        /// `private protected`
        const FAM_AND_ASSEM = 0x0002;
        /// `internal`
        const ASSEM = 0x0003;
        /// `protected`
        const FAMILY = 0x0004;
        /// `protected internal`
        const FAM_OR_ASSEM = 0x0005;
        /// `public`
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract the access level from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
    }
}

bitflags! {
    /// Method modifiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodModifiers: u32 {
        /// Defined on the type rather than per instance
        const STATIC = 0x0010;
        /// Cannot be overridden
        const FINAL = 0x0020;
        /// Virtual
        const VIRTUAL = 0x0040;
        /// Hides by name and signature
        const HIDE_BY_SIG = 0x0080;
        /// Does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Special name, e.g. property accessors
        const SPECIAL_NAME = 0x0800;
        /// Runtime special name, e.g. `.ctor`
        const RTSPECIAL_NAME = 0x1000;
        /// Implementation forwarded through P/Invoke
        const PINVOKE_IMPL = 0x2000;
    }
}

impl MethodModifiers {
    /// Extract the modifiers from raw method attributes
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & !METHOD_ACCESS_MASK)
    }
}

bitflags! {
    /// Method header flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodBodyFlags: u16 {
        /// Tiny header format
        const TINY_FORMAT = 0x2;
        /// Fat header format
        const FAT_FORMAT = 0x3;
        /// Extra data sections follow the code
        const MORE_SECTS = 0x8;
        /// Zero-initialize locals
        const INIT_LOCALS = 0x10;
    }
}

bitflags! {
    /// Extra data section flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SectionFlags: u8 {
        /// Section holds exception handling clauses
        const EHTABLE = 0x1;
        /// Reserved
        const OPT_ILTABLE = 0x2;
        /// Section uses the fat layout
        const FAT_FORMAT = 0x40;
        /// Another section follows
        const MORE_SECTS = 0x80;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_is_a_value_not_a_set() {
        // public static hidebysig
        let flags = 0x0096;
        assert_eq!(
            MethodAccessFlags::from_method_flags(flags),
            MethodAccessFlags::PUBLIC
        );
        assert!(MethodModifiers::from_method_flags(flags).contains(MethodModifiers::STATIC));

        // 0x5 (protected internal) shares bits with PUBLIC but is not public
        let fam_or_assem = MethodAccessFlags::from_method_flags(0x0005);
        assert_eq!(fam_or_assem, MethodAccessFlags::FAM_OR_ASSEM);
        assert_ne!(fam_or_assem, MethodAccessFlags::PUBLIC);
    }

    #[test]
    fn code_type() {
        assert_eq!(
            MethodImplCodeType::from_impl_flags(0x0000),
            MethodImplCodeType::IL
        );
        assert_eq!(
            MethodImplCodeType::from_impl_flags(0x1003),
            MethodImplCodeType::RUNTIME
        );
    }
}
