//! CLR header runtime flags and VTable fixups.
//!
//! Only the parts of the CLR 2.0 header that describe how the runtime treats the module are
//! kept: the [`CorFlags`] word and the VTable fixup directory used for unmanaged exports.
//!
//! # Reference
//! - [ECMA-335 II.25.3.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use bitflags::bitflags;

bitflags! {
    /// Flags describing the runtime requirements of the module
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CorFlags: u32 {
        /// Module contains only IL code
        const IL_ONLY = 0x0000_0001;
        /// Module requires a 32-bit process
        const REQUIRED_32BIT = 0x0000_0002;
        /// Module is an IL library
        const IL_LIBRARY = 0x0000_0004;
        /// Module is signed with a strong name
        const STRONG_NAME_SIGNED = 0x0000_0008;
        /// The entry point token refers to a native entry point
        const NATIVE_ENTRYPOINT = 0x0000_0010;
        /// Debug data is tracked
        const TRACK_DEBUG_DATA = 0x0001_0000;
        /// Module prefers a 32-bit process
        const PREFER_32BIT = 0x0002_0000;
    }
}

bitflags! {
    /// Kind of slots in a VTable fixup entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct VTableFixupFlags: u16 {
        /// 32-bit slots
        const SLOTS_32BIT = 0x01;
        /// 64-bit slots
        const SLOTS_64BIT = 0x02;
        /// Transition from unmanaged to managed code
        const FROM_UNMANAGED = 0x04;
        /// Retain the app domain of the caller
        const FROM_UNMANAGED_RETAIN_APPDOMAIN = 0x08;
        /// Call the most derived method
        const CALL_MOST_DERIVED = 0x10;
    }
}

/// One entry of the VTable fixup directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VTableFixup {
    /// RVA of the slot table
    pub rva: u32,
    /// Number of slots
    pub count: u16,
    /// Slot kind
    pub kind: VTableFixupFlags,
}
