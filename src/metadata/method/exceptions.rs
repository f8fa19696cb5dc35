//! Exception handling clauses of CIL method bodies (ECMA-335 II.25.4.6).

use bitflags::bitflags;

bitflags! {
    /// Kind of an exception handling clause.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ExceptionHandlerFlags: u16 {
        /// A typed exception clause, `filter_offset` carries the class token
        const EXCEPTION = 0x0000;
        /// A filter clause, `filter_offset` points at the filter code
        const FILTER = 0x0001;
        /// A finally clause
        const FINALLY = 0x0002;
        /// A fault clause, a finally that only runs when an exception is thrown
        const FAULT = 0x0004;
    }
}

/// A single exception handling clause.
///
/// ```text
/// try {
///     // try_offset .. try_offset + try_length
/// }
/// catch (ExceptionType) {
///     // handler_offset .. handler_offset + handler_length
/// }
/// ```
///
/// Offsets are relative to the start of the IL code. Clauses are carried through
/// generation untouched unless the owning body is replaced by a stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionHandler {
    /// Kind of clause
    pub flags: ExceptionHandlerFlags,
    /// Offset of the protected region
    pub try_offset: u32,
    /// Length of the protected region
    pub try_length: u32,
    /// Offset of the handler
    pub handler_offset: u32,
    /// Length of the handler
    pub handler_length: u32,
    /// Class token for typed clauses, or the offset of the filter code for filter clauses
    pub filter_offset: u32,
}

impl ExceptionHandler {
    /// Whether this clause fits the small section encoding
    #[must_use]
    pub fn fits_small(&self) -> bool {
        self.try_offset <= u32::from(u16::MAX)
            && self.try_length <= u32::from(u8::MAX)
            && self.handler_offset <= u32::from(u16::MAX)
            && self.handler_length <= u32::from(u8::MAX)
    }
}
