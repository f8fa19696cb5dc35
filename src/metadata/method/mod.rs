//! Methods, their bodies and exception handling clauses.
//!
//! A [`Method`] owns its signature and an optional decoded [`MethodBody`]. Abstract, runtime
//! and P/Invoke methods carry no body.
//!
//! # Examples
//!
//! ```rust
//! use refasm::metadata::{
//!     method::{Method, MethodAccessFlags, MethodBody},
//!     signatures::{MethodSignature, TypeSignature},
//! };
//!
//! let mut method = Method::new(
//!     "Run",
//!     MethodAccessFlags::PUBLIC.bits(),
//!     MethodSignature::new_instance(TypeSignature::Void, vec![TypeSignature::I4]),
//! );
//! method.body = Some(MethodBody::from_code(vec![0x2A]));
//!
//! assert!(method.is_public());
//! assert!(method.is_il());
//! ```

mod body;
mod exceptions;
mod types;

pub use body::{MethodBody, TINY_MAX_STACK};
pub use exceptions::{ExceptionHandler, ExceptionHandlerFlags};
pub use types::*;

use crate::metadata::{
    customattributes::CustomAttribute, signatures::MethodSignature, token::Token,
};

/// A method definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    /// Token of the method definition
    pub token: Token,
    /// Method name
    pub name: String,
    /// `MethodAttributes`, see [`MethodAccessFlags`] and [`MethodModifiers`]
    pub flags: u32,
    /// `MethodImplAttributes`, see [`MethodImplCodeType`]
    pub impl_flags: u32,
    /// Calling convention, return and parameter types
    pub signature: MethodSignature,
    /// Decoded body, `None` for methods without an implementation in this module
    pub body: Option<MethodBody>,
    /// Custom attributes applied to the method
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Method {
    /// Create an IL method without a body or attributes
    #[must_use]
    pub fn new(name: &str, flags: u32, signature: MethodSignature) -> Method {
        Method {
            token: Token::default(),
            name: name.to_string(),
            flags,
            impl_flags: 0,
            signature,
            body: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Access level of the method
    #[must_use]
    pub fn access(&self) -> MethodAccessFlags {
        MethodAccessFlags::from_method_flags(self.flags)
    }

    /// Modifiers of the method
    #[must_use]
    pub fn modifiers(&self) -> MethodModifiers {
        MethodModifiers::from_method_flags(self.flags)
    }

    /// How the method is implemented
    #[must_use]
    pub fn code_type(&self) -> MethodImplCodeType {
        MethodImplCodeType::from_impl_flags(self.impl_flags)
    }

    /// Whether the method is `public`
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.access() == MethodAccessFlags::PUBLIC
    }

    /// Whether the implementation is IL
    #[must_use]
    pub fn is_il(&self) -> bool {
        self.code_type() == MethodImplCodeType::IL
    }

    /// Whether the method is static
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.modifiers().contains(MethodModifiers::STATIC)
    }

    /// Whether the method is abstract
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.modifiers().contains(MethodModifiers::ABSTRACT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::TypeSignature;

    #[test]
    fn flags() {
        let mut method = Method::new(
            "Helper",
            MethodAccessFlags::ASSEM.bits() | MethodModifiers::STATIC.bits(),
            MethodSignature::new_static(TypeSignature::Void, vec![]),
        );

        assert!(!method.is_public());
        assert!(method.is_static());
        assert!(!method.is_abstract());
        assert!(method.is_il());

        method.impl_flags = MethodImplCodeType::RUNTIME.bits();
        assert!(!method.is_il());
    }
}
