//! Type definitions.
//!
//! A [`CilType`] owns its members and its nested types, so the module forms a tree rooted at
//! the top-level types. Types are identified by their fully-qualified name: `Namespace.Name`
//! for top-level types and `Outer/Inner` for nested ones, which is the same form signatures
//! use to reference named types.
//!
//! # Examples
//!
//! ```rust
//! use refasm::metadata::typesystem::{CilType, TypeAttributes};
//!
//! let mut outer = CilType::new("Lib", "Outer", TypeAttributes::PUBLIC);
//! outer
//!     .nested_types
//!     .push(CilType::new("", "Inner", TypeAttributes::NESTED_PRIVATE));
//!
//! assert_eq!(outer.fullname(), "Lib.Outer");
//! assert_eq!(outer.nested_types[0].nested_fullname(&outer.fullname()), "Lib.Outer/Inner");
//! assert!(outer.is_public());
//! assert!(!outer.nested_types[0].is_public());
//! ```

use crate::metadata::{
    customattributes::CustomAttribute,
    members::{Event, Field, Property},
    method::Method,
    token::Token,
};

/// Name of the pseudo-type holding global functions and fields
pub const GLOBAL_TYPE_NAME: &str = "<Module>";

#[allow(non_snake_case)]
/// Flags for `TypeAttributes` (II.23.1.15)
pub mod TypeAttributes {
    /// Mask for the 3 visibility bits, compare the masked value with the constants below
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Not visible outside the assembly
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Visible outside the assembly
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Nested, visible wherever the enclosing type is
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Nested, `private`
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Nested, `protected`
    pub const NESTED_FAMILY: u32 = 0x0000_0004;
    /// Nested, `internal`
    pub const NESTED_ASSEMBLY: u32 = 0x0000_0005;
    /// Nested, `private protected`
    pub const NESTED_FAM_AND_ASSEM: u32 = 0x0000_0006;
    /// Nested, `protected internal`
    pub const NESTED_FAM_OR_ASSEM: u32 = 0x0000_0007;
    /// Type is an interface
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Type is abstract
    pub const ABSTRACT: u32 = 0x0000_0080;
    /// Type cannot be derived from
    pub const SEALED: u32 = 0x0000_0100;
    /// Type name is special
    pub const SPECIAL_NAME: u32 = 0x0000_0400;
    /// Type is serializable
    pub const SERIALIZABLE: u32 = 0x0000_2000;
    /// Type initializer may run before first static field access
    pub const BEFORE_FIELD_INIT: u32 = 0x0010_0000;
}

/// A type definition and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CilType {
    /// Token of the type definition
    pub token: Token,
    /// `TypeAttributes`
    pub flags: u32,
    /// Namespace, empty for nested types and the global type
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Methods in declaration order
    pub methods: Vec<Method>,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// Properties in declaration order
    pub properties: Vec<Property>,
    /// Events in declaration order
    pub events: Vec<Event>,
    /// Nested types in declaration order
    pub nested_types: Vec<CilType>,
    /// Custom attributes applied to the type
    pub custom_attributes: Vec<CustomAttribute>,
}

impl CilType {
    /// Create an empty type
    #[must_use]
    pub fn new(namespace: &str, name: &str, flags: u32) -> CilType {
        CilType {
            token: Token::default(),
            flags,
            namespace: namespace.to_string(),
            name: name.to_string(),
            methods: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            nested_types: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }

    /// Create the global `<Module>` type
    #[must_use]
    pub fn global() -> CilType {
        CilType::new("", GLOBAL_TYPE_NAME, TypeAttributes::NOT_PUBLIC)
    }

    /// Fully-qualified name of a top-level type
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Fully-qualified name of this type nested inside `parent`
    #[must_use]
    pub fn nested_fullname(&self, parent: &str) -> String {
        format!("{}/{}", parent, self.name)
    }

    /// Visibility bits of the flags
    #[must_use]
    pub fn visibility(&self) -> u32 {
        self.flags & TypeAttributes::VISIBILITY_MASK
    }

    /// Whether the type is `public` or `nested public`
    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(
            self.visibility(),
            TypeAttributes::PUBLIC | TypeAttributes::NESTED_PUBLIC
        )
    }

    /// Whether this is the global `<Module>` type. Only meaningful for top-level types.
    #[must_use]
    pub fn is_global_module_type(&self) -> bool {
        self.name == GLOBAL_TYPE_NAME && self.namespace.is_empty()
    }

    /// Remove all members and nested types, keeping the type itself and its attributes
    pub fn clear(&mut self) {
        self.methods.clear();
        self.fields.clear();
        self.properties.clear();
        self.events.clear();
        self.nested_types.clear();
    }

    /// Whether the type owns no members and no nested types
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
            && self.fields.is_empty()
            && self.properties.is_empty()
            && self.events.is_empty()
            && self.nested_types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        members::FieldAttributes,
        method::MethodAccessFlags,
        signatures::{MethodSignature, TypeSignature},
    };

    #[test]
    fn visibility() {
        for (flags, public) in [
            (TypeAttributes::NOT_PUBLIC, false),
            (TypeAttributes::PUBLIC, true),
            (TypeAttributes::PUBLIC | TypeAttributes::SEALED, true),
            (TypeAttributes::NESTED_PUBLIC, true),
            (TypeAttributes::NESTED_PRIVATE, false),
            (TypeAttributes::NESTED_FAM_OR_ASSEM, false),
        ] {
            assert_eq!(CilType::new("Lib", "T", flags).is_public(), public);
        }
    }

    #[test]
    fn names() {
        let global = CilType::global();
        assert!(global.is_global_module_type());
        assert!(!global.is_public());
        assert_eq!(global.fullname(), "<Module>");

        let namespaced = CilType::new("Lib", "<Module>", TypeAttributes::NOT_PUBLIC);
        assert!(!namespaced.is_global_module_type());
        assert_eq!(namespaced.fullname(), "Lib.<Module>");
    }

    #[test]
    fn clear() {
        let mut ty = CilType::new("Lib", "T", TypeAttributes::PUBLIC);
        ty.methods.push(Method::new(
            "M",
            MethodAccessFlags::PUBLIC.bits(),
            MethodSignature::default(),
        ));
        ty.fields
            .push(Field::new("f", FieldAttributes::PRIVATE, TypeSignature::I4));
        ty.nested_types
            .push(CilType::new("", "N", TypeAttributes::NESTED_PUBLIC));
        ty.custom_attributes
            .push(CustomAttribute::marker("Lib.MarkerAttribute"));
        assert!(!ty.is_empty());

        ty.clear();
        assert!(ty.is_empty());
        assert_eq!(ty.custom_attributes.len(), 1);
    }
}
