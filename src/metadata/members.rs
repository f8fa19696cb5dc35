//! Fields, properties and events.
//!
//! Properties and events do not carry an accessibility of their own; it is derived from their
//! accessor methods. Accessors are owned by the property or event rather than the declaring
//! type's method list, so dropping an accessor drops the method.

use crate::metadata::{
    customattributes::CustomAttribute, method::Method, signatures::TypeSignature, token::Token,
};

#[allow(non_snake_case)]
/// Flags for `FieldAttributes` (II.23.1.5)
pub mod FieldAttributes {
    /// These 3 bits contain one of the access values below
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessible by anyone in the assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessible by sub-types anywhere, plus anyone in the assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessible by anyone who has visibility to this scope
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is a compile time constant
    pub const LITERAL: u32 = 0x0040;
    /// Field is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Field has RVA
    pub const HAS_FIELD_RVA: u32 = 0x0100;
}

#[allow(non_snake_case)]
/// Flags for `PropertyAttributes` (II.23.1.14)
pub mod PropertyAttributes {
    /// Property is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime should check the name encoding
    pub const RT_SPECIAL_NAME: u32 = 0x0400;
    /// Property has a default value
    pub const HAS_DEFAULT: u32 = 0x1000;
}

#[allow(non_snake_case)]
/// Flags for `EventAttributes` (II.23.1.4)
pub mod EventAttributes {
    /// Event is special
    pub const SPECIAL_NAME: u32 = 0x0200;
    /// Runtime should check the name encoding
    pub const RT_SPECIAL_NAME: u32 = 0x0400;
}

/// A field definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Token of the field definition
    pub token: Token,
    /// Field name
    pub name: String,
    /// `FieldAttributes`
    pub flags: u32,
    /// Type of the field
    pub signature: TypeSignature,
    /// Custom attributes applied to the field
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Field {
    /// Create a field without attributes
    #[must_use]
    pub fn new(name: &str, flags: u32, signature: TypeSignature) -> Field {
        Field {
            token: Token::default(),
            name: name.to_string(),
            flags,
            signature,
            custom_attributes: Vec::new(),
        }
    }

    /// Whether the field is `public`
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::PUBLIC
    }
}

/// A property definition with its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Token of the property definition
    pub token: Token,
    /// Property name
    pub name: String,
    /// `PropertyAttributes`
    pub flags: u32,
    /// The `get` accessor
    pub getter: Option<Method>,
    /// The `set` accessor
    pub setter: Option<Method>,
    /// Custom attributes applied to the property
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Property {
    /// Create a property without accessors
    #[must_use]
    pub fn new(name: &str) -> Property {
        Property {
            token: Token::default(),
            name: name.to_string(),
            flags: 0,
            getter: None,
            setter: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Type of the property: the getter's return type, or the value parameter of the setter.
    ///
    /// The value parameter is the last one, indexers pass their index arguments first.
    #[must_use]
    pub fn effective_type(&self) -> Option<&TypeSignature> {
        if let Some(getter) = &self.getter {
            return Some(&getter.signature.return_type);
        }

        self.setter
            .as_ref()
            .and_then(|setter| setter.signature.params.last())
    }

    /// Accessors that are present, getter first
    pub fn accessors(&self) -> impl Iterator<Item = &Method> {
        self.getter.iter().chain(self.setter.iter())
    }

    /// Whether neither accessor is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.getter.is_none() && self.setter.is_none()
    }
}

/// An event definition with its accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Token of the event definition
    pub token: Token,
    /// Event name
    pub name: String,
    /// `EventAttributes`
    pub flags: u32,
    /// Delegate type of the event
    pub event_type: TypeSignature,
    /// The `add` accessor
    pub add: Option<Method>,
    /// The `remove` accessor
    pub remove: Option<Method>,
    /// The `raise` accessor
    pub invoke: Option<Method>,
    /// Additional accessors (`.other`)
    pub others: Vec<Method>,
    /// Custom attributes applied to the event
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Event {
    /// Create an event without accessors
    #[must_use]
    pub fn new(name: &str, event_type: TypeSignature) -> Event {
        Event {
            token: Token::default(),
            name: name.to_string(),
            flags: 0,
            event_type,
            add: None,
            remove: None,
            invoke: None,
            others: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }

    /// Accessors that are present: add, remove, invoke, then the others in order
    pub fn accessors(&self) -> impl Iterator<Item = &Method> {
        self.add
            .iter()
            .chain(self.remove.iter())
            .chain(self.invoke.iter())
            .chain(self.others.iter())
    }

    /// Whether no accessor is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.remove.is_none() && self.invoke.is_none() && self.others.is_empty()
    }
}
