//! Signature data model.

#[allow(non_snake_case, missing_docs)]
/// ECMA-335 element type codes used in signature blobs (II.23.1.16)
pub mod ELEMENT_TYPE {
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    // Followed by type
    pub const PTR: u8 = 0x0f;
    // Followed by type
    pub const BYREF: u8 = 0x10;
    // Followed by the #Strings index of the full type name
    pub const VALUETYPE: u8 = 0x11;
    // Followed by the #Strings index of the full type name
    pub const CLASS: u8 = 0x12;
    // Generic parameter in a generic type definition, represented as number
    pub const VAR: u8 = 0x13;
    // Generic type instantiation. Followed by type type-arg-count type-1 ... type-n
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    // System.IntPtr
    pub const I: u8 = 0x18;
    // System.UIntPtr
    pub const U: u8 = 0x19;
    // System.Object
    pub const OBJECT: u8 = 0x1c;
    // Single-dim array with 0 lower bound
    pub const SZARRAY: u8 = 0x1d;
    // Generic parameter in a generic method definition, represented as number
    pub const MVAR: u8 = 0x1e;
}

/// Leading bytes of signature blobs (II.23.2)
#[allow(non_snake_case)]
pub mod SIGNATURE_HEADER {
    /// Field signature prolog
    pub const FIELD: u8 = 0x06;
    /// Instance method, `this` is passed implicitly
    pub const HASTHIS: u8 = 0x20;
    /// `this` is passed explicitly as the first parameter
    pub const EXPLICITTHIS: u8 = 0x40;
    /// Generic method, followed by the generic parameter count
    pub const GENERIC: u8 = 0x10;
}

/// A type as it appears in a signature.
///
/// Named types carry their fully-qualified name (`Namespace.Name`, nested types as
/// `Outer/Inner`), which is how the cascade logic matches them against removed types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// `void`, only valid as a return type
    Void,
    /// `bool`
    Boolean,
    /// `char`
    Char,
    /// `sbyte`
    I1,
    /// `byte`
    U1,
    /// `short`
    I2,
    /// `ushort`
    U2,
    /// `int`
    I4,
    /// `uint`
    U4,
    /// `long`
    I8,
    /// `ulong`
    U8,
    /// `float`
    R4,
    /// `double`
    R8,
    /// `string`
    String,
    /// `nint`
    I,
    /// `nuint`
    U,
    /// `object`
    Object,
    /// `TypedReference`
    TypedByRef,
    /// Unmanaged pointer to the inner type
    Ptr(Box<TypeSignature>),
    /// Managed reference to the inner type
    ByRef(Box<TypeSignature>),
    /// Value type by full name
    ValueType(String),
    /// Reference type by full name
    Class(String),
    /// Generic parameter of the declaring type, by position
    GenericParamType(u32),
    /// Generic parameter of the method, by position
    GenericParamMethod(u32),
    /// Instantiation of a generic type with the given arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// Single-dimensional, zero-based array
    SzArray(Box<TypeSignature>),
}

impl TypeSignature {
    /// Shorthand for a [`TypeSignature::Class`]
    #[must_use]
    pub fn class(name: &str) -> Self {
        TypeSignature::Class(name.to_string())
    }

    /// Shorthand for a [`TypeSignature::ValueType`]
    #[must_use]
    pub fn value_type(name: &str) -> Self {
        TypeSignature::ValueType(name.to_string())
    }

    /// Every named type that appears anywhere in this signature, in encounter order.
    ///
    /// ```rust
    /// use refasm::metadata::signatures::TypeSignature;
    ///
    /// let list = TypeSignature::GenericInst(
    ///     Box::new(TypeSignature::class("System.Collections.Generic.List`1")),
    ///     vec![TypeSignature::SzArray(Box::new(TypeSignature::value_type("Lib.Point")))],
    /// );
    /// assert_eq!(
    ///     list.referenced_types(),
    ///     vec!["System.Collections.Generic.List`1", "Lib.Point"]
    /// );
    /// ```
    #[must_use]
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.walk_names(&mut |name| {
            names.push(name);
            false
        });
        names
    }

    /// Whether any named type inside this signature satisfies `predicate`
    pub fn any_type(&self, predicate: &impl Fn(&str) -> bool) -> bool {
        self.walk_names(&mut |name| predicate(name))
    }

    /// Visit every named type depth-first until `visit` returns `true`.
    fn walk_names<'a>(&'a self, visit: &mut impl FnMut(&'a str) -> bool) -> bool {
        match self {
            TypeSignature::Class(name) | TypeSignature::ValueType(name) => visit(name),
            TypeSignature::Ptr(inner)
            | TypeSignature::ByRef(inner)
            | TypeSignature::SzArray(inner) => inner.walk_names(visit),
            TypeSignature::GenericInst(base, args) => {
                base.walk_names(visit) || args.iter().any(|arg| arg.walk_names(visit))
            }
            _ => false,
        }
    }
}

/// A method signature: calling convention, return type and ordered parameter types.
///
/// By-reference parameters are expressed as [`TypeSignature::ByRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    /// Instance method
    pub has_this: bool,
    /// `this` is passed explicitly as the first parameter
    pub explicit_this: bool,
    /// Number of generic parameters of the method
    pub generic_param_count: u32,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameter types in declaration order
    pub params: Vec<TypeSignature>,
}

impl MethodSignature {
    /// A static method signature
    #[must_use]
    pub fn new_static(return_type: TypeSignature, params: Vec<TypeSignature>) -> Self {
        MethodSignature {
            has_this: false,
            explicit_this: false,
            generic_param_count: 0,
            return_type,
            params,
        }
    }

    /// An instance method signature
    #[must_use]
    pub fn new_instance(return_type: TypeSignature, params: Vec<TypeSignature>) -> Self {
        MethodSignature {
            has_this: true,
            ..Self::new_static(return_type, params)
        }
    }
}

impl Default for MethodSignature {
    fn default() -> Self {
        Self::new_instance(TypeSignature::Void, Vec::new())
    }
}
