//! Shared helpers for unit tests.

pub mod factories;

use crate::metadata::{
    method::{Method, MethodAccessFlags, MethodBody, MethodModifiers},
    signatures::{MethodSignature, TypeSignature},
};

/// Builder for test methods. Defaults to a public instance method returning `void` with a
/// small IL body.
pub struct MethodBuilder {
    name: String,
    access: MethodAccessFlags,
    modifiers: MethodModifiers,
    signature: MethodSignature,
    body: Option<Vec<u8>>,
}

impl MethodBuilder {
    pub fn new(name: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            access: MethodAccessFlags::PUBLIC,
            modifiers: MethodModifiers::HIDE_BY_SIG,
            signature: MethodSignature::new_instance(TypeSignature::Void, vec![]),
            // ldarg.0; pop; ldc.i4.1; pop; ret
            body: Some(vec![0x02, 0x26, 0x17, 0x26, 0x2A]),
        }
    }

    pub fn access(mut self, access: MethodAccessFlags) -> Self {
        self.access = access;
        self
    }

    pub fn returns(mut self, return_type: TypeSignature) -> Self {
        self.signature.return_type = return_type;
        self
    }

    pub fn param(mut self, param: TypeSignature) -> Self {
        self.signature.params.push(param);
        self
    }

    pub fn abstract_method(mut self) -> Self {
        self.modifiers |= MethodModifiers::ABSTRACT | MethodModifiers::VIRTUAL;
        self.body = None;
        self
    }

    pub fn build(self) -> Method {
        let mut method = Method::new(
            &self.name,
            self.access.bits() | self.modifiers.bits(),
            self.signature,
        );
        method.body = self.body.map(MethodBody::from_code);
        method
    }
}
