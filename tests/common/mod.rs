//! Builders shared by the integration tests.
#![allow(dead_code)]

use refasm::prelude::*;

/// Non-trivial IL: ldarg.0; ldc.i4.1; add; pop; ret
pub const SAMPLE_IL: [u8; 5] = [0x02, 0x17, 0x58, 0x26, 0x2A];

/// Fluent builder for a [`CilType`].
pub struct TypeBuilder {
    cil_type: CilType,
}

impl TypeBuilder {
    pub fn public(namespace: &str, name: &str) -> Self {
        TypeBuilder {
            cil_type: CilType::new(namespace, name, TypeAttributes::PUBLIC),
        }
    }

    pub fn internal(namespace: &str, name: &str) -> Self {
        TypeBuilder {
            cil_type: CilType::new(namespace, name, TypeAttributes::NOT_PUBLIC),
        }
    }

    pub fn nested(name: &str, flags: u32) -> Self {
        TypeBuilder {
            cil_type: CilType::new("", name, flags),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.cil_type.methods.push(method);
        self
    }

    pub fn field(mut self, name: &str, flags: u32, signature: TypeSignature) -> Self {
        self.cil_type.fields.push(Field::new(name, flags, signature));
        self
    }

    pub fn property(mut self, property: Property) -> Self {
        self.cil_type.properties.push(property);
        self
    }

    pub fn event(mut self, event: Event) -> Self {
        self.cil_type.events.push(event);
        self
    }

    pub fn nested_type(mut self, nested: CilType) -> Self {
        self.cil_type.nested_types.push(nested);
        self
    }

    pub fn attribute(mut self, attribute_type: &str) -> Self {
        self.cil_type
            .custom_attributes
            .push(CustomAttribute::marker(attribute_type));
        self
    }

    pub fn build(self) -> CilType {
        self.cil_type
    }
}

/// A method with [`SAMPLE_IL`] as its body
pub fn method(name: &str, access: MethodAccessFlags, signature: MethodSignature) -> Method {
    let mut method = Method::new(name, access.bits(), signature);
    method.body = Some(MethodBody::from_code(SAMPLE_IL.to_vec()));
    method
}

/// A public instance method with [`SAMPLE_IL`] as its body
pub fn public_method(name: &str, params: Vec<TypeSignature>, ret: TypeSignature) -> Method {
    method(
        name,
        MethodAccessFlags::PUBLIC,
        MethodSignature::new_instance(ret, params),
    )
}

/// A module holding `types` after the global type
pub fn module_with(types: Vec<CilType>) -> Module {
    let mut module = Module::new("Scenario.dll");
    module.assembly = Some(Assembly::new("Scenario"));
    module.types.extend(types);
    module
}

/// Every method in the module, accessors included
pub fn all_methods(module: &Module) -> Vec<&Method> {
    fn collect<'a>(types: &'a [CilType], methods: &mut Vec<&'a Method>) {
        for cil_type in types {
            methods.extend(cil_type.methods.iter());
            for property in &cil_type.properties {
                methods.extend(property.accessors());
            }
            for event in &cil_type.events {
                methods.extend(event.accessors());
            }
            collect(&cil_type.nested_types, methods);
        }
    }

    let mut methods = Vec::new();
    collect(&module.types, &mut methods);
    methods
}
