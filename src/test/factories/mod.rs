//! Factory methods for test modules.

use crate::{
    metadata::{
        customattributes::CustomAttribute,
        members::{Event, Field, FieldAttributes, Property},
        method::MethodAccessFlags,
        module::Module,
        signatures::TypeSignature,
        typesystem::{CilType, TypeAttributes},
    },
    test::MethodBuilder,
};

/// Internal type referenced from the public surface of [`scenario_module`]
pub const SECRET_TYPE: &str = "Lib.Secret";

/// Internal attribute type applied throughout [`scenario_module`]
pub const SECRET_ATTRIBUTE: &str = "Lib.InternalTagAttribute";

/// A module exercising every cascade path:
///
/// - `<Module>` with an internal static field and a free function
/// - `Lib.Api` (public) with members referencing `Lib.Secret` through parameters, return
///   types, field types, a property type and an event type, plus a public and a private
///   nested type
/// - `Lib.Secret` and `Lib.InternalTagAttribute` (internal)
pub fn scenario_module() -> Module {
    let secret = || TypeSignature::class(SECRET_TYPE);

    let mut module = Module::new("Lib.dll");

    let global = &mut module.types[0];
    global.fields.push(Field::new(
        "s_counter",
        FieldAttributes::ASSEMBLY | FieldAttributes::STATIC,
        TypeSignature::I4,
    ));
    global.methods.push(
        MethodBuilder::new("Init")
            .access(MethodAccessFlags::ASSEM)
            .build(),
    );

    let mut api = CilType::new("Lib", "Api", TypeAttributes::PUBLIC);
    api.custom_attributes
        .push(CustomAttribute::marker(SECRET_ATTRIBUTE));
    api.custom_attributes
        .push(CustomAttribute::marker("System.SerializableAttribute"));

    api.methods.push(MethodBuilder::new("Run").build());
    api.methods
        .push(MethodBuilder::new("Accept").param(secret()).build());
    api.methods
        .push(MethodBuilder::new("Produce").returns(secret()).build());
    api.methods.push(
        MethodBuilder::new("Helper")
            .access(MethodAccessFlags::PRIVATE)
            .build(),
    );
    api.methods
        .push(MethodBuilder::new("Shape").abstract_method().build());

    api.fields
        .push(Field::new("Count", FieldAttributes::PUBLIC, TypeSignature::I4));
    api.fields.push(Field::new(
        "_secrets",
        FieldAttributes::PRIVATE,
        TypeSignature::SzArray(Box::new(secret())),
    ));
    api.fields.push(Field::new(
        "Leak",
        FieldAttributes::PUBLIC,
        TypeSignature::GenericInst(
            Box::new(TypeSignature::class("System.Collections.Generic.List`1")),
            vec![secret()],
        ),
    ));

    let mut name = Property::new("Name");
    name.getter = Some(
        MethodBuilder::new("get_Name")
            .returns(TypeSignature::String)
            .build(),
    );
    name.setter = Some(
        MethodBuilder::new("set_Name")
            .access(MethodAccessFlags::PRIVATE)
            .param(TypeSignature::String)
            .build(),
    );
    api.properties.push(name);

    let mut hidden = Property::new("Hidden");
    hidden.getter = Some(MethodBuilder::new("get_Hidden").returns(secret()).build());
    api.properties.push(hidden);

    let handler = TypeSignature::class("System.EventHandler");
    let mut changed = Event::new("Changed", handler.clone());
    changed.add = Some(MethodBuilder::new("add_Changed").param(handler.clone()).build());
    changed.remove = Some(MethodBuilder::new("remove_Changed").param(handler).build());
    api.events.push(changed);

    let mut leaked = Event::new("Leaked", secret());
    leaked.add = Some(MethodBuilder::new("add_Leaked").param(secret()).build());
    api.events.push(leaked);

    let mut options = CilType::new("", "Options", TypeAttributes::NESTED_PUBLIC);
    options
        .fields
        .push(Field::new("Verbose", FieldAttributes::PUBLIC, TypeSignature::Boolean));
    api.nested_types.push(options);

    let mut state = CilType::new("", "State", TypeAttributes::NESTED_PRIVATE);
    state
        .nested_types
        .push(CilType::new("", "Inner", TypeAttributes::NESTED_PUBLIC));
    api.nested_types.push(state);

    module.types.push(api);

    let mut secret_type = CilType::new("Lib", "Secret", TypeAttributes::NOT_PUBLIC);
    secret_type.methods.push(MethodBuilder::new("Open").build());
    module.types.push(secret_type);

    module.types.push(CilType::new(
        "Lib",
        "InternalTagAttribute",
        TypeAttributes::NOT_PUBLIC | TypeAttributes::SEALED,
    ));

    module
}
