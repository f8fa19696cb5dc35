//! Per-member retention, body purging and attribute scrubbing over the pruned type tree.

use log::debug;

use crate::{
    metadata::{
        members::{Event, Field, Property},
        method::Method,
        signatures::TypeSignature,
        typesystem::CilType,
    },
    refgen::{
        classifier::is_eligible, context::GenerationContext, purger::purge, scrubber::scrub,
    },
};

/// The member kinds that share one retention rule.
#[derive(Debug, Clone, Copy)]
pub enum MemberKind<'m> {
    /// A method owned directly by a type
    Method(&'m Method),
    /// A field
    Field(&'m Field),
    /// A property or event accessor, with the type of its owner
    Accessor {
        /// The accessor method
        method: &'m Method,
        /// Effective property type or event type, if known
        owner_type: Option<&'m TypeSignature>,
    },
}

/// Whether `member` has to be removed given the finalized removed-type set.
///
/// Methods are removed if they are not eligible or a parameter type references a removed type.
/// The return type is considered only with `cascade_return_types`. Fields are removed if they
/// are not eligible or their type references a removed type. Accessors follow the method rule
/// and are additionally removed if their owner's type references a removed type.
#[must_use]
pub fn should_remove(member: MemberKind<'_>, ctx: &GenerationContext<'_>) -> bool {
    match member {
        MemberKind::Method(method) => method_removed(method, ctx),
        MemberKind::Field(field) => {
            ctx.removed.references(&field.signature)
                || !is_eligible(field, ctx.config.keep_non_public)
        }
        MemberKind::Accessor { method, owner_type } => {
            owner_type.is_some_and(|owner| ctx.removed.references(owner))
                || method_removed(method, ctx)
        }
    }
}

fn method_removed(method: &Method, ctx: &GenerationContext<'_>) -> bool {
    let signature = &method.signature;

    signature
        .params
        .iter()
        .any(|param| ctx.removed.references(param))
        || (ctx.config.cascade_return_types && ctx.removed.references(&signature.return_type))
        || !is_eligible(method, ctx.config.keep_non_public)
}

/// Filter the members of every type in `types`, nested types included.
///
/// Must run after pruning so that the removed-type set is complete. Retained methods and
/// accessors are purged, and every retained entity has its attributes scrubbed.
pub fn filter_members(types: &mut [CilType], ctx: &mut GenerationContext<'_>) {
    for cil_type in types {
        ctx.stats.scrubbed_attributes += scrub(&mut cil_type.custom_attributes, &ctx.removed);

        filter_methods(&mut cil_type.methods, ctx);
        filter_fields(&mut cil_type.fields, ctx);
        filter_properties(&mut cil_type.properties, ctx);
        filter_events(&mut cil_type.events, ctx);

        filter_members(&mut cil_type.nested_types, ctx);
    }
}

fn filter_methods(methods: &mut Vec<Method>, ctx: &mut GenerationContext<'_>) {
    let mut retained = Vec::with_capacity(methods.len());

    for mut method in std::mem::take(methods) {
        if should_remove(MemberKind::Method(&method), ctx) {
            debug!("Removed method {}", method.name);
            ctx.stats.removed_methods += 1;
            continue;
        }

        finish_method(&mut method, ctx);
        retained.push(method);
    }

    *methods = retained;
}

fn filter_fields(fields: &mut Vec<Field>, ctx: &mut GenerationContext<'_>) {
    let mut retained = Vec::with_capacity(fields.len());

    for mut field in std::mem::take(fields) {
        if should_remove(MemberKind::Field(&field), ctx) {
            debug!("Removed field {}", field.name);
            ctx.stats.removed_fields += 1;
            continue;
        }

        ctx.stats.scrubbed_attributes += scrub(&mut field.custom_attributes, &ctx.removed);
        retained.push(field);
    }

    *fields = retained;
}

fn filter_properties(properties: &mut Vec<Property>, ctx: &mut GenerationContext<'_>) {
    let mut retained = Vec::with_capacity(properties.len());

    for mut property in std::mem::take(properties) {
        let owner_type = property.effective_type().cloned();

        property.getter = filter_accessor(property.getter.take(), owner_type.as_ref(), ctx);
        property.setter = filter_accessor(property.setter.take(), owner_type.as_ref(), ctx);

        if property.is_empty() {
            debug!("Removed property {}", property.name);
            ctx.stats.removed_properties += 1;
            continue;
        }

        ctx.stats.scrubbed_attributes += scrub(&mut property.custom_attributes, &ctx.removed);
        retained.push(property);
    }

    *properties = retained;
}

fn filter_events(events: &mut Vec<Event>, ctx: &mut GenerationContext<'_>) {
    let mut retained = Vec::with_capacity(events.len());

    for mut event in std::mem::take(events) {
        let owner_type = Some(&event.event_type);

        event.add = filter_accessor(event.add.take(), owner_type, ctx);
        event.remove = filter_accessor(event.remove.take(), owner_type, ctx);
        event.invoke = filter_accessor(event.invoke.take(), owner_type, ctx);

        let others = std::mem::take(&mut event.others);
        event.others = others
            .into_iter()
            .filter_map(|other| filter_accessor(Some(other), owner_type, ctx))
            .collect();

        if event.is_empty() {
            debug!("Removed event {}", event.name);
            ctx.stats.removed_events += 1;
            continue;
        }

        ctx.stats.scrubbed_attributes += scrub(&mut event.custom_attributes, &ctx.removed);
        retained.push(event);
    }

    *events = retained;
}

fn filter_accessor(
    accessor: Option<Method>,
    owner_type: Option<&TypeSignature>,
    ctx: &mut GenerationContext<'_>,
) -> Option<Method> {
    let mut method = accessor?;

    let member = MemberKind::Accessor {
        method: &method,
        owner_type,
    };
    if should_remove(member, ctx) {
        debug!("Removed accessor {}", method.name);
        ctx.stats.removed_methods += 1;
        return None;
    }

    finish_method(&mut method, ctx);
    Some(method)
}

fn finish_method(method: &mut Method, ctx: &mut GenerationContext<'_>) {
    ctx.stats.scrubbed_attributes += scrub(&mut method.custom_attributes, &ctx.removed);

    if purge(method, ctx.config.stub) {
        ctx.stats.purged_bodies += 1;
    } else {
        ctx.stats.skipped_bodies += 1;
    }
}
