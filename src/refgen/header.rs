//! Module level normalization of a reference module.

use log::warn;

use crate::{
    metadata::{cor20header::CorFlags, module::Module},
    refgen::{context::GenerationContext, scrubber::scrub},
};

/// Clear everything at module level that only makes sense for an executable image.
///
/// Marks the module IL-only, drops the strong name signature flag, the native entry point and
/// all VTable fixups, removes the assembly public key, and scrubs module and assembly
/// attributes.
pub fn normalize(module: &mut Module, ctx: &mut GenerationContext<'_>) {
    if !module.cor_flags.contains(CorFlags::IL_ONLY) {
        warn!("Module {} was not IL-only, marking it as such", module.name);
    }
    if module.cor_flags.contains(CorFlags::NATIVE_ENTRYPOINT) {
        warn!("Dropping native entry point of {}", module.name);
    }

    module.cor_flags.insert(CorFlags::IL_ONLY);
    module
        .cor_flags
        .remove(CorFlags::STRONG_NAME_SIGNED | CorFlags::NATIVE_ENTRYPOINT);

    if !module.vtable_fixups.is_empty() {
        warn!(
            "Dropping {} VTable fixups of {}",
            module.vtable_fixups.len(),
            module.name
        );
        module.vtable_fixups.clear();
    }

    ctx.stats.scrubbed_attributes += scrub(&mut module.custom_attributes, &ctx.removed);

    if let Some(assembly) = module.assembly.as_mut() {
        if assembly.has_public_key() {
            warn!("Removing public key of assembly {}", assembly.name);
        }
        assembly.clear_public_key();
        ctx.stats.scrubbed_attributes += scrub(&mut assembly.custom_attributes, &ctx.removed);
    }
}
