//! Removal of inaccessible types.

use log::debug;

use crate::{
    metadata::typesystem::CilType,
    refgen::{classifier::is_eligible, context::GenerationContext},
};

/// Remove every inaccessible type from the tree and record it in `ctx.removed`.
///
/// The walk is depth-first. A removed type is cleared and dropped from its parent's list
/// together with everything nested in it; its nested types are not visited since the
/// removed-type set covers them through their enclosing name. The top-level global type is
/// cleared but kept as an empty shell.
pub fn prune(types: &mut Vec<CilType>, ctx: &mut GenerationContext<'_>) {
    prune_level(types, None, ctx);
}

fn prune_level(types: &mut Vec<CilType>, parent: Option<&str>, ctx: &mut GenerationContext<'_>) {
    let mut retained = Vec::with_capacity(types.len());

    for mut cil_type in std::mem::take(types) {
        let fullname = match parent {
            Some(parent) => cil_type.nested_fullname(parent),
            None => cil_type.fullname(),
        };

        if is_eligible(&cil_type, ctx.config.keep_non_public) {
            prune_level(&mut cil_type.nested_types, Some(&fullname), ctx);
            retained.push(cil_type);
            continue;
        }

        let keep_shell = parent.is_none() && cil_type.is_global_module_type();
        if !keep_shell {
            ctx.stats.removed_types += 1 + count_nested(&cil_type.nested_types);
        }

        debug!("Removed type {}", fullname);
        cil_type.clear();
        ctx.removed.insert(fullname);

        if keep_shell {
            retained.push(cil_type);
        }
    }

    *types = retained;
}

fn count_nested(types: &[CilType]) -> usize {
    types
        .iter()
        .map(|nested| 1 + count_nested(&nested.nested_types))
        .sum()
}
