//! Reference module generation.
//!
//! A reference module keeps the public API surface of a module (types, public members and
//! their signatures) while removing everything else and replacing method bodies with a
//! minimal stub. No retained entity references a removed type.
//!
//! # Pipeline
//!
//! 1. [`pruner`] removes inaccessible types and records them in [`RemovedTypes`]
//! 2. [`filter`] decides per member, purges retained bodies ([`purger`]) and scrubs
//!    attributes ([`scrubber`])
//! 3. [`header`] normalizes CLR flags and the assembly identity
//!
//! The member pass only starts after pruning has finished, so every member decision sees the
//! complete removed-type set.
//!
//! # Examples
//!
//! ```rust
//! use refasm::{
//!     metadata::{
//!         module::Module,
//!         typesystem::{CilType, TypeAttributes},
//!     },
//!     refgen::{GeneratorConfig, ReferenceGenerator},
//! };
//!
//! let mut module = Module::new("Lib.dll");
//! module.types.push(CilType::new("Lib", "Api", TypeAttributes::PUBLIC));
//! module.types.push(CilType::new("Lib", "Impl", TypeAttributes::NOT_PUBLIC));
//!
//! let stats = ReferenceGenerator::new(GeneratorConfig::default()).generate(&mut module);
//!
//! assert_eq!(stats.removed_types, 1);
//! assert!(module.find_type("Lib.Impl").is_none());
//! ```

pub mod classifier;
pub mod config;
pub mod context;
pub mod filter;
pub mod header;
pub mod job;
pub mod pruner;
pub mod purger;
pub mod scrubber;

pub use classifier::{is_eligible, Accessible};
pub use config::{GeneratorConfig, StubKind};
pub use context::{GenerationContext, GenerationStats, RemovedTypes};
pub use filter::{should_remove, MemberKind};
pub use job::{default_output_path, JobSummary, ReferenceJob, REFERENCE_SUFFIX};
pub use purger::purge;

use log::info;

use crate::metadata::module::Module;

/// Turns a loaded module into its reference form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceGenerator {
    config: GeneratorConfig,
}

impl ReferenceGenerator {
    /// Create a generator with `config`
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        ReferenceGenerator { config }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Rewrite `module` in place and return what was done.
    pub fn generate(&self, module: &mut Module) -> GenerationStats {
        let mut ctx = GenerationContext::new(&self.config);

        pruner::prune(&mut module.types, &mut ctx);
        filter::filter_members(&mut module.types, &mut ctx);
        header::normalize(module, &mut ctx);

        info!("Generated reference module {}: {}", module.name, ctx.stats);
        ctx.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::factories::{scenario_module, SECRET_TYPE};

    #[test]
    fn generate_is_idempotent() {
        let generator = ReferenceGenerator::new(GeneratorConfig::default());

        let mut module = scenario_module();
        generator.generate(&mut module);
        let once = module.clone();

        let stats = generator.generate(&mut module);
        assert_eq!(module, once);
        assert_eq!(stats.removed_types, 0);
        assert_eq!(stats.removed_methods, 0);
    }

    #[test]
    fn keep_non_public_only_cascades() {
        let generator = ReferenceGenerator::new(GeneratorConfig::full());

        let mut module = scenario_module();
        let types_before = module.type_count();
        let stats = generator.generate(&mut module);

        assert_eq!(module.type_count(), types_before);
        assert_eq!(stats.removed_types, 0);
        assert!(module.find_type(SECRET_TYPE).is_some());
        assert!(stats.purged_bodies > 0);
    }
}
