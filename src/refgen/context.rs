//! Run-scoped state shared by the generation stages.

use std::{collections::BTreeSet, fmt};

use crate::{metadata::signatures::TypeSignature, refgen::GeneratorConfig};

/// Fully-qualified names of every type removed during a run.
///
/// Entries are only ever added. A name counts as removed if it equals an entry or is nested
/// inside one, so `Lib.Hidden/Inner` is covered by `Lib.Hidden` without being recorded.
/// Comparison is case-sensitive.
///
/// # Examples
///
/// ```rust
/// use refasm::refgen::RemovedTypes;
///
/// let mut removed = RemovedTypes::new();
/// removed.insert("Lib.Hidden".to_string());
///
/// assert!(removed.contains("Lib.Hidden"));
/// assert!(removed.contains("Lib.Hidden/Inner/Deep"));
/// assert!(!removed.contains("Lib.HiddenOther"));
/// assert!(!removed.contains("lib.hidden"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedTypes {
    names: BTreeSet<String>,
}

impl RemovedTypes {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a removed type. Returns `false` if it was already present.
    pub fn insert(&mut self, fullname: String) -> bool {
        self.names.insert(fullname)
    }

    /// Whether `fullname` or one of its enclosing types was removed
    #[must_use]
    pub fn contains(&self, fullname: &str) -> bool {
        let mut candidate = fullname;
        loop {
            if self.names.contains(candidate) {
                return true;
            }

            match candidate.rfind('/') {
                Some(separator) => candidate = &candidate[..separator],
                None => return false,
            }
        }
    }

    /// Whether any named type inside `signature` was removed
    #[must_use]
    pub fn references(&self, signature: &TypeSignature) -> bool {
        !self.names.is_empty() && signature.any_type(&|name| self.contains(name))
    }

    /// Number of recorded entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether nothing was removed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Recorded entries in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Types removed, nested types of removed types included
    pub removed_types: usize,
    /// Methods and accessors removed
    pub removed_methods: usize,
    /// Fields removed
    pub removed_fields: usize,
    /// Properties dropped because both accessors were removed
    pub removed_properties: usize,
    /// Events dropped because every accessor was removed
    pub removed_events: usize,
    /// Bodies replaced by a stub
    pub purged_bodies: usize,
    /// Retained methods without an IL body
    pub skipped_bodies: usize,
    /// Custom attributes removed because their type was removed
    pub scrubbed_attributes: usize,
}

impl fmt::Display for GenerationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed {} types, {} methods, {} fields, {} properties, {} events; \
             purged {} bodies ({} skipped); scrubbed {} attributes",
            self.removed_types,
            self.removed_methods,
            self.removed_fields,
            self.removed_properties,
            self.removed_events,
            self.purged_bodies,
            self.skipped_bodies,
            self.scrubbed_attributes
        )
    }
}

/// State threaded through one generation run.
pub struct GenerationContext<'a> {
    /// Active configuration
    pub config: &'a GeneratorConfig,
    /// Types removed so far; complete once pruning has finished
    pub removed: RemovedTypes,
    /// Counters
    pub stats: GenerationStats,
}

impl<'a> GenerationContext<'a> {
    /// Create a context with nothing removed yet
    #[must_use]
    pub fn new(config: &'a GeneratorConfig) -> Self {
        GenerationContext {
            config,
            removed: RemovedTypes::new(),
            stats: GenerationStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_prefix_rule() {
        let mut removed = RemovedTypes::new();
        assert!(removed.insert("Lib.Outer/Hidden".to_string()));
        assert!(!removed.insert("Lib.Outer/Hidden".to_string()));

        assert!(!removed.contains("Lib.Outer"));
        assert!(removed.contains("Lib.Outer/Hidden"));
        assert!(removed.contains("Lib.Outer/Hidden/Deeper"));
        assert!(!removed.contains("Lib.Outer/HiddenToo"));
        assert!(!removed.contains("Lib.Outer/Visible"));
        assert_eq!(removed.len(), 1);
    }

    #[test]
    fn references() {
        let mut removed = RemovedTypes::new();
        let sig = TypeSignature::SzArray(Box::new(TypeSignature::GenericInst(
            Box::new(TypeSignature::class("System.Collections.Generic.List`1")),
            vec![TypeSignature::value_type("Lib.Secret/Part")],
        )));
        assert!(!removed.references(&sig));

        removed.insert("Lib.Secret".to_string());
        assert!(removed.references(&sig));
        assert!(!removed.references(&TypeSignature::class("Lib.Public")));
        assert!(!removed.references(&TypeSignature::I4));
    }

    #[test]
    fn stats_display() {
        let stats = GenerationStats {
            removed_types: 2,
            purged_bodies: 5,
            ..GenerationStats::default()
        };
        let text = stats.to_string();
        assert!(text.starts_with("removed 2 types"));
        assert!(text.contains("purged 5 bodies (0 skipped)"));
    }
}
