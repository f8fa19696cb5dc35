//! Custom attribute removal.

use crate::{metadata::customattributes::CustomAttribute, refgen::RemovedTypes};

/// Drop every attribute whose type was removed, returning how many were dropped.
pub fn scrub(attributes: &mut Vec<CustomAttribute>, removed: &RemovedTypes) -> usize {
    if removed.is_empty() {
        return 0;
    }

    let before = attributes.len();
    attributes.retain(|attribute| !removed.contains(&attribute.attribute_type));
    before - attributes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_removed_attribute_types() {
        let mut removed = RemovedTypes::new();
        removed.insert("Lib.InternalMarkerAttribute".to_string());
        removed.insert("Lib.Outer".to_string());

        let mut attributes = vec![
            CustomAttribute::marker("Lib.InternalMarkerAttribute"),
            CustomAttribute::marker("System.ObsoleteAttribute"),
            CustomAttribute::marker("Lib.Outer/NestedAttribute"),
            CustomAttribute::marker("lib.internalmarkerattribute"),
        ];

        assert_eq!(scrub(&mut attributes, &removed), 2);

        let remaining: Vec<&str> = attributes
            .iter()
            .map(|attribute| attribute.attribute_type.as_str())
            .collect();
        assert_eq!(
            remaining,
            ["System.ObsoleteAttribute", "lib.internalmarkerattribute"]
        );
    }

    #[test]
    fn nothing_removed() {
        let mut attributes = vec![CustomAttribute::marker("System.ObsoleteAttribute")];
        assert_eq!(scrub(&mut attributes, &RemovedTypes::new()), 0);
        assert_eq!(attributes.len(), 1);
    }
}
