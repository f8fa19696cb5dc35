//! Visibility based eligibility.

use crate::metadata::{members::Field, method::Method, typesystem::CilType};

/// Entities with an accessibility that decides whether they belong to the public surface.
pub trait Accessible {
    /// Whether the entity is visible outside its assembly
    fn is_accessible(&self) -> bool;
}

impl Accessible for CilType {
    /// `public` and `nested public` types. The global `<Module>` type never is.
    fn is_accessible(&self) -> bool {
        !self.is_global_module_type() && self.is_public()
    }
}

impl Accessible for Method {
    fn is_accessible(&self) -> bool {
        self.is_public()
    }
}

impl Accessible for Field {
    fn is_accessible(&self) -> bool {
        self.is_public()
    }
}

/// Whether `entity` may be retained on visibility grounds alone.
///
/// ```rust
/// use refasm::{
///     metadata::typesystem::{CilType, TypeAttributes},
///     refgen::is_eligible,
/// };
///
/// let internal = CilType::new("Lib", "Helper", TypeAttributes::NOT_PUBLIC);
/// assert!(!is_eligible(&internal, false));
/// assert!(is_eligible(&internal, true));
/// ```
#[must_use]
pub fn is_eligible(entity: &impl Accessible, keep_non_public: bool) -> bool {
    keep_non_public || entity.is_accessible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        members::FieldAttributes,
        method::MethodAccessFlags,
        signatures::{MethodSignature, TypeSignature},
        typesystem::TypeAttributes,
    };

    fn method(access: MethodAccessFlags) -> Method {
        Method::new("M", access.bits(), MethodSignature::default())
    }

    #[test]
    fn types() {
        let public = CilType::new("Lib", "A", TypeAttributes::PUBLIC);
        let nested_public = CilType::new("", "B", TypeAttributes::NESTED_PUBLIC);
        let nested_family = CilType::new("", "C", TypeAttributes::NESTED_FAMILY);
        let global = CilType::global();

        assert!(is_eligible(&public, false));
        assert!(is_eligible(&nested_public, false));
        assert!(!is_eligible(&nested_family, false));
        assert!(!is_eligible(&global, false));
        assert!(is_eligible(&global, true));

        // Even a global type flagged public is treated as non-public
        let mut odd_global = CilType::global();
        odd_global.flags = TypeAttributes::PUBLIC;
        assert!(!is_eligible(&odd_global, false));
    }

    #[test]
    fn members() {
        assert!(is_eligible(&method(MethodAccessFlags::PUBLIC), false));
        assert!(!is_eligible(&method(MethodAccessFlags::FAMILY), false));
        assert!(is_eligible(&method(MethodAccessFlags::PRIVATE), true));

        assert!(!is_eligible(
            &Field::new("f", FieldAttributes::ASSEMBLY, TypeSignature::I4),
            false
        ));
        assert!(is_eligible(
            &Field::new("f", FieldAttributes::PUBLIC, TypeSignature::I4),
            false
        ));
    }
}
