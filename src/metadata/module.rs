//! The loaded module: the root of the metadata graph.
//!
//! [`Module`] is loaded once from an image, mutated in place and written once. Loading and
//! writing go through the image codec in [`crate::metadata::image`]; writing to disk goes
//! through [`crate::file::output::Output`], so the target only appears once the whole image
//! has been written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use refasm::metadata::module::Module;
//! use std::path::Path;
//!
//! let module = Module::from_file(Path::new("Library.refmd"))?;
//! for ty in &module.types {
//!     println!("{} ({} methods)", ty.fullname(), ty.methods.len());
//! }
//! # Ok::<(), refasm::Error>(())
//! ```

use std::path::Path;

use crate::{
    file::{output::Output, File},
    metadata::{
        cor20header::{CorFlags, VTableFixup},
        customattributes::CustomAttribute,
        image,
        typesystem::CilType,
    },
    Result,
};

#[allow(non_snake_case)]
/// Flags for `AssemblyFlags` (II.23.1.2)
pub mod AssemblyFlags {
    /// The assembly holds the full (unhashed) public key
    pub const PUBLIC_KEY: u32 = 0x0001;
    /// The implementation used at runtime may differ from the one seen at compile time
    pub const RETARGETABLE: u32 = 0x0100;
    /// Reserved
    pub const DISABLE_JIT_COMPILE_OPTIMIZER: u32 = 0x4000;
    /// Reserved
    pub const ENABLE_JIT_COMPILE_TRACKING: u32 = 0x8000;
}

/// Identity of the assembly a module belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    /// Simple name of the assembly
    pub name: String,
    /// Major version
    pub major_version: u16,
    /// Minor version
    pub minor_version: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
    /// `AssemblyFlags`
    pub flags: u32,
    /// Public key blob, empty if the assembly is not strong named
    pub public_key: Vec<u8>,
    /// Assembly level custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
}

impl Assembly {
    /// Create an unsigned assembly identity with version 1.0.0.0
    #[must_use]
    pub fn new(name: &str) -> Assembly {
        Assembly {
            name: name.to_string(),
            major_version: 1,
            minor_version: 0,
            build_number: 0,
            revision_number: 0,
            flags: 0,
            public_key: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }

    /// Whether a public key is present
    #[must_use]
    pub fn has_public_key(&self) -> bool {
        !self.public_key.is_empty() || self.flags & AssemblyFlags::PUBLIC_KEY != 0
    }

    /// Drop the public key and the flag announcing it
    pub fn clear_public_key(&mut self) {
        self.public_key.clear();
        self.flags &= !AssemblyFlags::PUBLIC_KEY;
    }
}

/// A module and everything it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Module name, e.g. `Library.dll`
    pub name: String,
    /// Assembly identity, present for the manifest module
    pub assembly: Option<Assembly>,
    /// Runtime flags from the CLR header
    pub cor_flags: CorFlags,
    /// VTable fixups for unmanaged exports
    pub vtable_fixups: Vec<VTableFixup>,
    /// Module level custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Top-level types in declaration order, the global type first
    pub types: Vec<CilType>,
}

impl Module {
    /// Create an IL-only module containing only the global `<Module>` type
    #[must_use]
    pub fn new(name: &str) -> Module {
        Module {
            name: name.to_string(),
            assembly: None,
            cor_flags: CorFlags::IL_ONLY,
            vtable_fixups: Vec::new(),
            custom_attributes: Vec::new(),
            types: vec![CilType::global()],
        }
    }

    /// Load a module image from disk. The file is memory-mapped while it is decoded.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened, [`crate::Error::Empty`]
    /// for an empty file, and [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] if
    /// the image is damaged.
    pub fn from_file(path: &Path) -> Result<Module> {
        let input = File::from_file(path)?;
        image::read(input.data())
    }

    /// Load a module image from memory.
    ///
    /// # Errors
    /// As [`Module::from_file`], minus the filesystem errors.
    pub fn from_mem(data: Vec<u8>) -> Result<Module> {
        let input = File::from_mem(data)?;
        image::read(input.data())
    }

    /// Serialize the module into an image.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the graph contains something the image format
    /// cannot express, such as an unnamed type reference.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        image::write(self)
    }

    /// Serialize the module and atomically write it to `path`.
    ///
    /// # Errors
    /// As [`Module::to_bytes`], plus [`crate::Error::WriteFailed`] if the output cannot be
    /// written. A pre-existing file at `path` is left untouched on failure.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;

        let mut output = Output::create(path, bytes.len() as u64)?;
        output.write_at(0, &bytes)?;
        output.finalize()
    }

    /// The global `<Module>` type, if present
    #[must_use]
    pub fn global_type(&self) -> Option<&CilType> {
        self.types.iter().find(|ty| ty.is_global_module_type())
    }

    /// Find a type by its fully-qualified name, nested types as `Outer/Inner`
    #[must_use]
    pub fn find_type(&self, fullname: &str) -> Option<&CilType> {
        let mut segments = fullname.split('/');
        let top = segments.next()?;

        let mut current = self.types.iter().find(|ty| ty.fullname() == top)?;
        for segment in segments {
            current = current
                .nested_types
                .iter()
                .find(|nested| nested.name == segment)?;
        }

        Some(current)
    }

    /// Number of types in the module, nested types included
    #[must_use]
    pub fn type_count(&self) -> usize {
        fn count(types: &[CilType]) -> usize {
            types.len() + types.iter().map(|ty| count(&ty.nested_types)).sum::<usize>()
        }

        count(&self.types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::TypeAttributes;

    fn sample() -> Module {
        let mut module = Module::new("Lib.dll");

        let mut outer = CilType::new("Lib", "Outer", TypeAttributes::PUBLIC);
        let mut inner = CilType::new("", "Inner", TypeAttributes::NESTED_PUBLIC);
        inner
            .nested_types
            .push(CilType::new("", "Deep", TypeAttributes::NESTED_PRIVATE));
        outer.nested_types.push(inner);
        module.types.push(outer);

        module
    }

    #[test]
    fn find_type() {
        let module = sample();

        assert!(module.global_type().is_some());
        assert_eq!(module.find_type("Lib.Outer").unwrap().name, "Outer");
        assert_eq!(module.find_type("Lib.Outer/Inner/Deep").unwrap().name, "Deep");
        assert!(module.find_type("Lib.Outer/Missing").is_none());
        assert!(module.find_type("Lib.outer").is_none());
        assert_eq!(module.type_count(), 4);
    }

    #[test]
    fn write_to_and_load() {
        let module = sample();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Lib.refmd");
        module.write_to(&path).unwrap();

        let loaded = Module::from_file(&path).unwrap();
        assert_eq!(loaded, module);
    }

    #[test]
    fn pe_container_is_rejected() {
        let mut data = vec![0u8; 128];
        data[..2].copy_from_slice(b"MZ");
        data[0x3C] = 0x80;

        assert!(matches!(
            Module::from_mem(data),
            Err(crate::Error::Malformed { .. })
        ));
    }

    #[test]
    fn public_key_flag() {
        let mut assembly = Assembly::new("Lib");
        assert!(!assembly.has_public_key());

        assembly.flags |= AssemblyFlags::PUBLIC_KEY;
        assert!(assembly.has_public_key());
    }
}
