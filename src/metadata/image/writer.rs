use crate::{
    file::parser::write_compressed_uint,
    metadata::{
        customattributes::CustomAttribute,
        image::{
            BLOB_STREAM, EVENT_HAS_ADD, EVENT_HAS_INVOKE, EVENT_HAS_REMOVE, PROPERTY_HAS_GETTER,
            PROPERTY_HAS_SETTER, RECORD_HEADER_SIZE, RECORD_MAJOR_VERSION, RECORD_MINOR_VERSION,
            RECORD_STREAM, STRINGS_STREAM,
        },
        members::{Event, Field, Property},
        method::Method,
        module::Module,
        root::Root,
        signatures::{encode_field_signature, encode_method_signature, encode_type_signature},
        streams::{BlobBuilder, StreamHeader, StringsBuilder},
        typesystem::CilType,
    },
    Result,
};

/// Serialize `module` into an image.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if a signature, body or name cannot be encoded, for
/// example a type reference without a name or a string containing a null byte.
///
/// # Examples
///
/// ```rust
/// use refasm::metadata::{image, module::Module};
///
/// let module = Module::new("Empty.dll");
/// let bytes = image::write(&module)?;
/// assert_eq!(&bytes[..4], b"BSJB");
/// assert_eq!(image::read(&bytes)?, module);
/// # Ok::<(), refasm::Error>(())
/// ```
pub fn write(module: &Module) -> Result<Vec<u8>> {
    let mut writer = ImageWriter::new();
    writer.module(module)?;
    writer.finish()
}

struct ImageWriter {
    records: Vec<u8>,
    strings: StringsBuilder,
    blobs: BlobBuilder,
}

impl ImageWriter {
    fn new() -> Self {
        let mut records = Vec::with_capacity(4096);
        records.extend_from_slice(&0_u32.to_le_bytes());
        records.push(RECORD_MAJOR_VERSION);
        records.push(RECORD_MINOR_VERSION);
        records.extend_from_slice(&0_u16.to_le_bytes());
        debug_assert_eq!(records.len(), RECORD_HEADER_SIZE);

        ImageWriter {
            records,
            strings: StringsBuilder::new(),
            blobs: BlobBuilder::new(),
        }
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut records = self.records;
        records.resize(align4(records.len()), 0);
        let strings = self.strings.finish();
        let blobs = self.blobs.finish();

        let streams = [
            (RECORD_STREAM, records),
            (STRINGS_STREAM, strings),
            (BLOB_STREAM, blobs),
        ];

        // The stream directory size only depends on the names, lay it out with empty entries
        // first to find where the streams start
        let mut headers: Vec<StreamHeader> = streams
            .iter()
            .map(|(name, _)| StreamHeader {
                offset: 0,
                size: 0,
                name: (*name).to_string(),
            })
            .collect();

        let mut offset = align4(Root::new(headers.clone()).encoded_size());
        for (header, (_, data)) in headers.iter_mut().zip(streams.iter()) {
            header.offset = to_u32(offset)?;
            header.size = to_u32(data.len())?;
            offset += data.len();
        }

        let root = Root::new(headers);

        let mut image = Vec::with_capacity(offset);
        root.write(&mut image);
        image.resize(align4(image.len()), 0);
        for (_, data) in &streams {
            image.extend_from_slice(data);
        }

        Ok(image)
    }

    fn u8(&mut self, value: u8) {
        self.records.push(value);
    }

    fn u16(&mut self, value: u16) {
        self.records.extend_from_slice(&value.to_le_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.records.extend_from_slice(&value.to_le_bytes());
    }

    fn count(&mut self, count: usize) -> Result<()> {
        write_compressed_uint(to_u32(count)?, &mut self.records)
    }

    fn string(&mut self, value: &str) -> Result<()> {
        let index = self.strings.add(value)?;
        write_compressed_uint(index, &mut self.records)
    }

    fn blob(&mut self, value: &[u8]) -> Result<()> {
        let index = self.blobs.add(value)?;
        write_compressed_uint(index, &mut self.records)
    }

    fn module(&mut self, module: &Module) -> Result<()> {
        self.u32(module.cor_flags.bits());
        self.string(&module.name)?;

        match &module.assembly {
            Some(assembly) => {
                self.u8(1);
                self.string(&assembly.name)?;
                self.u16(assembly.major_version);
                self.u16(assembly.minor_version);
                self.u16(assembly.build_number);
                self.u16(assembly.revision_number);
                self.u32(assembly.flags);
                self.blob(&assembly.public_key)?;
                self.attributes(&assembly.custom_attributes)?;
            }
            None => self.u8(0),
        }

        self.count(module.vtable_fixups.len())?;
        for fixup in &module.vtable_fixups {
            self.u32(fixup.rva);
            self.u16(fixup.count);
            self.u16(fixup.kind.bits());
        }

        self.attributes(&module.custom_attributes)?;

        self.count(module.types.len())?;
        for ty in &module.types {
            self.cil_type(ty)?;
        }

        Ok(())
    }

    fn cil_type(&mut self, ty: &CilType) -> Result<()> {
        self.u32(ty.token.value());
        self.u32(ty.flags);
        self.string(&ty.namespace)?;
        self.string(&ty.name)?;
        self.attributes(&ty.custom_attributes)?;

        self.count(ty.methods.len())?;
        for method in &ty.methods {
            self.method(method)?;
        }

        self.count(ty.fields.len())?;
        for field in &ty.fields {
            self.field(field)?;
        }

        self.count(ty.properties.len())?;
        for property in &ty.properties {
            self.property(property)?;
        }

        self.count(ty.events.len())?;
        for event in &ty.events {
            self.event(event)?;
        }

        self.count(ty.nested_types.len())?;
        for nested in &ty.nested_types {
            self.cil_type(nested)?;
        }

        Ok(())
    }

    fn method(&mut self, method: &Method) -> Result<()> {
        self.u32(method.token.value());
        self.u32(method.flags);
        self.u32(method.impl_flags);
        self.string(&method.name)?;

        let signature = encode_method_signature(&method.signature, &mut self.strings)?;
        self.blob(&signature)?;

        match &method.body {
            Some(body) => {
                let encoded = body.encode()?;
                self.blob(&encoded)?;
            }
            None => self.count(0)?,
        }

        self.attributes(&method.custom_attributes)
    }

    fn field(&mut self, field: &Field) -> Result<()> {
        self.u32(field.token.value());
        self.u32(field.flags);
        self.string(&field.name)?;

        let signature = encode_field_signature(&field.signature, &mut self.strings)?;
        self.blob(&signature)?;

        self.attributes(&field.custom_attributes)
    }

    fn property(&mut self, property: &Property) -> Result<()> {
        self.u32(property.token.value());
        self.u32(property.flags);
        self.string(&property.name)?;

        let mut mask = 0;
        if property.getter.is_some() {
            mask |= PROPERTY_HAS_GETTER;
        }
        if property.setter.is_some() {
            mask |= PROPERTY_HAS_SETTER;
        }
        self.u8(mask);

        for accessor in property.accessors() {
            self.method(accessor)?;
        }

        self.attributes(&property.custom_attributes)
    }

    fn event(&mut self, event: &Event) -> Result<()> {
        self.u32(event.token.value());
        self.u32(event.flags);
        self.string(&event.name)?;

        let event_type = encode_type_signature(&event.event_type, &mut self.strings)?;
        self.blob(&event_type)?;

        let mut mask = 0;
        if event.add.is_some() {
            mask |= EVENT_HAS_ADD;
        }
        if event.remove.is_some() {
            mask |= EVENT_HAS_REMOVE;
        }
        if event.invoke.is_some() {
            mask |= EVENT_HAS_INVOKE;
        }
        self.u8(mask);

        for accessor in [&event.add, &event.remove, &event.invoke]
            .into_iter()
            .flatten()
        {
            self.method(accessor)?;
        }

        self.count(event.others.len())?;
        for other in &event.others {
            self.method(other)?;
        }

        self.attributes(&event.custom_attributes)
    }

    fn attributes(&mut self, attributes: &[CustomAttribute]) -> Result<()> {
        self.count(attributes.len())?;
        for attribute in attributes {
            if attribute.attribute_type.is_empty() {
                return Err(malformed_error!("Custom attribute without a type"));
            }

            self.string(&attribute.attribute_type)?;
            self.blob(&attribute.value)?;
        }

        Ok(())
    }
}

fn align4(value: usize) -> usize {
    (value + 3) & !3
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| malformed_error!("Image too large - {}", value))
}
