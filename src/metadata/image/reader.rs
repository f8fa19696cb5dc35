use crate::{
    file::parser::Parser,
    metadata::{
        cor20header::{CorFlags, VTableFixup, VTableFixupFlags},
        customattributes::CustomAttribute,
        image::{
            BLOB_STREAM, EVENT_HAS_ADD, EVENT_HAS_INVOKE, EVENT_HAS_REMOVE, MAX_NESTING_DEPTH,
            MAX_PREALLOCATED_RECORDS, PROPERTY_HAS_GETTER, PROPERTY_HAS_SETTER, RECORD_HEADER_SIZE,
            RECORD_MAJOR_VERSION, RECORD_STREAM, STRINGS_STREAM,
        },
        members::{Event, Field, Property},
        method::{Method, MethodBody},
        module::{Assembly, Module},
        root::Root,
        signatures::SignatureParser,
        streams::{Blob, Strings},
        token::Token,
        typesystem::CilType,
    },
    Error::RecursionLimit,
    Result,
};

/// Decode an image into a [`Module`].
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the image is truncated, and
/// [`crate::Error::Malformed`] if the root, a stream or a record is invalid.
pub fn read(data: &[u8]) -> Result<Module> {
    let root = Root::read(data)?;

    let records = stream_data(data, &root, RECORD_STREAM)?;
    let strings = Strings::from(stream_data(data, &root, STRINGS_STREAM)?)?;
    let blobs = Blob::from(stream_data(data, &root, BLOB_STREAM)?)?;

    let mut reader = ImageReader {
        parser: Parser::new(records),
        strings,
        blobs,
        depth: 0,
    };

    reader.header()?;
    reader.module()
}

/// Empty list for `count` records; counts are bounded by stream bytes, not record sizes
fn records<T>(count: usize) -> Vec<T> {
    Vec::with_capacity(count.min(MAX_PREALLOCATED_RECORDS))
}

fn stream_data<'a>(data: &'a [u8], root: &Root, name: &str) -> Result<&'a [u8]> {
    let Some(header) = root.stream(name) else {
        return Err(malformed_error!("Image is missing the {} stream", name));
    };

    let start = header.offset as usize;
    let end = start + header.size as usize;
    // Root::read has already checked the range against the image
    Ok(&data[start..end])
}

struct ImageReader<'a> {
    parser: Parser<'a>,
    strings: Strings<'a>,
    blobs: Blob<'a>,
    depth: usize,
}

impl<'a> ImageReader<'a> {
    fn header(&mut self) -> Result<()> {
        if self.parser.len() < RECORD_HEADER_SIZE {
            return Err(malformed_error!(
                "Record stream too small - {} bytes",
                self.parser.len()
            ));
        }

        let _reserved = self.parser.read_le::<u32>()?;
        let major = self.parser.read_le::<u8>()?;
        let _minor = self.parser.read_le::<u8>()?;
        let _reserved = self.parser.read_le::<u16>()?;

        if major != RECORD_MAJOR_VERSION {
            return Err(malformed_error!(
                "Unsupported record stream version - {}",
                major
            ));
        }

        Ok(())
    }

    /// Read a record count; every record takes at least one byte
    fn count(&mut self) -> Result<usize> {
        let count = self.parser.read_compressed_uint()? as usize;
        if count > self.parser.remaining() {
            return Err(malformed_error!(
                "Record count exceeds the record stream - {}",
                count
            ));
        }

        Ok(count)
    }

    fn string(&mut self) -> Result<String> {
        let index = self.parser.read_compressed_uint()? as usize;
        Ok(self.strings.get(index)?.to_string())
    }

    fn blob(&mut self) -> Result<&'a [u8]> {
        let index = self.parser.read_compressed_uint()? as usize;
        self.blobs.get(index)
    }

    fn token(&mut self) -> Result<Token> {
        Ok(Token::new(self.parser.read_le::<u32>()?))
    }

    fn module(&mut self) -> Result<Module> {
        let cor_flags = CorFlags::from_bits_retain(self.parser.read_le::<u32>()?);
        let name = self.string()?;

        let assembly = match self.parser.read_le::<u8>()? {
            0 => None,
            1 => Some(self.assembly()?),
            other => {
                return Err(malformed_error!("Invalid assembly marker - {}", other));
            }
        };

        let fixup_count = self.count()?;
        let mut vtable_fixups = records(fixup_count);
        for _ in 0..fixup_count {
            vtable_fixups.push(VTableFixup {
                rva: self.parser.read_le::<u32>()?,
                count: self.parser.read_le::<u16>()?,
                kind: VTableFixupFlags::from_bits_retain(self.parser.read_le::<u16>()?),
            });
        }

        let custom_attributes = self.attributes()?;

        let type_count = self.count()?;
        let mut types = records(type_count);
        for _ in 0..type_count {
            types.push(self.cil_type()?);
        }

        Ok(Module {
            name,
            assembly,
            cor_flags,
            vtable_fixups,
            custom_attributes,
            types,
        })
    }

    fn assembly(&mut self) -> Result<Assembly> {
        Ok(Assembly {
            name: self.string()?,
            major_version: self.parser.read_le::<u16>()?,
            minor_version: self.parser.read_le::<u16>()?,
            build_number: self.parser.read_le::<u16>()?,
            revision_number: self.parser.read_le::<u16>()?,
            flags: self.parser.read_le::<u32>()?,
            public_key: self.blob()?.to_vec(),
            custom_attributes: self.attributes()?,
        })
    }

    fn cil_type(&mut self) -> Result<CilType> {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            return Err(RecursionLimit(MAX_NESTING_DEPTH));
        }

        let result = self.cil_type_inner();
        self.depth -= 1;
        result
    }

    fn cil_type_inner(&mut self) -> Result<CilType> {
        let token = self.token()?;
        let flags = self.parser.read_le::<u32>()?;
        let namespace = self.string()?;
        let name = self.string()?;
        if name.is_empty() {
            return Err(malformed_error!("Type without a name - {}", token));
        }

        let custom_attributes = self.attributes()?;

        let method_count = self.count()?;
        let mut methods = records(method_count);
        for _ in 0..method_count {
            methods.push(self.method()?);
        }

        let field_count = self.count()?;
        let mut fields = records(field_count);
        for _ in 0..field_count {
            fields.push(self.field()?);
        }

        let property_count = self.count()?;
        let mut properties = records(property_count);
        for _ in 0..property_count {
            properties.push(self.property()?);
        }

        let event_count = self.count()?;
        let mut events = records(event_count);
        for _ in 0..event_count {
            events.push(self.event()?);
        }

        let nested_count = self.count()?;
        let mut nested_types = records(nested_count);
        for _ in 0..nested_count {
            nested_types.push(self.cil_type()?);
        }

        Ok(CilType {
            token,
            flags,
            namespace,
            name,
            methods,
            fields,
            properties,
            events,
            nested_types,
            custom_attributes,
        })
    }

    fn method(&mut self) -> Result<Method> {
        let token = self.token()?;
        let flags = self.parser.read_le::<u32>()?;
        let impl_flags = self.parser.read_le::<u32>()?;
        let name = self.string()?;

        let signature_blob = self.blob()?;
        let signature = SignatureParser::new(signature_blob, &self.strings)
            .parse_method_signature()
            .map_err(|error| {
                malformed_error!("Invalid signature of method {} - {}", name, error)
            })?;

        let body_blob = self.blob()?;
        let body = if body_blob.is_empty() {
            None
        } else {
            Some(MethodBody::from(body_blob)?)
        };

        Ok(Method {
            token,
            name,
            flags,
            impl_flags,
            signature,
            body,
            custom_attributes: self.attributes()?,
        })
    }

    fn field(&mut self) -> Result<Field> {
        let token = self.token()?;
        let flags = self.parser.read_le::<u32>()?;
        let name = self.string()?;

        let signature_blob = self.blob()?;
        let signature = SignatureParser::new(signature_blob, &self.strings)
            .parse_field_signature()
            .map_err(|error| malformed_error!("Invalid signature of field {} - {}", name, error))?;

        Ok(Field {
            token,
            name,
            flags,
            signature,
            custom_attributes: self.attributes()?,
        })
    }

    fn property(&mut self) -> Result<Property> {
        let token = self.token()?;
        let flags = self.parser.read_le::<u32>()?;
        let name = self.string()?;

        let mask = self.parser.read_le::<u8>()?;
        if mask & !(PROPERTY_HAS_GETTER | PROPERTY_HAS_SETTER) != 0 {
            return Err(malformed_error!("Invalid property accessor mask - {}", mask));
        }

        let getter = self.optional_method(mask & PROPERTY_HAS_GETTER != 0)?;
        let setter = self.optional_method(mask & PROPERTY_HAS_SETTER != 0)?;

        Ok(Property {
            token,
            name,
            flags,
            getter,
            setter,
            custom_attributes: self.attributes()?,
        })
    }

    fn event(&mut self) -> Result<Event> {
        let token = self.token()?;
        let flags = self.parser.read_le::<u32>()?;
        let name = self.string()?;

        let type_blob = self.blob()?;
        let event_type = SignatureParser::new(type_blob, &self.strings)
            .parse_type_signature()
            .map_err(|error| malformed_error!("Invalid type of event {} - {}", name, error))?;

        let mask = self.parser.read_le::<u8>()?;
        if mask & !(EVENT_HAS_ADD | EVENT_HAS_REMOVE | EVENT_HAS_INVOKE) != 0 {
            return Err(malformed_error!("Invalid event accessor mask - {}", mask));
        }

        let add = self.optional_method(mask & EVENT_HAS_ADD != 0)?;
        let remove = self.optional_method(mask & EVENT_HAS_REMOVE != 0)?;
        let invoke = self.optional_method(mask & EVENT_HAS_INVOKE != 0)?;

        let other_count = self.count()?;
        let mut others = records(other_count);
        for _ in 0..other_count {
            others.push(self.method()?);
        }

        Ok(Event {
            token,
            name,
            flags,
            event_type,
            add,
            remove,
            invoke,
            others,
            custom_attributes: self.attributes()?,
        })
    }

    fn optional_method(&mut self, present: bool) -> Result<Option<Method>> {
        if present {
            Ok(Some(self.method()?))
        } else {
            Ok(None)
        }
    }

    fn attributes(&mut self) -> Result<Vec<CustomAttribute>> {
        let count = self.count()?;
        let mut attributes = records(count);
        for _ in 0..count {
            let attribute_type = self.string()?;
            if attribute_type.is_empty() {
                return Err(malformed_error!("Custom attribute without a type"));
            }

            attributes.push(CustomAttribute {
                attribute_type,
                value: self.blob()?.to_vec(),
            });
        }

        Ok(attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preallocation_is_capped() {
        let huge: Vec<CilType> = records(usize::MAX / 2);
        assert!(huge.capacity() >= MAX_PREALLOCATED_RECORDS);
        assert!(huge.capacity() < 2 * MAX_PREALLOCATED_RECORDS);

        let small: Vec<Method> = records(3);
        assert!(small.capacity() >= 3);
    }
}
