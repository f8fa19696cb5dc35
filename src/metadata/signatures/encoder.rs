use crate::{
    file::parser::write_compressed_uint,
    metadata::{
        signatures::{MethodSignature, TypeSignature, ELEMENT_TYPE, SIGNATURE_HEADER},
        streams::StringsBuilder,
    },
    Result,
};

fn encode_type(
    signature: &TypeSignature,
    strings: &mut StringsBuilder,
    buffer: &mut Vec<u8>,
) -> Result<()> {
    match signature {
        TypeSignature::Void => buffer.push(ELEMENT_TYPE::VOID),
        TypeSignature::Boolean => buffer.push(ELEMENT_TYPE::BOOLEAN),
        TypeSignature::Char => buffer.push(ELEMENT_TYPE::CHAR),
        TypeSignature::I1 => buffer.push(ELEMENT_TYPE::I1),
        TypeSignature::U1 => buffer.push(ELEMENT_TYPE::U1),
        TypeSignature::I2 => buffer.push(ELEMENT_TYPE::I2),
        TypeSignature::U2 => buffer.push(ELEMENT_TYPE::U2),
        TypeSignature::I4 => buffer.push(ELEMENT_TYPE::I4),
        TypeSignature::U4 => buffer.push(ELEMENT_TYPE::U4),
        TypeSignature::I8 => buffer.push(ELEMENT_TYPE::I8),
        TypeSignature::U8 => buffer.push(ELEMENT_TYPE::U8),
        TypeSignature::R4 => buffer.push(ELEMENT_TYPE::R4),
        TypeSignature::R8 => buffer.push(ELEMENT_TYPE::R8),
        TypeSignature::String => buffer.push(ELEMENT_TYPE::STRING),
        TypeSignature::I => buffer.push(ELEMENT_TYPE::I),
        TypeSignature::U => buffer.push(ELEMENT_TYPE::U),
        TypeSignature::Object => buffer.push(ELEMENT_TYPE::OBJECT),
        TypeSignature::TypedByRef => buffer.push(ELEMENT_TYPE::TYPEDBYREF),
        TypeSignature::Ptr(inner) => {
            buffer.push(ELEMENT_TYPE::PTR);
            encode_type(inner, strings, buffer)?;
        }
        TypeSignature::ByRef(inner) => {
            buffer.push(ELEMENT_TYPE::BYREF);
            encode_type(inner, strings, buffer)?;
        }
        TypeSignature::SzArray(inner) => {
            buffer.push(ELEMENT_TYPE::SZARRAY);
            encode_type(inner, strings, buffer)?;
        }
        TypeSignature::ValueType(name) => {
            buffer.push(ELEMENT_TYPE::VALUETYPE);
            encode_type_name(name, strings, buffer)?;
        }
        TypeSignature::Class(name) => {
            buffer.push(ELEMENT_TYPE::CLASS);
            encode_type_name(name, strings, buffer)?;
        }
        TypeSignature::GenericParamType(index) => {
            buffer.push(ELEMENT_TYPE::VAR);
            write_compressed_uint(*index, buffer)?;
        }
        TypeSignature::GenericParamMethod(index) => {
            buffer.push(ELEMENT_TYPE::MVAR);
            write_compressed_uint(*index, buffer)?;
        }
        TypeSignature::GenericInst(base, args) => {
            if !matches!(
                base.as_ref(),
                TypeSignature::Class(_) | TypeSignature::ValueType(_)
            ) {
                return Err(malformed_error!(
                    "GENERICINST base must be a named type - {:?}",
                    base
                ));
            }

            buffer.push(ELEMENT_TYPE::GENERICINST);
            encode_type(base, strings, buffer)?;

            let arg_count = u32::try_from(args.len())
                .map_err(|_| malformed_error!("Too many generic arguments: {}", args.len()))?;
            write_compressed_uint(arg_count, buffer)?;
            for arg in args {
                encode_type(arg, strings, buffer)?;
            }
        }
    }

    Ok(())
}

fn encode_type_name(name: &str, strings: &mut StringsBuilder, buffer: &mut Vec<u8>) -> Result<()> {
    if name.is_empty() {
        return Err(malformed_error!("Named type without a name"));
    }

    let index = strings.add(name)?;
    write_compressed_uint(index, buffer)
}

/// Encode a standalone type signature, as used for event types.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for unnamed types or a generic instantiation over a
/// non-named base.
pub fn encode_type_signature(
    signature: &TypeSignature,
    strings: &mut StringsBuilder,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    encode_type(signature, strings, &mut buffer)?;
    Ok(buffer)
}

/// Encode a field signature: the field prolog followed by the field type.
///
/// # Errors
/// As [`encode_type_signature`].
pub fn encode_field_signature(
    signature: &TypeSignature,
    strings: &mut StringsBuilder,
) -> Result<Vec<u8>> {
    let mut buffer = vec![SIGNATURE_HEADER::FIELD];
    encode_type(signature, strings, &mut buffer)?;
    Ok(buffer)
}

/// Encode a method signature.
///
/// # Errors
/// As [`encode_type_signature`].
pub fn encode_method_signature(
    signature: &MethodSignature,
    strings: &mut StringsBuilder,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();

    let mut calling_convention = 0_u8;
    if signature.has_this {
        calling_convention |= SIGNATURE_HEADER::HASTHIS;
    }

    if signature.explicit_this {
        calling_convention |= SIGNATURE_HEADER::EXPLICITTHIS;
    }

    if signature.generic_param_count > 0 {
        calling_convention |= SIGNATURE_HEADER::GENERIC;
    }

    buffer.push(calling_convention);

    if signature.generic_param_count > 0 {
        write_compressed_uint(signature.generic_param_count, &mut buffer)?;
    }

    let param_count = u32::try_from(signature.params.len()).map_err(|_| {
        malformed_error!(
            "Too many parameters in method signature: {}",
            signature.params.len()
        )
    })?;
    write_compressed_uint(param_count, &mut buffer)?;

    encode_type(&signature.return_type, strings, &mut buffer)?;
    for param in &signature.params {
        encode_type(param, strings, &mut buffer)?;
    }

    Ok(buffer)
}
