use crate::{
    file::parser::Parser,
    metadata::{
        signatures::{MethodSignature, TypeSignature, ELEMENT_TYPE, SIGNATURE_HEADER},
        streams::Strings,
    },
    Error::RecursionLimit,
    Result,
};

const MAX_RECURSION_DEPTH: usize = 50;

/// Decodes signature blobs, resolving named types through the `#Strings` heap.
///
/// # Examples
///
/// ```rust
/// use refasm::{metadata::signatures::{SignatureParser, TypeSignature}, Strings};
///
/// let heap = [0x00, b'L', b'i', b'b', b'.', b'A', 0x00];
/// let strings = Strings::from(&heap)?;
///
/// let blob = [0x06, 0x12, 0x01];
/// let field = SignatureParser::new(&blob, &strings).parse_field_signature()?;
/// assert_eq!(field, TypeSignature::class("Lib.A"));
/// # Ok::<(), refasm::Error>(())
/// ```
pub struct SignatureParser<'a> {
    parser: Parser<'a>,
    strings: &'a Strings<'a>,
    depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a parser over a single signature blob
    #[must_use]
    pub fn new(data: &'a [u8], strings: &'a Strings<'a>) -> Self {
        SignatureParser {
            parser: Parser::new(data),
            strings,
            depth: 0,
        }
    }

    fn parse_type(&mut self) -> Result<TypeSignature> {
        self.depth += 1;
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(RecursionLimit(MAX_RECURSION_DEPTH));
        }

        let result = self.parse_type_inner();
        self.depth -= 1;
        result
    }

    fn parse_type_inner(&mut self) -> Result<TypeSignature> {
        let current_byte = self.parser.read_le::<u8>()?;
        match current_byte {
            ELEMENT_TYPE::VOID => Ok(TypeSignature::Void),
            ELEMENT_TYPE::BOOLEAN => Ok(TypeSignature::Boolean),
            ELEMENT_TYPE::CHAR => Ok(TypeSignature::Char),
            ELEMENT_TYPE::I1 => Ok(TypeSignature::I1),
            ELEMENT_TYPE::U1 => Ok(TypeSignature::U1),
            ELEMENT_TYPE::I2 => Ok(TypeSignature::I2),
            ELEMENT_TYPE::U2 => Ok(TypeSignature::U2),
            ELEMENT_TYPE::I4 => Ok(TypeSignature::I4),
            ELEMENT_TYPE::U4 => Ok(TypeSignature::U4),
            ELEMENT_TYPE::I8 => Ok(TypeSignature::I8),
            ELEMENT_TYPE::U8 => Ok(TypeSignature::U8),
            ELEMENT_TYPE::R4 => Ok(TypeSignature::R4),
            ELEMENT_TYPE::R8 => Ok(TypeSignature::R8),
            ELEMENT_TYPE::STRING => Ok(TypeSignature::String),
            ELEMENT_TYPE::I => Ok(TypeSignature::I),
            ELEMENT_TYPE::U => Ok(TypeSignature::U),
            ELEMENT_TYPE::OBJECT => Ok(TypeSignature::Object),
            ELEMENT_TYPE::TYPEDBYREF => Ok(TypeSignature::TypedByRef),
            ELEMENT_TYPE::PTR => Ok(TypeSignature::Ptr(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::BYREF => Ok(TypeSignature::ByRef(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::SZARRAY => Ok(TypeSignature::SzArray(Box::new(self.parse_type()?))),
            ELEMENT_TYPE::VALUETYPE => Ok(TypeSignature::ValueType(self.parse_type_name()?)),
            ELEMENT_TYPE::CLASS => Ok(TypeSignature::Class(self.parse_type_name()?)),
            ELEMENT_TYPE::VAR => Ok(TypeSignature::GenericParamType(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::MVAR => Ok(TypeSignature::GenericParamMethod(
                self.parser.read_compressed_uint()?,
            )),
            ELEMENT_TYPE::GENERICINST => {
                let peek_byte = self.parser.peek_byte()?;
                if peek_byte != ELEMENT_TYPE::CLASS && peek_byte != ELEMENT_TYPE::VALUETYPE {
                    return Err(malformed_error!(
                        "GENERICINST - Next byte is not TYPE_CLASS or TYPE_VALUE - {}",
                        peek_byte
                    ));
                }

                let base_type = self.parse_type()?;
                let arg_count = self.parser.read_compressed_uint()?;
                if arg_count as usize > self.parser.remaining() {
                    return Err(malformed_error!(
                        "GENERICINST - Argument count exceeds signature - {}",
                        arg_count
                    ));
                }

                let mut type_args = Vec::with_capacity(arg_count as usize);
                for _ in 0..arg_count {
                    type_args.push(self.parse_type()?);
                }

                Ok(TypeSignature::GenericInst(Box::new(base_type), type_args))
            }
            _ => Err(malformed_error!(
                "Unsupported ELEMENT_TYPE - {}",
                current_byte
            )),
        }
    }

    fn parse_type_name(&mut self) -> Result<String> {
        let index = self.parser.read_compressed_uint()? as usize;
        let name = self.strings.get(index)?;
        if name.is_empty() {
            return Err(malformed_error!("Named type without a name at index {}", index));
        }

        Ok(name.to_string())
    }

    /// Parse a standalone type signature, as used for event types.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for unknown element types or unresolved names,
    /// [`crate::Error::RecursionLimit`] for excessive nesting, and
    /// [`crate::Error::OutOfBounds`] for truncated blobs.
    pub fn parse_type_signature(&mut self) -> Result<TypeSignature> {
        self.parse_type()
    }

    /// Parse a field signature: the field prolog followed by the field type.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the prolog is missing, otherwise as
    /// [`SignatureParser::parse_type_signature`].
    pub fn parse_field_signature(&mut self) -> Result<TypeSignature> {
        let head_byte = self.parser.read_le::<u8>()?;
        if head_byte != SIGNATURE_HEADER::FIELD {
            return Err(malformed_error!(
                "SignatureField - invalid start - {}",
                head_byte
            ));
        }

        self.parse_type()
    }

    /// Parse a method signature.
    ///
    /// # Errors
    /// As [`SignatureParser::parse_type_signature`], plus [`crate::Error::Malformed`] if the
    /// parameter count exceeds the blob.
    pub fn parse_method_signature(&mut self) -> Result<MethodSignature> {
        let convention_byte = self.parser.read_le::<u8>()?;

        let generic_param_count = if convention_byte & SIGNATURE_HEADER::GENERIC != 0 {
            self.parser.read_compressed_uint()?
        } else {
            0
        };

        let param_count = self.parser.read_compressed_uint()?;
        if param_count as usize > self.parser.remaining() {
            return Err(malformed_error!(
                "SignatureMethod - parameter count exceeds signature - {}",
                param_count
            ));
        }

        let return_type = self.parse_type()?;
        let mut params = Vec::with_capacity(param_count as usize);
        for _ in 0..param_count {
            params.push(self.parse_type()?);
        }

        Ok(MethodSignature {
            has_this: convention_byte & SIGNATURE_HEADER::HASTHIS != 0,
            explicit_this: convention_byte & SIGNATURE_HEADER::EXPLICITTHIS != 0,
            generic_param_count,
            return_type,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEAP: [u8; 15] = [
        0x00, b'L', b'i', b'b', b'.', b'A', 0x00, b'L', b'i', b'b', b'.', b'B', b'`', b'1', 0x00,
    ];

    #[test]
    fn method_signature() {
        let strings = Strings::from(&HEAP).unwrap();

        // instance Lib.A M(int32, Lib.B`1<string>&)
        #[rustfmt::skip]
        let blob = [
            0x20, 0x02,
            0x12, 0x01,
            0x08,
            0x10, 0x15, 0x12, 0x07, 0x01, 0x0e,
        ];

        let sig = SignatureParser::new(&blob, &strings)
            .parse_method_signature()
            .unwrap();

        assert!(sig.has_this);
        assert_eq!(sig.generic_param_count, 0);
        assert_eq!(sig.return_type, TypeSignature::class("Lib.A"));
        assert_eq!(sig.params.len(), 2);
        assert_eq!(sig.params[0], TypeSignature::I4);
        assert_eq!(
            sig.params[1],
            TypeSignature::ByRef(Box::new(TypeSignature::GenericInst(
                Box::new(TypeSignature::class("Lib.B`1")),
                vec![TypeSignature::String]
            )))
        );
    }

    #[test]
    fn generic_method_signature() {
        let strings = Strings::from(&HEAP).unwrap();

        // static !!0 M<T>(!!0[])
        let blob = [0x10, 0x01, 0x01, 0x1e, 0x00, 0x1d, 0x1e, 0x00];

        let sig = SignatureParser::new(&blob, &strings)
            .parse_method_signature()
            .unwrap();

        assert!(!sig.has_this);
        assert_eq!(sig.generic_param_count, 1);
        assert_eq!(sig.return_type, TypeSignature::GenericParamMethod(0));
        assert_eq!(
            sig.params,
            vec![TypeSignature::SzArray(Box::new(
                TypeSignature::GenericParamMethod(0)
            ))]
        );
    }

    #[test]
    fn field_signature() {
        let strings = Strings::from(&HEAP).unwrap();

        let sig = SignatureParser::new(&[0x06, 0x11, 0x01], &strings)
            .parse_field_signature()
            .unwrap();
        assert_eq!(sig, TypeSignature::value_type("Lib.A"));

        assert!(SignatureParser::new(&[0x07, 0x08], &strings)
            .parse_field_signature()
            .is_err());
    }

    #[test]
    fn invalid() {
        let strings = Strings::from(&HEAP).unwrap();

        // Unknown element type
        assert!(SignatureParser::new(&[0x06, 0x45], &strings)
            .parse_field_signature()
            .is_err());

        // Class pointing at the empty string
        assert!(SignatureParser::new(&[0x06, 0x12, 0x00], &strings)
            .parse_field_signature()
            .is_err());

        // GENERICINST over a primitive
        assert!(SignatureParser::new(&[0x06, 0x15, 0x08, 0x01, 0x08], &strings)
            .parse_field_signature()
            .is_err());

        // Truncated parameter list
        assert!(SignatureParser::new(&[0x00, 0x05, 0x01], &strings)
            .parse_method_signature()
            .is_err());
    }

    #[test]
    fn recursion_limit() {
        let strings = Strings::from(&HEAP).unwrap();

        let mut blob = vec![0x06];
        blob.extend(std::iter::repeat(0x0f).take(100));
        blob.push(0x08);

        assert!(matches!(
            SignatureParser::new(&blob, &strings).parse_field_signature(),
            Err(RecursionLimit(_))
        ));
    }
}
