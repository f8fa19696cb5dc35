//! Representation, parsing and encoding of CIL method bodies.
//!
//! A body is a method header (tiny or fat), the IL code, and for fat bodies optional extra
//! data sections holding exception handling clauses. [`MethodBody::from`] decodes the on-disk
//! format and [`MethodBody::encode`] produces it again, choosing the tiny header whenever the
//! body allows it.
//!
//! # Examples
//!
//! ```rust
//! use refasm::metadata::method::MethodBody;
//!
//! // ldnull; throw
//! let body = MethodBody::from_code(vec![0x14, 0x7A]);
//! let bytes = body.encode()?;
//! assert_eq!(bytes, [0x0A, 0x14, 0x7A]);
//!
//! let parsed = MethodBody::from(&bytes)?;
//! assert!(!parsed.is_fat);
//! assert_eq!(parsed.code, [0x14, 0x7A]);
//! assert_eq!(parsed.max_stack, 8);
//! # Ok::<(), refasm::Error>(())
//! ```
//!
//! # References
//! - ECMA-335 6th Edition, Partition II, Section 25.4 - Method Header Format

use crate::{
    file::io::{read_le, read_le_at},
    metadata::method::{ExceptionHandler, ExceptionHandlerFlags, MethodBodyFlags, SectionFlags},
    Error::OutOfBounds,
    Result,
};

/// Evaluation stack depth implied by a tiny header
pub const TINY_MAX_STACK: usize = 8;

/// Size of a fat method header in bytes
const FAT_HEADER_SIZE: usize = 12;

/// Size of a single small exception clause
const SMALL_CLAUSE_SIZE: usize = 12;

/// Size of a single fat exception clause
const FAT_CLAUSE_SIZE: usize = 24;

/// A decoded method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBody {
    /// Size of the IL code in bytes
    pub size_code: usize,
    /// Size of the method header in bytes, 1 for tiny and 12 for fat headers
    pub size_header: usize,
    /// Token of the local variable signature, 0 if the method has no locals
    pub local_var_sig_token: u32,
    /// Maximum evaluation stack depth
    pub max_stack: usize,
    /// Whether the body uses a fat header
    pub is_fat: bool,
    /// Whether locals are zero-initialized
    pub is_init_local: bool,
    /// Whether exception handling sections are present
    pub is_exception_data: bool,
    /// The IL code
    pub code: Vec<u8>,
    /// Exception handling clauses
    pub exception_handlers: Vec<ExceptionHandler>,
}

impl MethodBody {
    /// Create a body with a tiny header for `code`: no locals, no exception handlers and the
    /// implied stack depth of 8.
    #[must_use]
    pub fn from_code(code: Vec<u8>) -> MethodBody {
        MethodBody {
            size_code: code.len(),
            size_header: 1,
            local_var_sig_token: 0,
            max_stack: TINY_MAX_STACK,
            is_fat: false,
            is_init_local: false,
            is_exception_data: false,
            code,
            exception_handlers: Vec::new(),
        }
    }

    /// Decode a method body from the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the header or code run past `data`, or
    /// [`crate::Error::Malformed`] if the header format is invalid.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from(data: &[u8]) -> Result<MethodBody> {
        if data.is_empty() {
            return Err(malformed_error!("Provided data for body parsing is empty"));
        }

        let first_byte = read_le::<u8>(data)?;
        match MethodBodyFlags::from_bits_truncate(u16::from(first_byte & 0b_00000011_u8)) {
            MethodBodyFlags::TINY_FORMAT => {
                let size_code = (first_byte >> 2) as usize;
                if size_code + 1 > data.len() {
                    return Err(OutOfBounds);
                }

                Ok(MethodBody {
                    size_code,
                    size_header: 1,
                    local_var_sig_token: 0,
                    max_stack: TINY_MAX_STACK,
                    is_fat: false,
                    is_init_local: false,
                    is_exception_data: false,
                    code: data[1..=size_code].to_vec(),
                    exception_handlers: Vec::new(),
                })
            }
            MethodBodyFlags::FAT_FORMAT => {
                if data.len() < FAT_HEADER_SIZE {
                    return Err(OutOfBounds);
                }

                let first_duo = read_le::<u16>(data)?;

                let size_header = ((first_duo >> 12) * 4) as usize;
                if size_header < FAT_HEADER_SIZE {
                    return Err(malformed_error!(
                        "Fat method header is too small - {}",
                        size_header
                    ));
                }

                let size_code = read_le::<u32>(&data[4..])? as usize;
                let Some(code_end) = size_header.checked_add(size_code) else {
                    return Err(OutOfBounds);
                };
                if data.len() < code_end {
                    return Err(OutOfBounds);
                }

                let local_var_sig_token = read_le::<u32>(&data[8..])?;
                let flags_header =
                    MethodBodyFlags::from_bits_truncate(first_duo & 0b_0000111111111111_u16);
                let max_stack = read_le::<u16>(&data[2..])? as usize;

                let is_init_local = flags_header.contains(MethodBodyFlags::INIT_LOCALS);

                // Exception Handling -> II.25.4.6
                // The extra sections currently can only contain exception handling data
                let mut exception_handlers = Vec::new();
                if flags_header.contains(MethodBodyFlags::MORE_SECTS) {
                    let mut cursor = (code_end + 3) & !3;

                    while data.len() >= cursor + 4 {
                        let method_data_section_flags =
                            SectionFlags::from_bits_truncate(read_le::<u8>(&data[cursor..])?);
                        if !method_data_section_flags.contains(SectionFlags::EHTABLE) {
                            break;
                        }

                        if method_data_section_flags.contains(SectionFlags::FAT_FORMAT) {
                            let method_data_section_size =
                                (read_le::<u32>(&data[cursor..])? >> 8) as usize;
                            if method_data_section_size < 4
                                || data.len() < cursor + method_data_section_size
                            {
                                return Err(OutOfBounds);
                            }

                            cursor += 4;
                            for _ in 0..(method_data_section_size - 4) / FAT_CLAUSE_SIZE {
                                exception_handlers.push(ExceptionHandler {
                                    // Only the low 16 bits carry defined clause kinds
                                    flags: ExceptionHandlerFlags::from_bits_truncate(
                                        read_le_at::<u32>(data, &mut cursor)? as u16,
                                    ),
                                    try_offset: read_le_at::<u32>(data, &mut cursor)?,
                                    try_length: read_le_at::<u32>(data, &mut cursor)?,
                                    handler_offset: read_le_at::<u32>(data, &mut cursor)?,
                                    handler_length: read_le_at::<u32>(data, &mut cursor)?,
                                    filter_offset: read_le_at::<u32>(data, &mut cursor)?,
                                });
                            }
                        } else {
                            let method_data_section_size =
                                read_le::<u8>(&data[cursor + 1..])? as usize;
                            if method_data_section_size < 4
                                || data.len() < cursor + method_data_section_size
                            {
                                return Err(OutOfBounds);
                            }

                            cursor += 4;
                            for _ in 0..(method_data_section_size - 4) / SMALL_CLAUSE_SIZE {
                                exception_handlers.push(ExceptionHandler {
                                    flags: ExceptionHandlerFlags::from_bits_truncate(
                                        read_le_at::<u16>(data, &mut cursor)?,
                                    ),
                                    try_offset: u32::from(read_le_at::<u16>(data, &mut cursor)?),
                                    try_length: u32::from(read_le_at::<u8>(data, &mut cursor)?),
                                    handler_offset: u32::from(read_le_at::<u16>(
                                        data,
                                        &mut cursor,
                                    )?),
                                    handler_length: u32::from(read_le_at::<u8>(data, &mut cursor)?),
                                    filter_offset: read_le_at::<u32>(data, &mut cursor)?,
                                });
                            }
                        }

                        if !method_data_section_flags.contains(SectionFlags::MORE_SECTS) {
                            break;
                        }

                        cursor = (cursor + 3) & !3;
                    }
                }

                Ok(MethodBody {
                    size_code,
                    size_header,
                    local_var_sig_token,
                    max_stack,
                    is_fat: true,
                    is_init_local,
                    is_exception_data: !exception_handlers.is_empty(),
                    code: data[size_header..code_end].to_vec(),
                    exception_handlers,
                })
            }
            _ => Err(malformed_error!(
                "MethodHeader is neither FAT nor TINY - {}",
                first_byte
            )),
        }
    }

    /// Total size of header and code
    #[must_use]
    pub fn size(&self) -> usize {
        self.size_code + self.size_header
    }

    /// Whether this body can be written with a tiny header
    #[must_use]
    pub fn fits_tiny(&self) -> bool {
        self.code.len() < 64
            && self.max_stack <= TINY_MAX_STACK
            && self.local_var_sig_token == 0
            && !self.is_init_local
            && self.exception_handlers.is_empty()
    }

    /// Encode the body. Bodies not marked fat are written with a tiny header when they fit.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the code, stack depth or a clause exceeds what
    /// the fat format can express.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if !self.is_fat && self.fits_tiny() {
            #[allow(clippy::cast_possible_truncation)]
            let header = ((self.code.len() as u8) << 2) | MethodBodyFlags::TINY_FORMAT.bits() as u8;

            let mut buffer = Vec::with_capacity(1 + self.code.len());
            buffer.push(header);
            buffer.extend_from_slice(&self.code);
            return Ok(buffer);
        }

        let mut flags = MethodBodyFlags::FAT_FORMAT;
        if self.is_init_local {
            flags |= MethodBodyFlags::INIT_LOCALS;
        }
        if !self.exception_handlers.is_empty() {
            flags |= MethodBodyFlags::MORE_SECTS;
        }

        let max_stack = u16::try_from(self.max_stack)
            .map_err(|_| malformed_error!("Max stack too large - {}", self.max_stack))?;
        let code_size = u32::try_from(self.code.len())
            .map_err(|_| malformed_error!("Code too large - {}", self.code.len()))?;

        let mut buffer = Vec::with_capacity(FAT_HEADER_SIZE + self.code.len());
        buffer.extend_from_slice(&(flags.bits() | (3 << 12)).to_le_bytes());
        buffer.extend_from_slice(&max_stack.to_le_bytes());
        buffer.extend_from_slice(&code_size.to_le_bytes());
        buffer.extend_from_slice(&self.local_var_sig_token.to_le_bytes());
        buffer.extend_from_slice(&self.code);

        if !self.exception_handlers.is_empty() {
            buffer.resize((buffer.len() + 3) & !3, 0);
            self.encode_exception_section(&mut buffer)?;
        }

        Ok(buffer)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn encode_exception_section(&self, buffer: &mut Vec<u8>) -> Result<()> {
        let count = self.exception_handlers.len();
        let small_fits = 4 + count * SMALL_CLAUSE_SIZE <= 0xFF
            && self
                .exception_handlers
                .iter()
                .all(ExceptionHandler::fits_small);

        if small_fits {
            buffer.push(SectionFlags::EHTABLE.bits());
            buffer.push((4 + count * SMALL_CLAUSE_SIZE) as u8);
            buffer.extend_from_slice(&[0, 0]);

            for handler in &self.exception_handlers {
                buffer.extend_from_slice(&handler.flags.bits().to_le_bytes());
                buffer.extend_from_slice(&(handler.try_offset as u16).to_le_bytes());
                buffer.push(handler.try_length as u8);
                buffer.extend_from_slice(&(handler.handler_offset as u16).to_le_bytes());
                buffer.push(handler.handler_length as u8);
                buffer.extend_from_slice(&handler.filter_offset.to_le_bytes());
            }
        } else {
            let section_size = 4 + count * FAT_CLAUSE_SIZE;
            if section_size > 0x00FF_FFFF {
                return Err(malformed_error!(
                    "Too many exception handlers - {}",
                    count
                ));
            }

            let kind = (SectionFlags::EHTABLE | SectionFlags::FAT_FORMAT).bits();
            buffer.extend_from_slice(&(((section_size as u32) << 8) | u32::from(kind)).to_le_bytes());

            for handler in &self.exception_handlers {
                buffer.extend_from_slice(&u32::from(handler.flags.bits()).to_le_bytes());
                buffer.extend_from_slice(&handler.try_offset.to_le_bytes());
                buffer.extend_from_slice(&handler.try_length.to_le_bytes());
                buffer.extend_from_slice(&handler.handler_offset.to_le_bytes());
                buffer.extend_from_slice(&handler.handler_length.to_le_bytes());
                buffer.extend_from_slice(&handler.filter_offset.to_le_bytes());
            }
        }

        Ok(())
    }
}
