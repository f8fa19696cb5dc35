//! Metadata root (ECMA-335 II.24.2.1): the `BSJB` signature, version string and stream
//! directory at the start of every module image.

use crate::{
    file::io::{read_le, read_le_at},
    metadata::streams::StreamHeader,
    Error::OutOfBounds,
    Result,
};

/// Signature of the metadata root, `BSJB` read as a little-endian `u32`
pub const CIL_HEADER_MAGIC: u32 = 0x424A_5342;

/// Version string written into generated images
pub const DEFAULT_VERSION: &str = "v4.0.30319";

/// The metadata root header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    /// Magic signature, always [`CIL_HEADER_MAGIC`]
    pub signature: u32,
    /// Major version, 1
    pub major_version: u16,
    /// Minor version, 1
    pub minor_version: u16,
    /// Reserved, always 0
    pub reserved: u32,
    /// Length of the version string including its padding
    pub length: u32,
    /// Version string without padding
    pub version: String,
    /// Reserved, always 0
    pub flags: u16,
    /// Number of streams
    pub stream_number: u16,
    /// The stream directory
    pub stream_headers: Vec<StreamHeader>,
}

impl Root {
    /// Create a root for `stream_headers` with the default version string
    #[must_use]
    pub fn new(stream_headers: Vec<StreamHeader>) -> Root {
        let version = DEFAULT_VERSION.to_string();
        #[allow(clippy::cast_possible_truncation)]
        Root {
            signature: CIL_HEADER_MAGIC,
            major_version: 1,
            minor_version: 1,
            reserved: 0,
            length: ((version.len() + 1 + 3) & !3) as u32,
            version,
            flags: 0,
            stream_number: stream_headers.len() as u16,
            stream_headers,
        }
    }

    /// Parse the root from the start of a metadata image.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] or [`crate::Error::Malformed`] if the signature,
    /// version string or stream directory is damaged.
    pub fn read(data: &[u8]) -> Result<Root> {
        if data.len() < 36 {
            return Err(OutOfBounds);
        }

        let signature = read_le::<u32>(data)?;
        if signature != CIL_HEADER_MAGIC {
            return Err(malformed_error!(
                "CIL_HEADER_MAGIC does not match - {}",
                signature
            ));
        }

        let version_string_length = read_le_at::<u32>(data, &mut 12)?;
        match u32::checked_add(version_string_length, 20_u32) {
            Some(str_end) => {
                let data_len = u32::try_from(data.len())
                    .map_err(|_| malformed_error!("Data length too large"))?;
                if str_end > data_len {
                    return Err(OutOfBounds);
                }
            }
            None => {
                return Err(malformed_error!(
                    "Version string length causing integer overflow - {} + {}",
                    version_string_length,
                    20
                ))
            }
        }

        let version_len = version_string_length as usize;
        let version_bytes = &data[16..16 + version_len];
        let version_end = version_bytes
            .iter()
            .position(|byte| *byte == 0)
            .unwrap_or(version_len);
        let version = String::from_utf8_lossy(&version_bytes[..version_end]).into_owned();

        let flags = read_le::<u16>(&data[16 + version_len..])?;
        let stream_count = read_le::<u16>(&data[18 + version_len..])?;
        if stream_count == 0 || stream_count > 5 || (stream_count as usize * 9) > data.len() {
            // 9 - min size that a valid StreamHeader can be; Must have streams, no more than 5 possible
            return Err(malformed_error!("Invalid stream count - {}", stream_count));
        }

        let mut streams: Vec<StreamHeader> = Vec::with_capacity(stream_count as usize);
        let mut stream_offset = version_len + 20;
        for _ in 0..stream_count {
            if stream_offset > data.len() {
                return Err(OutOfBounds);
            }

            let new_stream = StreamHeader::from(&data[stream_offset..])?;
            match u32::checked_add(new_stream.offset, new_stream.size) {
                Some(range) => {
                    if range as usize > data.len() {
                        return Err(OutOfBounds);
                    }
                }
                None => {
                    return Err(malformed_error!(
                        "Stream offset and size cause integer overflow - {} + {}",
                        new_stream.offset,
                        new_stream.size
                    ))
                }
            }

            if streams.iter().any(|stream| stream.name == new_stream.name) {
                return Err(malformed_error!("Duplicate stream - {}", new_stream.name));
            }

            stream_offset += new_stream.encoded_size();
            streams.push(new_stream);
        }

        Ok(Root {
            signature,
            major_version: read_le::<u16>(&data[4..])?,
            minor_version: read_le::<u16>(&data[6..])?,
            reserved: read_le::<u32>(&data[8..])?,
            length: version_string_length,
            version,
            flags,
            stream_number: stream_count,
            stream_headers: streams,
        })
    }

    /// Find a stream header by name
    #[must_use]
    pub fn stream(&self, name: &str) -> Option<&StreamHeader> {
        self.stream_headers.iter().find(|header| header.name == name)
    }

    /// Size of the encoded root including the stream directory
    #[must_use]
    pub fn encoded_size(&self) -> usize {
        20 + self.length as usize
            + self
                .stream_headers
                .iter()
                .map(StreamHeader::encoded_size)
                .sum::<usize>()
    }

    /// Append the encoded root and stream directory to `out`
    pub fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.signature.to_le_bytes());
        out.extend_from_slice(&self.major_version.to_le_bytes());
        out.extend_from_slice(&self.minor_version.to_le_bytes());
        out.extend_from_slice(&self.reserved.to_le_bytes());
        out.extend_from_slice(&self.length.to_le_bytes());

        let version_start = out.len();
        out.extend_from_slice(self.version.as_bytes());
        out.resize(version_start + self.length as usize, 0);

        out.extend_from_slice(&self.flags.to_le_bytes());
        out.extend_from_slice(&self.stream_number.to_le_bytes());
        for header in &self.stream_headers {
            header.write(out);
        }
    }
}
