//! OBU framing over a low-overhead bitstream.
//!
//! Handles the low-overhead bitstream format defined in the AV1
//! specification (Section 5.2): OBUs concatenated back to back, each with a
//! header byte, an optional extension byte, an optional LEB128 size field,
//! and a payload.
//!
//! The walker tolerates `obu_has_size_field=0`: such an OBU contributes only
//! its 1-2 header bytes (no payload bounds are known) and the walk resumes at
//! the following byte. Container formats that imply the remaining size from
//! the frame boundary produce these.

use std::io;

use bytes::Bytes;
use bytes_util::BytesCursorExt;

use crate::error::{Av1Error, Result};
use crate::obu::{ObuExtension, ObuHeader, ObuType};

/// A single OBU as found on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obu {
    /// Parsed OBU header.
    pub header: ObuHeader,
    /// The complete on-wire bytes of this OBU: header byte, extension byte,
    /// size field, and payload, exactly as encoded in the input.
    pub raw: Bytes,
    /// Raw OBU payload (not including the header or size field). Empty when
    /// the OBU has no size field.
    pub data: Bytes,
}

/// Iterator over OBUs in a byte range.
///
/// Each call to `next()` parses one OBU header and slices its on-wire span
/// zero-copy out of the underlying buffer.
pub struct ObuIterator<'a> {
    reader: &'a mut io::Cursor<Bytes>,
}

impl<'a> ObuIterator<'a> {
    /// Creates a new iterator over the OBUs remaining in `reader`.
    pub fn new(reader: &'a mut io::Cursor<Bytes>) -> Self {
        Self { reader }
    }
}

impl Iterator for ObuIterator<'_> {
    type Item = Result<Obu>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.remaining() == 0 {
            return None;
        }

        Some(parse_obu(self.reader))
    }
}

fn parse_obu(reader: &mut io::Cursor<Bytes>) -> Result<Obu> {
    let start = reader.position() as usize;
    let header = ObuHeader::parse(reader)?;

    let data = match header.size {
        Some(size) => reader.extract_bytes(size as usize).map_err(|_| Av1Error::UnexpectedEof {
            expected: size as usize,
            actual: reader.remaining(),
        })?,
        None => Bytes::new(),
    };

    let raw = reader.get_ref().slice(start..reader.position() as usize);

    Ok(Obu { header, raw, data })
}

/// Writes a single OBU in low-overhead bitstream format.
///
/// Constructs the OBU header with `obu_has_size_field=1` and writes the
/// header followed by the payload data.
///
/// Returns the total number of bytes written (header + payload).
pub fn write_obu<W: io::Write>(
    writer: &mut W,
    obu_type: ObuType,
    extension: Option<ObuExtension>,
    payload: &[u8],
) -> Result<usize> {
    let header = ObuHeader {
        obu_type,
        size: Some(payload.len() as u64),
        extension,
    };

    let header_bytes = header.mux(writer)?;
    writer.write_all(payload)?;

    Ok(header_bytes + payload.len())
}
