//! OBU framing primitives.
//!
//! An OBU starts with a single header byte, laid out MSB first:
//!
//! | bit 7     | bits 6..3  | bit 2          | bit 1           | bit 0    |
//! |-----------|------------|----------------|-----------------|----------|
//! | forbidden | `obu_type` | extension flag | has-size flag   | reserved |
//!
//! The extension flag announces one extra byte carrying scalability ids, and
//! the has-size flag announces a LEB128 payload length. Everything here works
//! on whole bytes; only payloads need a bit reader.

use std::io;

use byteorder::{ReadBytesExt, WriteBytesExt};
use utils::{leb128_size, read_leb128, write_leb128};

pub mod seq;
pub mod utils;

const EXTENSION_FLAG: u8 = 0b0000_0100;
const HAS_SIZE_FLAG: u8 = 0b0000_0010;

/// Semantic OBU type, decoded from the 4-bit `obu_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObuType {
    /// Sequence header, type 1.
    SequenceHeader,
    /// Temporal delimiter, type 2.
    TemporalDelimiter,
    /// Frame header, type 3.
    FrameHeader,
    /// Tile group, type 4.
    TileGroup,
    /// Metadata, type 5.
    Metadata,
    /// Frame, a frame header and tile group in one OBU, type 6.
    Frame,
    /// Redundant frame header, type 7.
    RedundantFrameHeader,
    /// Padding, type 15.
    Padding,
    /// Any other type value, kept as read. Tile lists (8) land here; no
    /// dispatch rule in this crate distinguishes them.
    Reserved(u8),
}

impl ObuType {
    /// Decodes a 4-bit `obu_type` value.
    pub const fn from_bits(bits: u8) -> Self {
        match bits {
            1 => Self::SequenceHeader,
            2 => Self::TemporalDelimiter,
            3 => Self::FrameHeader,
            4 => Self::TileGroup,
            5 => Self::Metadata,
            6 => Self::Frame,
            7 => Self::RedundantFrameHeader,
            15 => Self::Padding,
            other => Self::Reserved(other),
        }
    }

    /// The 4-bit wire value of this type.
    pub const fn bits(self) -> u8 {
        match self {
            Self::SequenceHeader => 1,
            Self::TemporalDelimiter => 2,
            Self::FrameHeader => 3,
            Self::TileGroup => 4,
            Self::Metadata => 5,
            Self::Frame => 6,
            Self::RedundantFrameHeader => 7,
            Self::Padding => 15,
            Self::Reserved(other) => other,
        }
    }
}

/// Scalability ids from the optional `obu_extension_header()` byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObuExtension {
    /// Temporal layer id, top 3 bits of the extension byte.
    pub temporal_id: u8,
    /// Spatial layer id, the following 2 bits.
    pub spatial_id: u8,
}

/// One OBU header as it appears on the wire: the header byte, the optional
/// extension byte, and the optional LEB128 payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObuHeader {
    /// The kind of payload this OBU carries.
    pub obu_type: ObuType,
    /// Payload length in bytes; `None` when the has-size flag is clear.
    pub size: Option<u64>,
    /// Scalability ids; `None` when the extension flag is clear.
    pub extension: Option<ObuExtension>,
}

impl ObuHeader {
    /// Reads one OBU header from `reader`.
    ///
    /// The forbidden bit and the reserved bits are not checked; the walker
    /// relies only on the type, extension, and size fields.
    pub fn parse(reader: &mut impl io::Read) -> io::Result<Self> {
        let byte = reader.read_u8()?;

        let obu_type = ObuType::from_bits((byte >> 3) & 0x0f);

        let extension = if byte & EXTENSION_FLAG != 0 {
            let ext = reader.read_u8()?;
            Some(ObuExtension {
                temporal_id: ext >> 5,
                spatial_id: (ext >> 3) & 0b11,
            })
        } else {
            None
        };

        let size = if byte & HAS_SIZE_FLAG != 0 {
            Some(read_leb128(reader)?)
        } else {
            None
        };

        Ok(Self {
            obu_type,
            size,
            extension,
        })
    }

    /// Writes this header to `writer`, re-encoding the size as minimal
    /// LEB128.
    ///
    /// Returns the number of bytes written.
    pub fn mux<W: io::Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut byte = self.obu_type.bits() << 3;
        if self.extension.is_some() {
            byte |= EXTENSION_FLAG;
        }
        if self.size.is_some() {
            byte |= HAS_SIZE_FLAG;
        }
        writer.write_u8(byte)?;
        let mut written = 1;

        if let Some(ext) = self.extension {
            writer.write_u8((ext.temporal_id & 0b111) << 5 | (ext.spatial_id & 0b11) << 3)?;
            written += 1;
        }
        if let Some(size) = self.size {
            written += write_leb128(writer, size)?;
        }

        Ok(written)
    }

    /// The encoded length of this header in bytes.
    pub fn header_size(&self) -> usize {
        1 + self.extension.is_some() as usize + self.size.map_or(0, leb128_size)
    }
}
