//! Sample assembly for ISOBMFF storage.
//!
//! An AV1 access unit stored in an MP4 sample keeps only the OBU kinds that
//! carry coded data or metadata; temporal delimiters, padding, and redundant
//! frame headers are stripped. The kept OBUs are copied byte-for-byte from
//! the packet.

use std::io;

use bytes::{Bytes, BytesMut};
use bytes_util::BitReader;
use tracing::trace;

use crate::error::Result;
use crate::obu::ObuType;
use crate::obu_stream::ObuIterator;

/// One assembled access unit ready for ISOBMFF storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledSample {
    /// The filtered OBU bytes.
    pub data: Bytes,
    /// Whether the sample is a sync sample (starts a decodable sequence).
    pub is_sync: bool,
}

/// Returns `true` for OBU types that belong in a stored sample.
const fn is_sample_obu(obu_type: ObuType) -> bool {
    matches!(
        obu_type,
        ObuType::SequenceHeader
            | ObuType::FrameHeader
            | ObuType::TileGroup
            | ObuType::Metadata
            | ObuType::Frame
    )
}

/// Decodes the `uncompressed_header()` prefix of a frame header payload and
/// returns whether it starts a key frame.
///
/// Returns `false` on any read failure.
fn is_key_frame(payload: &Bytes) -> bool {
    let mut bit_reader = BitReader::new_from_slice(payload.as_ref());

    match bit_reader.read_bit() {
        // show_existing_frame repeats a previously decoded frame.
        Ok(true) | Err(_) => false,
        // KEY_FRAME is frame_type 0.
        Ok(false) => matches!(bit_reader.read_bits(2), Ok(0)),
    }
}

/// Assembles one access unit from a packet of concatenated OBUs.
///
/// Keeps sequence-header, frame-header, tile-group, metadata, and frame OBUs,
/// copied byte-for-byte including their size fields; drops everything else.
/// An OBU without a size field contributes only its 1-2 header bytes.
///
/// The sample is classified as sync when a frame-header OBU follows a
/// sequence header within the packet and its uncompressed header carries
/// `frame_type == KEY_FRAME` without `show_existing_frame`.
pub fn assemble_sample(packet: &Bytes) -> Result<AssembledSample> {
    let mut cursor = io::Cursor::new(packet.clone());
    let mut data = BytesMut::with_capacity(packet.len());
    let mut seen_sequence_header = false;
    let mut is_sync = false;

    for obu in ObuIterator::new(&mut cursor) {
        let obu = obu?;

        if !is_sample_obu(obu.header.obu_type) {
            trace!(obu_type = ?obu.header.obu_type, "dropping OBU from sample");
            continue;
        }

        if obu.header.size.is_some() {
            if obu.header.obu_type == ObuType::SequenceHeader {
                seen_sequence_header = true;
            } else if obu.header.obu_type == ObuType::FrameHeader && seen_sequence_header {
                // A sync sample carries its sequence header ahead of the
                // frame header.
                is_sync = is_key_frame(&obu.data);
            }
        }

        data.extend_from_slice(&obu.raw);
    }

    Ok(AssembledSample {
        data: data.freeze(),
        is_sync,
    })
}
