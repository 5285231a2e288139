//! Sequence-header extraction for the codec configuration record.

use std::io;

use bytes::{Bytes, BytesMut};
use tracing::{debug, trace};

use crate::config::AV1CodecConfigurationRecord;
use crate::error::{Av1Error, Result};
use crate::obu::ObuType;
use crate::obu::seq::SequenceHeaderObu;
use crate::obu_stream::ObuIterator;

/// Builds an [`AV1CodecConfigurationRecord`] from a range of concatenated
/// low-overhead OBUs.
///
/// Every sized sequence-header OBU in `data` is decoded into the record's
/// scalar fields (a later sequence header overwrites an earlier one) and its
/// complete on-wire bytes are appended to `config_obu`, byte-identical and in
/// encounter order. OBUs without a size field are skipped regardless of
/// type. A range without any sequence header yields a default record with an
/// empty `config_obu`.
///
/// Fails on still-picture streams, on metadata OBUs, and on malformed
/// framing; no partial record is returned.
pub fn extract_config_record(data: &Bytes) -> Result<AV1CodecConfigurationRecord> {
    let mut cursor = io::Cursor::new(data.clone());
    let mut record = AV1CodecConfigurationRecord::default();
    let mut config_obus = BytesMut::new();

    for obu in ObuIterator::new(&mut cursor) {
        let obu = obu?;
        if obu.header.size.is_none() {
            continue;
        }

        match obu.header.obu_type {
            ObuType::SequenceHeader => {
                let seq = SequenceHeaderObu::parse(&mut io::Cursor::new(obu.data.clone()))?;

                record.seq_profile = seq.seq_profile;
                record.seq_level_idx_0 = seq.seq_level_idx_0;
                record.seq_tier_0 = seq.seq_tier_0;
                record.high_bitdepth = seq.color_config.high_bitdepth;
                record.twelve_bit = seq.color_config.twelve_bit;
                record.monochrome = seq.color_config.monochrome;
                record.chroma_subsampling_x = seq.color_config.subsampling_x;
                record.chroma_subsampling_y = seq.color_config.subsampling_y;
                record.chroma_sample_position = seq.color_config.chroma_sample_position;
                record.initial_presentation_delay_present =
                    seq.initial_presentation_delay_present;
                record.initial_presentation_delay_minus_one =
                    seq.initial_presentation_delay_minus_one;

                debug!(size = obu.raw.len(), "found sequence header OBU");
                config_obus.extend_from_slice(&obu.raw);
            }
            ObuType::Metadata => {
                // TODO: append metadata OBUs to config_obu; the ISOBMFF
                // binding stores them alongside the sequence header.
                return Err(Av1Error::UnsupportedMetadataObu);
            }
            obu_type => {
                trace!(?obu_type, "skipping OBU");
            }
        }
    }

    record.config_obu = config_obus.freeze();
    Ok(record)
}
