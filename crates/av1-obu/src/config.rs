use std::io;

use bytes::Bytes;
use bytes_util::{BitReader, BitWriter, BytesCursorExt};

use crate::obu::seq::ChromaSamplePosition;

/// AV1 Codec Configuration Record
///
/// <https://aomediacodec.github.io/av1-isobmff/#av1codecconfigurationbox-syntax>
///
/// A default record has every scalar field zeroed and an empty `config_obu`;
/// [`crate::extract::extract_config_record`] populates it from a stream of
/// OBUs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AV1CodecConfigurationRecord {
    /// `seq_profile` from the sequence header.
    ///
    /// 3 bits
    pub seq_profile: u8,
    /// `seq_level_idx` of the first operating point.
    ///
    /// 5 bits
    pub seq_level_idx_0: u8,
    /// `seq_tier` of the first operating point; 0 unless its level is
    /// above 7.
    ///
    /// 1 bit
    pub seq_tier_0: bool,
    /// `high_bitdepth` from `color_config()`.
    ///
    /// 1 bit
    pub high_bitdepth: bool,
    /// `twelve_bit`; only signalled for profile 2 with `high_bitdepth` set.
    ///
    /// 1 bit
    pub twelve_bit: bool,
    /// `mono_chrome` from `color_config()`.
    ///
    /// 1 bit
    pub monochrome: bool,
    /// `subsampling_x` as derived in `color_config()`.
    ///
    /// 1 bit
    pub chroma_subsampling_x: bool,
    /// `subsampling_y` as derived in `color_config()`.
    ///
    /// 1 bit
    pub chroma_subsampling_y: bool,
    /// `chroma_sample_position`; [`ChromaSamplePosition::Unknown`] unless
    /// both subsamplings are set.
    ///
    /// 2 bits
    pub chroma_sample_position: ChromaSamplePosition,
    /// `initial_display_delay_present_flag` from the sequence header.
    ///
    /// 1 bit
    pub initial_presentation_delay_present: bool,
    /// `initial_display_delay_minus_1`; 0 when not signalled.
    ///
    /// 4 bits
    pub initial_presentation_delay_minus_one: u8,
    /// Zero or more complete on-wire OBUs, byte-identical to the input
    /// stream, in encounter order.
    pub config_obu: Bytes,
}

impl AV1CodecConfigurationRecord {
    /// Demuxes an ISOBMFF `av1C` payload from the given reader.
    pub fn demux(reader: &mut io::Cursor<Bytes>) -> io::Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        let marker = bit_reader.read_bit()?;
        if !marker {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "marker is not set",
            ));
        }

        let version = bit_reader.read_bits(7)? as u8;
        if version != 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "version is not 1",
            ));
        }

        let seq_profile = bit_reader.read_bits(3)? as u8;
        let seq_level_idx_0 = bit_reader.read_bits(5)? as u8;

        let seq_tier_0 = bit_reader.read_bit()?;
        let high_bitdepth = bit_reader.read_bit()?;
        let twelve_bit = bit_reader.read_bit()?;
        let monochrome = bit_reader.read_bit()?;
        let chroma_subsampling_x = bit_reader.read_bit()?;
        let chroma_subsampling_y = bit_reader.read_bit()?;
        let chroma_sample_position = ChromaSamplePosition::from(bit_reader.read_bits(2)? as u8);

        bit_reader.seek_bits(3)?; // reserved 3 bits

        let initial_presentation_delay_present = bit_reader.read_bit()?;
        let initial_presentation_delay_minus_one = if initial_presentation_delay_present {
            bit_reader.read_bits(4)? as u8
        } else {
            bit_reader.seek_bits(4)?; // reserved 4 bits
            0
        };

        if !bit_reader.is_aligned() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "bit reader is not aligned",
            ));
        }

        let reader = bit_reader.into_inner();

        Ok(AV1CodecConfigurationRecord {
            seq_profile,
            seq_level_idx_0,
            seq_tier_0,
            high_bitdepth,
            twelve_bit,
            monochrome,
            chroma_subsampling_x,
            chroma_subsampling_y,
            chroma_sample_position,
            initial_presentation_delay_present,
            initial_presentation_delay_minus_one,
            config_obu: reader.extract_remaining(),
        })
    }

    /// Returns the size of the `av1C` payload in bytes.
    pub fn size(&self) -> u64 {
        1 // marker, version
        + 1 // seq_profile, seq_level_idx_0
        + 1 // seq_tier_0, high_bitdepth, twelve_bit, monochrome, chroma_subsampling_x, chroma_subsampling_y, chroma_sample_position
        + 1 // reserved, initial_presentation_delay_present, initial_presentation_delay_minus_one/reserved
        + self.config_obu.len() as u64
    }

    /// Muxes the ISOBMFF `av1C` payload to the given writer.
    pub fn mux<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        let mut bit_writer = BitWriter::new(writer);

        bit_writer.write_bit(true)?; // marker
        bit_writer.write_bits(1, 7)?; // version

        bit_writer.write_bits(self.seq_profile as u64, 3)?;
        bit_writer.write_bits(self.seq_level_idx_0 as u64, 5)?;

        bit_writer.write_bit(self.seq_tier_0)?;
        bit_writer.write_bit(self.high_bitdepth)?;
        bit_writer.write_bit(self.twelve_bit)?;
        bit_writer.write_bit(self.monochrome)?;
        bit_writer.write_bit(self.chroma_subsampling_x)?;
        bit_writer.write_bit(self.chroma_subsampling_y)?;
        bit_writer.write_bits(u8::from(self.chroma_sample_position) as u64, 2)?;

        bit_writer.write_bits(0, 3)?; // reserved 3 bits

        bit_writer.write_bit(self.initial_presentation_delay_present)?;
        if self.initial_presentation_delay_present {
            bit_writer.write_bits(self.initial_presentation_delay_minus_one as u64, 4)?;
        } else {
            bit_writer.write_bits(0, 4)?; // reserved 4 bits
        }

        bit_writer.finish()?.write_all(&self.config_obu)?;

        Ok(())
    }
}

#[cfg(test)]
#[cfg_attr(all(test, coverage_nightly), coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_config_demux() {
        let data = b"\x81\r\x0c\0\n\x0f\0\0\0j\xef\xbf\xe1\xbc\x02\x19\x90\x10\x10\x10@".to_vec();

        let config = AV1CodecConfigurationRecord::demux(&mut io::Cursor::new(data.into())).unwrap();

        insta::assert_debug_snapshot!(config, @r#"
        AV1CodecConfigurationRecord {
            seq_profile: 0,
            seq_level_idx_0: 13,
            seq_tier_0: false,
            high_bitdepth: false,
            twelve_bit: false,
            monochrome: false,
            chroma_subsampling_x: true,
            chroma_subsampling_y: true,
            chroma_sample_position: Unknown,
            initial_presentation_delay_present: false,
            initial_presentation_delay_minus_one: 0,
            config_obu: b"\n\x0f\0\0\0j\xef\xbf\xe1\xbc\x02\x19\x90\x10\x10\x10@",
        }
        "#);
    }

    #[test]
    fn test_config_demux_with_initial_presentation_delay() {
        let data = b"\x81\r\x0c\x3f\n\x0f\0\0\0j\xef\xbf\xe1\xbc\x02\x19\x90\x10\x10\x10@".to_vec();

        let config = AV1CodecConfigurationRecord::demux(&mut io::Cursor::new(data.into())).unwrap();

        assert!(config.initial_presentation_delay_present);
        assert_eq!(config.initial_presentation_delay_minus_one, 15);
    }

    #[test]
    fn test_marker_is_not_set() {
        let data = vec![0b00000000];

        let err =
            AV1CodecConfigurationRecord::demux(&mut io::Cursor::new(data.into())).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "marker is not set");
    }

    #[test]
    fn test_version_is_not_1() {
        let data = vec![0b10000000];

        let err =
            AV1CodecConfigurationRecord::demux(&mut io::Cursor::new(data.into())).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "version is not 1");
    }

    #[test]
    fn test_config_mux() {
        let config = AV1CodecConfigurationRecord {
            config_obu: Bytes::from_static(b"HELLO FROM THE OBU"),
            ..Default::default()
        };

        let mut buf = Vec::new();
        config.mux(&mut buf).unwrap();

        assert_eq!(buf.len() as u64, config.size());
        insta::assert_snapshot!(format!("{:?}", Bytes::from(buf)), @r#"b"\x81\0\0\0HELLO FROM THE OBU""#);
    }

    #[test]
    fn test_config_mux_with_delay() {
        let config = AV1CodecConfigurationRecord {
            initial_presentation_delay_present: true,
            initial_presentation_delay_minus_one: 15,
            config_obu: Bytes::from_static(b"HELLO FROM THE OBU"),
            ..Default::default()
        };

        let mut buf = Vec::new();
        config.mux(&mut buf).unwrap();

        insta::assert_snapshot!(format!("{:?}", Bytes::from(buf)), @r#"b"\x81\0\0\x1fHELLO FROM THE OBU""#);
    }

    #[test]
    fn test_config_mux_demux_round_trip() {
        let config = AV1CodecConfigurationRecord {
            seq_profile: 2,
            seq_level_idx_0: 9,
            seq_tier_0: true,
            high_bitdepth: true,
            twelve_bit: true,
            monochrome: false,
            chroma_subsampling_x: true,
            chroma_subsampling_y: false,
            chroma_sample_position: ChromaSamplePosition::Unknown,
            initial_presentation_delay_present: true,
            initial_presentation_delay_minus_one: 3,
            config_obu: Bytes::from_static(&[0x0a, 0x00]),
        };

        let mut buf = Vec::new();
        config.mux(&mut buf).unwrap();

        let parsed =
            AV1CodecConfigurationRecord::demux(&mut io::Cursor::new(Bytes::from(buf))).unwrap();
        assert_eq!(parsed, config);
    }
}
