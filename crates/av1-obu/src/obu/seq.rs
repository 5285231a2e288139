//! Sequence header OBU parsing.
//!
//! Decodes `sequence_header_obu()` down to the fields an
//! [`AV1CodecConfigurationRecord`](crate::AV1CodecConfigurationRecord)
//! carries; every other field is consumed at its exact bit width and
//! discarded.

use std::io;

use byteorder::{BigEndian, ReadBytesExt};
use bytes_util::BitReader;

use crate::error::{Av1Error, Result};
use crate::obu::utils::read_uvlc;

/// `chroma_sample_position`
/// AV1-Spec-2 - 6.4.2
#[derive(Debug, Clone, PartialEq, Eq, Copy, Default)]
pub enum ChromaSamplePosition {
    /// `CSP_UNKNOWN`
    #[default]
    Unknown,
    /// `CSP_VERTICAL`
    Vertical,
    /// `CSP_COLOCATED`
    Colocated,
    /// `CSP_RESERVED`
    Reserved,
}

impl From<u8> for ChromaSamplePosition {
    fn from(value: u8) -> Self {
        match value {
            1 => ChromaSamplePosition::Vertical,
            2 => ChromaSamplePosition::Colocated,
            3 => ChromaSamplePosition::Reserved,
            _ => ChromaSamplePosition::Unknown,
        }
    }
}

impl From<ChromaSamplePosition> for u8 {
    fn from(value: ChromaSamplePosition) -> Self {
        match value {
            ChromaSamplePosition::Unknown => 0,
            ChromaSamplePosition::Vertical => 1,
            ChromaSamplePosition::Colocated => 2,
            ChromaSamplePosition::Reserved => 3,
        }
    }
}

/// The `color_config()` fields a configuration record needs.
/// AV1-Spec-2 - 5.5.2
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct ColorConfig {
    /// `high_bitdepth`
    pub high_bitdepth: bool,
    /// `twelve_bit`, present only for profile 2 with `high_bitdepth` set
    pub twelve_bit: bool,
    /// `mono_chrome`, forced to 0 for profile 1
    pub monochrome: bool,
    /// `subsampling_x`
    pub subsampling_x: bool,
    /// `subsampling_y`
    pub subsampling_y: bool,
    /// `chroma_sample_position`, read only when both subsamplings are set
    pub chroma_sample_position: ChromaSamplePosition,
}

impl ColorConfig {
    /// Parses `color_config()` for the given `seq_profile`.
    ///
    /// The trailing `separate_uv_delta_q` bit is left unread.
    pub fn parse(seq_profile: u8, bit_reader: &mut BitReader<impl io::Read>) -> io::Result<Self> {
        const CP_BT_709: u8 = 1;
        const TC_SRGB: u8 = 13;
        const MC_IDENTITY: u8 = 0;

        let high_bitdepth = bit_reader.read_bit()?;
        let mut twelve_bit = false;
        let bit_depth = if seq_profile == 2 && high_bitdepth {
            twelve_bit = bit_reader.read_bit()?;
            if twelve_bit { 12 } else { 10 }
        } else if high_bitdepth {
            10
        } else {
            8
        };

        let monochrome = if seq_profile == 1 { false } else { bit_reader.read_bit()? };

        let color_description_present_flag = bit_reader.read_bit()?;
        let (color_primaries, transfer_characteristics, matrix_coefficients) =
            if color_description_present_flag {
                (
                    bit_reader.read_bits(8)? as u8,
                    bit_reader.read_bits(8)? as u8,
                    bit_reader.read_bits(8)? as u8,
                )
            } else {
                // CP_UNSPECIFIED, TC_UNSPECIFIED, MC_UNSPECIFIED
                (2, 2, 2)
            };

        if monochrome {
            bit_reader.read_bit()?; // color_range
            return Ok(ColorConfig {
                high_bitdepth,
                twelve_bit,
                monochrome,
                subsampling_x: true,
                subsampling_y: true,
                chroma_sample_position: ChromaSamplePosition::Unknown,
            });
        }

        let subsampling_x;
        let subsampling_y;
        if color_primaries == CP_BT_709
            && transfer_characteristics == TC_SRGB
            && matrix_coefficients == MC_IDENTITY
        {
            // color_range = 1 implied, no bit consumed
            subsampling_x = false;
            subsampling_y = false;
        } else {
            bit_reader.read_bit()?; // color_range
            if seq_profile == 0 {
                subsampling_x = true;
                subsampling_y = true;
            } else if seq_profile == 1 {
                subsampling_x = false;
                subsampling_y = false;
            } else if bit_depth == 12 {
                subsampling_x = bit_reader.read_bit()?;
                subsampling_y = if subsampling_x { bit_reader.read_bit()? } else { false };
            } else {
                subsampling_x = true;
                subsampling_y = false;
            }
        }

        let chroma_sample_position = if subsampling_x && subsampling_y {
            ChromaSamplePosition::from(bit_reader.read_bits(2)? as u8)
        } else {
            ChromaSamplePosition::Unknown
        };

        Ok(ColorConfig {
            high_bitdepth,
            twelve_bit,
            monochrome,
            subsampling_x,
            subsampling_y,
            chroma_sample_position,
        })
    }
}

/// The `sequence_header_obu()` fields a configuration record needs.
/// AV1-Spec-2 - 5.5.1
///
/// Everything else in the sequence header is consumed and discarded; only
/// the fields stored in an `av1C` box are kept.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct SequenceHeaderObu {
    /// `seq_profile`
    pub seq_profile: u8,
    /// `seq_level_idx` of the first operating point
    pub seq_level_idx_0: u8,
    /// `seq_tier` of the first operating point, present when its level is
    /// above 7
    pub seq_tier_0: bool,
    /// `initial_display_delay_present_flag`
    pub initial_presentation_delay_present: bool,
    /// `initial_display_delay_minus_1`, 0 when not signalled
    pub initial_presentation_delay_minus_one: u8,
    /// `color_config()`
    pub color_config: ColorConfig,
}

impl SequenceHeaderObu {
    /// Parses a sequence header OBU payload.
    ///
    /// Still-picture streams (`still_picture` or
    /// `reduced_still_picture_header` set) are rejected. Parsing stops after
    /// `color_config()`; `film_grain_params_present` is never read.
    pub fn parse(reader: &mut impl io::Read) -> Result<Self> {
        let mut bit_reader = BitReader::new(reader);

        let seq_profile = bit_reader.read_bits(3)? as u8;

        let still_picture = bit_reader.read_bit()?;
        let reduced_still_picture_header = bit_reader.read_bit()?;
        if still_picture || reduced_still_picture_header {
            return Err(Av1Error::StillPictureStream);
        }

        let mut decoder_model_info_present = false;
        let mut buffer_delay_length_minus_1 = 0u8;

        let timing_info_present_flag = bit_reader.read_bit()?;
        if timing_info_present_flag {
            bit_reader.read_u32::<BigEndian>()?; // num_units_in_display_tick
            bit_reader.read_u32::<BigEndian>()?; // time_scale
            let equal_picture_interval = bit_reader.read_bit()?;
            if equal_picture_interval {
                read_uvlc(&mut bit_reader)?; // num_ticks_per_picture_minus_1
            }
            decoder_model_info_present = bit_reader.read_bit()?;
            if decoder_model_info_present {
                buffer_delay_length_minus_1 = bit_reader.read_bits(5)? as u8;
                bit_reader.read_u32::<BigEndian>()?; // num_units_in_decoding_tick
                bit_reader.read_bits(5)?; // buffer_removal_time_length_minus_1
                bit_reader.read_bits(5)?; // frame_presentation_time_length_minus_1
            }
        }

        let initial_presentation_delay_present = bit_reader.read_bit()?;

        let mut seq_level_idx_0 = 0;
        let mut seq_tier_0 = false;

        let operating_points_cnt_minus_1 = bit_reader.read_bits(5)? as u8;
        for i in 0..=operating_points_cnt_minus_1 {
            bit_reader.read_bits(12)?; // operating_point_idc
            let seq_level_idx = bit_reader.read_bits(5)? as u8;
            if i == 0 {
                seq_level_idx_0 = seq_level_idx;
            }
            if seq_level_idx > 7 {
                let seq_tier = bit_reader.read_bit()?;
                if i == 0 {
                    seq_tier_0 = seq_tier;
                }
            }
            if decoder_model_info_present {
                // decoder_model_present_for_this_op
                if bit_reader.read_bit()? {
                    bit_reader.read_bits(buffer_delay_length_minus_1 + 1)?; // decoder_buffer_delay
                    bit_reader.read_bits(buffer_delay_length_minus_1 + 1)?; // encoder_buffer_delay
                    bit_reader.read_bit()?; // low_delay_mode_flag
                }
            }
        }

        // A single delay value is read here; the record carries one.
        let mut initial_presentation_delay_minus_one = 0;
        if initial_presentation_delay_present {
            // initial_display_delay_present_for_this_op
            if bit_reader.read_bit()? {
                initial_presentation_delay_minus_one = bit_reader.read_bits(4)? as u8;
            }
        }

        let frame_width_bits_minus_1 = bit_reader.read_bits(4)? as u8;
        let frame_height_bits_minus_1 = bit_reader.read_bits(4)? as u8;
        bit_reader.read_bits(frame_width_bits_minus_1 + 1)?; // max_frame_width_minus_1
        bit_reader.read_bits(frame_height_bits_minus_1 + 1)?; // max_frame_height_minus_1

        let frame_id_numbers_present_flag = bit_reader.read_bit()?;
        if frame_id_numbers_present_flag {
            bit_reader.read_bits(4)?; // delta_frame_id_length_minus_2
            bit_reader.read_bits(3)?; // additional_frame_id_length_minus_1
        }

        // use_128x128_superblock, enable_filter_intra, enable_intra_edge_filter
        bit_reader.read_bits(3)?;
        // enable_interintra_compound, enable_masked_compound,
        // enable_warped_motion, enable_dual_filter
        bit_reader.read_bits(4)?;

        let enable_order_hint = bit_reader.read_bit()?;
        if enable_order_hint {
            bit_reader.read_bits(2)?; // enable_jnt_comp, enable_ref_frame_mvs
        }

        let seq_force_screen_content_tools = if bit_reader.read_bit()? {
            2 // SELECT_SCREEN_CONTENT_TOOLS
        } else {
            bit_reader.read_bits(1)? as u8
        };
        if seq_force_screen_content_tools > 0 {
            // seq_choose_integer_mv
            if bit_reader.read_bit()? {
                bit_reader.read_bits(1)?; // seq_force_integer_mv
            }
        }

        if enable_order_hint {
            bit_reader.read_bits(3)?; // order_hint_bits_minus_1
        }

        // enable_superres, enable_cdef, enable_restoration
        bit_reader.read_bits(3)?;

        let color_config = ColorConfig::parse(seq_profile, &mut bit_reader)?;

        Ok(Self {
            seq_profile,
            seq_level_idx_0,
            seq_tier_0,
            initial_presentation_delay_present,
            initial_presentation_delay_minus_one,
            color_config,
        })
    }
}
