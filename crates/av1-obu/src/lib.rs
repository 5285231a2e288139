//! AV1 OBU parsing for ISO-BMFF (MP4) muxing.
//!
//! Supports:
//! - OBU (Open Bitstream Unit) header parsing and writing
//! - OBU framing over low-overhead bitstreams, tolerant of a missing
//!   `obu_has_size_field`
//! - Sequence header OBU parsing (the subset an `av1C` box needs)
//! - AV1 Codec Configuration Record extraction and ISOBMFF serialization
//! - Sample assembly with sync (key frame) detection
//!
//! The two top-level operations are [`extract_config_record`], which walks a
//! stream of OBUs and produces the codec configuration record with the raw
//! sequence-header bytes retained verbatim, and [`assemble_sample`], which
//! filters one packet down to the OBUs stored in an MP4 sample and classifies
//! it as a sync sample.
//!
//! Still-picture and reduced-still-picture streams are rejected. Tile data,
//! film grain, and metadata OBU payloads are never decoded.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

mod config;
pub mod error;
mod extract;
mod obu;
pub mod obu_stream;
pub mod sample;

pub use config::AV1CodecConfigurationRecord;
pub use error::{Av1Error, Result};
pub use extract::extract_config_record;
pub use obu::utils::{leb128_size, read_leb128, read_uvlc, write_leb128};
pub use obu::{ObuExtension, ObuHeader, ObuType, seq};
pub use sample::{AssembledSample, assemble_sample};
