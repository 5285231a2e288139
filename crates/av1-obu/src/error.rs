//! Error types for AV1 OBU parsing and sample assembly.

use thiserror::Error;

/// Errors that can occur while parsing OBU streams or assembling samples.
#[derive(Error, Debug)]
pub enum Av1Error {
    /// An I/O error occurred. Bit-level decode failures (truncated reads,
    /// LEB128 overflow, malformed UVLC) surface here as `InvalidData` or
    /// `UnexpectedEof`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sequence header signals a still-picture stream
    /// (`still_picture` or `reduced_still_picture_header` set).
    #[error("still-picture streams are not supported")]
    StillPictureStream,

    /// A metadata OBU was found while extracting the configuration record.
    #[error("metadata OBUs in the configuration stream are not supported")]
    UnsupportedMetadataObu,

    /// An OBU declared a payload size extending past the end of the data.
    #[error("unexpected end of data: expected {expected} bytes, got {actual}")]
    UnexpectedEof {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes available.
        actual: usize,
    },
}

/// Result type alias for AV1 OBU operations.
pub type Result<T> = std::result::Result<T, Av1Error>;
