//! Bit-level readers and writers plus zero-copy helpers for `Cursor<Bytes>`.
#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]

mod bit_read;
mod bit_write;
mod bytes_cursor;

pub use bit_read::BitReader;
pub use bit_write::BitWriter;
pub use bytes_cursor::BytesCursorExt;
