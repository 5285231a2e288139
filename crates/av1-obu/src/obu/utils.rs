use std::io;

use byteorder::{ReadBytesExt, WriteBytesExt};
use bytes_util::BitReader;

/// Decodes an AV1 LEB128-coded unsigned integer.
///
/// Byte `i` contributes its low seven bits shifted up by `7 * i`; the first
/// byte with the high bit clear terminates the value, after at most 8 bytes.
/// Sizes in conforming streams fit 32 bits; anything larger is rejected.
pub fn read_leb128(reader: &mut impl io::Read) -> io::Result<u64> {
    let mut value = 0u64;
    for i in 0..8 {
        let byte = reader.read_u8()?;
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            break;
        }
    }
    if value > u64::from(u32::MAX) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "LEB128 value exceeds u32::MAX",
        ));
    }
    Ok(value)
}

/// Encodes `value` as minimal LEB128.
///
/// Returns the number of bytes written (1-8).
pub fn write_leb128<W: io::Write>(writer: &mut W, mut value: u64) -> io::Result<usize> {
    let mut written = 0;
    loop {
        let group = (value & 0x7f) as u8;
        value >>= 7;
        writer.write_u8(if value != 0 { group | 0x80 } else { group })?;
        written += 1;
        if value == 0 {
            return Ok(written);
        }
    }
}

/// Returns the number of bytes a minimal LEB128 encoding of `value` takes.
pub fn leb128_size(value: u64) -> usize {
    // Seven payload bits per byte.
    value.checked_ilog2().unwrap_or(0) as usize / 7 + 1
}

/// Read a variable-length unsigned integer.
/// AV1-Spec-2 - 4.10.3
///
/// A code with 32 leading zero bits is malformed and rejected.
pub fn read_uvlc<T: io::Read>(reader: &mut BitReader<T>) -> io::Result<u64> {
    let mut leading_zeros: u8 = 0;
    while !reader.read_bit()? {
        leading_zeros += 1;
        if leading_zeros == 32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "UVLC code with 32 leading zero bits",
            ));
        }
    }

    let value = reader.read_bits(leading_zeros)?;
    Ok(value + (1 << leading_zeros) - 1)
}
