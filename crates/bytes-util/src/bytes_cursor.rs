use std::io;

use bytes::Bytes;

/// Zero-copy extraction helpers for `io::Cursor<Bytes>`.
pub trait BytesCursorExt {
    /// Returns the number of bytes left in the cursor.
    fn remaining(&self) -> usize;

    /// Extracts everything from the current position to the end.
    ///
    /// O(1); the returned `Bytes` shares the underlying buffer.
    fn extract_remaining(&mut self) -> Bytes;

    /// Extracts `size` bytes from the current position.
    ///
    /// O(1); errors with `UnexpectedEof` if fewer than `size` bytes remain.
    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes>;
}

impl BytesCursorExt for io::Cursor<Bytes> {
    fn remaining(&self) -> usize {
        self.get_ref().len().saturating_sub(self.position() as usize)
    }

    fn extract_remaining(&mut self) -> Bytes {
        // remaining() can never overshoot the buffer.
        self.extract_bytes(self.remaining()).expect("remaining bytes")
    }

    fn extract_bytes(&mut self, size: usize) -> io::Result<Bytes> {
        let position = self.position() as usize;
        if position + size > self.get_ref().len() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "not enough bytes"));
        }

        let slice = self.get_ref().slice(position..position + size);
        self.set_position((position + size) as u64);

        Ok(slice)
    }
}
