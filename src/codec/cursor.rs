// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Byte cursor for codec implementations.
//!
//! Tracks a read offset over the session's mapped bytes and provides
//! bounds-checked fixed-width, endian-aware and line-oriented reads. Every
//! failed read leaves the offset where it was.
//!
//! # Example
//!
//! ```
//! use byteorder::BigEndian;
//! use swathio::codec::ByteCursor;
//!
//! let data = [0x00, 0x00, 0x00, 0x2A, b'o', b'k', b'\n'];
//! let mut cursor = ByteCursor::new(&data);
//! assert_eq!(cursor.read_u32::<BigEndian>().unwrap(), 42);
//! assert_eq!(cursor.read_line(), Some(&b"ok"[..]));
//! assert!(cursor.is_at_end());
//! ```

use byteorder::ByteOrder;

use super::DecodeError;

/// Read position over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Current read position.
    #[inline]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Move to an absolute position, clamped to the end of the data.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.offset = position.min(self.data.len());
    }

    /// Bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Unread part of the buffer.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        if self.remaining() < needed {
            return Err(DecodeError::Truncated {
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.ensure(len)?;
        let bytes = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(bytes)
    }

    /// Advance without reading.
    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.ensure(len)?;
        self.offset += len;
        Ok(())
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16<B: ByteOrder>(&mut self) -> Result<u16, DecodeError> {
        Ok(B::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u32<B: ByteOrder>(&mut self) -> Result<u32, DecodeError> {
        Ok(B::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32<B: ByteOrder>(&mut self) -> Result<i32, DecodeError> {
        Ok(B::read_i32(self.read_bytes(4)?))
    }

    pub fn read_f64<B: ByteOrder>(&mut self) -> Result<f64, DecodeError> {
        Ok(B::read_f64(self.read_bytes(8)?))
    }

    /// Read a `u16` length prefix followed by that many UTF-8 bytes.
    pub fn read_short_string<B: ByteOrder>(&mut self) -> Result<String, DecodeError> {
        let start = self.offset;
        let len = self.read_u16::<B>()? as usize;
        match self.read_bytes(len) {
            Ok(bytes) => String::from_utf8(bytes.to_vec())
                .map_err(|e| DecodeError::Malformed(format!("invalid UTF-8 string: {e}"))),
            Err(e) => {
                self.offset = start;
                Err(e)
            }
        }
    }

    /// Read up to the next line terminator and consume it.
    ///
    /// Accepts `\n` and `\r\n`. Returns `None` at end of data. The final line
    /// need not be terminated.
    pub fn read_line(&mut self) -> Option<&'a [u8]> {
        if self.is_at_end() {
            return None;
        }
        let rest = self.rest();
        let (line, consumed) = match rest.iter().position(|&b| b == b'\n') {
            Some(end) => (&rest[..end], end + 1),
            None => (rest, rest.len()),
        };
        self.offset += consumed;
        Some(line.strip_suffix(b"\r").unwrap_or(line))
    }

    /// Skip to the start of the next line.
    pub fn skip_line(&mut self) {
        let _ = self.read_line();
    }

    /// Skip any run of `\r` and `\n` bytes.
    pub fn skip_line_endings(&mut self) {
        while matches!(self.peek_u8(), Some(b'\r' | b'\n')) {
            self.offset += 1;
        }
    }

    /// Offset of the next occurrence of `pattern` at or after `from`.
    pub fn find_from(&self, from: usize, pattern: &[u8]) -> Option<usize> {
        if pattern.is_empty() || from >= self.data.len() {
            return None;
        }
        self.data[from..]
            .windows(pattern.len())
            .position(|w| w == pattern)
            .map(|p| p + from)
    }
}
