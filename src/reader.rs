//! Positional reads over the database buffer
//!
//! A [`Cursor`] borrows the immutable buffer and carries its own read
//! position. One is created per lookup and dropped when the lookup returns,
//! so concurrent lookups never share a position.
//!
//! Every read is truncation tolerant: asking for bytes past the end of the
//! buffer returns whatever is left (possibly nothing) instead of failing.
//! The cursor remembers that it happened, which the validator reports.

use crate::format::{u24_le, u32_le};
use memchr::memchr;

/// Read position into a borrowed database buffer
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    overrun: bool,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at offset 0
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            overrun: false,
        }
    }

    /// Whether any read so far was cut short by the end of the buffer
    #[inline]
    pub fn overrun(&self) -> bool {
        self.overrun
    }

    /// Current read position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Move the read position
    #[inline]
    pub fn set_position(&mut self, offset: usize) {
        self.pos = offset;
    }

    /// Read up to `length` bytes from the current position
    ///
    /// Returns `min(length, remaining)` bytes and advances past them. At or
    /// beyond the end of the buffer the result is empty and the position is
    /// left where it was.
    pub fn read_bytes(&mut self, length: usize) -> &'a [u8] {
        let data = self.data;
        if self.pos >= data.len() {
            self.overrun |= length > 0;
            return &[];
        }
        let wanted = self.pos.saturating_add(length);
        let end = wanted.min(data.len());
        self.overrun |= wanted > end;
        let out = &data[self.pos..end];
        self.pos = end;
        out
    }

    /// Reposition, then [`read_bytes`](Self::read_bytes)
    pub fn read_bytes_at(&mut self, length: usize, offset: usize) -> &'a [u8] {
        self.set_position(offset);
        self.read_bytes(length)
    }

    /// Read a 3-byte little-endian value
    pub fn read_u24(&mut self) -> u32 {
        u24_le(self.read_bytes(3))
    }

    /// Read a 4-byte little-endian value
    pub fn read_u32(&mut self) -> u32 {
        u32_le(self.read_bytes(4))
    }

    /// Read the mode byte at `offset`
    ///
    /// A read past the end yields `0x00`, which callers treat as an inline
    /// (non-redirect) entry.
    pub fn read_mode(&mut self, offset: usize) -> u8 {
        self.read_bytes_at(1, offset).first().copied().unwrap_or(0)
    }

    /// Read a null-terminated byte string starting at `offset`
    ///
    /// The terminator is not included. Without a terminator the string runs to
    /// the end of the buffer. The cursor ends up just past the terminator.
    pub fn read_cstring(&mut self, offset: usize) -> &'a [u8] {
        self.set_position(offset);
        let data = self.data;
        if offset >= data.len() {
            self.overrun = true;
            return &[];
        }
        let rest = &data[offset..];
        match memchr(0, rest) {
            Some(len) => {
                self.pos = offset + len + 1;
                &rest[..len]
            }
            None => {
                self.pos = data.len();
                self.overrun = true;
                rest
            }
        }
    }
}
