//! QQwry binary layout
//!
//! The file is a single read-only blob. Everything is little-endian.
//!
//! ```text
//! [0..4)   index_start   u32  absolute offset of the first index record
//! [4..8)   index_end     u32  absolute offset of the last index record
//! [8..)    data region   mode-tagged entries, GBK strings, 24-bit pointers
//! [index_start..=index_end]
//!          index region  7-byte records { ip: u32, pointer: u24 }, ascending by ip
//! ```
//!
//! An index record's pointer addresses a data entry whose first four bytes
//! repeat the range's end address; the entry layout proper starts after them.

use crate::error::{QqwryError, Result};
use serde::Serialize;
use std::net::Ipv4Addr;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// Size of the file header in bytes
pub const HEADER_LEN: usize = 8;

/// Size of one index record in bytes
pub const RECORD_LEN: usize = 7;

/// Length of the duplicated address at the head of every data entry
pub const ENTRY_IP_LEN: usize = 4;

/// Mode byte: country and area both live behind a pointer
pub const REDIRECT_MODE_1: u8 = 0x01;

/// Mode byte: only the country lives behind a pointer
pub const REDIRECT_MODE_2: u8 = 0x02;

/// On-disk header as it appears in the first eight bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct RawHeader {
    index_start: U32,
    index_end: U32,
}

/// Parsed file header bounding the index region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    /// Absolute offset of the first index record
    pub index_start: u32,
    /// Absolute offset of the last index record (inclusive)
    pub index_end: u32,
}

impl Header {
    /// Parse and check the header at the start of `data`
    ///
    /// Requires at least [`HEADER_LEN`] bytes, `index_end >= index_start`, and
    /// a record-aligned index region. Whether the index actually fits inside
    /// the buffer is left to [`crate::validation`]: lookups tolerate truncation.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (raw, _) = RawHeader::read_from_prefix(data).map_err(|_| {
            QqwryError::format(format!(
                "file too small: {} bytes (need at least {})",
                data.len(),
                HEADER_LEN
            ))
        })?;

        let header = Header {
            index_start: raw.index_start.get(),
            index_end: raw.index_end.get(),
        };

        if header.index_end < header.index_start {
            return Err(QqwryError::format(format!(
                "index end {:#x} precedes index start {:#x}",
                header.index_end, header.index_start
            )));
        }

        if (header.index_end - header.index_start) as usize % RECORD_LEN != 0 {
            return Err(QqwryError::format(format!(
                "index region {:#x}..={:#x} is not a multiple of {} bytes",
                header.index_start, header.index_end, RECORD_LEN
            )));
        }

        Ok(header)
    }

    /// Number of records in the index region
    pub fn record_count(&self) -> u32 {
        (self.index_end - self.index_start) / RECORD_LEN as u32 + 1
    }

    /// Offset one past the last index record
    pub fn index_limit(&self) -> usize {
        self.index_end as usize + RECORD_LEN
    }
}

/// One 7-byte index record
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct IndexRecord {
    ip: U32,
    pointer: [u8; 3],
}

impl IndexRecord {
    /// Build a record from a possibly short slice
    ///
    /// Missing trailing bytes read as zero, matching the reader's truncation rule.
    pub fn from_partial(bytes: &[u8]) -> Self {
        let mut raw = [0u8; RECORD_LEN];
        let n = bytes.len().min(RECORD_LEN);
        raw[..n].copy_from_slice(&bytes[..n]);
        zerocopy::transmute!(raw)
    }

    /// Start address of the range, as a numeric key
    pub fn ip(&self) -> u32 {
        self.ip.get()
    }

    /// Start address of the range
    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ip())
    }

    /// Absolute offset of the data entry
    pub fn pointer(&self) -> u32 {
        u24_le(&self.pointer)
    }
}

impl std::fmt::Debug for IndexRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexRecord")
            .field("ip", &self.addr())
            .field("pointer", &format_args!("{:#08x}", self.pointer()))
            .finish()
    }
}

/// Little-endian 24-bit value; absent bytes are zero
#[inline]
pub fn u24_le(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(3)
        .enumerate()
        .fold(0u32, |acc, (i, &b)| acc | ((b as u32) << (8 * i)))
}

/// Little-endian 32-bit value; absent bytes are zero
#[inline]
pub fn u32_le(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .enumerate()
        .fold(0u32, |acc, (i, &b)| acc | ((b as u32) << (8 * i)))
}
