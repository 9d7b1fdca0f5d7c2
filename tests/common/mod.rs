//! Synthetic QQwry files for tests
#![allow(dead_code)]

use std::net::Ipv4Addr;

/// Lays out a QQwry file byte by byte
///
/// Entries are appended to the data region in call order; the index is
/// sorted and written after them by [`QqwryBuilder::build`].
pub struct QqwryBuilder {
    data: Vec<u8>,
    index: Vec<(u32, u32)>,
}

impl Default for QqwryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl QqwryBuilder {
    pub fn new() -> Self {
        Self {
            data: vec![0u8; 8],
            index: Vec::new(),
        }
    }

    /// Current end of the data region
    pub fn offset(&self) -> u32 {
        self.data.len() as u32
    }

    /// Append a null-terminated string, returning its offset
    pub fn cstring(&mut self, bytes: &[u8]) -> u32 {
        let at = self.offset();
        self.data.extend_from_slice(bytes);
        self.data.push(0);
        at
    }

    /// Append a `[mode][u24 pointer]` redirect
    pub fn redirect(&mut self, mode: u8, target: u32) {
        self.data.push(mode);
        self.data.extend_from_slice(&target.to_le_bytes()[..3]);
    }

    /// Append raw bytes
    pub fn raw(&mut self, bytes: &[u8]) -> u32 {
        let at = self.offset();
        self.data.extend_from_slice(bytes);
        at
    }

    /// Start an entry for the range `start..=end`, returning its pointer
    fn entry_head(&mut self, start: Ipv4Addr, end: Ipv4Addr) -> u32 {
        let at = self.offset();
        self.data.extend_from_slice(&u32::from(end).to_le_bytes());
        self.index.push((u32::from(start), at));
        at
    }

    /// Inline country and inline area
    pub fn inline(&mut self, start: Ipv4Addr, end: Ipv4Addr, country: &[u8], area: &[u8]) -> u32 {
        let at = self.entry_head(start, end);
        self.cstring(country);
        self.cstring(area);
        at
    }

    /// Inline country, area behind a pointer (0 for no area)
    pub fn inline_area_ref(
        &mut self,
        start: Ipv4Addr,
        end: Ipv4Addr,
        country: &[u8],
        area_at: u32,
    ) -> u32 {
        let at = self.entry_head(start, end);
        self.cstring(country);
        self.redirect(0x02, area_at);
        at
    }

    /// Country behind a pointer, inline area
    pub fn country_redirect(
        &mut self,
        start: Ipv4Addr,
        end: Ipv4Addr,
        country_at: u32,
        area: &[u8],
    ) -> u32 {
        let at = self.entry_head(start, end);
        self.redirect(0x02, country_at);
        self.cstring(area);
        at
    }

    /// Whole record behind a pointer
    pub fn full_redirect(&mut self, start: Ipv4Addr, end: Ipv4Addr, block_at: u32) -> u32 {
        let at = self.entry_head(start, end);
        self.redirect(0x01, block_at);
        at
    }

    /// Index record pointing at an arbitrary offset
    pub fn record(&mut self, start: Ipv4Addr, pointer: u32) {
        self.index.push((u32::from(start), pointer));
    }

    /// Append the sorted index and fill in the header
    pub fn build(mut self) -> Vec<u8> {
        self.index.sort_by_key(|&(ip, _)| ip);
        let index_start = self.offset();
        for &(ip, pointer) in &self.index {
            self.data.extend_from_slice(&ip.to_le_bytes());
            self.data.extend_from_slice(&pointer.to_le_bytes()[..3]);
        }
        let index_end = index_start + (self.index.len().max(1) as u32 - 1) * 7;
        self.data[0..4].copy_from_slice(&index_start.to_le_bytes());
        self.data[4..8].copy_from_slice(&index_end.to_le_bytes());
        self.data
    }
}

pub fn ip(s: &str) -> Ipv4Addr {
    s.parse().unwrap()
}

/// GBK for 中国
pub const GBK_CHINA: &[u8] = &[0xD6, 0xD0, 0xB9, 0xFA];
/// GBK for 北京市
pub const GBK_BEIJING: &[u8] = &[0xB1, 0xB1, 0xBE, 0xA9, 0xCA, 0xD0];
/// GBK for 电信
pub const GBK_TELECOM: &[u8] = &[0xB5, 0xE7, 0xD0, 0xC5];

/// A small database exercising every entry layout
///
/// | range                       | layout                         | result              |
/// |-----------------------------|--------------------------------|---------------------|
/// | 1.0.0.0 - 1.0.0.255         | inline                         | TestCountry/TestArea|
/// | 1.0.1.0 - 1.0.3.255         | country redirect               | 中国/北京市           |
/// | 1.0.4.0 - 1.0.7.255         | full redirect -> inline block  | 中国/电信             |
/// | 1.0.8.0 - 1.0.15.255        | full redirect -> 0x02 block    | 中国/北京市           |
/// | 1.0.16.0 - 1.0.31.255       | inline, zero area pointer      | IANA/""             |
/// | 1.0.32.0 - 1.0.63.255       | inline, vendor token           | 局域网/""             |
/// | 1.0.64.0 - 1.255.255.255    | inline, empty area             | Reserved/""         |
/// | 2.0.0.0 - 255.255.255.255   | version slot (never matched)   |                     |
pub fn sample_database() -> Vec<u8> {
    let mut b = QqwryBuilder::new();
    let china = b.cstring(GBK_CHINA);
    let beijing = b.cstring(GBK_BEIJING);

    let telecom_block = b.cstring(GBK_CHINA);
    b.cstring(GBK_TELECOM);

    let redirect_block = b.offset();
    b.redirect(0x02, china);
    b.redirect(0x01, beijing);

    b.inline(ip("1.0.0.0"), ip("1.0.0.255"), b"TestCountry", b"TestArea");
    b.country_redirect(ip("1.0.1.0"), ip("1.0.3.255"), china, GBK_BEIJING);
    b.full_redirect(ip("1.0.4.0"), ip("1.0.7.255"), telecom_block);
    b.full_redirect(ip("1.0.8.0"), ip("1.0.15.255"), redirect_block);
    b.inline_area_ref(ip("1.0.16.0"), ip("1.0.31.255"), b"IANA", 0);
    // 局域网 + vendor token
    b.inline(
        ip("1.0.32.0"),
        ip("1.0.63.255"),
        &[0xBE, 0xD6, 0xD3, 0xF2, 0xCD, 0xF8],
        b" CZ88.NET",
    );
    b.inline(ip("1.0.64.0"), ip("1.255.255.255"), b"Reserved", b"");
    b.inline(
        ip("2.0.0.0"),
        ip("255.255.255.255"),
        b"IANA",
        b"2024-01-03 data",
    );
    b.build()
}
