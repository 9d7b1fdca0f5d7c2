//! Data entry decoding
//!
//! An index record points at a data entry. After the entry's 4-byte copy of
//! the range end address comes a mode byte that decides where the country and
//! area strings live:
//!
//! ```text
//! 0x01  [0x01][ptr u24] ─────────► country block (either of the two forms below)
//! 0x02  [0x02][ptr u24][area…]     country string behind ptr, area follows
//! other [country\0][area…]         country inline, area follows
//! ```
//!
//! The area itself is either inline or `[0x01|0x02][ptr u24]`, where a zero
//! pointer means "no area". Redirects never nest deeper than this, so decoding
//! is a fixed number of reads no matter what the buffer contains.

use crate::format::{ENTRY_IP_LEN, REDIRECT_MODE_1, REDIRECT_MODE_2};
use crate::reader::Cursor;
use serde::Serialize;

/// Layout of a data entry, from its leading mode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Country and area both behind a pointer
    FullRedirect,
    /// Country behind a pointer, area follows the pointer
    CountryRedirect,
    /// Country string stored in place
    Inline,
}

impl From<u8> for EntryMode {
    fn from(mode: u8) -> Self {
        match mode {
            REDIRECT_MODE_1 => EntryMode::FullRedirect,
            REDIRECT_MODE_2 => EntryMode::CountryRedirect,
            _ => EntryMode::Inline,
        }
    }
}

/// Undecoded country and area bytes of one entry, borrowed from the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEntry<'a> {
    /// Layout the entry was stored with
    pub mode: EntryMode,
    /// Country bytes (GBK)
    pub country: &'a [u8],
    /// Area bytes (GBK), empty for a zero area pointer
    pub area: &'a [u8],
}

/// Decode the entry an index record points at
pub fn decode_entry<'a>(cursor: &mut Cursor<'a>, pointer: u32) -> RawEntry<'a> {
    let offset = pointer as usize + ENTRY_IP_LEN;
    let mode = EntryMode::from(cursor.read_mode(offset));

    let (country, area) = match mode {
        EntryMode::FullRedirect => {
            let target = cursor.read_u24() as usize;
            read_country_area(cursor, target)
        }
        EntryMode::CountryRedirect | EntryMode::Inline => read_country_area(cursor, offset),
    };

    RawEntry {
        mode,
        country,
        area,
    }
}

/// Read a country/area pair starting at `offset`
///
/// A full redirect lands here too. At the target only the country-redirect
/// form is recognised; anything else, 0x01 included, is an inline country.
fn read_country_area<'a>(cursor: &mut Cursor<'a>, offset: usize) -> (&'a [u8], &'a [u8]) {
    if cursor.read_mode(offset) == REDIRECT_MODE_2 {
        let country_offset = cursor.read_u24() as usize;
        let country = cursor.read_cstring(country_offset);
        let area = resolve_area(cursor, offset + 4);
        (country, area)
    } else {
        let country = cursor.read_cstring(offset);
        let area = resolve_area(cursor, offset + country.len() + 1);
        (country, area)
    }
}

/// Resolve the area field at `offset`
pub fn resolve_area<'a>(cursor: &mut Cursor<'a>, offset: usize) -> &'a [u8] {
    match cursor.read_mode(offset) {
        REDIRECT_MODE_1 | REDIRECT_MODE_2 => match cursor.read_u24() {
            0 => &[],
            area_offset => cursor.read_cstring(area_offset as usize),
        },
        _ => cursor.read_cstring(offset),
    }
}
