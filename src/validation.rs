//! Database validation for untrusted QQwry files
//!
//! Lookups never fail on a damaged file: they just return shortened or empty
//! strings. This module finds out whether that would happen, so a broken
//! download can be rejected before it is put into service.
//!
//! # Usage
//!
//! ```rust,no_run
//! use qqwry::validation::{validate_database, ValidationLevel};
//! use std::path::Path;
//!
//! let report = validate_database(Path::new("qqwry.dat"), ValidationLevel::Strict)?;
//!
//! if report.is_valid() {
//!     println!("✓ Database is safe to use");
//! } else {
//!     for error in &report.errors {
//!         println!("  - {}", error);
//!     }
//! }
//! # Ok::<(), qqwry::QqwryError>(())
//! ```

use crate::decoder::{decode_entry, EntryMode};
use crate::error::Result;
use crate::file_reader;
use crate::format::{Header, IndexRecord, HEADER_LEN, RECORD_LEN};
use crate::reader::Cursor;
use crate::text::{decode_gbk, normalize};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::net::Ipv4Addr;
use std::path::Path;

/// Maximum number of per-record findings reported before summarising
const MAX_REPORTED: usize = 20;

/// Validation strictness level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    /// Header, index bounds, ordering and pointer bounds
    Standard,
    /// Standard checks plus decoding every entry (default)
    Strict,
}

impl std::str::FromStr for ValidationLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ValidationLevel::Standard),
            "strict" => Ok(ValidationLevel::Strict),
            _ => Err(format!(
                "Invalid validation level: '{}'. Must be: standard or strict",
                s
            )),
        }
    }
}

/// Validation report with detailed findings
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Critical errors that make the database unusable
    pub errors: Vec<String>,
    /// Warnings about potential issues (non-fatal)
    pub warnings: Vec<String>,
    /// Informational messages about database properties
    pub info: Vec<String>,
    /// Database statistics
    pub stats: ValidationStats,
}

/// Statistics gathered during validation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    /// File size in bytes
    pub file_size: usize,
    /// Number of index records
    pub record_count: u32,
    /// Number of distinct entry pointers
    pub distinct_entries: usize,
    /// Entries stored inline (strict only)
    pub inline_entries: u32,
    /// Entries with a redirected country (strict only)
    pub country_redirect_entries: u32,
    /// Entries with a fully redirected record (strict only)
    pub full_redirect_entries: u32,
    /// Data version string, if present (strict only)
    pub version: Option<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            info: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// Check if database passed all validations (no errors)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn warning(&mut self, msg: impl Into<String>) {
        let msg = msg.into();
        log::warn!("{}", msg);
        self.warnings.push(msg);
    }

    fn info(&mut self, msg: impl Into<String>) {
        self.info.push(msg.into());
    }
}

impl ValidationStats {
    /// Human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Records: {}, Entries: {} ({} inline, {} country redirect, {} full redirect), Size: {} KB",
            self.record_count,
            self.distinct_entries,
            self.inline_entries,
            self.country_redirect_entries,
            self.full_redirect_entries,
            self.file_size / 1024
        )
    }
}

/// Counts findings of one kind and stops listing them after a while
struct Tally {
    label: &'static str,
    count: usize,
}

impl Tally {
    fn new(label: &'static str) -> Self {
        Self { label, count: 0 }
    }

    /// Returns true while individual findings should still be listed
    fn hit(&mut self) -> bool {
        self.count += 1;
        self.count <= MAX_REPORTED
    }

    fn overflow(&self) -> Option<String> {
        (self.count > MAX_REPORTED).then(|| {
            format!(
                "... and {} more {}",
                self.count - MAX_REPORTED,
                self.label
            )
        })
    }
}

/// Validate a database file (`.gz` files are decompressed first)
pub fn validate_database(path: &Path, level: ValidationLevel) -> Result<ValidationReport> {
    let data = file_reader::read_all(path)?;
    Ok(validate_bytes(&data, level))
}

/// Validate a database held in memory
pub fn validate_bytes(data: &[u8], level: ValidationLevel) -> ValidationReport {
    let mut report = ValidationReport::new();
    report.stats.file_size = data.len();

    let header = match Header::parse(data) {
        Ok(header) => header,
        Err(e) => {
            report.error(e.to_string());
            return report;
        }
    };
    report.stats.record_count = header.record_count();
    report.info(format!(
        "Index region {:#x}..={:#x} ({} records)",
        header.index_start,
        header.index_end,
        header.record_count()
    ));

    if (header.index_start as usize) < HEADER_LEN {
        report.error(format!(
            "Index start {:#x} overlaps the header",
            header.index_start
        ));
        return report;
    }

    if header.index_limit() > data.len() {
        report.error(format!(
            "Index region ends at {:#x}, past the end of the file ({:#x})",
            header.index_limit(),
            data.len()
        ));
        return report;
    }

    if header.record_count() < 2 {
        report.warning("Index holds a single record; no address can match");
    }

    let records: Vec<IndexRecord> = data[header.index_start as usize..header.index_limit()]
        .chunks_exact(RECORD_LEN)
        .map(IndexRecord::from_partial)
        .collect();

    check_index(data, &records, &mut report);

    if level == ValidationLevel::Strict && report.is_valid() {
        check_entries(data, &records, &mut report);
    }

    report
}

/// Ordering and pointer bounds of the index records
fn check_index(data: &[u8], records: &[IndexRecord], report: &mut ValidationReport) {
    let mut order = Tally::new("ordering errors");
    let mut bounds = Tally::new("out-of-bounds pointers");
    let mut pointers = FxHashSet::default();

    for (i, pair) in records.windows(2).enumerate() {
        if pair[1].ip() < pair[0].ip() && order.hit() {
            report.error(format!(
                "Record {} ({}) sorts before record {} ({})",
                i + 1,
                pair[1].addr(),
                i,
                pair[0].addr()
            ));
        }
    }

    for (i, record) in records.iter().enumerate() {
        let pointer = record.pointer() as usize;
        if pointer < HEADER_LEN || pointer + 4 >= data.len() {
            if bounds.hit() {
                report.error(format!(
                    "Record {} ({}) points to {:#x}, outside the data region",
                    i,
                    record.addr(),
                    pointer
                ));
            }
            continue;
        }
        pointers.insert(record.pointer());
    }

    for tally in [&order, &bounds] {
        if let Some(msg) = tally.overflow() {
            report.error(msg);
        }
    }

    report.stats.distinct_entries = pointers.len();

    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        if first.ip() != 0 {
            report.warning(format!(
                "First range starts at {}; lower addresses are not covered",
                first.addr()
            ));
        }
        report.info(format!(
            "Address space {} - {}",
            first.addr(),
            Ipv4Addr::from(last.ip())
        ));
    }
}

/// Decode every distinct entry
fn check_entries(data: &[u8], records: &[IndexRecord], report: &mut ValidationReport) {
    let mut seen = FxHashSet::default();
    let mut truncated = Tally::new("truncated entries");
    let mut encoding = Tally::new("encoding warnings");

    for record in records {
        if !seen.insert(record.pointer()) {
            continue;
        }

        let mut cursor = Cursor::new(data);
        let raw = decode_entry(&mut cursor, record.pointer());

        match raw.mode {
            EntryMode::Inline => report.stats.inline_entries += 1,
            EntryMode::CountryRedirect => report.stats.country_redirect_entries += 1,
            EntryMode::FullRedirect => report.stats.full_redirect_entries += 1,
        }

        if cursor.overrun() && truncated.hit() {
            report.error(format!(
                "Entry {:#x} for {} runs past the end of the file",
                record.pointer(),
                record.addr()
            ));
        }

        for (field, bytes) in [("country", raw.country), ("area", raw.area)] {
            let (_, had_errors) = decode_gbk(bytes);
            if had_errors && encoding.hit() {
                report.warning(format!(
                    "Entry {:#x} for {}: {} is not valid GBK",
                    record.pointer(),
                    record.addr(),
                    field
                ));
            }
        }
    }

    if let Some(msg) = truncated.overflow() {
        report.error(msg);
    }
    if let Some(msg) = encoding.overflow() {
        report.warning(msg);
    }

    if let Some(last) = records.last() {
        let mut cursor = Cursor::new(data);
        let raw = decode_entry(&mut cursor, last.pointer());
        let version = normalize(raw.area);
        if !version.is_empty() {
            report.info(format!("Data version: {}", version));
            report.stats.version = Some(version);
        }
    }
}
