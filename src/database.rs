//! Database handle and lookup API
//!
//! A [`Database`] owns the complete file contents (read into memory, or
//! mapped read-only) plus the parsed header. It is never mutated after
//! opening, so one handle can serve any number of threads. Each lookup builds
//! its own [`Cursor`] over the shared bytes.

use crate::decoder::{decode_entry, RawEntry};
use crate::error::{QqwryError, Result};
use crate::file_reader::{self, is_gzip_path};
use crate::format::{Header, IndexRecord, RECORD_LEN};
use crate::reader::Cursor;
use crate::search::search_index;
use crate::text::normalize;
use memmap2::Mmap;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// Country and area for an address
///
/// Both fields are empty when the address is malformed or not covered by
/// the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct LookupResult {
    /// Country (or top-level region) name
    pub country: String,
    /// Area, ISP or finer-grained location
    pub area: String,
}

impl LookupResult {
    /// Build a result from decoded fields
    pub fn new(country: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            area: area.into(),
        }
    }

    /// True when neither field carries text
    pub fn is_empty(&self) -> bool {
        self.country.is_empty() && self.area.is_empty()
    }

    fn from_raw(raw: &RawEntry<'_>) -> Self {
        Self {
            country: normalize(raw.country),
            area: normalize(raw.area),
        }
    }
}

/// Summary numbers for an opened database
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    /// Size of the buffer in bytes
    pub file_size: usize,
    /// Offset of the first index record
    pub index_start: u32,
    /// Offset of the last index record
    pub index_end: u32,
    /// Number of index records
    pub record_count: u32,
    /// Whether the buffer is memory-mapped
    pub mmap: bool,
}

/// Storage for database data - either owned or memory-mapped
enum DatabaseStorage {
    Owned(Vec<u8>),
    Mmap(Mmap),
}

impl DatabaseStorage {
    fn as_slice(&self) -> &[u8] {
        match self {
            DatabaseStorage::Owned(v) => v.as_slice(),
            DatabaseStorage::Mmap(m) => &m[..],
        }
    }
}

/// Where an opener takes its bytes from
enum Source {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// Fluent configuration for opening a [`Database`]
///
/// ```no_run
/// use qqwry::Database;
///
/// let db = Database::from("qqwry.dat").mmap(true).open()?;
/// println!("{:?}", db.find("8.8.8.8"));
/// # Ok::<(), qqwry::QqwryError>(())
/// ```
pub struct DatabaseOpener {
    source: Source,
    mmap: bool,
}

impl DatabaseOpener {
    /// Map the file read-only instead of reading it into memory
    ///
    /// Has no effect when opening from bytes or a `.gz` file.
    pub fn mmap(mut self, enabled: bool) -> Self {
        self.mmap = enabled;
        self
    }

    /// Load the data and parse the header
    pub fn open(self) -> Result<Database> {
        let use_mmap = self.mmap;
        let storage = match self.source {
            Source::Bytes(bytes) => DatabaseStorage::Owned(bytes),
            Source::Path(path) if is_gzip_path(&path) => {
                if use_mmap {
                    log::info!("{} is compressed, reading into memory", path.display());
                }
                let bytes = file_reader::read_all(&path)?;
                log::debug!("decompressed {} ({} bytes)", path.display(), bytes.len());
                DatabaseStorage::Owned(bytes)
            }
            Source::Path(path) if use_mmap => {
                let file = File::open(&path)?;
                // SAFETY: the mapping is read-only; the file must not be modified
                // while the database is open.
                let mmap = unsafe { Mmap::map(&file) }.map_err(|e| {
                    QqwryError::Mmap(format!("Failed to mmap {}: {}", path.display(), e))
                })?;
                log::debug!("mapped {} ({} bytes)", path.display(), mmap.len());
                DatabaseStorage::Mmap(mmap)
            }
            Source::Path(path) => {
                let bytes = std::fs::read(&path)?;
                log::debug!("read {} ({} bytes)", path.display(), bytes.len());
                DatabaseStorage::Owned(bytes)
            }
        };
        Database::from_storage(storage)
    }
}

/// An opened QQwry database
pub struct Database {
    data: DatabaseStorage,
    header: Header,
}

impl Database {
    /// Read the whole file at `path` into memory
    ///
    /// Fails when the file cannot be read or its header is unusable. Callers
    /// serving lookups should treat this as fatal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from(path.as_ref()).open()
    }

    /// Start configuring how the file at `path` is opened
    #[allow(clippy::should_implement_trait)]
    pub fn from(path: impl AsRef<Path>) -> DatabaseOpener {
        DatabaseOpener {
            source: Source::Path(path.as_ref().to_path_buf()),
            mmap: false,
        }
    }

    /// Start configuring a database over bytes already in memory
    pub fn from_bytes_builder(bytes: Vec<u8>) -> DatabaseOpener {
        DatabaseOpener {
            source: Source::Bytes(bytes),
            mmap: false,
        }
    }

    /// Create database from raw bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes_builder(bytes).open()
    }

    fn from_storage(data: DatabaseStorage) -> Result<Self> {
        let header = Header::parse(data.as_slice())?;
        log::debug!(
            "index {:#x}..={:#x}, {} records",
            header.index_start,
            header.index_end,
            header.record_count()
        );
        Ok(Self { data, header })
    }

    /// The raw database bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_slice()
    }

    /// Parsed header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of index records
    pub fn record_count(&self) -> u32 {
        self.header.record_count()
    }

    fn cursor(&self) -> Cursor<'_> {
        Cursor::new(self.data.as_slice())
    }

    /// Look up dotted-quad address text
    ///
    /// The text must contain exactly three dots and parse as an IPv4 address
    /// (an IPv4-mapped IPv6 literal such as `::ffff:1.2.3.4` also qualifies).
    /// Anything else, and any address outside the indexed ranges, yields an
    /// empty result.
    pub fn find(&self, address: &str) -> LookupResult {
        match parse_ipv4(address) {
            Some(addr) => self.lookup(addr),
            None => {
                log::trace!("rejected address {:?}", address);
                LookupResult::default()
            }
        }
    }

    /// Look up an IPv4 address
    pub fn lookup(&self, addr: Ipv4Addr) -> LookupResult {
        let mut cursor = self.cursor();
        let pointer = search_index(&mut cursor, &self.header, u32::from(addr));
        if pointer == 0 {
            log::trace!("{} not covered", addr);
            return LookupResult::default();
        }
        let raw = decode_entry(&mut cursor, pointer);
        LookupResult::from_raw(&raw)
    }

    /// Data pointer of the range containing `addr`, without decoding it
    pub fn locate(&self, addr: Ipv4Addr) -> Option<u32> {
        let mut cursor = self.cursor();
        match search_index(&mut cursor, &self.header, u32::from(addr)) {
            0 => None,
            pointer => Some(pointer),
        }
    }

    /// Decode the entry at `pointer`
    pub fn entry(&self, pointer: u32) -> LookupResult {
        let mut cursor = self.cursor();
        LookupResult::from_raw(&decode_entry(&mut cursor, pointer))
    }

    /// Undecoded bytes of the entry at `pointer`
    pub fn raw_entry(&self, pointer: u32) -> RawEntry<'_> {
        let mut cursor = self.cursor();
        decode_entry(&mut cursor, pointer)
    }

    /// Look up many addresses in parallel, preserving input order
    pub fn find_batch<S>(&self, addresses: &[S]) -> Vec<LookupResult>
    where
        S: AsRef<str> + Sync,
    {
        addresses
            .par_iter()
            .map(|address| self.find(address.as_ref()))
            .collect()
    }

    /// Iterate over every index record
    ///
    /// Records lying past the end of the buffer are not yielded.
    pub fn records(&self) -> Records<'_> {
        Records {
            data: self.data.as_slice(),
            offset: self.header.index_start as usize,
            end: self.header.index_limit(),
        }
    }

    /// Data version string
    ///
    /// QQwry files store their release date in the area of the last index
    /// record's entry (e.g. "2024年01月03日IP数据").
    pub fn version(&self) -> Option<String> {
        let last = self.records().last()?;
        let version = self.entry(last.pointer()).area;
        (!version.is_empty()).then_some(version)
    }

    /// Summary numbers
    pub fn stats(&self) -> DatabaseStats {
        DatabaseStats {
            file_size: self.data.as_slice().len(),
            index_start: self.header.index_start,
            index_end: self.header.index_end,
            record_count: self.header.record_count(),
            mmap: matches!(self.data, DatabaseStorage::Mmap(_)),
        }
    }
}

/// Iterator over index records, see [`Database::records`]
pub struct Records<'a> {
    data: &'a [u8],
    offset: usize,
    end: usize,
}

impl<'a> Iterator for Records<'a> {
    type Item = IndexRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.end {
            return None;
        }
        let bytes = self.data.get(self.offset..self.offset + RECORD_LEN)?;
        self.offset += RECORD_LEN;
        Some(IndexRecord::from_partial(bytes))
    }
}

/// Validate and convert address text to an IPv4 address
pub fn parse_ipv4(address: &str) -> Option<Ipv4Addr> {
    if address.matches('.').count() != 3 {
        return None;
    }
    match address.parse::<IpAddr>().ok()? {
        IpAddr::V4(addr) => Some(addr),
        IpAddr::V6(addr) => addr.to_ipv4_mapped(),
    }
}
