//! QQwry - IPv4 location lookups over the legacy QQwry database
//!
//! QQwry (`qqwry.dat`) is a single binary file mapping IPv4 address ranges to
//! a country and an area string. This crate opens such a file once and
//! answers lookups from any number of threads.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qqwry::Database;
//!
//! let db = Database::open("qqwry.dat")?;
//!
//! let result = db.find("8.8.8.8");
//! println!("{} {}", result.country, result.area);
//!
//! // Malformed or uncovered addresses give an empty result
//! assert!(db.find("not an address").is_empty());
//! # Ok::<(), qqwry::QqwryError>(())
//! ```
//!
//! # Key Features
//!
//! - **Immutable handle**: `Database` is `Send + Sync`; every lookup carries
//!   its own read position
//! - **Memory mapping**: open with `Database::from(path).mmap(true)`
//! - **Never panics on bad data**: truncated or corrupt files yield shortened
//!   or empty strings
//! - **Validation**: check an untrusted file before serving from it
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  find("1.2.3.4")                     │
//! ├──────────────────────────────────────┤
//! │  1. parse_ipv4     text -> u32       │
//! │  2. search_index   u32  -> pointer   │
//! │  3. decode_entry   pointer -> bytes  │
//! │  4. normalize      GBK  -> String    │
//! └──────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Database handle and lookup API
pub mod database;
/// Data entry decoding
pub mod decoder;
/// Error types
pub mod error;
/// Address list input for batch lookups
pub mod file_reader;
pub mod format;
pub mod reader;
pub mod search;
pub mod text;
/// Database validation
pub mod validation;

pub use crate::database::{parse_ipv4, Database, DatabaseOpener, DatabaseStats, LookupResult};
pub use crate::decoder::{EntryMode, RawEntry};
pub use crate::error::{QqwryError, Result};
pub use crate::format::{Header, IndexRecord};

/// Library version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
