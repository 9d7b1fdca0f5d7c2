//! Lookups over arbitrary bytes and arbitrary address text
//!
//! Whatever the buffer or the input, a lookup returns a (possibly empty)
//! result and never panics.

mod common;

use common::sample_database;
use proptest::prelude::*;
use qqwry::validation::{validate_bytes, ValidationLevel};
use qqwry::Database;
use std::net::Ipv4Addr;

/// Small, record-aligned header followed by random bytes
fn aligned_database() -> impl Strategy<Value = Vec<u8>> {
    (0u32..64, 0u32..16, prop::collection::vec(any::<u8>(), 0..512)).prop_map(
        |(start, records, body)| {
            let index_start = 8 + start;
            let index_end = index_start + records * 7;
            let mut data = Vec::with_capacity(8 + body.len());
            data.extend_from_slice(&index_start.to_le_bytes());
            data.extend_from_slice(&index_end.to_le_bytes());
            data.extend_from_slice(&body);
            data
        },
    )
}

proptest! {
    #[test]
    fn random_bytes_never_panic(data in aligned_database(), addr in any::<u32>()) {
        let db = Database::from_bytes(data).unwrap();
        let _ = db.lookup(Ipv4Addr::from(addr));
        let _ = db.version();
        let _ = db.records().count();
    }

    #[test]
    fn random_bytes_validate_without_panic(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let _ = validate_bytes(&data, ValidationLevel::Strict);
    }

    #[test]
    fn corrupted_sample_never_panics(
        flips in prop::collection::vec((any::<prop::sample::Index>(), any::<u8>()), 1..8),
        addr in any::<u32>(),
    ) {
        let mut data = sample_database();
        // Keep the header intact so the buffer still opens
        for (index, byte) in flips {
            let at = 8 + index.index(data.len() - 8);
            data[at] = byte;
        }
        let db = Database::from_bytes(data).unwrap();
        let _ = db.lookup(Ipv4Addr::from(addr));
    }

    #[test]
    fn arbitrary_text_never_panics(input in ".{0,40}") {
        let db = Database::from_bytes(sample_database()).unwrap();
        let _ = db.find(&input);
    }

    #[test]
    fn dotted_quads_parse(a in any::<u8>(), b in any::<u8>(), c in any::<u8>(), d in any::<u8>()) {
        let db = Database::from_bytes(sample_database()).unwrap();
        let text = format!("{}.{}.{}.{}", a, b, c, d);
        prop_assert_eq!(db.find(&text), db.lookup(Ipv4Addr::new(a, b, c, d)));
    }
}
