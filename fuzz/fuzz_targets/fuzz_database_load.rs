#![no_main]
use libfuzzer_sys::fuzz_target;
use std::net::Ipv4Addr;

fuzz_target!(|data: &[u8]| {
    // Opening and reading garbage must never panic
    let Ok(db) = qqwry::Database::from_bytes(data.to_vec()) else {
        return;
    };

    for addr in [0u32, 0x0100_0005, 0x7F00_0001, 0xC0A8_0101, u32::MAX] {
        let _ = db.lookup(Ipv4Addr::from(addr));
    }
    for record in db.records().take(64) {
        let _ = db.entry(record.pointer());
    }
    let _ = db.version();
    let _ = qqwry::validation::validate_bytes(data, qqwry::validation::ValidationLevel::Strict);
});
