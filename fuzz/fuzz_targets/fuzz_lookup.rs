#![no_main]
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

/// Three ranges; the last one only bounds the second
fn database() -> &'static qqwry::Database {
    static DB: OnceLock<qqwry::Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut data = vec![0u8; 8];
        let mut index = Vec::new();
        for (ip, body) in [
            (0x0100_0000u32, &b"TestCountry\0TestArea\0"[..]),
            (0x0A00_0000, &[0xD6, 0xD0, 0xB9, 0xFA, 0x00, 0x02, 0x00, 0x00, 0x00][..]),
            (0xE000_0000, &b"IANA\0 CZ88.NET\0"[..]),
        ] {
            index.push((ip, data.len() as u32));
            data.extend_from_slice(&[0xFF; 4]);
            data.extend_from_slice(body);
        }
        let start = data.len() as u32;
        for (ip, pointer) in index {
            data.extend_from_slice(&ip.to_le_bytes());
            data.extend_from_slice(&pointer.to_le_bytes()[..3]);
        }
        let end = data.len() as u32 - 7;
        data[0..4].copy_from_slice(&start.to_le_bytes());
        data[4..8].copy_from_slice(&end.to_le_bytes());
        qqwry::Database::from_bytes(data).unwrap()
    })
}

fuzz_target!(|data: &[u8]| {
    // Address text parsing: malformed input must give an empty result
    if let Ok(s) = std::str::from_utf8(data) {
        let result = database().find(s);
        if qqwry::parse_ipv4(s).is_none() {
            assert!(result.is_empty());
        }
    }
});
