//! Text normalization for decoded entries
//!
//! Strings in the data region are GBK. They are decoded with the WHATWG GBK
//! decoder from `encoding_rs`, which maps malformed sequences to U+FFFD
//! instead of failing, and the vendor's marketing token is removed.

use encoding_rs::GBK;

/// Vendor token appended to many entries
pub const VENDOR_TOKEN: &str = " CZ88.NET";

/// Decode GBK bytes and strip the vendor token
pub fn normalize(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    let (decoded, _had_errors) = GBK.decode_without_bom_handling(bytes);
    strip_vendor_token(&decoded)
}

/// Decode GBK bytes, also reporting whether any malformed sequence was replaced
pub fn decode_gbk(bytes: &[u8]) -> (String, bool) {
    if bytes.is_empty() {
        return (String::new(), false);
    }
    let (decoded, had_errors) = GBK.decode_without_bom_handling(bytes);
    (decoded.into_owned(), had_errors)
}

/// Remove every occurrence of [`VENDOR_TOKEN`]
pub fn strip_vendor_token(text: &str) -> String {
    if text.contains(VENDOR_TOKEN) {
        text.replace(VENDOR_TOKEN, "")
    } else {
        text.to_string()
    }
}
