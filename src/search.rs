//! Index search
//!
//! Record-aligned binary search over the index region. The result is the
//! pointer of the record that opens the range containing the target, or 0.
//!
//! The loop stops as soon as the window narrows to a single gap
//! (`end - start == 7`). At that point the record at `mid` matches only if the
//! target sits strictly below the key of the record right after it (and not
//! below its own key, which only happens left of the first record). That next
//! record is read without checking it lies inside the index region, and the
//! last record's own range therefore never matches.

use crate::format::{Header, IndexRecord, RECORD_LEN};
use crate::reader::Cursor;

/// Find the data pointer for `target` (an IPv4 address as a big-endian u32)
///
/// Returns 0 when no range matches.
pub fn search_index(cursor: &mut Cursor<'_>, header: &Header, target: u32) -> u32 {
    let mut start = header.index_start as usize;
    let mut end = header.index_end as usize;

    loop {
        let mid = middle_offset(start, end);
        let record = read_record(cursor, mid);

        // A single-record index has no gap to narrow; it takes the same exit.
        if end - start <= RECORD_LEN {
            let next = read_record(cursor, mid + RECORD_LEN);
            return if record.ip() <= target && target < next.ip() {
                record.pointer()
            } else {
                0
            };
        }

        let key = record.ip();
        if key > target {
            end = mid;
        } else if key < target {
            start = mid;
        } else {
            return record.pointer();
        }
    }
}

/// Offset of the record halfway between `start` and `end`, rounded down to a
/// record boundary
#[inline]
fn middle_offset(start: usize, end: usize) -> usize {
    let records = (end - start) / RECORD_LEN / 2;
    start + records * RECORD_LEN
}

#[inline]
fn read_record(cursor: &mut Cursor<'_>, offset: usize) -> IndexRecord {
    IndexRecord::from_partial(cursor.read_bytes_at(RECORD_LEN, offset))
}
