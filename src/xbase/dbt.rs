//! The `.dbt` memo-block heap: a 512-byte header block followed by any
//! number of 512-byte data blocks (spec.md §4.6).
//!
//! Grounded on the teacher's page-indexed block I/O in `innodb::tablespace`
//! (`read_page`, running `page_count` bookkeeping), generalised from disk
//! pages to in-memory blocks, and `innodb::write::build_fsp_page`'s pattern
//! of assembling a fixed-layout header by field offset.

use std::collections::BTreeMap;

use crate::error::ReadError;
use crate::util::bytes::{read_u32_le, ByteBuffer};
use crate::xbase::constants::*;

/// Accumulates memo payloads into a DBT buffer during a single write pass.
///
/// Lazily materialises its header block on the first [`DbtWriter::write_memo`]
/// call, matching spec.md §4.6's "lazily initialise... on first memo write."
#[derive(Debug, Default)]
pub struct DbtWriter {
    buf: Option<ByteBuffer>,
    next_index: u32,
}

impl DbtWriter {
    /// An empty writer; no DBT buffer is materialised until the first write.
    pub fn new() -> Self {
        DbtWriter {
            buf: None,
            next_index: 1,
        }
    }

    fn ensure_initialised(&mut self) {
        if self.buf.is_some() {
            return;
        }
        let mut buf = ByteBuffer::zeroed(DBT_BLOCK_SIZE);
        buf.set_u8_at(DBT_HEADER_NEXT_INDEX, 1);
        buf.set_u8_at(DBT_HEADER_VERSION_OFFSET, DBT_HEADER_VERSION);
        self.buf = Some(buf);
        self.next_index = 1;
    }

    /// Write `payload` as a new memo, returning the block index it occupies.
    pub fn write_memo(&mut self, payload: &[u8]) -> u32 {
        self.ensure_initialised();
        let index = self.next_index;

        let span = if payload.len() < 510 {
            1
        } else {
            payload.len().div_ceil(DBT_BLOCK_SIZE)
        };

        let buf = self.buf.as_mut().expect("initialised above");
        buf.push_zeros(span * DBT_BLOCK_SIZE);
        let block_start = (index as usize) * DBT_BLOCK_SIZE;
        {
            let data = buf.as_mut_slice();
            data[block_start..block_start + payload.len()].copy_from_slice(payload);
            if span == 1 {
                data[block_start + DBT_BLOCK_SIZE - 1] = EOF_MARKER;
            } else {
                let span_end = block_start + span * DBT_BLOCK_SIZE;
                data[span_end - 1] = EOF_MARKER;
                data[span_end - 2] = EOF_MARKER;
            }
        }

        self.next_index += span as u32;
        buf.set_u32_le_at(DBT_HEADER_NEXT_INDEX, self.next_index);
        index
    }

    /// True if no memo has been written yet (the buffer was never
    /// materialised).
    pub fn is_empty(&self) -> bool {
        self.buf.is_none()
    }

    /// Consume the writer, returning the finished DBT buffer if any memo
    /// was written.
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        self.buf.map(ByteBuffer::into_vec)
    }
}

fn validate_buffer(dbt: &[u8]) -> Result<(), ReadError> {
    if dbt.len() < DBT_MIN_LEN {
        return Err(ReadError::DbtTooShort { len: dbt.len() });
    }
    if dbt.len() % DBT_BLOCK_SIZE != 0 {
        return Err(ReadError::DbtNotBlockAligned { len: dbt.len() });
    }
    Ok(())
}

/// Read the memo at `index`, per spec.md §4.6's indexed read path.
///
/// Preserves the documented imperfection: the EOF scan starts at the
/// beginning of the whole buffer, not at the requested block, so a memo in
/// an earlier block can mask ones that follow it.
pub fn read_memo(dbt: &[u8], index: u32) -> Result<String, ReadError> {
    validate_buffer(dbt)?;
    let block_start = DBT_BLOCK_SIZE * index as usize;
    if block_start >= dbt.len() {
        return Err(ReadError::DbtIndexOutOfRange {
            index,
            dbt_len: dbt.len(),
        });
    }

    let eof = dbt
        .iter()
        .position(|&b| b == EOF_MARKER)
        .ok_or(ReadError::UnterminatedMemo { index })?;
    if eof < block_start {
        return Err(ReadError::UnterminatedMemo { index });
    }
    // Relative to the requested block, not the buffer start: a span-ending
    // EOF requires its partner byte only once we're a full block past
    // block_start, not once the absolute offset crosses DBT_BLOCK_SIZE.
    if eof - block_start >= DBT_BLOCK_SIZE && dbt.get(eof + 1) != Some(&EOF_MARKER) {
        return Err(ReadError::UnterminatedMemo { index });
    }

    Ok(decode_trimmed(&dbt[block_start..eof]))
}

/// Decode `bytes` as UTF-8, dropping trailing `0x00` padding.
///
/// `write_memo` never pads content with embedded zero bytes; any zero run
/// at the very end is fill between the payload and its terminator, not
/// payload content, so it's excluded rather than returned to the caller.
fn decode_trimmed(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Read — enumerate merged (spec.md §4.6): block index to decoded content,
/// with key `0` holding the header's next-free index as a decimal string.
pub fn enumerate_merged(dbt: &[u8]) -> Result<BTreeMap<u32, String>, ReadError> {
    validate_buffer(dbt)?;
    let mut out = BTreeMap::new();
    out.insert(0, read_u32_le(dbt, DBT_HEADER_NEXT_INDEX).to_string());

    let total_blocks = dbt.len() / DBT_BLOCK_SIZE;
    let mut block_index = 1u32;
    while (block_index as usize) < total_blocks {
        let block_start = block_index as usize * DBT_BLOCK_SIZE;
        let tail = &dbt[block_start..];
        let relative_eof = tail.iter().position(|&b| b == EOF_MARKER);

        let (content, advance) = match relative_eof {
            Some(offset) if offset >= DBT_BLOCK_SIZE => {
                let span = offset.div_ceil(DBT_BLOCK_SIZE);
                (decode_trimmed(&tail[..offset]), span as u32)
            }
            Some(offset) => (decode_trimmed(&tail[..offset]), 1),
            None => (decode_trimmed(tail), 1),
        };

        out.insert(block_index, content);
        block_index += advance.max(1);
    }

    Ok(out)
}

/// Read — enumerate unmerged (spec.md §4.6): a flat list of raw 511-byte
/// block slices, preserving the documented off-by-one (no merging, no EOF
/// handling).
pub fn enumerate_unmerged(dbt: &[u8]) -> Result<Vec<String>, ReadError> {
    validate_buffer(dbt)?;
    let mut out = vec![read_u32_le(dbt, DBT_HEADER_NEXT_INDEX).to_string()];

    let total_blocks = dbt.len() / DBT_BLOCK_SIZE;
    for block_index in 1..total_blocks {
        let start = block_index * DBT_BLOCK_SIZE;
        let end = (start + 511).min(dbt.len());
        out.push(String::from_utf8_lossy(&dbt[start..end]).into_owned());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_memo_gets_index_one_and_initialises_header() {
        let mut writer = DbtWriter::new();
        let index = writer.write_memo(b"hello");
        assert_eq!(index, 1);
        let bytes = writer.into_bytes().unwrap();
        assert_eq!(bytes.len(), 1024);
        assert_eq!(bytes[DBT_HEADER_NEXT_INDEX], 2);
        assert_eq!(bytes[DBT_HEADER_VERSION_OFFSET], DBT_HEADER_VERSION);
    }

    #[test]
    fn short_payload_occupies_one_block_with_single_eof() {
        let mut writer = DbtWriter::new();
        writer.write_memo(b"hi");
        let bytes = writer.into_bytes().unwrap();
        assert_eq!(bytes[DBT_BLOCK_SIZE + DBT_BLOCK_SIZE - 1], EOF_MARKER);
    }

    #[test]
    fn spanning_payload_matches_spec_scenario_four() {
        let payload = vec![b'A'; 800];
        let mut writer = DbtWriter::new();
        let index = writer.write_memo(&payload);
        assert_eq!(index, 1);
        let bytes = writer.into_bytes().unwrap();
        assert_eq!(bytes.len(), 512 + 1024);
        assert_eq!(bytes[0], 3);
        assert!(bytes[512..1311].iter().all(|&b| b == b'A'));
        assert_eq!(bytes[1534], EOF_MARKER);
        assert_eq!(bytes[1535], EOF_MARKER);
    }

    #[test]
    fn read_memo_round_trips_a_simple_payload() {
        let mut writer = DbtWriter::new();
        let index = writer.write_memo(b"hello");
        let bytes = writer.into_bytes().unwrap();
        assert_eq!(read_memo(&bytes, index).unwrap(), "hello");
    }

    #[test]
    fn read_memo_rejects_short_buffer() {
        assert_eq!(
            read_memo(&[0u8; 100], 1).unwrap_err(),
            ReadError::DbtTooShort { len: 100 }
        );
    }

    #[test]
    fn read_memo_rejects_misaligned_buffer() {
        assert_eq!(
            read_memo(&vec![0u8; 1025], 1).unwrap_err(),
            ReadError::DbtNotBlockAligned { len: 1025 }
        );
    }

    #[test]
    fn enumerate_unmerged_blocks_are_511_bytes() {
        let mut writer = DbtWriter::new();
        writer.write_memo(b"hi");
        let bytes = writer.into_bytes().unwrap();
        let blocks = enumerate_unmerged(&bytes).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].len(), 511);
    }

    #[test]
    fn enumerate_merged_advances_past_spanned_blocks() {
        let payload = vec![b'A'; 800];
        let mut writer = DbtWriter::new();
        writer.write_memo(&payload);
        let bytes = writer.into_bytes().unwrap();
        let blocks = enumerate_merged(&bytes).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[&1].len(), 800);
    }
}
