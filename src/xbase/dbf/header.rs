//! The fixed 32-byte DBF header (spec.md §4.2).

use crate::error::ReadError;
use crate::util::bytes::{read_u16_le, read_u32_le, ByteBuffer};
use crate::xbase::constants::*;

/// The parsed contents of a DBF file's 32-byte header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// `true` if the table has a companion DBT memo file.
    pub has_memo: bool,
    /// Last-modified year, stored as an offset from 1900.
    pub year: u8,
    pub month: u8,
    pub day: u8,
    /// Number of records in the table (live plus deleted).
    pub record_count: u32,
    /// Byte offset from the start of the file to the first record.
    pub header_len: u16,
    /// Length in bytes of a single record, including its leading marker.
    pub record_len: u16,
    pub incomplete_transaction: bool,
    pub encrypted: bool,
}

impl Header {
    /// Parse the 32-byte header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self, ReadError> {
        if data.len() < DBF_HEADER_SIZE {
            return Err(ReadError::TooShortForHeader { len: data.len() });
        }

        let version = data[HDR_VERSION];
        let has_memo = match version {
            VERSION_NO_MEMO => false,
            VERSION_WITH_MEMO => true,
            _ => false,
        };

        let incomplete_transaction = parse_flag(data[HDR_INCOMPLETE_TRANSACTION], "incomplete_transaction")?;
        let encrypted = parse_flag(data[HDR_ENCRYPTED], "encrypted")?;

        Ok(Header {
            has_memo,
            year: data[HDR_YEAR],
            month: data[HDR_MONTH],
            day: data[HDR_DAY],
            record_count: read_u32_le(data, HDR_RECORD_COUNT),
            header_len: read_u16_le(data, HDR_HEADER_LEN),
            record_len: read_u16_le(data, HDR_RECORD_LEN),
            incomplete_transaction,
            encrypted,
        })
    }

    /// Append this header's 32 bytes to `buf`.
    pub fn write(&self, buf: &mut ByteBuffer) {
        buf.push_u8(if self.has_memo {
            VERSION_WITH_MEMO
        } else {
            VERSION_NO_MEMO
        });
        buf.push_u8(self.year);
        buf.push_u8(self.month);
        buf.push_u8(self.day);
        buf.push_u32_le(self.record_count);
        buf.push_u16_le(self.header_len);
        buf.push_u16_le(self.record_len);
        buf.push_zeros(2); // reserved @ 12
        buf.push_u8(self.incomplete_transaction as u8);
        buf.push_u8(self.encrypted as u8);
        buf.push_zeros(12); // reserved @ 16 (multi-user reservation block)
        buf.push_u8(0); // production MDX flag, unused
        buf.push_u8(0); // language driver ID, unused
        buf.push_zeros(2); // reserved @ 30
        debug_assert_eq!(buf.len() % DBF_HEADER_SIZE, 0);
    }
}

fn parse_flag(byte: u8, field: &str) -> Result<bool, ReadError> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        value => Err(ReadError::InvalidFlag {
            field: field.to_string(),
            value,
        }),
    }
}
