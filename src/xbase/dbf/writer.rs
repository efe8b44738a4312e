//! Serialises a locked [`Schema`] into a DBF byte buffer, plus an optional
//! DBT buffer if any memo-bearing column holds data.
//!
//! Grounded on the teacher's `innodb::write` module: free-function,
//! buffer-building style, but collected behind a small `Writer` struct per
//! Design Note 9's single-call recommendation rather than the teacher's
//! page-at-a-time free functions, since a DBF file is one contiguous region
//! rather than independently addressable pages.

use chrono::{Datelike, NaiveDate};

use crate::error::RowAddError;
use crate::util::bytes::ByteBuffer;
use crate::xbase::constants::*;
use crate::xbase::dbf::field::{encode_field, encode_memo_index_field, write_descriptor, TextEncoding};
use crate::xbase::dbf::header::Header;
use crate::xbase::dbt::DbtWriter;
use crate::xbase::schema::{Locked, Row, Schema};

/// Builds the on-disk bytes for a locked [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct Writer {
    encoding: TextEncoding,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// A writer using the default (UTF-8) text encoding for `C` columns.
    pub fn new() -> Self {
        Writer {
            encoding: TextEncoding::utf8(),
        }
    }

    /// A writer using a caller-selected text encoding for `C` columns.
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Writer { encoding }
    }

    /// Serialise `schema`, stamping `modified` as the header's last-update
    /// date. Returns the DBF buffer, plus a DBT buffer if any memo-like
    /// column's rows produced memo content.
    pub fn write(
        &self,
        schema: &Schema<Locked>,
        modified: NaiveDate,
    ) -> Result<(Vec<u8>, Option<Vec<u8>>), RowAddError> {
        let columns = schema.columns();
        let has_memo = columns.iter().any(|c| c.column_type().is_memo_like());

        let mut dbt = DbtWriter::new();
        let record_len: u16 = 1 + columns.iter().map(|c| c.width() as u16).sum::<u16>();
        let header_len: u16 = (FIELD_DESCRIPTOR_SIZE * columns.len() + DBF_HEADER_SIZE + 1) as u16;

        let mut records = ByteBuffer::new();
        for row in schema.live_rows() {
            self.encode_record(row, columns, RECORD_LIVE, &mut dbt, &mut records)?;
        }
        for row in schema.deleted_rows() {
            self.encode_record(row, columns, RECORD_DELETED, &mut dbt, &mut records)?;
        }

        let header = Header {
            has_memo,
            year: (modified.year() - 1900).clamp(0, u8::MAX as i32) as u8,
            month: modified.month() as u8,
            day: modified.day() as u8,
            record_count: schema.record_count() as u32,
            header_len,
            record_len,
            incomplete_transaction: false,
            encrypted: false,
        };

        let mut buf = ByteBuffer::new();
        header.write(&mut buf);
        for column in columns {
            write_descriptor(column, &mut buf);
        }
        buf.push_u8(DESCRIPTOR_TERMINATOR);
        buf.push_bytes(records.as_slice());
        buf.push_u8(EOF_MARKER);

        let dbf_bytes = buf.into_vec();
        let dbt_bytes = dbt.into_bytes();
        tracing::debug!(
            dbf_len = dbf_bytes.len(),
            dbt_len = dbt_bytes.as_ref().map(Vec::len),
            records = schema.record_count(),
            "dbf buffer written"
        );
        Ok((dbf_bytes, dbt_bytes))
    }

    fn encode_record(
        &self,
        row: &Row,
        columns: &[crate::xbase::column::Column],
        marker: u8,
        dbt: &mut DbtWriter,
        out: &mut ByteBuffer,
    ) -> Result<(), RowAddError> {
        out.push_u8(marker);
        for (column, value) in columns.iter().zip(row.iter()) {
            if column.column_type().is_memo_like() {
                let index = dbt.write_memo(value.as_bytes());
                out.push_bytes(&encode_memo_index_field(index));
            } else {
                let field_bytes = encode_field(column, value, self.encoding)?;
                out.push_bytes(&field_bytes);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbase::column::ColumnType;
    use crate::xbase::schema::Schema;

    fn sample_schema() -> Schema<Locked> {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        locked.add_row(vec!["gg".to_string()]).unwrap();
        locked
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 19).unwrap()
    }

    #[test]
    fn minimal_write_matches_spec_scenario_one() {
        let schema = sample_schema();
        let (bytes, dbt) = Writer::new().write(&schema, date()).unwrap();
        assert!(dbt.is_none());
        assert_eq!(bytes.len(), 32 + 32 + 1 + (1 + 2) + 1);
        assert_eq!(bytes[HDR_VERSION], VERSION_NO_MEMO);
        assert_eq!(&bytes[HDR_RECORD_COUNT..HDR_RECORD_COUNT + 4], &[1, 0, 0, 0]);
        assert_eq!(&bytes[HDR_HEADER_LEN..HDR_HEADER_LEN + 2], &[0x41, 0x00]);
        assert_eq!(&bytes[HDR_RECORD_LEN..HDR_RECORD_LEN + 2], &[0x03, 0x00]);
        let record_start = DBF_HEADER_SIZE + FIELD_DESCRIPTOR_SIZE + 1;
        assert_eq!(&bytes[record_start..record_start + 3], b"\x20gg");
        assert_eq!(*bytes.last().unwrap(), EOF_MARKER);
    }

    #[test]
    fn deleted_record_matches_spec_scenario_two() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        locked.add_row(vec!["aa".to_string()]).unwrap();
        locked.add_row_deleted(vec!["xx".to_string()]).unwrap();

        let (bytes, _) = Writer::new().write(&locked, date()).unwrap();
        let record_start = DBF_HEADER_SIZE + FIELD_DESCRIPTOR_SIZE + 1;
        let record_area = &bytes[record_start..bytes.len() - 1];
        assert_eq!(record_area, b"\x20aa\x2Axx");
    }

    #[test]
    fn mixed_types_match_spec_scenario_three() {
        let mut schema = Schema::new();
        schema.add_column("num", ColumnType::Numeric, 1).unwrap();
        schema.add_column("score", ColumnType::Float, 4).unwrap();
        let mut locked = schema.lock();
        locked
            .add_row(vec!["1".to_string(), "2.50".to_string()])
            .unwrap();

        let (bytes, _) = Writer::new().write(&locked, date()).unwrap();
        let record_start = DBF_HEADER_SIZE + 2 * FIELD_DESCRIPTOR_SIZE + 1;
        let record = &bytes[record_start..bytes.len() - 1];
        assert_eq!(record, b"\x2012.50");
    }

    #[test]
    fn memo_column_produces_dbt_buffer_matching_scenario_four() {
        let mut schema = Schema::new();
        schema.add_column("notes", ColumnType::Memo, 10).unwrap();
        let mut locked = schema.lock();
        let payload = "A".repeat(800);
        locked.add_row(vec![payload]).unwrap();

        let (dbf, dbt) = Writer::new().write(&locked, date()).unwrap();
        let dbt = dbt.unwrap();
        assert_eq!(dbt.len(), 512 + 1024);

        let record_start = DBF_HEADER_SIZE + FIELD_DESCRIPTOR_SIZE + 1;
        let memo_field = &dbf[record_start + 1..record_start + 11];
        assert_eq!(memo_field, b"0000000001");
    }

    #[test]
    fn header_byte_zero_reflects_memo_columns() {
        let mut schema = Schema::new();
        schema.add_column("notes", ColumnType::Memo, 10).unwrap();
        let locked = schema.lock();
        let (bytes, _) = Writer::new().write(&locked, date()).unwrap();
        assert_eq!(bytes[HDR_VERSION], VERSION_WITH_MEMO);
    }
}
