//! Decodes a DBF byte buffer (and, optionally, a companion DBT buffer) back
//! into a locked [`Schema`].
//!
//! Grounded on the teacher's `Tablespace::open` as the read-side entry
//! point: validate the header, walk a fixed-layout descriptor area, then
//! decode the payload — generalising its `IdbError` mapping idiom to
//! [`ReadError`].

use crate::error::ReadError;
use crate::xbase::column::Column;
use crate::xbase::constants::*;
use crate::xbase::dbf::field::{decode_field, parse_descriptor, TextEncoding};
use crate::xbase::dbf::header::Header;
use crate::xbase::dbt;
use crate::xbase::schema::{Locked, Row, Schema};

/// Decodes DBF byte buffers into a [`Schema`].
#[derive(Debug, Clone, Copy)]
pub struct Reader {
    encoding: TextEncoding,
}

impl Default for Reader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader {
    /// A reader using the default (UTF-8) text encoding for `C` columns.
    pub fn new() -> Self {
        Reader {
            encoding: TextEncoding::utf8(),
        }
    }

    /// A reader using a caller-selected text encoding for `C` columns.
    pub fn with_encoding(encoding: TextEncoding) -> Self {
        Reader { encoding }
    }

    /// Decode `data` into a locked schema. Memo-like (`M`/`G`/`B`) columns
    /// decode to their raw 10-byte block-index string; resolve them against
    /// a DBT buffer separately, or use [`Reader::read_with_memos`].
    pub fn read(&self, data: &[u8]) -> Result<Schema<Locked>, ReadError> {
        let header = Header::parse(data)?;

        let descriptor_area = &data[DBF_HEADER_SIZE..];
        let mut columns = Vec::new();
        let mut cursor = 0usize;
        loop {
            if descriptor_area.get(cursor) == Some(&DESCRIPTOR_TERMINATOR) {
                break;
            }
            let slot = descriptor_area
                .get(cursor..cursor + FIELD_DESCRIPTOR_SIZE)
                .ok_or(ReadError::TooShortForHeader { len: data.len() })?;
            let (name, column_type, width) = parse_descriptor(slot)?;
            columns.push(Column::new(&name, column_type, width).map_err(|e| ReadError::Decode {
                column: name.clone(),
                reason: e.to_string(),
            })?);
            cursor += FIELD_DESCRIPTOR_SIZE;
        }

        let computed_len: u16 = 1 + columns.iter().map(|c| c.width() as u16).sum::<u16>();
        if computed_len != header.record_len {
            return Err(ReadError::RecordLengthMismatch {
                header_len: header.record_len,
                computed_len,
            });
        }

        if *data.last().unwrap_or(&0) != EOF_MARKER {
            return Err(ReadError::MissingEofMarker {
                byte: *data.last().unwrap_or(&0),
            });
        }

        let record_start = DBF_HEADER_SIZE + FIELD_DESCRIPTOR_SIZE * columns.len() + 1;
        let record_area = &data[record_start..data.len() - 1];
        let record_size = header.record_len as usize;

        if record_area.len() % record_size != 0 {
            return Err(ReadError::RecordAreaMisaligned {
                record_area_len: record_area.len(),
                record_size,
            });
        }

        let mut schema = Schema::new();
        for column in &columns {
            schema.add_column(column.name(), column.column_type(), column.width()).ok();
        }
        let mut locked = schema.lock();

        for (index, record) in record_area.chunks(record_size).enumerate() {
            let marker = record[0];
            let mut offset = 1;
            let mut row: Row = Vec::with_capacity(columns.len());
            for column in &columns {
                let width = column.width() as usize;
                let field_bytes = &record[offset..offset + width];
                row.push(decode_field(column, field_bytes, self.encoding));
                offset += width;
            }

            match marker {
                RECORD_LIVE => {
                    locked.add_row(row).ok();
                }
                RECORD_DELETED => {
                    locked.add_row_deleted(row).ok();
                }
                other => {
                    return Err(ReadError::InvalidRecordMarker { byte: other, index });
                }
            }
        }

        tracing::debug!(
            columns = columns.len(),
            records = locked.record_count(),
            "dbf buffer read"
        );
        Ok(locked)
    }

    /// Like [`Reader::read`], but resolves every memo-like column's value
    /// against `dbt_bytes`, replacing the raw block-index string with the
    /// memo's decoded text content.
    pub fn read_with_memos(&self, data: &[u8], dbt_bytes: &[u8]) -> Result<Schema<Locked>, ReadError> {
        let decoded = self.read(data)?;
        let columns = decoded.columns().to_vec();
        let memo_positions: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.column_type().is_memo_like())
            .map(|(i, _)| i)
            .collect();

        if memo_positions.is_empty() {
            return Ok(decoded);
        }

        let mut schema = Schema::new();
        for column in &columns {
            schema.add_column(column.name(), column.column_type(), column.width()).ok();
        }
        let mut resolved = schema.lock();

        for row in decoded.live_rows() {
            resolved.add_row(resolve_memos(row, &memo_positions, dbt_bytes)?).ok();
        }
        for row in decoded.deleted_rows() {
            resolved.add_row_deleted(resolve_memos(row, &memo_positions, dbt_bytes)?).ok();
        }

        Ok(resolved)
    }
}

fn resolve_memos(row: &Row, memo_positions: &[usize], dbt_bytes: &[u8]) -> Result<Row, ReadError> {
    let mut out = row.clone();
    for &pos in memo_positions {
        let index: u32 = out[pos]
            .trim()
            .parse()
            .map_err(|_| ReadError::Decode {
                column: format!("field {pos}"),
                reason: "memo index is not a valid integer".to_string(),
            })?;
        out[pos] = dbt::read_memo(dbt_bytes, index)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xbase::column::ColumnType;
    use crate::xbase::dbf::writer::Writer;
    use crate::xbase::schema::Schema;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 19).unwrap()
    }

    #[test]
    fn reads_back_a_minimal_write() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        locked.add_row(vec!["gg".to_string()]).unwrap();

        let (bytes, _) = Writer::new().write(&locked, date()).unwrap();
        let read_back = Reader::new().read(&bytes).unwrap();

        assert_eq!(read_back.columns().len(), 1);
        assert_eq!(read_back.columns()[0].name(), "u");
        assert_eq!(read_back.live_rows(), &[vec!["gg".to_string()]]);
    }

    #[test]
    fn live_and_deleted_rows_round_trip() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        locked.add_row(vec!["aa".to_string()]).unwrap();
        locked.add_row_deleted(vec!["xx".to_string()]).unwrap();

        let (bytes, _) = Writer::new().write(&locked, date()).unwrap();
        let read_back = Reader::new().read(&bytes).unwrap();

        assert_eq!(read_back.live_rows(), &[vec!["aa".to_string()]]);
        assert_eq!(read_back.deleted_rows(), &[vec!["xx".to_string()]]);
    }

    #[test]
    fn memo_round_trips_through_read_with_memos() {
        let mut schema = Schema::new();
        schema.add_column("notes", ColumnType::Memo, 10).unwrap();
        let mut locked = schema.lock();
        let payload = "A".repeat(800);
        locked.add_row(vec![payload.clone()]).unwrap();

        let (dbf, dbt_bytes) = Writer::new().write(&locked, date()).unwrap();
        let dbt_bytes = dbt_bytes.unwrap();

        let read_back = Reader::new().read_with_memos(&dbf, &dbt_bytes).unwrap();
        assert_eq!(read_back.live_rows()[0][0], payload);
    }

    #[test]
    fn bad_record_length_is_detected() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let locked = schema.lock();
        let (mut bytes, _) = Writer::new().write(&locked, date()).unwrap();
        bytes[HDR_RECORD_LEN] = 2; // tamper: claim record length 2 instead of 3
        let err = Reader::new().read(&bytes).unwrap_err();
        assert!(matches!(err, ReadError::RecordLengthMismatch { .. }));
    }

    #[test]
    fn blank_descriptor_name_surfaces_as_decode_error_not_unknown_type() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let locked = schema.lock();
        let (mut bytes, _) = Writer::new().write(&locked, date()).unwrap();

        // Blank out the first descriptor's name field (a valid type tag,
        // just an all-whitespace name) rather than touching the type tag.
        let name_start = DBF_HEADER_SIZE;
        bytes[name_start..name_start + FD_NAME_LEN].fill(b' ');

        let err = Reader::new().read(&bytes).unwrap_err();
        assert!(
            matches!(err, ReadError::Decode { .. }),
            "expected a Decode error for a blank name, got {err:?}"
        );
    }

    #[test]
    fn truncated_record_area_is_detected() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        locked.add_row(vec!["aa".to_string()]).unwrap();
        locked.add_row(vec!["bb".to_string()]).unwrap();

        let (mut bytes, _) = Writer::new().write(&locked, date()).unwrap();
        // Drop one byte from the middle of the record area without fixing up
        // the header, leaving a partial trailing record before the EOF byte.
        let cut = bytes.len() - 2;
        bytes.remove(cut);

        let err = Reader::new().read(&bytes).unwrap_err();
        assert!(matches!(err, ReadError::RecordAreaMisaligned { .. }));
    }

    #[test]
    fn missing_eof_marker_is_detected() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let locked = schema.lock();
        let (mut bytes, _) = Writer::new().write(&locked, date()).unwrap();
        *bytes.last_mut().unwrap() = 0x00;
        let err = Reader::new().read(&bytes).unwrap_err();
        assert!(matches!(err, ReadError::MissingEofMarker { byte: 0x00 }));
    }
}
