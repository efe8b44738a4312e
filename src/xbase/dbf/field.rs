//! Per-column-type field encoding and decoding (spec.md §4.4/§4.5).
//!
//! Dispatch is exhaustive over [`ColumnType`]'s 12 tags, the same way the
//! teacher's `field_decode` module dispatches over MySQL's `dd_type` codes —
//! one function per variant, called from a `match` in
//! [`crate::xbase::dbf::writer`] / [`crate::xbase::dbf::reader`].

use crate::error::{ReadError, RowAddError};
use crate::util::bytes::{read_f64_le, read_i32_le, right_justify, zero_pad_trailing, ByteBuffer};
use crate::xbase::column::{Column, ColumnType};
use crate::xbase::constants::{FD_NAME_LEN, FD_TYPE, FD_LENGTH, FIELD_DESCRIPTOR_SIZE};

/// Write one column's 32-byte field descriptor (spec.md §4.3) to `buf`.
///
/// Only the first [`FD_NAME_LEN`] bytes of the name are significant on
/// disk; spec.md §3 permits a model-level name up to 32 bytes ("≤10 bytes
/// significant, total ≤ 32"), so names of 12-32 bytes are silently
/// truncated here. This is a one-way lossy conversion: such a name will not
/// round-trip through `write`/`read` intact (see `descriptor_write_then_parse_truncates_oversize_name`).
pub fn write_descriptor(column: &Column, buf: &mut ByteBuffer) {
    let start = buf.len();
    let name_bytes = column.name().as_bytes();
    let take = name_bytes.len().min(FD_NAME_LEN);
    buf.push_bytes(&name_bytes[..take]);
    buf.push_zeros(FD_NAME_LEN - take);
    buf.push_u8(column.column_type().tag());
    buf.push_zeros(4); // reserved @ 12
    // Width is written as u16 LE at offset 16-17 rather than a single byte
    // at 16; safe only because MAX_WIDTH caps it at 254 (spec.md §9).
    buf.push_u16_le(column.width() as u16);
    buf.push_u8(0); // decimal count
    buf.push_zeros(14); // reserved/work area/MDX @ 18
    debug_assert_eq!(buf.len() - start, FIELD_DESCRIPTOR_SIZE);
}

/// Parse one column's 32-byte field descriptor starting at `data[0]`.
///
/// Follows spec.md §4.5's rolling-cursor description: scan the name until
/// the first `0x00` (at most [`FD_NAME_LEN`] bytes), then read the type tag
/// and width at their fixed offsets from the slot start.
pub fn parse_descriptor(data: &[u8]) -> Result<(String, ColumnType, u8), ReadError> {
    let name_end = data[..FD_NAME_LEN]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(FD_NAME_LEN);
    let name = String::from_utf8_lossy(&data[..name_end]).into_owned();

    let tag = data[FD_TYPE];
    let column_type = ColumnType::from_tag(tag).ok_or(ReadError::UnknownColumnType { tag: tag as char })?;

    let width = crate::util::bytes::read_u16_le(data, FD_LENGTH) as u8;
    Ok((name, column_type, width))
}

/// The text encoding used to encode/decode `C` (string) column values.
///
/// Defaults to UTF-8 per spec.md §6, but any encoding `encoding_rs` knows
/// about can be selected — the same approach
/// `other_examples/…NattapongSiri-adbf_rs` takes for the same problem.
#[derive(Debug, Clone, Copy)]
pub struct TextEncoding(&'static encoding_rs::Encoding);

impl TextEncoding {
    /// UTF-8, the default encoding for `C` columns.
    pub fn utf8() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }

    /// Look up an encoding by its WHATWG label (e.g. `"windows-1252"`).
    pub fn for_label(label: &str) -> Option<Self> {
        encoding_rs::Encoding::for_label(label.as_bytes()).map(TextEncoding)
    }

    /// Encode `s`, returning `None` if any character is not representable
    /// in this encoding.
    pub fn encode(&self, s: &str) -> Option<Vec<u8>> {
        let (bytes, _, had_errors) = self.0.encode(s);
        if had_errors {
            None
        } else {
            Some(bytes.into_owned())
        }
    }

    /// Decode raw bytes, replacing any malformed sequences per the
    /// encoding's standard replacement rules.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (s, _, _had_errors) = self.0.decode_without_bom_handling(bytes);
        s.into_owned()
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::utf8()
    }
}

/// Encode one field's value into exactly `column.width()` bytes.
///
/// `M`/`G`/`B` columns are handled separately by the caller (see
/// [`crate::xbase::dbf::writer::Writer`]), since encoding them requires
/// allocating a DBT block first; this function rejects them.
pub fn encode_field(
    column: &Column,
    value: &str,
    encoding: TextEncoding,
) -> Result<Vec<u8>, RowAddError> {
    let width = column.width() as usize;
    let invalid = |reason: String| RowAddError::InvalidValue {
        column: column.name().to_string(),
        column_type: column.column_type().tag() as char,
        value: value.to_string(),
        reason,
    };

    match column.column_type() {
        ColumnType::String => {
            let bytes = encoding
                .encode(value)
                .ok_or_else(|| invalid("not encodable in the chosen text encoding".into()))?;
            zero_pad_trailing(&bytes, width)
                .ok_or_else(|| invalid(format!("encodes to {} bytes, exceeds width {width}", bytes.len())))
        }
        ColumnType::Numeric => {
            value
                .parse::<i64>()
                .map_err(|_| invalid("not a valid integer".into()))?;
            right_justify(value.as_bytes(), width, b' ')
                .ok_or_else(|| invalid(format!("is {} bytes, exceeds width {width}", value.len())))
        }
        ColumnType::Float => {
            value
                .parse::<f64>()
                .map_err(|_| invalid("not a valid floating-point number".into()))?;
            right_justify(value.as_bytes(), width, b' ')
                .ok_or_else(|| invalid(format!("is {} bytes, exceeds width {width}", value.len())))
        }
        ColumnType::Date => {
            if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("not 8 ASCII digits (YYYYMMDD)".into()));
            }
            Ok(value.as_bytes().to_vec())
        }
        ColumnType::Bool => {
            let c = match value {
                "T" | "t" | "Y" | "y" => b'T',
                "F" | "f" | "N" | "n" => b'F',
                "?" | "" | " " => b'?',
                _ => return Err(invalid("not T/F/? (or Y/N/space)".into())),
            };
            Ok(vec![c])
        }
        ColumnType::Long | ColumnType::Autoincrement => {
            let v: i32 = value.parse().map_err(|_| invalid("not a valid i32".into()))?;
            let mut buf = crate::util::bytes::ByteBuffer::new();
            buf.push_i32_le(v);
            Ok(buf.into_vec())
        }
        ColumnType::Double => {
            let v: f64 = value.parse().map_err(|_| invalid("not a valid f64".into()))?;
            let mut buf = crate::util::bytes::ByteBuffer::new();
            buf.push_f64_le(v);
            Ok(buf.into_vec())
        }
        ColumnType::Timestamp => {
            let (days_str, ms_str) = value
                .split_once(' ')
                .ok_or_else(|| invalid("expected \"<days> <ms>\"".into()))?;
            let days: i32 = days_str.parse().map_err(|_| invalid("day count is not a valid i32".into()))?;
            let ms: i32 = ms_str.parse().map_err(|_| invalid("millisecond count is not a valid i32".into()))?;
            let mut buf = crate::util::bytes::ByteBuffer::new();
            buf.push_i32_le(days);
            buf.push_i32_le(ms);
            Ok(buf.into_vec())
        }
        ColumnType::Memo | ColumnType::Ole | ColumnType::Binary => Err(invalid(
            "memo-indirection columns are encoded via the DBT writer, not encode_field".into(),
        )),
    }
}

/// Encode a resolved DBT block index into the 10-byte, zero-padded ASCII
/// field an `M`/`G`/`B` column stores in place of its payload.
pub fn encode_memo_index_field(index: u32) -> [u8; 10] {
    let digits = index.to_string();
    let padded = right_justify(digits.as_bytes(), 10, b'0').expect("u32 never exceeds 10 digits");
    let mut out = [0u8; 10];
    out.copy_from_slice(&padded);
    out
}

/// Decode one field's raw on-disk bytes back into its string representation.
pub fn decode_field(column: &Column, bytes: &[u8], encoding: TextEncoding) -> String {
    match column.column_type() {
        ColumnType::Long | ColumnType::Autoincrement => {
            // Written as signed i32 LE but read back reinterpreted as u32 —
            // see spec.md §9's documented asymmetry, preserved as specified.
            (read_i32_le(bytes, 0) as u32).to_string()
        }
        ColumnType::Double => read_f64_le(bytes, 0).to_string(),
        ColumnType::Timestamp => {
            let days = read_i32_le(bytes, 0);
            let ms = read_i32_le(bytes, 4);
            format!("{days} {ms}")
        }
        // Everything else is a raw ASCII/text payload: decode verbatim
        // under the caller's encoding, with no trimming. Trailing
        // zero-padding on `C` columns is retained for the caller to trim,
        // per spec.md §4.5.
        ColumnType::String
        | ColumnType::Date
        | ColumnType::Numeric
        | ColumnType::Float
        | ColumnType::Bool
        | ColumnType::Memo
        | ColumnType::Ole
        | ColumnType::Binary => encoding.decode(bytes),
    }
}
