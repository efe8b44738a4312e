//! Column types and the immutable [`Column`] record.
//!
//! `ColumnType` is a closed, single-byte-tagged sum, dispatched exhaustively
//! by both the encoder and decoder — the same shape as the teacher's
//! `PageType` (`innodb::page_types`), but keyed by an ASCII tag byte instead
//! of a numeric page-type code.

use crate::xbase::constants::{MAX_COLUMN_NAME_LEN, MAX_WIDTH, MIN_WIDTH};
use crate::error::ColumnAddError;

/// The closed set of xBase column types (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// `C` — arbitrary text, caller-encoded (default UTF-8).
    String,
    /// `D` — 8 ASCII digits, `YYYYMMDD`.
    Date,
    /// `F` — decimal ASCII, right-justified.
    Float,
    /// `N` — integer ASCII, right-justified.
    Numeric,
    /// `L` — one byte: `T`/`Y` true, `F`/`N` false, `?`/space unknown.
    Bool,
    /// `M` — 10-byte ASCII DBT block index.
    Memo,
    /// `G` — 10-byte ASCII DBT block index (OLE object).
    Ole,
    /// `B` — 10-byte ASCII DBT block index (binary object).
    Binary,
    /// `I` — 4-byte little-endian signed integer.
    Long,
    /// `+` — 4-byte little-endian signed integer (autoincrement).
    Autoincrement,
    /// `O` — 8-byte little-endian IEEE-754 double.
    Double,
    /// `@` — 8 bytes: two little-endian u32s (day count, milliseconds).
    Timestamp,
}

impl ColumnType {
    /// The single ASCII byte this type is tagged with on disk.
    pub fn tag(&self) -> u8 {
        match self {
            ColumnType::String => b'C',
            ColumnType::Date => b'D',
            ColumnType::Float => b'F',
            ColumnType::Numeric => b'N',
            ColumnType::Bool => b'L',
            ColumnType::Memo => b'M',
            ColumnType::Ole => b'G',
            ColumnType::Binary => b'B',
            ColumnType::Long => b'I',
            ColumnType::Autoincrement => b'+',
            ColumnType::Double => b'O',
            ColumnType::Timestamp => b'@',
        }
    }

    /// Parse a type tag byte read from a field descriptor.
    pub fn from_tag(tag: u8) -> Option<Self> {
        Some(match tag {
            b'C' => ColumnType::String,
            b'D' => ColumnType::Date,
            b'F' => ColumnType::Float,
            b'N' => ColumnType::Numeric,
            b'L' => ColumnType::Bool,
            b'M' => ColumnType::Memo,
            b'G' => ColumnType::Ole,
            b'B' => ColumnType::Binary,
            b'I' => ColumnType::Long,
            b'+' => ColumnType::Autoincrement,
            b'O' => ColumnType::Double,
            b'@' => ColumnType::Timestamp,
            _ => return None,
        })
    }

    /// The fixed width this type is forced to, or `None` if the caller
    /// chooses the width (C, F, N).
    pub fn default_width(&self) -> Option<u8> {
        use crate::xbase::constants::*;
        match self {
            ColumnType::Date => Some(WIDTH_DATE),
            ColumnType::Bool => Some(WIDTH_BOOL),
            ColumnType::Memo | ColumnType::Ole | ColumnType::Binary => {
                Some(WIDTH_MEMO_OLE_BINARY)
            }
            ColumnType::Long | ColumnType::Autoincrement => Some(WIDTH_LONG),
            ColumnType::Double => Some(WIDTH_DOUBLE),
            ColumnType::Timestamp => Some(WIDTH_TIMESTAMP),
            ColumnType::String | ColumnType::Float | ColumnType::Numeric => None,
        }
    }

    /// True for the three memo-indirection types (M/G/B), which store a
    /// DBT block index in-place rather than the payload itself.
    pub fn is_memo_like(&self) -> bool {
        matches!(self, ColumnType::Memo | ColumnType::Ole | ColumnType::Binary)
    }
}

/// A single table column: name, type, and on-disk width.
///
/// Immutable once constructed — there is no API to rename, retype, or
/// resize a column after [`Schema::add_column`](crate::xbase::schema::Schema::add_column)
/// accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    width: u8,
}

impl Column {
    /// Validate a candidate column and correct its width if the type
    /// mandates a fixed one.
    ///
    /// - Strips surrounding whitespace from `name`; rejects it empty or
    ///   over [`MAX_COLUMN_NAME_LEN`] bytes.
    /// - For fixed-width types, silently replaces `width` with the type's
    ///   default and emits an advisory `tracing::warn!` if the caller's
    ///   value disagreed.
    /// - Rejects the final width if it falls outside `1..=254`.
    pub fn new(name: &str, column_type: ColumnType, width: u8) -> Result<Self, ColumnAddError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ColumnAddError::EmptyName);
        }
        if trimmed.len() > MAX_COLUMN_NAME_LEN {
            return Err(ColumnAddError::NameTooLong {
                name: trimmed.to_string(),
                len: trimmed.len(),
                max: MAX_COLUMN_NAME_LEN,
            });
        }

        let resolved_width = match column_type.default_width() {
            Some(default) if default != width => {
                tracing::warn!(
                    column = trimmed,
                    requested = width,
                    corrected = default,
                    "column width does not match its type's fixed width; correcting"
                );
                default
            }
            Some(default) => default,
            None => width,
        };

        if resolved_width < MIN_WIDTH || resolved_width > MAX_WIDTH {
            return Err(ColumnAddError::WidthOutOfRange {
                name: trimmed.to_string(),
                width: resolved_width as u16,
            });
        }

        Ok(Column {
            name: trimmed.to_string(),
            column_type,
            width: resolved_width,
        })
    }

    /// The column's (trimmed) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column's type tag.
    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// The column's on-disk width in bytes.
    pub fn width(&self) -> u8 {
        self.width
    }
}
