//! Error types surfaced at the `xbase` API boundary.
//!
//! Three terminal error kinds, one per spec.md §7: schema-construction
//! failures, row-append/encoding failures, and decode failures. Grounded on
//! the teacher's single `IdbError` (`src/lib.rs`), split three ways because
//! the spec treats them as distinct error types rather than one umbrella
//! enum.

use thiserror::Error;

/// Errors raised by [`crate::xbase::schema::Schema::add_column`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColumnAddError {
    /// A column was added after the schema was locked.
    #[error("cannot add column {name:?}: schema is locked")]
    SchemaLocked {
        /// Name of the column that was rejected.
        name: String,
    },

    /// The column name was empty after whitespace was stripped.
    #[error("column name is empty after trimming whitespace")]
    EmptyName,

    /// The column name exceeded the on-disk name budget.
    #[error("column name {name:?} is {len} bytes, exceeds the {max} byte limit")]
    NameTooLong {
        /// The rejected name.
        name: String,
        /// Its byte length.
        len: usize,
        /// The limit it exceeded.
        max: usize,
    },

    /// The (possibly default-corrected) width fell outside `1..=254`.
    #[error("column {name:?} width {width} is out of range (1..=254)")]
    WidthOutOfRange {
        /// Name of the offending column.
        name: String,
        /// The width that was rejected.
        width: u16,
    },
}

/// Errors raised by [`crate::xbase::schema::Schema::add_row`],
/// [`crate::xbase::schema::Schema::add_row_deleted`], and record
/// serialisation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowAddError {
    /// A row was added before the schema was locked.
    #[error("cannot add row: schema is not locked")]
    SchemaNotLocked,

    /// The row's field count did not match the column count.
    #[error("row has {got} values, schema has {expected} columns")]
    ArityMismatch {
        /// Number of columns in the schema.
        expected: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// A field value failed its column's type contract during encoding.
    #[error("column {column:?} ({column_type}): value {value:?} is invalid: {reason}")]
    InvalidValue {
        /// Name of the offending column.
        column: String,
        /// The column's type tag, for diagnostics.
        column_type: char,
        /// The rejected value.
        value: String,
        /// Human-readable reason.
        reason: String,
    },
}

/// Errors raised while decoding a DBF or DBT byte buffer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    /// The buffer is shorter than the fixed 32-byte DBF header.
    #[error("buffer is {len} bytes, shorter than the 32-byte DBF header")]
    TooShortForHeader {
        /// Observed buffer length.
        len: usize,
    },

    /// A field descriptor used a type tag this crate does not recognise.
    #[error("unknown column type tag {tag:?}")]
    UnknownColumnType {
        /// The unrecognised tag byte, rendered as a char where printable.
        tag: char,
    },

    /// Sum of column widths (plus the marker byte) disagreed with the
    /// header's declared record length.
    #[error("record length mismatch: header declares {header_len}, columns sum to {computed_len}")]
    RecordLengthMismatch {
        /// Value read from the header.
        header_len: u16,
        /// Value computed by summing column widths plus one.
        computed_len: u16,
    },

    /// A record's leading marker byte was neither `0x20` nor `0x2A`.
    #[error("invalid record marker byte 0x{byte:02X} at record {index}")]
    InvalidRecordMarker {
        /// The offending byte.
        byte: u8,
        /// Index of the record within the record area.
        index: usize,
    },

    /// The buffer did not end with the `0x1A` EOF marker.
    #[error("missing EOF marker: final byte is 0x{byte:02X}, expected 0x1A")]
    MissingEofMarker {
        /// The byte actually found at the end of the buffer.
        byte: u8,
    },

    /// The DBT buffer was shorter than the minimum valid length (1024 bytes).
    #[error("DBT buffer is {len} bytes, shorter than the minimum 1024")]
    DbtTooShort {
        /// Observed buffer length.
        len: usize,
    },

    /// The DBT buffer length was not a multiple of the 512-byte block size.
    #[error("DBT buffer length {len} is not a multiple of 512")]
    DbtNotBlockAligned {
        /// Observed buffer length.
        len: usize,
    },

    /// A memo index pointed past the end of the DBT buffer.
    #[error("memo block index {index} is out of range for a {dbt_len}-byte DBT buffer")]
    DbtIndexOutOfRange {
        /// The requested block index.
        index: u32,
        /// Length of the DBT buffer.
        dbt_len: usize,
    },

    /// A memo payload never reached a `0x1A` terminator.
    #[error("memo at block {index} is not terminated by 0x1A")]
    UnterminatedMemo {
        /// The block index that was being read.
        index: u32,
    },

    /// A decoded field's bytes were not valid text under the selected
    /// encoding, or a memo block's bytes were not valid UTF-8.
    #[error("column {column:?}: {reason}")]
    Decode {
        /// Name of the offending column, or an empty string for non-column
        /// decode failures (e.g. a memo block).
        column: String,
        /// Human-readable reason.
        reason: String,
    },

    /// The encryption or incomplete-transaction header flag was not 0 or 1.
    #[error("header flag {field:?} has invalid value {value}, expected 0 or 1")]
    InvalidFlag {
        /// Which flag was invalid (`"encrypted"` or `"incomplete_transaction"`).
        field: String,
        /// The value actually read.
        value: u8,
    },

    /// The record area's length was not an exact multiple of the record
    /// size (trailing partial bytes before the EOF marker).
    #[error(
        "record area is {record_area_len} bytes, not a multiple of the {record_size}-byte record size"
    )]
    RecordAreaMisaligned {
        /// Length of the buffer between the descriptor terminator and the
        /// EOF marker.
        record_area_len: usize,
        /// The header's declared per-record byte length.
        record_size: usize,
    },
}
