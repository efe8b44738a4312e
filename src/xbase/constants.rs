//! DBF/DBT file-format constants.
//!
//! Derived from the layout tables in spec.md §4.2–§4.6 and §6, the same way
//! the teacher's `innodb::constants` derives its offsets from the MySQL
//! source headers.

// ── DBF header (32 bytes) ────────────────────────────────────────────

/// Size of the fixed DBF header in bytes.
pub const DBF_HEADER_SIZE: usize = 32;
/// Size of a single field descriptor in bytes.
pub const FIELD_DESCRIPTOR_SIZE: usize = 32;
/// Byte terminating the field descriptor array.
pub const DESCRIPTOR_TERMINATOR: u8 = 0x0D;
/// Byte marking end-of-file after the last record.
pub const EOF_MARKER: u8 = 0x1A;

/// Version byte: dBase III, no memo file.
pub const VERSION_NO_MEMO: u8 = 0x03;
/// Version byte: dBase III plus a DBT companion file.
pub const VERSION_WITH_MEMO: u8 = 0x83;

/// Marker byte preceding a live record.
pub const RECORD_LIVE: u8 = 0x20;
/// Marker byte preceding a tombstoned (deleted) record.
pub const RECORD_DELETED: u8 = 0x2A;

// Header field offsets.
pub const HDR_VERSION: usize = 0;
pub const HDR_YEAR: usize = 1;
pub const HDR_MONTH: usize = 2;
pub const HDR_DAY: usize = 3;
pub const HDR_RECORD_COUNT: usize = 4;
pub const HDR_HEADER_LEN: usize = 8;
pub const HDR_RECORD_LEN: usize = 10;
pub const HDR_RESERVED_12: usize = 12;
pub const HDR_INCOMPLETE_TRANSACTION: usize = 14;
pub const HDR_ENCRYPTED: usize = 15;
pub const HDR_RESERVED_16: usize = 16;
pub const HDR_PRODUCTION_MDX: usize = 28;
pub const HDR_LANGUAGE_DRIVER: usize = 29;
pub const HDR_RESERVED_30: usize = 30;

// Field descriptor offsets (relative to the descriptor's own start).
pub const FD_NAME: usize = 0;
pub const FD_NAME_LEN: usize = 11;
pub const FD_TYPE: usize = 11;
pub const FD_RESERVED_12: usize = 12;
pub const FD_LENGTH: usize = 16;
pub const FD_DECIMAL_COUNT: usize = 17;
pub const FD_RESERVED_18: usize = 18;

// ── DBT memo file ────────────────────────────────────────────────────

/// Size of a DBT block, including the header block.
pub const DBT_BLOCK_SIZE: usize = 512;
/// Offset within the DBT header of the next-free-block index.
pub const DBT_HEADER_NEXT_INDEX: usize = 0;
/// Offset within the DBT header of the version byte.
pub const DBT_HEADER_VERSION_OFFSET: usize = 16;
/// Version byte written at [`DBT_HEADER_VERSION_OFFSET`].
pub const DBT_HEADER_VERSION: u8 = 0x03;
/// Minimum valid DBT file length (header block + at least one data block).
pub const DBT_MIN_LEN: usize = 1024;

// ── Column defaults ──────────────────────────────────────────────────

pub const WIDTH_DATE: u8 = 8;
pub const WIDTH_BOOL: u8 = 1;
pub const WIDTH_MEMO_OLE_BINARY: u8 = 10;
pub const WIDTH_LONG: u8 = 4;
pub const WIDTH_DOUBLE: u8 = 8;
pub const WIDTH_TIMESTAMP: u8 = 8;

/// Maximum byte length of a column name as stored on disk.
pub const MAX_COLUMN_NAME_LEN: usize = 32;
/// Minimum allowed column width.
pub const MIN_WIDTH: u8 = 1;
/// Maximum allowed column width.
pub const MAX_WIDTH: u8 = 254;
