//! The `.dbf` main-table codec: header, field descriptors, and record
//! encoding/decoding (spec.md §4.2–§4.5).

pub mod field;
pub mod header;
pub mod reader;
pub mod writer;

pub use field::TextEncoding;
pub use reader::Reader;
pub use writer::Writer;
