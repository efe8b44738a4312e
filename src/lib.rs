//! xBase-family database file toolkit.
//!
//! The `xbasedb` crate (library name `xbase`) provides Rust types and
//! functions for reading and writing dBase III/IV and FoxPro-dialect
//! `.dbf` tables and their companion `.dbt` memo files.
//!
//! # Library API
//!
//! Add `xbase` as a dependency to use the codec directly:
//!
//! ```toml
//! [dependencies]
//! xbase = { package = "xbasedb", version = "1" }
//! ```
//!
//! ## Quick example
//!
//! ```
//! use xbase::{ColumnType, Schema};
//! use xbase::dbf::{Reader, Writer};
//! use chrono::NaiveDate;
//!
//! // Build a schema, lock it, and add a row.
//! let mut schema = Schema::new();
//! schema.add_column("name", ColumnType::String, 10).unwrap();
//! let mut table = schema.lock();
//! table.add_row(vec!["gg".to_string()]).unwrap();
//!
//! // Serialise to a byte buffer.
//! let modified = NaiveDate::from_ymd_opt(2024, 12, 19).unwrap();
//! let (dbf_bytes, dbt_bytes) = Writer::new().write(&table, modified).unwrap();
//! assert!(dbt_bytes.is_none()); // no memo columns, no DBT buffer
//!
//! // Read it back.
//! let read_back = Reader::new().read(&dbf_bytes).unwrap();
//! assert_eq!(read_back.live_rows()[0][0], "gg");
//! ```
//!
//! ## Key entry points
//!
//! | Type / Function | Purpose |
//! |-----------------|---------|
//! | [`xbase::Schema`] | In-memory table model: columns plus live/deleted rows |
//! | [`xbase::Column`] / [`xbase::ColumnType`] | Column metadata and the closed type-tag set |
//! | [`xbase::dbf::Writer`] | Serialise a locked schema to DBF (+ optional DBT) bytes |
//! | [`xbase::dbf::Reader`] | Parse DBF bytes (optionally resolving memos against DBT bytes) back into a schema |
//! | [`xbase::dbt`] | The lower-level 512-byte memo block heap |
//! | [`xbase::schema::convert`] | `chrono` bridging helpers for DATE/TIMESTAMP columns |
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`xbase::column`] | `ColumnType` tag set and the `Column` record |
//! | [`xbase::schema`] | Two-phase, typestate-locked table model |
//! | [`xbase::dbf::header`] | 32-byte DBF header parse/write |
//! | [`xbase::dbf::field`] | Field descriptor and per-type record codec |
//! | [`xbase::dbf::writer`] | DBF (+ DBT) serialisation entry point |
//! | [`xbase::dbf::reader`] | DBF (+ DBT) deserialisation entry point |
//! | [`xbase::dbt`] | 512-byte memo block heap |
//! | [`xbase::constants`] | On-disk layout constants |
//! | [`util::bytes`] | Positioned little-endian buffer operations |

pub mod error;
pub mod util;
pub mod xbase;

pub use error::{ColumnAddError, ReadError, RowAddError};
pub use xbase::column::{Column, ColumnType};
pub use xbase::dbf;
pub use xbase::dbt;
pub use xbase::schema::{Locked, Row, Schema, Unlocked};
