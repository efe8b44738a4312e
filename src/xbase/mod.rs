//! xBase-family table model and on-disk codec.
//!
//! - [`column`] — the closed `ColumnType` tag set and the `Column` record.
//! - [`schema`] — the two-phase, typestate-locked table model.
//! - [`dbf`] — the `.dbf` header/field-descriptor/record codec.
//! - [`dbt`] — the `.dbt` memo-block heap.
//! - [`constants`] — shared on-disk layout constants.

pub mod column;
pub mod constants;
pub mod dbf;
pub mod dbt;
pub mod schema;

pub use column::{Column, ColumnType};
pub use schema::{Locked, Row, Schema, Unlocked};
