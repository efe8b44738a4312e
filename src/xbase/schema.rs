//! The in-memory table model: columns, rows, and the two-phase column-lock
//! lifecycle.
//!
//! `Schema` is parameterized over a marker type (`Unlocked`/`Locked`) the
//! way the teacher's code captures construction-time state in a plain
//! struct (`Tablespace`'s `page_size`/`fsp_header` fields, fixed at `open`);
//! here the state itself is lifted into the type so the compiler rejects
//! `add_column` after `lock()` and `add_row` before it, per spec.md §9.

use std::marker::PhantomData;

use crate::error::{ColumnAddError, RowAddError};
use crate::xbase::column::{Column, ColumnType};

/// One row's field values, one string per column, in column order.
///
/// All field values are carried as strings at the model layer — see
/// spec.md §3. Numeric/binary columns are stringified by the codec on
/// decode, and validated/parsed back out of their string form on encode.
pub type Row = Vec<String>;

/// Marker type: the schema's column list is still open for mutation.
#[derive(Debug)]
pub struct Unlocked;

/// Marker type: the schema's column list is frozen; rows may be appended.
#[derive(Debug)]
pub struct Locked;

/// The table model: an ordered column list plus live/tombstoned row lists.
///
/// See the module docs for the `Unlocked`/`Locked` typestate. There is no
/// API to go back from `Locked` to `Unlocked`, and none to mutate or remove
/// an existing row or column once added, matching spec.md §3's invariants.
#[derive(Debug)]
pub struct Schema<State = Unlocked> {
    columns: Vec<Column>,
    live_rows: Vec<Row>,
    deleted_rows: Vec<Row>,
    _state: PhantomData<State>,
}

impl Default for Schema<Unlocked> {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema<Unlocked> {
    /// Create an empty, unlocked schema.
    pub fn new() -> Self {
        Schema {
            columns: Vec::new(),
            live_rows: Vec::new(),
            deleted_rows: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Always `true`: an unlocked schema can always accept more columns.
    pub fn can_add_columns(&self) -> bool {
        true
    }

    /// Append a new column, validating its name and (re-)computing its
    /// width per spec.md §3/§4.1. See [`Column::new`] for the exact rules.
    pub fn add_column(
        &mut self,
        name: &str,
        column_type: ColumnType,
        width: u8,
    ) -> Result<(), ColumnAddError> {
        let column = Column::new(name, column_type, width)?;
        self.columns.push(column);
        Ok(())
    }

    /// Freeze the column list and transition to the row-mutation phase.
    pub fn lock(self) -> Schema<Locked> {
        tracing::debug!(columns = self.columns.len(), "schema locked");
        Schema {
            columns: self.columns,
            live_rows: self.live_rows,
            deleted_rows: self.deleted_rows,
            _state: PhantomData,
        }
    }

    /// The columns added so far.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl Schema<Locked> {
    /// Always `false`: a locked schema never accepts more columns.
    pub fn can_add_columns(&self) -> bool {
        false
    }

    /// Append a live row. Fails if `values.len()` doesn't match the column
    /// count; does not otherwise validate field contents (that happens at
    /// record encoding time — see [`crate::xbase::dbf::writer::Writer`]).
    pub fn add_row(&mut self, values: Row) -> Result<(), RowAddError> {
        self.check_arity(&values)?;
        self.live_rows.push(values);
        Ok(())
    }

    /// Append a tombstoned row (marked deleted on write, but still present
    /// in the record area for on-disk compatibility).
    pub fn add_row_deleted(&mut self, values: Row) -> Result<(), RowAddError> {
        self.check_arity(&values)?;
        self.deleted_rows.push(values);
        Ok(())
    }

    fn check_arity(&self, values: &[String]) -> Result<(), RowAddError> {
        if values.len() != self.columns.len() {
            return Err(RowAddError::ArityMismatch {
                expected: self.columns.len(),
                got: values.len(),
            });
        }
        Ok(())
    }

    /// The schema's columns, in on-disk order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Live (non-deleted) rows, in append order.
    pub fn live_rows(&self) -> &[Row] {
        &self.live_rows
    }

    /// Tombstoned rows, in append order.
    pub fn deleted_rows(&self) -> &[Row] {
        &self.deleted_rows
    }

    /// Total record count: live plus deleted.
    pub fn record_count(&self) -> usize {
        self.live_rows.len() + self.deleted_rows.len()
    }
}

/// Value-level conversions between xBase string encodings and `chrono`
/// calendar types.
///
/// These are independent utilities — the DBF/DBT codec neither calls nor
/// depends on them, per spec.md §4.1. They exist so callers working with
/// DATE/TIMESTAMP columns don't have to hand-roll the Julian day
/// arithmetic themselves.
pub mod convert {
    use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

    /// Offset between `chrono`'s "days from 0001-01-01 CE" counter and the
    /// xBase/FoxPro Julian day count from the proleptic-Julian epoch
    /// 4713-01-01 BC. See DESIGN.md's Open Question decision.
    const JULIAN_EPOCH_OFFSET: i64 = 1_721_425;

    /// Render a bool/unknown tri-state as the DBF `L` character.
    pub fn bool_to_char(value: Option<bool>) -> char {
        match value {
            Some(true) => 'T',
            Some(false) => 'F',
            None => '?',
        }
    }

    /// Parse a DBF `L` character into a bool/unknown tri-state.
    ///
    /// Accepts the writer's `{T, F, ?}` plus the reader's additional
    /// `{Y, N, space}` per spec.md §4.4/§4.5.
    pub fn char_to_bool(c: char) -> Option<bool> {
        match c {
            'T' | 't' | 'Y' | 'y' => Some(true),
            'F' | 'f' | 'N' | 'n' => Some(false),
            _ => None,
        }
    }

    /// Format a date as the 8-digit `YYYYMMDD` string used by `D` columns.
    pub fn date_to_dbf_string(date: NaiveDate) -> String {
        format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
    }

    /// Parse an 8-digit `YYYYMMDD` string back into a date.
    pub fn dbf_string_to_date(s: &str) -> Option<NaiveDate> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = s[0..4].parse().ok()?;
        let month: u32 = s[4..6].parse().ok()?;
        let day: u32 = s[6..8].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    /// Convert a date to the xBase Julian day count stored in `@` columns.
    pub fn date_to_julian_days(date: NaiveDate) -> i32 {
        (date.num_days_from_ce() as i64 + JULIAN_EPOCH_OFFSET) as i32
    }

    /// Convert an xBase Julian day count back into a date.
    pub fn julian_days_to_date(days: i32) -> Option<NaiveDate> {
        let ce_days = days as i64 - JULIAN_EPOCH_OFFSET;
        NaiveDate::from_num_days_from_ce_opt(ce_days.try_into().ok()?)
    }

    /// Render a datetime as the `"<days> <ms>"` string a `@` column's two
    /// u32s decode to (spec.md §4.5 scenario 5).
    pub fn datetime_to_timestamp_string(dt: NaiveDateTime) -> String {
        let days = date_to_julian_days(dt.date());
        let ms = dt.time().num_seconds_from_midnight() as i64 * 1000
            + dt.time().nanosecond() as i64 / 1_000_000;
        format!("{days} {ms}")
    }

    /// Parse a `"<days> <ms>"` string back into a datetime.
    pub fn timestamp_string_to_datetime(s: &str) -> Option<NaiveDateTime> {
        let mut parts = s.split(' ');
        let days: i32 = parts.next()?.parse().ok()?;
        let ms: i64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || ms < 0 {
            return None;
        }
        let date = julian_days_to_date(days)?;
        let secs = (ms / 1000) as u32;
        let nanos = ((ms % 1000) * 1_000_000) as u32;
        let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos)?;
        Some(date.and_time(time))
    }
}

#[cfg(test)]
mod tests {
    use super::convert::*;
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn can_add_columns_reflects_lock_state() {
        let schema = Schema::new();
        assert!(schema.can_add_columns());
        let locked = schema.lock();
        assert!(!locked.can_add_columns());
    }

    #[test]
    fn add_row_rejects_arity_mismatch() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        let err = locked.add_row(vec!["a".into(), "b".into()]).unwrap_err();
        assert_eq!(
            err,
            RowAddError::ArityMismatch {
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn live_and_deleted_rows_tracked_separately() {
        let mut schema = Schema::new();
        schema.add_column("u", ColumnType::String, 2).unwrap();
        let mut locked = schema.lock();
        locked.add_row(vec!["aa".into()]).unwrap();
        locked.add_row_deleted(vec!["xx".into()]).unwrap();
        assert_eq!(locked.live_rows().len(), 1);
        assert_eq!(locked.deleted_rows().len(), 1);
        assert_eq!(locked.record_count(), 2);
    }

    #[test]
    fn bool_char_roundtrip() {
        assert_eq!(bool_to_char(Some(true)), 'T');
        assert_eq!(bool_to_char(Some(false)), 'F');
        assert_eq!(bool_to_char(None), '?');
        assert_eq!(char_to_bool('Y'), Some(true));
        assert_eq!(char_to_bool('N'), Some(false));
        assert_eq!(char_to_bool(' '), None);
    }

    #[test]
    fn date_string_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 19).unwrap();
        let s = date_to_dbf_string(date);
        assert_eq!(s, "20241219");
        assert_eq!(dbf_string_to_date(&s), Some(date));
    }

    #[test]
    fn timestamp_roundtrip_matches_spec_scenario() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 19).unwrap();
        let time = chrono::NaiveTime::from_hms_opt(7, 25, 6).unwrap();
        let dt = date.and_time(time);

        let s = datetime_to_timestamp_string(dt);
        let mut parts = s.split(' ');
        let days: i32 = parts.next().unwrap().parse().unwrap();
        let ms: i64 = parts.next().unwrap().parse().unwrap();
        assert_eq!(ms, 26_706_000);
        assert_eq!(days, date_to_julian_days(date));

        let back = timestamp_string_to_datetime(&s).unwrap();
        assert_eq!(back, dt);
    }
}
