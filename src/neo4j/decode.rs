//! Schema-driven decoding of untyped graph rows into typed records
//!
//! A record type declares its columns once (name + expected kind) through
//! [`FromGraphRow::COLUMNS`]. [`decode_row`] checks the whole schema against a
//! row before the record is built, so a bad row never yields partial data.
//! Null values count as missing: a node without the property projects `null`.

use super::models::{GraphRow, GraphValue, ValueKind};
use chrono::{DateTime, TimeZone, Utc};
use thiserror::Error;

/// Errors raised while decoding a result row
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DecodeError {
    /// The column is absent from the row or holds null
    #[error("column '{column}' is missing")]
    MissingColumn { column: String },

    /// The column holds a value of another kind
    #[error("column '{column}' should be {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: ValueKind,
        found: ValueKind,
    },

    /// An epoch-seconds column does not fit in a timestamp
    #[error("column '{column}' holds an out-of-range timestamp: {value}")]
    TimestampOutOfRange { column: String, value: i64 },
}

/// A column of a row schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ValueKind,
}

impl Column {
    pub const fn string(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::String,
        }
    }

    pub const fn integer(name: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Integer,
        }
    }

    /// Check that `row` carries this column with the expected kind
    pub fn check<'r>(&self, row: &'r GraphRow) -> Result<&'r GraphValue, DecodeError> {
        let value = row
            .get(self.name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| DecodeError::MissingColumn {
                column: self.name.to_string(),
            })?;

        if value.kind() != self.kind {
            return Err(DecodeError::TypeMismatch {
                column: self.name.to_string(),
                expected: self.kind,
                found: value.kind(),
            });
        }

        Ok(value)
    }
}

/// Column names of a schema, in order (used to build projections)
pub fn column_names(columns: &[Column]) -> Vec<&'static str> {
    columns.iter().map(|c| c.name).collect()
}

/// A record that can be rebuilt from a graph row
pub trait FromGraphRow: Sized {
    /// Expected columns, in projection order
    const COLUMNS: &'static [Column];

    /// Build the record; called only after every column of
    /// [`FromGraphRow::COLUMNS`] has been checked
    fn from_row(row: &RowReader<'_>) -> Result<Self, DecodeError>;
}

/// Typed accessors over a row
pub struct RowReader<'r> {
    row: &'r GraphRow,
}

impl<'r> RowReader<'r> {
    pub fn new(row: &'r GraphRow) -> Self {
        Self { row }
    }

    /// A non-null string column
    pub fn string(&self, column: &'static str) -> Result<String, DecodeError> {
        let value = Column::string(column).check(self.row)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// A non-null integer column
    pub fn integer(&self, column: &'static str) -> Result<i64, DecodeError> {
        let value = Column::integer(column).check(self.row)?;
        value.as_i64().ok_or_else(|| DecodeError::TypeMismatch {
            column: column.to_string(),
            expected: ValueKind::Integer,
            found: value.kind(),
        })
    }

    /// An integer epoch-seconds column, as a UTC timestamp
    pub fn timestamp(&self, column: &'static str) -> Result<DateTime<Utc>, DecodeError> {
        let secs = self.integer(column)?;
        Utc.timestamp_opt(secs, 0)
            .single()
            .ok_or_else(|| DecodeError::TimestampOutOfRange {
                column: column.to_string(),
                value: secs,
            })
    }
}

/// Decode one row into `T`, checking the full schema first
pub fn decode_row<T: FromGraphRow>(row: &GraphRow) -> Result<T, DecodeError> {
    for column in T::COLUMNS {
        column.check(row)?;
    }
    T::from_row(&RowReader::new(row))
}

/// Decode every row, aborting on the first failure
pub fn decode_rows<T: FromGraphRow>(rows: &[GraphRow]) -> Result<Vec<T>, DecodeError> {
    rows.iter().map(decode_row::<T>).collect()
}
