//! Result-set model shared with the connector seam.

use indexmap::IndexMap;
use serde_json::Value;

/// Wire type of a result column, as reported by the warehouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Fixed-point number.
    Fixed,
    /// Floating-point number.
    Real,
    /// Text.
    Text,
    /// Date.
    Date,
    /// Timestamp without timezone semantics.
    Timestamp,
    /// Semi-structured value of any shape.
    Variant,
    /// Timestamp in the session's local timezone.
    TimestampLtz,
    /// Timestamp with timezone offset.
    TimestampTz,
    /// Wallclock timestamp.
    TimestampNtz,
    /// Semi-structured object.
    Object,
    /// Semi-structured array.
    Array,
    /// Binary blob.
    Binary,
    /// Time of day.
    Time,
    /// Boolean.
    Boolean,
}

impl WireType {
    /// Structured kinds arrive as textual JSON and are decoded by
    /// [`SnowConn::execute_simple`](crate::conn::SnowConn::execute_simple).
    pub fn is_structured(self) -> bool {
        matches!(self, Self::Variant | Self::Object | Self::Array)
    }
}

/// Description of one result column.
#[derive(Debug, Clone)]
pub struct ColumnDesc {
    /// Column name as reported by the warehouse.
    pub name: String,
    /// Wire type of the column.
    pub wire_type: WireType,
}

impl ColumnDesc {
    /// New column description.
    pub fn new(name: impl Into<String>, wire_type: WireType) -> Self {
        Self {
            name: name.into(),
            wire_type,
        }
    }
}

/// A fully materialized result set.
///
/// Connectors hand cells over as [`Value`]s; structured columns arrive as
/// JSON text and stay textual until the facade decodes them.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    columns: Vec<ColumnDesc>,
    rows: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Assemble a result set from column descriptions and row cells.
    pub fn new(columns: Vec<ColumnDesc>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Column descriptions, in result order.
    pub fn columns(&self) -> &[ColumnDesc] {
        &self.columns
    }

    /// Raw row cells, in result order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when the result carries no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One result row keyed by column name, in result order.
pub type Row = IndexMap<String, Value>;
