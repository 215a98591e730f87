//! Tabular capability seam.
//!
//! Reading a result set into a tabular in-memory form and writing a table
//! back to the warehouse are delegated to a pluggable [`TableBackend`]
//! installed on the facade. Without one, the table operations fail with a
//! clear capability error instead of existing half-implemented.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::connector::Session;
use crate::result::ResultSet;

/// Opaque failure surfaced by a tabular backend.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TableError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TableError {
    /// Failure described by a message alone.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Failure wrapping the backend library's own error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// In-memory tabular form of a result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Column names, in order.
    pub columns: Vec<String>,
    /// Row cells, one inner vector per row.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Assemble a table from column names and row cells.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when the table carries no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What to do when the destination table already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfExists {
    /// Refuse to touch an existing table.
    Fail,
    /// Drop and recreate.
    #[default]
    Replace,
    /// Append rows to the existing table.
    Append,
}

/// Destination description for [`TableBackend::store`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOptions {
    /// Bare table name, no namespace. The facade upper-cases it before
    /// delegation, matching the warehouse's unquoted-identifier convention.
    pub table: String,
    /// Schema of the table, upper-cased like the table name.
    pub schema: Option<String>,
    /// Behavior when the destination already exists.
    pub if_exists: IfExists,
    /// Create a temporary table instead of a permanent one.
    pub temporary: bool,
    /// Rows per insert batch.
    pub chunk_size: usize,
}

impl WriteOptions {
    /// Options for writing to `table` with the defaults: replace an
    /// existing table, permanent, 5000 rows per batch.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            if_exists: IfExists::default(),
            temporary: false,
            chunk_size: 5000,
        }
    }

    /// Set the destination schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the existing-table behavior.
    pub fn with_if_exists(mut self, if_exists: IfExists) -> Self {
        self.if_exists = if_exists;
        self
    }

    /// Write a temporary table.
    pub fn temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    /// Set the insert batch size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}

/// Pluggable backend materializing result sets as tables and writing
/// tables back to the warehouse.
pub trait TableBackend {
    /// Materialize a result set as a table.
    fn load(&self, result: &ResultSet) -> Result<Table, TableError>;

    /// Write a table to the warehouse through the given session.
    fn store(
        &self,
        session: &mut dyn Session,
        table: &Table,
        options: &WriteOptions,
    ) -> Result<(), TableError>;
}
