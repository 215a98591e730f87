//! snowconn-client — connection construction and the `SnowConn` facade.
//!
//! Builds on [`snowconn_credential`]'s canonical credential record. The
//! wire protocol, SQL execution, and tabular materialization are external
//! collaborators consumed through the trait seams in [`connector`] and
//! [`table`]; this crate owns what sits in between:
//!
//! - the **builder** ([`builder::build`]): partitions canonical parameters
//!   into the locator string and the side-channel options bag, applies
//!   explicit overrides, and produces a live [`Connection`];
//! - the **facade** ([`SnowConn`]): the connect-method fallback loop,
//!   statement/script/file execution with structured-column decoding, the
//!   tabular read/write capability, and the connection lifecycle.
//!
//! Everything is synchronous and blocking; callers needing concurrency
//! open independent handles.

#![forbid(unsafe_code)]

/// Connection builder: canonical credentials → live connection handle.
pub mod builder;
/// The `SnowConn` facade.
pub mod conn;
/// Connector seam traits and connection parameters.
pub mod connector;
/// Result-set model shared with the connector seam.
pub mod result;
/// Tabular capability seam.
pub mod table;

pub use builder::{ConnectError, Connection, SessionOverrides, build};
pub use conn::{ClientError, ConnectOptions, Method, SnowConn};
pub use connector::{
    ConnectionParams, Connector, ConnectorError, Engine, Session, SessionOptions,
};
pub use result::{ColumnDesc, ResultSet, Row, WireType};
pub use table::{IfExists, Table, TableBackend, TableError, WriteOptions};

// Re-export the credential layer for one-stop consumers.
pub use snowconn_credential as credential;
pub use snowconn_credential::{Credentials, SecretStore};
