//! The `SnowConn` facade.
//!
//! One handle per connection: a [`SnowConn`] value is only obtainable
//! through a successful connect, `close` releases the underlying session
//! and engine, and dropping an unclosed handle closes best-effort, so
//! scoped acquisition holds on every exit path. There is no process-wide
//! shared connection state; every call to a constructor yields an
//! independently owned handle.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;
use snowconn_credential::{
    CredentialError, Credentials, SecretStore, load_from_config_file, load_from_env,
    load_from_json_file, load_from_secret_store, params,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::builder::{ConnectError, Connection, SessionOverrides, build};
use crate::connector::{Connector, ConnectorError, Engine, Session};
use crate::result::{ResultSet, Row};
use crate::table::{Table, TableBackend, TableError, WriteOptions};

/// Credential acquisition method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Remote secret store.
    SecretsManager,
    /// snowsql config file.
    Local,
    /// JSON settings file.
    Settings,
    /// `SNOWFLAKE_`-prefixed environment variables.
    Env,
    /// Explicit credentials supplied by the caller.
    Credentials,
}

impl Method {
    /// Every method, in the order they are usually tried.
    pub const ALL: [Self; 5] = [
        Self::SecretsManager,
        Self::Local,
        Self::Settings,
        Self::Env,
        Self::Credentials,
    ];

    fn name(self) -> &'static str {
        match self {
            Self::SecretsManager => "secretsmanager",
            Self::Local => "local",
            Self::Settings => "settings",
            Self::Env => "env",
            Self::Credentials => "credentials",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "secretsmanager" => Ok(Self::SecretsManager),
            "local" => Ok(Self::Local),
            "settings" => Ok(Self::Settings),
            "env" => Ok(Self::Env),
            "credentials" => Ok(Self::Credentials),
            other => Err(ClientError::InvalidMethod {
                name: other.to_string(),
            }),
        }
    }
}

/// Facade error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Credential resolution failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Connection construction failed.
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// The underlying connector failed during execution.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// The tabular backend failed.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Unknown connection method name.
    #[error(
        "'{name}' is not a valid connection method; valid methods are \
         secretsmanager, local, settings, env, credentials"
    )]
    InvalidMethod {
        /// The offending name.
        name: String,
    },

    /// Every configured connection method failed.
    #[error("no connection method succeeded (attempted: {})", .attempted.join(", "))]
    MethodsExhausted {
        /// Methods tried, in order.
        attempted: Vec<String>,
    },

    /// A method was requested without the inputs it needs.
    #[error("connection method '{method}' is not configured: {reason}")]
    MethodNotConfigured {
        /// The method missing its inputs.
        method: Method,
        /// What is missing.
        reason: &'static str,
    },

    /// The connection is already closed.
    #[error("connection is closed")]
    Closed,

    /// An optional capability was exercised without a collaborator
    /// installed for it.
    #[error("capability '{name}' is not available; install a collaborator for it")]
    CapabilityUnavailable {
        /// Capability name.
        name: &'static str,
    },

    /// A structured column could not be decoded.
    #[error("failed to decode structured column '{column}': {source}")]
    StructuredColumn {
        /// Column name.
        column: String,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The server reported no current role.
    #[error("no current role reported by the server")]
    CurrentRoleUnavailable,

    /// A script file could not be read.
    #[error("failed to read script {}: {source}", .path.display())]
    ScriptRead {
        /// The script file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Options for [`SnowConn::connect`]: method order, override parameters,
/// and the per-method inputs.
pub struct ConnectOptions {
    /// Methods to try, in order.
    pub methods: Vec<Method>,
    /// Database to use; always overrides the harvested value.
    pub database: String,
    /// Schema to use; always overrides the harvested value.
    pub schema: String,
    /// Session autocommit; always overrides the harvested value.
    pub autocommit: bool,
    /// Role override; the harvested role applies when `None`.
    pub role: Option<String>,
    /// Warehouse override; the harvested warehouse applies when `None`.
    pub warehouse: Option<String>,
    /// snowsql config file location override.
    pub config_path: Option<PathBuf>,
    /// Config file section to read.
    pub config_section: String,
    /// JSON settings file location override.
    pub settings_path: Option<PathBuf>,
    /// Secret identifier for the `secretsmanager` method.
    pub secret_id: Option<String>,
    /// Authenticated secret store session for the `secretsmanager` method.
    pub secret_store: Option<Arc<dyn SecretStore>>,
    /// Explicit credentials for the `credentials` method. Consumed by the
    /// first attempt of that method.
    pub credentials: Option<Credentials>,
    /// Extra side-channel parameters merged into the options bag; these win
    /// over same-named harvested extras.
    pub connect_args: BTreeMap<String, String>,
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("methods", &self.methods)
            .field("database", &self.database)
            .field("schema", &self.schema)
            .field("autocommit", &self.autocommit)
            .field("role", &self.role)
            .field("warehouse", &self.warehouse)
            .field("config_path", &self.config_path)
            .field("config_section", &self.config_section)
            .field("settings_path", &self.settings_path)
            .field("secret_id", &self.secret_id)
            .field("connect_args", &self.connect_args)
            .finish_non_exhaustive()
    }
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            methods: vec![Method::Local],
            database: "public".to_string(),
            schema: "public".to_string(),
            autocommit: true,
            role: None,
            warehouse: None,
            config_path: None,
            config_section: params::DEFAULT_CONFIG_SECTION.to_string(),
            settings_path: None,
            secret_id: None,
            secret_store: None,
            credentials: None,
            connect_args: BTreeMap::new(),
        }
    }
}

impl ConnectOptions {
    /// Options with the defaults: `local` method only, database and schema
    /// `public`, autocommit on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method order.
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Parse a textual method list (e.g. `["secretsmanager", "local"]`).
    pub fn with_method_names<I, S>(mut self, names: I) -> Result<Self, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.methods = names
            .into_iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Set the database override.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Set the schema override.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the autocommit override.
    pub fn with_autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = autocommit;
        self
    }

    /// Set the role override.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the warehouse override.
    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    /// Point the `local` method at a specific config file.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Read a different config file section.
    pub fn with_config_section(mut self, section: impl Into<String>) -> Self {
        self.config_section = section.into();
        self
    }

    /// Point the `settings` method at a specific JSON file.
    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Configure the `secretsmanager` method.
    pub fn with_secret(
        mut self,
        secret_id: impl Into<String>,
        store: Arc<dyn SecretStore>,
    ) -> Self {
        self.secret_id = Some(secret_id.into());
        self.secret_store = Some(store);
        self
    }

    /// Supply explicit credentials for the `credentials` method.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Add a side-channel parameter passed straight to the connector.
    pub fn with_connect_arg(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.connect_args.insert(key.into(), value.into());
        self
    }
}

/// Connection manager for the Snowflake warehouse.
///
/// A value of this type is always open. [`SnowConn::close`] releases the
/// underlying session and engine, after which every operation fails fast
/// with [`ClientError::Closed`].
pub struct SnowConn<C: Connector> {
    inner: Option<Connection<C>>,
    table_backend: Option<Arc<dyn TableBackend>>,
}

impl<C: Connector> fmt::Debug for SnowConn<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowConn")
            .field("open", &self.inner.is_some())
            .finish_non_exhaustive()
    }
}

impl<C: Connector> SnowConn<C> {
    /// Try each configured method in order; the first success wins.
    ///
    /// Per-method failures are logged and swallowed so the loop can move
    /// on; only total exhaustion is an error, naming every attempted
    /// method.
    pub fn connect(connector: &C, mut options: ConnectOptions) -> Result<Self, ClientError> {
        let methods = options.methods.clone();
        let mut attempted = Vec::with_capacity(methods.len());
        for method in methods {
            attempted.push(method.to_string());
            match Self::connect_once(connector, method, &mut options) {
                Ok(conn) => {
                    info!(method = %method, "connected");
                    return Ok(conn);
                }
                Err(err) => {
                    error!(method = %method, error = %err, "connection method failed");
                }
            }
        }
        Err(ClientError::MethodsExhausted { attempted })
    }

    /// Connect using the snowsql config file.
    pub fn connect_local(connector: &C, options: ConnectOptions) -> Result<Self, ClientError> {
        Self::connect(connector, options.with_methods([Method::Local]))
    }

    /// Connect using the JSON settings file.
    pub fn connect_settings(connector: &C, options: ConnectOptions) -> Result<Self, ClientError> {
        Self::connect(connector, options.with_methods([Method::Settings]))
    }

    /// Connect using `SNOWFLAKE_`-prefixed environment variables.
    pub fn connect_env(connector: &C, options: ConnectOptions) -> Result<Self, ClientError> {
        Self::connect(connector, options.with_methods([Method::Env]))
    }

    /// Connect using a secret fetched from the remote store configured via
    /// [`ConnectOptions::with_secret`].
    pub fn connect_secretsmanager(
        connector: &C,
        options: ConnectOptions,
    ) -> Result<Self, ClientError> {
        Self::connect(connector, options.with_methods([Method::SecretsManager]))
    }

    /// Connect using explicitly supplied credentials.
    pub fn connect_credentials(
        connector: &C,
        credentials: Credentials,
        options: ConnectOptions,
    ) -> Result<Self, ClientError> {
        Self::connect(
            connector,
            options
                .with_credentials(credentials)
                .with_methods([Method::Credentials]),
        )
    }

    fn connect_once(
        connector: &C,
        method: Method,
        options: &mut ConnectOptions,
    ) -> Result<Self, ClientError> {
        let mut creds = match method {
            Method::Local => {
                load_from_config_file(options.config_path.as_deref(), &options.config_section)?
            }
            Method::Settings => load_from_json_file(options.settings_path.as_deref())?,
            Method::Env => load_from_env()?,
            Method::SecretsManager => {
                let store =
                    options
                        .secret_store
                        .as_deref()
                        .ok_or(ClientError::MethodNotConfigured {
                            method,
                            reason: "no secret store session supplied",
                        })?;
                let secret_id =
                    options
                        .secret_id
                        .as_deref()
                        .ok_or(ClientError::MethodNotConfigured {
                            method,
                            reason: "no secret id supplied",
                        })?;
                load_from_secret_store(store, secret_id)?
            }
            Method::Credentials => {
                options
                    .credentials
                    .take()
                    .ok_or(ClientError::MethodNotConfigured {
                        method,
                        reason: "no explicit credentials supplied",
                    })?
            }
        };

        for (key, value) in &options.connect_args {
            creds.extra.insert(key.clone(), value.clone());
        }

        let overrides = SessionOverrides {
            database: Some(options.database.clone()),
            schema: Some(options.schema.clone()),
            warehouse: options.warehouse.clone(),
            role: options.role.clone(),
            autocommit: Some(options.autocommit),
        };
        let connection = build(connector, creds, &overrides)?;
        Ok(Self {
            inner: Some(connection),
            table_backend: None,
        })
    }

    /// Install the tabular backend enabling [`SnowConn::read_table`] and
    /// [`SnowConn::write_table`].
    pub fn with_table_backend(mut self, backend: Arc<dyn TableBackend>) -> Self {
        self.table_backend = Some(backend);
        self
    }

    fn open_mut(&mut self) -> Result<&mut Connection<C>, ClientError> {
        self.inner.as_mut().ok_or(ClientError::Closed)
    }

    /// The live session handle.
    pub fn session(&self) -> Result<&<C::Engine as Engine>::Session, ClientError> {
        self.inner
            .as_ref()
            .map(Connection::session)
            .ok_or(ClientError::Closed)
    }

    /// The engine wrapper the session came from.
    pub fn engine(&self) -> Result<&C::Engine, ClientError> {
        self.inner
            .as_ref()
            .map(Connection::engine)
            .ok_or(ClientError::Closed)
    }

    /// Execute a single statement and materialize every row as a
    /// name → value mapping.
    ///
    /// Columns with a structured wire type (variant, object, array) are
    /// decoded from their textual JSON encoding into nested values; nulls
    /// pass through unparsed.
    pub fn execute_simple(&mut self, sql: &str) -> Result<Vec<Row>, ClientError> {
        let result = self.open_mut()?.session_mut().execute(sql)?;
        rows_from_result(&result)
    }

    /// Execute a multi-statement script, returning one result set per
    /// statement in script order.
    pub fn execute_script(&mut self, sql: &str) -> Result<Vec<ResultSet>, ClientError> {
        Ok(self.open_mut()?.session_mut().execute_script(sql)?)
    }

    /// Execute the contents of a script file.
    pub fn execute_file(&mut self, path: &Path) -> Result<Vec<ResultSet>, ClientError> {
        let sql = fs::read_to_string(path).map_err(|source| ClientError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.execute_script(&sql)
    }

    /// Name of the role the session is currently using.
    pub fn current_role(&mut self) -> Result<String, ClientError> {
        let rows = self.execute_simple("show roles;")?;
        for row in rows {
            if row.get("is_current").and_then(Value::as_str) == Some("Y") {
                if let Some(name) = row.get("name").and_then(Value::as_str) {
                    return Ok(name.to_string());
                }
            }
        }
        Err(ClientError::CurrentRoleUnavailable)
    }

    /// Execute `sql` and load the result through the tabular backend.
    pub fn read_table(&mut self, sql: &str) -> Result<Table, ClientError> {
        let backend = self.require_table_backend()?;
        let result = self.open_mut()?.session_mut().execute(sql)?;
        Ok(backend.load(&result)?)
    }

    /// Write a table through the tabular backend.
    ///
    /// Table and schema names are upper-cased before delegation, matching
    /// the warehouse's unquoted-identifier convention.
    pub fn write_table(&mut self, table: &Table, options: &WriteOptions) -> Result<(), ClientError> {
        let backend = self.require_table_backend()?;
        let mut options = options.clone();
        options.table = options.table.to_uppercase();
        options.schema = options.schema.map(|schema| schema.to_uppercase());
        let session = self.open_mut()?.session_mut();
        Ok(backend.store(session, table, &options)?)
    }

    fn require_table_backend(&self) -> Result<Arc<dyn TableBackend>, ClientError> {
        self.table_backend
            .clone()
            .ok_or(ClientError::CapabilityUnavailable { name: "table" })
    }

    /// Close the connection: the session first, then engine disposal.
    ///
    /// Closing an already-closed handle fails with [`ClientError::Closed`].
    pub fn close(&mut self) -> Result<(), ClientError> {
        let connection = self.inner.take().ok_or(ClientError::Closed)?;
        connection.close()?;
        Ok(())
    }
}

impl<C: Connector> Drop for SnowConn<C> {
    /// Scoped-acquisition guarantee: an unclosed handle is released on
    /// drop, errors downgraded to a warning.
    fn drop(&mut self) {
        if let Some(connection) = self.inner.take() {
            if let Err(err) = connection.close() {
                warn!(error = %err, "failed to close connection on drop");
            }
        }
    }
}

/// Materialize a result set as rows, decoding structured columns.
fn rows_from_result(result: &ResultSet) -> Result<Vec<Row>, ClientError> {
    let mut rows = Vec::with_capacity(result.len());
    for cells in result.rows() {
        let mut row = Row::with_capacity(result.columns().len());
        for (column, cell) in result.columns().iter().zip(cells) {
            let value = match cell {
                Value::String(text) if column.wire_type.is_structured() => {
                    serde_json::from_str(text).map_err(|source| {
                        ClientError::StructuredColumn {
                            column: column.name.clone(),
                            source,
                        }
                    })?
                }
                other => other.clone(),
            };
            row.insert(column.name.clone(), value);
        }
        rows.push(row);
    }
    Ok(rows)
}
