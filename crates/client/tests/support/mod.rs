//! Shared fakes for the connector and secret-store seams.
//!
//! Each integration test binary compiles its own copy and uses a subset.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use snowconn_client::{
    ConnectionParams, Connector, ConnectorError, Engine, ResultSet, Session,
};
use snowconn_credential::{SecretStore, SecretStoreError};

/// In-memory connector recording everything the builder hands it.
#[derive(Default)]
pub struct FakeConnector {
    /// Reject `create_engine` outright.
    pub fail_create: bool,
    /// Accept the engine but refuse the session handshake.
    pub fail_connect: bool,
    /// Results handed out by every session: `execute` yields the first,
    /// `execute_script` all of them in order.
    pub canned: Vec<ResultSet>,
    /// Parameters seen by `create_engine`, in call order.
    pub seen: Mutex<Vec<ConnectionParams>>,
    /// Lifecycle events (`session.close`, `engine.dispose`), in order.
    pub events: Arc<Mutex<Vec<String>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(canned: Vec<ResultSet>) -> Self {
        Self {
            canned,
            ..Self::default()
        }
    }

    pub fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    pub fn locators(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|params| params.locator.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl Connector for FakeConnector {
    type Engine = FakeEngine;

    fn create_engine(&self, params: ConnectionParams) -> Result<FakeEngine, ConnectorError> {
        if self.fail_create {
            return Err(ConnectorError::new("connector rejected the parameters"));
        }
        self.seen.lock().unwrap().push(params);
        Ok(FakeEngine {
            fail_connect: self.fail_connect,
            canned: self.canned.clone(),
            events: Arc::clone(&self.events),
        })
    }
}

pub struct FakeEngine {
    fail_connect: bool,
    canned: Vec<ResultSet>,
    events: Arc<Mutex<Vec<String>>>,
}

impl Engine for FakeEngine {
    type Session = FakeSession;

    fn connect(&mut self) -> Result<FakeSession, ConnectorError> {
        if self.fail_connect {
            return Err(ConnectorError::new("handshake refused"));
        }
        Ok(FakeSession {
            canned: self.canned.clone(),
            events: Arc::clone(&self.events),
            executed: Vec::new(),
        })
    }

    fn dispose(&mut self) -> Result<(), ConnectorError> {
        self.events.lock().unwrap().push("engine.dispose".to_string());
        Ok(())
    }
}

#[derive(Debug)]
pub struct FakeSession {
    canned: Vec<ResultSet>,
    events: Arc<Mutex<Vec<String>>>,
    /// Statements this session has run, in order.
    pub executed: Vec<String>,
}

impl Session for FakeSession {
    fn execute(&mut self, sql: &str) -> Result<ResultSet, ConnectorError> {
        self.executed.push(sql.to_string());
        Ok(self.canned.first().cloned().unwrap_or_default())
    }

    fn execute_script(&mut self, sql: &str) -> Result<Vec<ResultSet>, ConnectorError> {
        self.executed.push(sql.to_string());
        Ok(self.canned.clone())
    }

    fn close(&mut self) -> Result<(), ConnectorError> {
        self.events.lock().unwrap().push("session.close".to_string());
        Ok(())
    }
}

/// Secret store yielding a fixed payload, or failing, as configured.
pub struct FakeSecretStore {
    payload: Option<String>,
    fail_with: Option<String>,
}

impl FakeSecretStore {
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            payload: Some(payload.into()),
            fail_with: None,
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            payload: None,
            fail_with: Some(message.into()),
        }
    }
}

impl SecretStore for FakeSecretStore {
    fn get_secret_value(&self, _secret_id: &str) -> Result<Option<String>, SecretStoreError> {
        match &self.fail_with {
            Some(message) => Err(SecretStoreError::new(message.clone())),
            None => Ok(self.payload.clone()),
        }
    }
}
