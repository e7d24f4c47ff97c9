//! In-memory collaborators for exercising the exchange and the
//! authentication action without a network or a pool.

use crate::action::{PoolConfig, PoolConfigError};
use crate::exchange::{TokenTransport, TransportError};
use crate::secret::{HealthCheckConfigMap, SecretError, SecretHandle, SecretStore};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

/// A request observed by [`StubTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Target URL.
    pub url: String,
    /// JSON body as sent.
    pub body: String,
}

/// Transport that answers requests from a queue of scripted responses.
///
/// Once the queue is empty every further request fails with a transport
/// error, so a test that expects fewer requests notices extra ones.
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: RefCell<VecDeque<Result<String, TransportError>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl StubTransport {
    /// Create a transport with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next request with `{"Token": token}`.
    pub fn respond_with_token(&self, token: &str) {
        let body = serde_json::json!({ "Token": token }).to_string();
        self.responses.borrow_mut().push_back(Ok(body));
    }

    /// Answer the next request with a raw body.
    pub fn respond_with_body(&self, body: &str) {
        self.responses.borrow_mut().push_back(Ok(body.to_owned()));
    }

    /// Fail the next request with the given HTTP status.
    pub fn fail_with_status(&self, code: u16) {
        self.responses.borrow_mut().push_back(Err(TransportError::Status {
            url: String::new(),
            code,
        }));
    }

    /// All requests sent so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }
}

impl TokenTransport for StubTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<String, TransportError> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_owned(),
            body: body.to_owned(),
        });
        match self.responses.borrow_mut().pop_front() {
            Some(Err(TransportError::Status { code, .. })) => Err(TransportError::Status {
                url: url.to_owned(),
                code,
            }),
            Some(response) => response,
            None => Err(TransportError::Http {
                url: url.to_owned(),
                reason: "no scripted response".to_owned(),
            }),
        }
    }
}

/// Secret store backed by a map, with call counters.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    secrets: RefCell<BTreeMap<String, String>>,
    next_id: Cell<u32>,
    creates: Cell<usize>,
    updates: Cell<usize>,
    offline: Cell<bool>,
}

impl InMemorySecretStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a secret under an explicit handle.
    pub fn insert(&self, handle: &str, value: &str) {
        self.secrets
            .borrow_mut()
            .insert(handle.to_owned(), value.to_owned());
    }

    /// Make every subsequent request fail with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    /// Value behind `handle`, if any.
    #[must_use]
    pub fn value(&self, handle: &str) -> Option<String> {
        self.secrets.borrow().get(handle).cloned()
    }

    /// Number of successful `create` calls.
    #[must_use]
    pub fn creates(&self) -> usize {
        self.creates.get()
    }

    /// Number of successful `update` calls.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates.get()
    }

    fn ensure_online(&self) -> Result<(), SecretError> {
        if self.offline.get() {
            return Err(SecretError::Transport {
                reason: "secret store offline".to_owned(),
            });
        }
        Ok(())
    }
}

impl SecretStore for InMemorySecretStore {
    fn lookup(&self, handle: &SecretHandle) -> Result<String, SecretError> {
        self.ensure_online()?;
        self.value(handle.as_str())
            .ok_or_else(|| SecretError::NotFound {
                handle: handle.clone(),
            })
    }

    fn create(&self, value: &str) -> Result<SecretHandle, SecretError> {
        self.ensure_online()?;
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let handle = format!("secret-{id}");
        self.insert(&handle, value);
        self.creates.set(self.creates.get() + 1);
        Ok(SecretHandle::new(handle))
    }

    fn update(&self, handle: &SecretHandle, value: &str) -> Result<(), SecretError> {
        self.ensure_online()?;
        let mut secrets = self.secrets.borrow_mut();
        let Some(slot) = secrets.get_mut(handle.as_str()) else {
            return Err(SecretError::NotFound {
                handle: handle.clone(),
            });
        };
        value.clone_into(slot);
        self.updates.set(self.updates.get() + 1);
        Ok(())
    }
}

/// Pool whose health-check configuration lives in memory.
#[derive(Debug, Default)]
pub struct InMemoryPoolConfig {
    config: RefCell<HealthCheckConfigMap>,
    writes: Cell<usize>,
}

impl InMemoryPoolConfig {
    /// Create a pool with the given configuration.
    #[must_use]
    pub fn with_config(config: HealthCheckConfigMap) -> Self {
        Self {
            config: RefCell::new(config),
            writes: Cell::new(0),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> HealthCheckConfigMap {
        self.config.borrow().clone()
    }

    /// Number of configuration writes.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl PoolConfig for InMemoryPoolConfig {
    fn health_check_config(&self) -> Result<HealthCheckConfigMap, PoolConfigError> {
        Ok(self.config())
    }

    fn set_health_check_config(&self, config: &HealthCheckConfigMap) -> Result<(), PoolConfigError> {
        *self.config.borrow_mut() = config.clone();
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
