//! Token persistence through an external secret store.
//!
//! The pool's health-check configuration maps keys to secret handles rather
//! than raw credentials. Writing a token creates or updates the secret behind
//! the handle; clearing a token drops the key.

use log::{info, warn};
use std::collections::BTreeMap;
use std::fmt;

/// Configuration key under which the upload token's secret handle is stored.
pub const UPLOAD_TOKEN_SECRET: &str = "UploadToken";

/// Key-value health-check configuration of a pool.
pub type HealthCheckConfigMap = BTreeMap<String, String>;

/// Opaque reference to a value held by the secret store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretHandle(String);

impl SecretHandle {
    /// Wrap a handle string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Return the handle as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors reported by a [`SecretStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SecretError {
    /// No secret exists for the handle.
    #[error("secret {handle} not found")]
    NotFound {
        /// The handle that was looked up.
        handle: SecretHandle,
    },

    /// The store could not be reached or rejected the request.
    #[error("secret store request failed: {reason}")]
    Transport {
        /// Description of the failure.
        reason: String,
    },
}

/// External store holding secret values behind opaque handles.
#[cfg_attr(test, mockall::automock)]
pub trait SecretStore {
    /// Read the value behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the handle is unknown, or
    /// [`SecretError::Transport`] if the store is unreachable.
    fn lookup(&self, handle: &SecretHandle) -> Result<String, SecretError>;

    /// Store `value` as a new secret and return its handle.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Transport`] if the store is unreachable.
    fn create(&self, value: &str) -> Result<SecretHandle, SecretError>;

    /// Replace the value behind an existing handle.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the handle is unknown, or
    /// [`SecretError::Transport`] if the store is unreachable.
    fn update(&self, handle: &SecretHandle, value: &str) -> Result<(), SecretError>;
}

/// Store `value` under `key` in `config`, backed by a secret.
///
/// - An absent or empty `value` removes `key`; the old secret is left alone.
/// - A new `key` gets a freshly created secret.
/// - An existing `key` has its secret updated in place. If the update fails
///   for any reason a new secret is created and its handle replaces the old
///   one.
///
/// # Errors
///
/// Returns the store's error if creating a secret fails.
pub fn set_token_secret(
    store: &dyn SecretStore,
    config: &mut HealthCheckConfigMap,
    key: &str,
    value: Option<&str>,
) -> Result<(), SecretError> {
    let Some(token) = value.filter(|v| !v.is_empty()) else {
        config.remove(key);
        return Ok(());
    };

    if let Some(existing) = config.get(key) {
        let handle = SecretHandle::new(existing.as_str());
        match store.update(&handle, token) {
            Ok(()) => {
                info!("updated secret for {key}");
                return Ok(());
            }
            Err(SecretError::NotFound { .. }) => {
                warn!("secret for {key} no longer exists; creating a new one");
            }
            Err(e) => {
                warn!("could not update secret for {key} ({e}); creating a new one");
            }
        }
    }

    let handle = store.create(token)?;
    info!("created secret for {key}");
    config.insert(key.to_owned(), handle.0);
    Ok(())
}

/// Read the value stored under `key`, following its secret handle.
///
/// Returns `Ok(None)` when `key` is not configured.
///
/// # Errors
///
/// Returns the store's error if the lookup fails.
pub fn read_token_secret(
    store: &dyn SecretStore,
    config: &HealthCheckConfigMap,
    key: &str,
) -> Result<Option<String>, SecretError> {
    config
        .get(key)
        .map(|handle| store.lookup(&SecretHandle::new(handle.as_str())))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn config_with(key: &str, handle: &str) -> HealthCheckConfigMap {
        let mut config = HealthCheckConfigMap::new();
        config.insert(key.to_owned(), handle.to_owned());
        config
    }

    #[test]
    fn creates_secret_when_key_is_absent() {
        let mut store = MockSecretStore::new();
        store.expect_update().never();
        store
            .expect_create()
            .withf(|value| value == "C")
            .times(1)
            .returning(|_| Ok(SecretHandle::new("handle-1")));
        let mut config = HealthCheckConfigMap::new();

        set_token_secret(&store, &mut config, UPLOAD_TOKEN_SECRET, Some("C"))
            .expect("create succeeds");

        assert_eq!(config.len(), 1);
        assert_eq!(
            config.get(UPLOAD_TOKEN_SECRET).map(String::as_str),
            Some("handle-1")
        );
    }

    #[test]
    fn updates_existing_secret_in_place() {
        let mut store = MockSecretStore::new();
        store
            .expect_update()
            .withf(|handle, value| handle.as_str() == "handle-1" && value == "C")
            .times(1)
            .returning(|_, _| Ok(()));
        store.expect_create().never();
        let mut config = config_with(UPLOAD_TOKEN_SECRET, "handle-1");

        set_token_secret(&store, &mut config, UPLOAD_TOKEN_SECRET, Some("C"))
            .expect("update succeeds");

        assert_eq!(config, config_with(UPLOAD_TOKEN_SECRET, "handle-1"));
    }

    #[rstest]
    #[case::not_found(SecretError::NotFound { handle: SecretHandle::new("handle-1") })]
    #[case::transport(SecretError::Transport { reason: "connection reset".to_owned() })]
    fn failed_update_falls_back_to_create(#[case] failure: SecretError) {
        let mut store = MockSecretStore::new();
        store
            .expect_update()
            .times(1)
            .returning(move |_, _| Err(failure.clone()));
        store
            .expect_create()
            .times(1)
            .returning(|_| Ok(SecretHandle::new("handle-2")));
        let mut config = config_with(UPLOAD_TOKEN_SECRET, "handle-1");

        set_token_secret(&store, &mut config, UPLOAD_TOKEN_SECRET, Some("C"))
            .expect("fallback create succeeds");

        assert_eq!(config, config_with(UPLOAD_TOKEN_SECRET, "handle-2"));
    }

    #[rstest]
    #[case::absent(None)]
    #[case::empty(Some(""))]
    fn missing_value_removes_key_without_touching_store(#[case] value: Option<&'static str>) {
        let mut store = MockSecretStore::new();
        store.expect_update().never();
        store.expect_create().never();
        let mut config = config_with(UPLOAD_TOKEN_SECRET, "handle-1");
        config.insert("Enrollment".to_owned(), "true".to_owned());

        set_token_secret(&store, &mut config, UPLOAD_TOKEN_SECRET, value).expect("removal succeeds");

        assert_eq!(config, config_with("Enrollment", "true"));
    }

    #[test]
    fn create_failure_propagates_and_leaves_config_untouched() {
        let mut store = MockSecretStore::new();
        store.expect_create().returning(|_| {
            Err(SecretError::Transport {
                reason: "store offline".to_owned(),
            })
        });
        let mut config = HealthCheckConfigMap::new();

        let err = set_token_secret(&store, &mut config, UPLOAD_TOKEN_SECRET, Some("C"))
            .expect_err("create failure propagates");

        assert!(matches!(err, SecretError::Transport { .. }));
        assert!(config.is_empty());
    }

    #[test]
    fn read_follows_the_handle() {
        let mut store = MockSecretStore::new();
        store
            .expect_lookup()
            .withf(|handle| handle.as_str() == "handle-1")
            .returning(|_| Ok("C".to_owned()));
        let config = config_with(UPLOAD_TOKEN_SECRET, "handle-1");

        let value = read_token_secret(&store, &config, UPLOAD_TOKEN_SECRET).expect("lookup works");

        assert_eq!(value.as_deref(), Some("C"));
    }

    #[test]
    fn read_of_absent_key_is_none() {
        let mut store = MockSecretStore::new();
        store.expect_lookup().never();

        let value = read_token_secret(&store, &HealthCheckConfigMap::new(), UPLOAD_TOKEN_SECRET)
            .expect("absent key is not an error");

        assert_eq!(value, None);
    }
}
