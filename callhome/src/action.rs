//! Authentication action: run the token exchange and optionally save the
//! upload token as a pool secret.
//!
//! The action never returns a `Result`. Failures are logged and reported
//! through [`AuthenticationOutcome::Failed`] so the embedding tool can show
//! them like any other failed task.

use crate::exchange::{CancellationFlag, Credentials, ExchangeError, TokenExchange, UploadToken};
use crate::secret::{
    HealthCheckConfigMap, SecretError, SecretStore, UPLOAD_TOKEN_SECRET, set_token_secret,
};
use log::{error, info};
use thiserror::Error;

/// Failure reading or writing a pool's health-check configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pool health-check configuration request failed: {reason}")]
pub struct PoolConfigError {
    /// Description of the failure.
    pub reason: String,
}

/// Access to the health-check configuration of a pool.
#[cfg_attr(test, mockall::automock)]
pub trait PoolConfig {
    /// Read the pool's current health-check configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolConfigError`] if the pool cannot be queried.
    fn health_check_config(&self) -> Result<HealthCheckConfigMap, PoolConfigError>;

    /// Replace the pool's health-check configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PoolConfigError`] if the pool rejects the update.
    fn set_health_check_config(&self, config: &HealthCheckConfigMap) -> Result<(), PoolConfigError>;
}

/// Errors recorded by a failed [`AuthenticationAction`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// The token exchange failed.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The upload token could not be stored as a secret.
    #[error("could not save upload token: {0}")]
    Secret(#[from] SecretError),

    /// The pool configuration could not be read or written.
    #[error(transparent)]
    PoolConfig(#[from] PoolConfigError),
}

/// Where to save the upload token once the exchange succeeds.
#[derive(Clone, Copy)]
pub struct TokenPersistence<'a> {
    /// Secret store holding the token value.
    pub store: &'a dyn SecretStore,
    /// Pool whose health-check configuration records the secret handle.
    pub pool: &'a dyn PoolConfig,
}

/// Terminal state of an [`AuthenticationAction`].
#[derive(Debug)]
pub enum AuthenticationOutcome {
    /// All three tokens were obtained.
    Authenticated {
        /// The upload token.
        upload_token: UploadToken,
        /// Whether the token was saved to the pool configuration.
        persisted: bool,
    },
    /// The action stopped at the recorded error; nothing was saved.
    Failed {
        /// The error that ended the action.
        error: ActionError,
    },
}

impl AuthenticationOutcome {
    /// The upload token, if the action succeeded.
    #[must_use]
    pub fn upload_token(&self) -> Option<&UploadToken> {
        match self {
            Self::Authenticated { upload_token, .. } => Some(upload_token),
            Self::Failed { .. } => None,
        }
    }

    /// The terminal error, if the action failed.
    #[must_use]
    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Self::Authenticated { .. } => None,
            Self::Failed { error } => Some(error),
        }
    }
}

/// Obtains an upload token and, when asked, saves it as a pool secret.
pub struct AuthenticationAction<'a> {
    exchange: TokenExchange<'a>,
    credentials: Credentials,
    persistence: Option<TokenPersistence<'a>>,
    cancel: CancellationFlag,
}

impl<'a> AuthenticationAction<'a> {
    /// Create an action that only obtains the token.
    #[must_use]
    pub fn new(exchange: TokenExchange<'a>, credentials: Credentials) -> Self {
        Self {
            exchange,
            credentials,
            persistence: None,
            cancel: CancellationFlag::new(),
        }
    }

    /// Save the token to `persistence` after a successful exchange.
    #[must_use]
    pub fn save_token_as_secret(mut self, persistence: TokenPersistence<'a>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Abandon the exchange between steps once `cancel` is set.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run the action to completion.
    #[must_use]
    pub fn run(&self) -> AuthenticationOutcome {
        match self.authenticate() {
            Ok((upload_token, persisted)) => AuthenticationOutcome::Authenticated {
                upload_token,
                persisted,
            },
            Err(e) => {
                error!("authentication failed: {e}");
                AuthenticationOutcome::Failed { error: e }
            }
        }
    }

    fn authenticate(&self) -> Result<(UploadToken, bool), ActionError> {
        let upload_token = self
            .exchange
            .exchange_until(&self.credentials, &self.cancel)?;

        let Some(persistence) = self.persistence else {
            return Ok((upload_token, false));
        };

        info!("saving upload token as a secret");
        let mut config = persistence.pool.health_check_config()?;
        set_token_secret(
            persistence.store,
            &mut config,
            UPLOAD_TOKEN_SECRET,
            Some(upload_token.as_str()),
        )?;
        persistence.pool.set_health_check_config(&config)?;
        Ok((upload_token, true))
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
