//! Three-step token exchange for the call-home upload service.
//!
//! Credentials are traded for an identity token, the identity token for an
//! upload grant, and the grant for the upload token. Steps run strictly in
//! order and the first failure aborts the exchange.
//!
//! # Sub-modules
//!
//! - [`error`] - Exchange error types and step names.
//! - [`step`] - The `Step` trait and the three concrete steps.
//! - [`token`] - Credential and token newtypes.
//! - [`transport`] - JSON `POST` transport trait and `ureq` implementation.

pub mod error;
pub mod step;
pub mod token;
pub mod transport;

pub use error::{ExchangeError, Result, StepName};
pub use step::{GrantStep, IdentityStep, PRODUCT_KEY, Step, UploadStep};
pub use token::{Credentials, GrantToken, IdentityToken, TokenExpiration, UploadToken};
pub use transport::{HttpTransport, TokenTransport, TransportError};

use healthcheck::config::{EndpointConfig, HealthCheckConfig};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Path of the identity-token service.
pub const IDENTITY_TOKEN_PATH: &str = "/auth/api/create_identity/";

/// Path of the upload-grant service.
pub const GRANT_TOKEN_PATH: &str = "/feeds/api/create_grant/";

/// Path of the upload-token service.
pub const UPLOAD_TOKEN_PATH: &str = "/feeds/api/create_upload/";

/// Fully qualified URLs of the three token services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    identity: String,
    grant: String,
    upload: String,
}

impl Endpoints {
    /// Build the service URLs from their domains.
    ///
    /// A trailing `/` on a domain is dropped before the service path is
    /// appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use healthcheck_callhome::exchange::Endpoints;
    ///
    /// let endpoints = Endpoints::from_domains(
    ///     "https://id.example.test/",
    ///     "https://feeds.example.test",
    ///     "https://feeds.example.test",
    /// );
    /// assert_eq!(
    ///     endpoints.identity(),
    ///     "https://id.example.test/auth/api/create_identity/"
    /// );
    /// ```
    #[must_use]
    pub fn from_domains(identity_domain: &str, grant_domain: &str, upload_domain: &str) -> Self {
        Self {
            identity: join(identity_domain, IDENTITY_TOKEN_PATH),
            grant: join(grant_domain, GRANT_TOKEN_PATH),
            upload: join(upload_domain, UPLOAD_TOKEN_PATH),
        }
    }

    /// Build the service URLs from configured domains.
    #[must_use]
    pub fn from_config(config: &EndpointConfig) -> Self {
        Self::from_domains(
            config.identity_domain(),
            config.grant_domain(),
            config.upload_domain(),
        )
    }

    /// URL of the identity-token service.
    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// URL of the upload-grant service.
    #[must_use]
    pub fn grant(&self) -> &str {
        &self.grant
    }

    /// URL of the upload-token service.
    #[must_use]
    pub fn upload(&self) -> &str {
        &self.upload
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&EndpointConfig::default())
    }
}

fn join(domain: &str, path: &str) -> String {
    format!("{}{path}", domain.trim().trim_end_matches('/'))
}

/// Shared flag used to abandon an exchange between steps.
///
/// Cancellation is only observed before a step starts; a request that has
/// already been sent runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create a flag that is not yet cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self, before: StepName) -> Result<()> {
        if self.is_cancelled() {
            return Err(ExchangeError::Cancelled { before });
        }
        Ok(())
    }
}

/// Runs the identity, grant, and upload steps in sequence.
pub struct TokenExchange<'t> {
    transport: &'t dyn TokenTransport,
    identity: IdentityStep,
    grant: GrantStep,
    upload: UploadStep,
}

impl<'t> TokenExchange<'t> {
    /// Create an exchange over `transport` for the given services.
    #[must_use]
    pub fn new(
        transport: &'t dyn TokenTransport,
        endpoints: &Endpoints,
        expiration: TokenExpiration,
    ) -> Self {
        Self {
            transport,
            identity: IdentityStep::new(endpoints.identity()),
            grant: GrantStep::new(endpoints.grant(), expiration),
            upload: UploadStep::new(endpoints.upload(), expiration),
        }
    }

    /// Create an exchange using the configured domains and token lifetime.
    #[must_use]
    pub fn from_config(transport: &'t dyn TokenTransport, config: &HealthCheckConfig) -> Self {
        Self::new(
            transport,
            &Endpoints::from_config(&config.endpoints),
            TokenExpiration::from_secs(config.token_expiration),
        )
    }

    /// Obtain an upload token for `credentials`.
    ///
    /// # Errors
    ///
    /// Returns the first step failure; later steps are not attempted.
    pub fn exchange(&self, credentials: &Credentials) -> Result<UploadToken> {
        self.exchange_until(credentials, &CancellationFlag::new())
    }

    /// Obtain an upload token, checking `cancel` before each step.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Cancelled`] naming the first step that was
    /// not started, or the first step failure.
    pub fn exchange_until(
        &self,
        credentials: &Credentials,
        cancel: &CancellationFlag,
    ) -> Result<UploadToken> {
        cancel.check(StepName::Identity)?;
        let identity = self.identity.run(self.transport, credentials)?;
        cancel.check(StepName::Grant)?;
        let grant = self.grant.run(self.transport, identity)?;
        cancel.check(StepName::Upload)?;
        self.upload.run(self.transport, grant)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
