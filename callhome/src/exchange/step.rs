//! The typed steps of the token exchange.
//!
//! Each step posts one JSON request and turns the `{"Token": ...}` response
//! into the token type consumed by the next step.

use super::error::{ExchangeError, Result, StepName};
use super::token::{Credentials, GrantToken, IdentityToken, TokenExpiration, UploadToken};
use super::transport::TokenTransport;
use log::debug;
use serde::{Deserialize, Serialize};

/// Product key sent with every upload-token request.
pub const PRODUCT_KEY: &str = "eb1b224c461038baf1f08dfba6b8d4b4413f96c7";

/// One request/response round-trip of the exchange.
///
/// Steps hold only their configuration; the transport is supplied per run so
/// a step can be tested against a fake.
pub trait Step<In, Out> {
    /// Which step this is.
    fn name(&self) -> StepName;

    /// Send the request built from `input` and decode the resulting token.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Transport`] if the request fails and
    /// [`ExchangeError::Serialization`] if the response is not a token
    /// object or carries an empty token.
    fn run(&self, transport: &dyn TokenTransport, input: In) -> Result<Out>;
}

/// Response body shared by all three services.
#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "Token")]
    token: String,
}

#[derive(Serialize)]
struct IdentityRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct GrantRequest<'a> {
    identity_token: &'a str,
    expiration: TokenExpiration,
}

#[derive(Serialize)]
struct UploadRequest<'a> {
    grant_token: &'a str,
    product_key: &'a str,
    expiration: TokenExpiration,
}

/// Exchanges credentials for an identity token.
#[derive(Debug, Clone)]
pub struct IdentityStep {
    url: String,
}

impl IdentityStep {
    /// Create the step for the given endpoint URL.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl<'c> Step<&'c Credentials, IdentityToken> for IdentityStep {
    fn name(&self) -> StepName {
        StepName::Identity
    }

    fn run(&self, transport: &dyn TokenTransport, input: &'c Credentials) -> Result<IdentityToken> {
        let body = IdentityRequest {
            username: input.username(),
            password: input.password(),
        };
        request_token(transport, self.name(), &self.url, &body).map(IdentityToken::new)
    }
}

/// Exchanges an identity token for an upload grant token.
#[derive(Debug, Clone)]
pub struct GrantStep {
    url: String,
    expiration: TokenExpiration,
}

impl GrantStep {
    /// Create the step for the given endpoint URL and token lifetime.
    #[must_use]
    pub fn new(url: impl Into<String>, expiration: TokenExpiration) -> Self {
        Self {
            url: url.into(),
            expiration,
        }
    }
}

impl Step<IdentityToken, GrantToken> for GrantStep {
    fn name(&self) -> StepName {
        StepName::Grant
    }

    fn run(&self, transport: &dyn TokenTransport, input: IdentityToken) -> Result<GrantToken> {
        let body = GrantRequest {
            identity_token: input.as_str(),
            expiration: self.expiration,
        };
        request_token(transport, self.name(), &self.url, &body).map(GrantToken::new)
    }
}

/// Exchanges an upload grant token for an upload token.
#[derive(Debug, Clone)]
pub struct UploadStep {
    url: String,
    expiration: TokenExpiration,
}

impl UploadStep {
    /// Create the step for the given endpoint URL and token lifetime.
    #[must_use]
    pub fn new(url: impl Into<String>, expiration: TokenExpiration) -> Self {
        Self {
            url: url.into(),
            expiration,
        }
    }
}

impl Step<GrantToken, UploadToken> for UploadStep {
    fn name(&self) -> StepName {
        StepName::Upload
    }

    fn run(&self, transport: &dyn TokenTransport, input: GrantToken) -> Result<UploadToken> {
        let body = UploadRequest {
            grant_token: input.as_str(),
            product_key: PRODUCT_KEY,
            expiration: self.expiration,
        };
        request_token(transport, self.name(), &self.url, &body).map(UploadToken::new)
    }
}

/// Post `body` to `url` and extract the `Token` field of the response.
fn request_token<B: Serialize>(
    transport: &dyn TokenTransport,
    step: StepName,
    url: &str,
    body: &B,
) -> Result<String> {
    let payload = serde_json::to_string(body).map_err(|e| ExchangeError::Serialization {
        step,
        reason: e.to_string(),
    })?;
    debug!("requesting {step} token from {url}");
    let response = transport
        .post_json(url, &payload)
        .map_err(|source| ExchangeError::Transport { step, source })?;
    let decoded: TokenResponse =
        serde_json::from_str(&response).map_err(|e| ExchangeError::Serialization {
            step,
            reason: e.to_string(),
        })?;
    if decoded.token.is_empty() {
        return Err(ExchangeError::Serialization {
            step,
            reason: "empty token".to_owned(),
        });
    }
    debug!("received {step} token");
    Ok(decoded.token)
}
