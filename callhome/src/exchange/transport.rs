//! HTTP transport for the token exchange.
//!
//! Provides a trait-based abstraction over JSON `POST` requests so that each
//! exchange step can be exercised against a fake transport without network
//! access.

use std::sync::OnceLock;

/// Trait for posting a JSON body and reading the response body.
///
/// # Examples
///
/// ```
/// use healthcheck_callhome::exchange::transport::HttpTransport;
///
/// let transport = HttpTransport;
/// // Use transport.post_json(url, body) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait TokenTransport {
    /// Send `body` to `url` as `application/json` and return the response
    /// body text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with a
    /// non-success status.
    fn post_json(&self, url: &str, body: &str) -> Result<String, TransportError>;
}

/// Errors arising from a token service request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The server answered with a non-success HTTP status.
    #[error("{url} returned HTTP {code}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The HTTP status code.
        code: u16,
    },

    /// The request could not be completed.
    #[error("request to {url} failed: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// HTTP transport using `ureq` with its default timeouts and TLS settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpTransport;

impl TokenTransport for HttpTransport {
    fn post_json(&self, url: &str, body: &str) -> Result<String, TransportError> {
        let response = http_agent()
            .post(url)
            .header("Content-Type", "application/json")
            .send(body)
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| TransportError::Http {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }
}

/// Shared `ureq` agent.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a [`TransportError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> TransportError {
    match err {
        ureq::Error::StatusCode(code) => TransportError::Status {
            url: url.to_owned(),
            code: *code,
        },
        other => TransportError::Http {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(404)]
    #[case(500)]
    fn map_ureq_error_keeps_status_code(#[case] code: u16) {
        let err = ureq::Error::StatusCode(code);
        let mapped = map_ureq_error("https://example.test/feeds/api/create_grant/", &err);
        assert_eq!(
            mapped,
            TransportError::Status {
                url: "https://example.test/feeds/api/create_grant/".to_owned(),
                code,
            }
        );
    }

    #[test]
    fn map_ureq_error_maps_other_errors_to_http() {
        let err = ureq::Error::HostNotFound;
        let mapped = map_ureq_error("https://example.test/", &err);
        assert!(matches!(mapped, TransportError::Http { .. }));
    }

    #[test]
    fn status_error_mentions_url_and_code() {
        let err = TransportError::Status {
            url: "https://example.test/auth/api/create_identity/".to_owned(),
            code: 401,
        };
        let msg = err.to_string();
        assert!(msg.contains("create_identity"));
        assert!(msg.contains("401"));
    }
}
