//! Credentials and the short-lived tokens produced by each exchange step.
//!
//! Token and password values are secrets, so their `Debug` output is redacted
//! and they never appear in log records.

use std::fmt;

/// Declare a redacted token newtype.
macro_rules! token_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            /// Wrap a token value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the token as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!(stringify!($name), "(<redacted>)"))
            }
        }
    };
}

token_type!(
    /// Token proving the caller's identity; consumed by the grant step.
    IdentityToken
);

token_type!(
    /// Token granting permission to request an upload token.
    GrantToken
);

token_type!(
    /// Final token authorising health-check uploads.
    UploadToken
);

/// Username and password presented to the identity service.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Build credentials from a username and password.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Lifetime requested for grant and upload tokens, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct TokenExpiration(u64);

impl TokenExpiration {
    /// Wrap a lifetime in seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    /// The lifetime in seconds.
    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_token_values() {
        let token = UploadToken::new("s3cr3t");
        let rendered = format!("{token:?}");
        assert_eq!(rendered, "UploadToken(<redacted>)");
        assert_eq!(token.as_str(), "s3cr3t");
    }

    #[test]
    fn debug_output_hides_password() {
        let credentials = Credentials::new("alice", "hunter2");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn expiration_serialises_as_number() {
        let json = serde_json::to_string(&TokenExpiration::from_secs(3600)).expect("serialise");
        assert_eq!(json, "3600");
    }
}
