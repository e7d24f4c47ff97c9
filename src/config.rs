//! Health-check configuration loaded from `healthcheck.toml`.
//!
//! The file is optional. When it is absent every setting falls back to the
//! built-in defaults, and blank endpoint overrides are ignored so a templated
//! file such as `identity_domain = ""` behaves like an omitted key.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use thiserror::Error;

/// Default domain serving identity tokens.
pub const DEFAULT_IDENTITY_DOMAIN: &str = "http://cis-daily.citrite.net";

/// Default domain serving upload grant tokens.
pub const DEFAULT_GRANT_DOMAIN: &str = "https://rttf-staging.citrix.com";

/// Default domain serving upload tokens.
pub const DEFAULT_UPLOAD_DOMAIN: &str = "https://rttf-staging.citrix.com";

/// Default lifetime requested for grant and upload tokens, in seconds.
pub const DEFAULT_TOKEN_EXPIRATION: u64 = 86_400;

/// Name of the configuration file inside the platform config directory.
const CONFIG_FILE_NAME: &str = "healthcheck.toml";

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration at {path}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration TOML.
    #[error("invalid configuration at {path}: {reason}")]
    Parse {
        /// Path that was parsed.
        path: Utf8PathBuf,
        /// The TOML parser's message.
        reason: String,
    },
}

/// Settings shared by the health-check tools.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HealthCheckConfig {
    /// Lifetime requested for grant and upload tokens, in seconds.
    pub token_expiration: u64,
    /// Domain overrides for the token exchange services.
    pub endpoints: EndpointConfig,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            token_expiration: DEFAULT_TOKEN_EXPIRATION,
            endpoints: EndpointConfig::default(),
        }
    }
}

impl HealthCheckConfig {
    /// Returns the platform-specific configuration file path.
    ///
    /// - Linux: `~/.config/healthcheck/healthcheck.toml`
    /// - macOS: `~/Library/Application Support/healthcheck/healthcheck.toml`
    /// - Windows: `%APPDATA%\healthcheck\healthcheck.toml`
    ///
    /// Returns `None` if the platform's config directory cannot be
    /// determined or is not valid UTF-8.
    #[must_use]
    pub fn default_path() -> Option<Utf8PathBuf> {
        directories_next::BaseDirs::new()
            .and_then(|dirs| Utf8PathBuf::try_from(dirs.config_dir().to_path_buf()).ok())
            .map(|dir| dir.join("healthcheck").join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `explicit`, or from [`Self::default_path`]
    /// when no path is given.
    ///
    /// A missing file at the default location yields the defaults; a missing
    /// explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) => Self::load_with(&path, read_if_present),
                None => Ok(Self::default()),
            },
        }
    }

    /// Loads configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        Self::load_with(path, |p| std::fs::read_to_string(p).map(Some))
    }

    /// Loads configuration using the supplied reader.
    ///
    /// The reader returns `Ok(None)` when the file does not exist and the
    /// defaults should apply. This exists so tests can simulate the file
    /// system.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use healthcheck::config::HealthCheckConfig;
    ///
    /// let config = HealthCheckConfig::load_with(Utf8Path::new("healthcheck.toml"), |_| {
    ///     Ok(Some("token_expiration = 600\n".to_owned()))
    /// })
    /// .expect("valid configuration");
    /// assert_eq!(config.token_expiration, 600);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the reader fails or the contents do not
    /// parse.
    pub fn load_with<F>(path: &Utf8Path, reader: F) -> Result<Self, ConfigError>
    where
        F: FnOnce(&Utf8Path) -> std::io::Result<Option<String>>,
    {
        let contents = reader(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        match contents {
            Some(text) => toml::from_str(&text).map_err(|e| ConfigError::Parse {
                path: path.to_owned(),
                reason: e.message().to_owned(),
            }),
            None => Ok(Self::default()),
        }
    }
}

fn read_if_present(path: &Utf8Path) -> std::io::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Domain overrides for the three token services.
///
/// Each accessor returns the override when it is non-blank and the default
/// otherwise.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointConfig {
    /// Domain for the identity-token service.
    pub identity_domain: Option<String>,
    /// Domain for the upload-grant service.
    pub grant_domain: Option<String>,
    /// Domain for the upload-token service.
    pub upload_domain: Option<String>,
}

impl EndpointConfig {
    /// Effective identity-token domain.
    #[must_use]
    pub fn identity_domain(&self) -> &str {
        non_blank(self.identity_domain.as_deref()).unwrap_or(DEFAULT_IDENTITY_DOMAIN)
    }

    /// Effective upload-grant domain.
    #[must_use]
    pub fn grant_domain(&self) -> &str {
        non_blank(self.grant_domain.as_deref()).unwrap_or(DEFAULT_GRANT_DOMAIN)
    }

    /// Effective upload-token domain.
    #[must_use]
    pub fn upload_domain(&self) -> &str {
        non_blank(self.upload_domain.as_deref()).unwrap_or(DEFAULT_UPLOAD_DOMAIN)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
