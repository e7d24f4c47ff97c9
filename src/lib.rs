//! Core health-check library: shared configuration and hotfix resolution.
//!
//! # Modules
//!
//! - [`config`] - Configuration file loading and endpoint defaults
//! - [`hotfix`] - Platform version classification and hotfix lookup

pub mod config;
pub mod hotfix;

pub use config::{ConfigError, EndpointConfig, HealthCheckConfig};
pub use hotfix::{HotfixCatalogue, HotfixError, HotfixableRelease, RemediationArtifact};
