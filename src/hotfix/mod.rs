//! Hotfix resolution for hosts reporting a platform version.
//!
//! Hosts running an older platform release need a remediation package before
//! health-check data can be collected. This module decides whether a host
//! needs one and which package applies.
//!
//! # Sub-modules
//!
//! - [`artifact`] - Remediation package records (`RemediationArtifact`).
//! - [`catalogue`] - Validated version-to-hotfix lookup (`HotfixCatalogue`).
//! - [`error`] - Parse and configuration error types.
//! - [`platform_version`] - Dotted numeric version newtype (`PlatformVersion`).
//! - [`release`] - Ordered enumeration of hotfixable releases.

pub mod artifact;
pub mod catalogue;
pub mod error;
pub mod platform_version;
pub mod release;

pub use artifact::RemediationArtifact;
pub use catalogue::{Assessment, HotfixCatalogue, ReleaseBoundary, UP_TO_DATE_FLOOR};
pub use error::{HotfixError, PlatformVersionError};
pub use platform_version::PlatformVersion;
pub use release::HotfixableRelease;
