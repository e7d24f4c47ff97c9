//! Remediation artifacts published for hotfixable releases.

use super::error::{HotfixError, Result};
use super::release::HotfixableRelease;
use serde::Serialize;
use uuid::Uuid;

/// A hotfix package identified by UUID and filename.
///
/// Artifacts are immutable once built; the catalogue hands out shared
/// references.
///
/// # Examples
///
/// ```
/// use healthcheck::hotfix::{HotfixableRelease, RemediationArtifact};
///
/// let artifact = RemediationArtifact::new(
///     HotfixableRelease::Dundee,
///     "b651dd22-df7d-45a4-8c0a-6be037bc1714",
///     "RPU003",
/// )
/// .expect("valid artifact");
/// assert_eq!(artifact.filename(), "RPU003");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemediationArtifact {
    release: HotfixableRelease,
    uuid: Uuid,
    filename: String,
}

impl RemediationArtifact {
    /// Build an artifact, validating the UUID and filename.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Configuration`] when `uuid` is not a valid
    /// UUID or `filename` is blank.
    pub fn new(release: HotfixableRelease, uuid: &str, filename: &str) -> Result<Self> {
        let parsed = Uuid::parse_str(uuid).map_err(|e| HotfixError::Configuration {
            reason: format!("invalid UUID \"{uuid}\" for {release}: {e}"),
        })?;
        if filename.trim().is_empty() {
            return Err(HotfixError::Configuration {
                reason: format!("empty filename for {release}"),
            });
        }
        Ok(Self {
            release,
            uuid: parsed,
            filename: filename.to_owned(),
        })
    }

    /// The release this artifact remediates.
    #[must_use]
    pub fn release(&self) -> HotfixableRelease {
        self.release
    }

    /// The hotfix UUID.
    #[must_use]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// The hotfix package filename.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}
