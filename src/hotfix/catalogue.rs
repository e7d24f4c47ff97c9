//! Version-gated lookup from a host's platform version to its hotfix.
//!
//! Each hotfixable release owns the half-open interval from its floor up to
//! the next release's floor. The newest interval ends at the up-to-date
//! ceiling: hosts at or above it need no hotfix. Hosts below the oldest floor
//! predate the catalogue and are also reported as needing no hotfix.

use super::artifact::RemediationArtifact;
use super::error::{HotfixError, Result};
use super::platform_version::PlatformVersion;
use super::release::HotfixableRelease;
use log::debug;
use std::collections::{BTreeMap, HashSet};

/// Platform version from which hosts are up to date (Kolkata).
pub const UP_TO_DATE_FLOOR: PlatformVersion = PlatformVersion::new(2, 5, 50);

/// The oldest platform version in which a release is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseBoundary {
    /// The release owning the interval.
    pub release: HotfixableRelease,
    /// Lowest platform version belonging to the release.
    pub floor: PlatformVersion,
}

const BUILTIN_BOUNDARIES: [ReleaseBoundary; 4] = [
    ReleaseBoundary {
        release: HotfixableRelease::Clearwater,
        floor: PlatformVersion::new(1, 8, 0),
    },
    ReleaseBoundary {
        release: HotfixableRelease::Creedence,
        floor: PlatformVersion::new(1, 9, 0),
    },
    ReleaseBoundary {
        release: HotfixableRelease::Dundee,
        floor: PlatformVersion::new(2, 0, 0),
    },
    ReleaseBoundary {
        release: HotfixableRelease::ElyJura,
        floor: PlatformVersion::new(2, 1, 1),
    },
];

const BUILTIN_ARTIFACTS: [(HotfixableRelease, &str, &str); 4] = [
    (
        HotfixableRelease::Clearwater,
        "932eb245-d132-40d3-b1c5-1390cf8caa4d",
        "RPU001",
    ),
    (
        HotfixableRelease::Creedence,
        "9adf434f-05b6-4c49-bf87-3447b5eb7850",
        "RPU002",
    ),
    (
        HotfixableRelease::Dundee,
        "b651dd22-df7d-45a4-8c0a-6be037bc1714",
        "RPU003",
    ),
    (
        HotfixableRelease::ElyJura,
        "1821854d-0171-4696-a9c4-01daf75a45a0",
        "RPU004",
    ),
];

/// Where a platform version falls relative to the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assessment {
    /// The host runs a release with a published hotfix.
    Hotfixable(HotfixableRelease),
    /// The host is at or above the up-to-date ceiling.
    UpToDate,
    /// The host is older than every release in the catalogue.
    PredatesCatalogue,
}

impl Assessment {
    /// The release needing a hotfix, if any.
    #[must_use]
    pub fn release(self) -> Option<HotfixableRelease> {
        match self {
            Self::Hotfixable(release) => Some(release),
            Self::UpToDate | Self::PredatesCatalogue => None,
        }
    }
}

/// Immutable, validated mapping from platform versions to hotfixes.
///
/// # Examples
///
/// ```
/// use healthcheck::hotfix::HotfixCatalogue;
///
/// let catalogue = HotfixCatalogue::builtin().expect("built-in table is valid");
/// let artifact = catalogue
///     .resolve("2.1.1")
///     .expect("valid version")
///     .expect("Ely needs a hotfix");
/// assert_eq!(artifact.filename(), "RPU004");
/// assert!(!catalogue.is_required("2.5.50").expect("valid version"));
/// ```
#[derive(Debug, Clone)]
pub struct HotfixCatalogue {
    boundaries: Vec<ReleaseBoundary>,
    ceiling: PlatformVersion,
    artifacts: BTreeMap<HotfixableRelease, RemediationArtifact>,
}

impl HotfixCatalogue {
    /// Build the catalogue shipped with this crate.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Configuration`] if the built-in table is
    /// inconsistent. The table is covered by tests, so this indicates a
    /// build defect.
    pub fn builtin() -> Result<Self> {
        let artifacts = BUILTIN_ARTIFACTS
            .iter()
            .map(|(release, uuid, filename)| RemediationArtifact::new(*release, uuid, filename))
            .collect::<Result<Vec<_>>>()?;
        Self::new(artifacts, BUILTIN_BOUNDARIES.to_vec(), UP_TO_DATE_FLOOR)
    }

    /// Build a catalogue from explicit tables.
    ///
    /// Every [`HotfixableRelease`] must have exactly one artifact and one
    /// boundary. Boundaries must be listed oldest first with strictly
    /// increasing floors, and `ceiling` must lie above the last floor.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Configuration`] describing the first
    /// inconsistency found.
    pub fn new(
        artifacts: Vec<RemediationArtifact>,
        boundaries: Vec<ReleaseBoundary>,
        ceiling: PlatformVersion,
    ) -> Result<Self> {
        let artifacts = index_artifacts(artifacts)?;
        validate_boundaries(&boundaries, ceiling)?;
        Ok(Self {
            boundaries,
            ceiling,
            artifacts,
        })
    }

    /// Place a parsed platform version relative to the catalogue.
    #[must_use]
    pub fn assess_version(&self, version: &PlatformVersion) -> Assessment {
        if *version >= self.ceiling {
            return Assessment::UpToDate;
        }
        self.boundaries
            .iter()
            .rev()
            .find(|boundary| boundary.floor <= *version)
            .map_or(Assessment::PredatesCatalogue, |boundary| {
                Assessment::Hotfixable(boundary.release)
            })
    }

    /// Parse `platform_version` and place it relative to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Parse`] if the version is malformed.
    pub fn assess(&self, platform_version: &str) -> Result<Assessment> {
        let version: PlatformVersion = platform_version.parse()?;
        let assessment = self.assess_version(&version);
        debug!("platform version {version} assessed as {assessment:?}");
        Ok(assessment)
    }

    /// Map a platform version to the release whose hotfix applies.
    ///
    /// Returns `None` when the host is up to date or predates the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Parse`] if the version is malformed.
    pub fn classify(&self, platform_version: &str) -> Result<Option<HotfixableRelease>> {
        Ok(self.assess(platform_version)?.release())
    }

    /// Look up the artifact for a release.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Configuration`] if the release has no
    /// artifact. Construction rejects such tables, so this does not happen
    /// for a catalogue built through [`Self::new`].
    pub fn artifact_for(&self, release: HotfixableRelease) -> Result<&RemediationArtifact> {
        self.artifacts
            .get(&release)
            .ok_or_else(|| HotfixError::Configuration {
                reason: format!("no artifact for {release}"),
            })
    }

    /// Resolve a platform version to the hotfix it needs, if any.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Parse`] if the version is malformed.
    pub fn resolve(&self, platform_version: &str) -> Result<Option<&RemediationArtifact>> {
        self.classify(platform_version)?
            .map(|release| self.artifact_for(release))
            .transpose()
    }

    /// Whether a host reporting `platform_version` needs a hotfix.
    ///
    /// # Errors
    ///
    /// Returns [`HotfixError::Parse`] if the version is malformed.
    pub fn is_required(&self, platform_version: &str) -> Result<bool> {
        Ok(self.classify(platform_version)?.is_some())
    }

    /// Iterate over all artifacts, oldest release first.
    pub fn artifacts(&self) -> impl Iterator<Item = &RemediationArtifact> {
        self.artifacts.values()
    }
}

fn index_artifacts(
    artifacts: Vec<RemediationArtifact>,
) -> Result<BTreeMap<HotfixableRelease, RemediationArtifact>> {
    let mut uuids = HashSet::new();
    let mut filenames = HashSet::new();
    let mut indexed = BTreeMap::new();

    for artifact in artifacts {
        if !uuids.insert(artifact.uuid()) {
            return Err(configuration(format!(
                "duplicate hotfix UUID {}",
                artifact.uuid()
            )));
        }
        if !filenames.insert(artifact.filename().to_owned()) {
            return Err(configuration(format!(
                "duplicate hotfix filename {}",
                artifact.filename()
            )));
        }
        let release = artifact.release();
        if indexed.insert(release, artifact).is_some() {
            return Err(configuration(format!("more than one artifact for {release}")));
        }
    }

    if let Some(missing) = HotfixableRelease::ALL
        .iter()
        .find(|release| !indexed.contains_key(release))
    {
        return Err(configuration(format!("no artifact for {missing}")));
    }
    Ok(indexed)
}

fn validate_boundaries(boundaries: &[ReleaseBoundary], ceiling: PlatformVersion) -> Result<()> {
    let releases: Vec<HotfixableRelease> = boundaries.iter().map(|b| b.release).collect();
    if releases != HotfixableRelease::ALL {
        return Err(configuration(format!(
            "boundaries must list every release once, oldest first; found {releases:?}"
        )));
    }

    for pair in boundaries.windows(2) {
        if let [lower, upper] = pair {
            if lower.floor >= upper.floor {
                return Err(configuration(format!(
                    "floor {} of {} is not below floor {} of {}",
                    lower.floor, lower.release, upper.floor, upper.release
                )));
            }
        }
    }

    match boundaries.last() {
        Some(last) if last.floor < ceiling => Ok(()),
        Some(last) => Err(configuration(format!(
            "up-to-date ceiling {ceiling} is not above floor {} of {}",
            last.floor, last.release
        ))),
        None => Err(configuration("no release boundaries".to_owned())),
    }
}

fn configuration(reason: String) -> HotfixError {
    HotfixError::Configuration { reason }
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
