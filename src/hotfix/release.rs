//! Platform releases that have a remediation hotfix.
//!
//! Ordering follows release chronology through an explicit ordinal rather
//! than declaration order, so reordering the variants cannot change how
//! releases compare.

use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// A platform release for which a hotfix is published.
///
/// # Examples
///
/// ```
/// use healthcheck::hotfix::HotfixableRelease;
///
/// assert!(HotfixableRelease::Clearwater < HotfixableRelease::ElyJura);
/// assert_eq!(HotfixableRelease::ElyJura.to_string(), "Ely-Jura");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HotfixableRelease {
    /// XenServer 6.2.
    Clearwater,
    /// XenServer 6.5.
    Creedence,
    /// XenServer 7.0.
    Dundee,
    /// XenServer 7.1 through 7.4 (Ely, Falcon, Inverness, Jura).
    #[serde(rename = "Ely-Jura")]
    ElyJura,
}

impl HotfixableRelease {
    /// Every hotfixable release, oldest first.
    pub const ALL: [Self; 4] = [Self::Clearwater, Self::Creedence, Self::Dundee, Self::ElyJura];

    /// Chronological position of the release; older releases are smaller.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Clearwater => 0,
            Self::Creedence => 1,
            Self::Dundee => 2,
            Self::ElyJura => 3,
        }
    }

    /// Human-readable release name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Clearwater => "Clearwater",
            Self::Creedence => "Creedence",
            Self::Dundee => "Dundee",
            Self::ElyJura => "Ely-Jura",
        }
    }
}

impl PartialOrd for HotfixableRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HotfixableRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for HotfixableRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
