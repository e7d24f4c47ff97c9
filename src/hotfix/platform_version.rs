//! Dotted numeric platform versions reported by hosts.
//!
//! Hosts report a version such as `2.1.1`. Comparison is numeric per
//! component, and missing trailing components count as zero, so `2.5` and
//! `2.5.0` are equal.

use super::error::PlatformVersionError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Maximum number of dotted components accepted.
const MAX_COMPONENTS: usize = 4;

/// A parsed platform version.
///
/// # Examples
///
/// ```
/// use healthcheck::hotfix::PlatformVersion;
///
/// let ely: PlatformVersion = "2.1.1".parse().expect("valid version");
/// let jura: PlatformVersion = "2.5".parse().expect("valid version");
/// assert!(ely < jura);
/// assert_eq!(jura, PlatformVersion::new(2, 5, 0));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct PlatformVersion {
    parts: [u32; MAX_COMPONENTS],
    len: usize,
}

impl PlatformVersion {
    /// Build a three-component version.
    #[must_use]
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            parts: [major, minor, patch, 0],
            len: 3,
        }
    }

    /// Return the components as written, without zero padding.
    #[must_use]
    pub fn components(&self) -> &[u32] {
        self.parts.get(..self.len).unwrap_or(&self.parts)
    }
}

impl FromStr for PlatformVersion {
    type Err = PlatformVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(PlatformVersionError::Empty);
        }

        let count = value.split('.').count();
        if count > MAX_COMPONENTS {
            return Err(PlatformVersionError::TooManyComponents {
                value: value.to_owned(),
                count,
                max: MAX_COMPONENTS,
            });
        }

        let mut parts = [0_u32; MAX_COMPONENTS];
        for (slot, component) in parts.iter_mut().zip(value.split('.')) {
            *slot = parse_component(value, component)?;
        }

        Ok(Self { parts, len: count })
    }
}

/// Parse one component, accepting ASCII digits only.
///
/// `u32::from_str` tolerates a leading `+`, which no host reports.
fn parse_component(value: &str, component: &str) -> Result<u32, PlatformVersionError> {
    let invalid = || PlatformVersionError::InvalidComponent {
        value: value.to_owned(),
        component: component.to_owned(),
    };
    if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    component.parse().map_err(|_| invalid())
}

impl TryFrom<&str> for PlatformVersion {
    type Error = PlatformVersionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl PartialEq for PlatformVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for PlatformVersion {}

impl Hash for PlatformVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl PartialOrd for PlatformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlatformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts.cmp(&other.parts)
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in self.components() {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}
