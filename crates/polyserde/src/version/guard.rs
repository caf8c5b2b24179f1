use super::Version;
use crate::packages::PackageMetadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// How an artifact's recorded version relates to the installed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compatibility {
    /// Same major and minor release; patch and pre-release labels are ignored.
    Compatible,
    MinorDifference,
    MajorMismatch,
    /// At least one side is not a semantic version and the strings differ.
    Incomparable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Compatibility {
    /// `None` when no warning is due.
    pub fn severity(self) -> Option<Severity> {
        match self {
            Compatibility::Compatible => None,
            Compatibility::MinorDifference => Some(Severity::Low),
            Compatibility::Incomparable => Some(Severity::Medium),
            Compatibility::MajorMismatch => Some(Severity::High),
        }
    }

    pub fn is_compatible(self) -> bool {
        self == Compatibility::Compatible
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// Classify `serialized` against `installed`.
///
/// Versions that both parse are compared on major, then minor. Anything else
/// falls back to string equality.
pub fn compare(serialized: &str, installed: &str) -> Compatibility {
    match (Version::parse(serialized), Version::parse(installed)) {
        (Ok(ours), Ok(theirs)) => {
            if ours.major() != theirs.major() {
                Compatibility::MajorMismatch
            } else if ours.minor() != theirs.minor() {
                Compatibility::MinorDifference
            } else {
                Compatibility::Compatible
            }
        }
        _ if serialized == installed => Compatibility::Compatible,
        _ => Compatibility::Incomparable,
    }
}

/// A non-fatal notice that an artifact may not match the installed library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionWarning {
    pub lib: String,
    pub serialized: String,
    pub installed: String,
    pub compatibility: Compatibility,
    pub severity: Severity,
    pub message: String,
}

impl VersionWarning {
    /// Build the warning for a `compatibility` outcome, or `None` if it needs none.
    pub fn new(lib: &str, serialized: &str, installed: &str, compatibility: Compatibility) -> Option<Self> {
        let severity = compatibility.severity()?;
        let message = match compatibility {
            Compatibility::MajorMismatch => format!(
                "Major version mismatch for '{}': data was serialized with {} but {} is installed. \
                 The data is likely incompatible.",
                lib, serialized, installed
            ),
            Compatibility::MinorDifference => format!(
                "Minor version difference for '{}': data was serialized with {} but {} is installed. \
                 Review recommended.",
                lib, serialized, installed
            ),
            _ => format!(
                "Version mismatch for '{}': data was serialized with '{}' but '{}' is installed; \
                 the versions cannot be compared semantically.",
                lib, serialized, installed
            ),
        };
        Some(Self {
            lib: lib.to_string(),
            serialized: serialized.to_string(),
            installed: installed.to_string(),
            compatibility,
            severity,
            message,
        })
    }
}

impl fmt::Display for VersionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Compares artifact versions with the versions reported by a [`PackageMetadata`].
#[derive(Clone)]
pub struct VersionGuard {
    packages: Arc<dyn PackageMetadata>,
}

impl VersionGuard {
    pub fn new(packages: impl PackageMetadata + 'static) -> Self {
        Self::from_shared(Arc::new(packages))
    }

    pub fn from_shared(packages: Arc<dyn PackageMetadata>) -> Self {
        Self { packages }
    }

    pub fn packages(&self) -> &Arc<dyn PackageMetadata> {
        &self.packages
    }

    /// Check `serialized` against the installed version of `lib`.
    ///
    /// Returns `None` when the versions are compatible or when `lib` is not
    /// installed. A returned warning has also been logged.
    pub fn check(&self, lib: &str, serialized: &str) -> Option<VersionWarning> {
        let Some(installed) = self.packages.installed_version(lib) else {
            debug!("Library '{}' is not installed, skipping version check", lib);
            return None;
        };

        let compatibility = compare(serialized, &installed);
        debug!(
            "Version check for '{}': serialized {}, installed {}, {:?}",
            lib, serialized, installed, compatibility
        );

        let warning = VersionWarning::new(lib, serialized, &installed, compatibility)?;
        warn!(severity = %warning.severity, "{}", warning.message);
        Some(warning)
    }
}

impl fmt::Debug for VersionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersionGuard").finish_non_exhaustive()
    }
}
