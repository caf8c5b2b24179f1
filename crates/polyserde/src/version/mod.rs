//! Library versions and load-time compatibility checks.
//!
//! [`Version`] parses the PEP 440 shape used by library releases
//! (`[v][N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`). The [`guard`] compares a
//! version recorded in an artifact with the installed one.

pub mod guard;

pub use guard::{Compatibility, Severity, VersionGuard, VersionWarning, compare};

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::error;

const VERSION_PATTERN: &str = r"(?ix)
    ^\s*
    v?
    (?:(?P<epoch>[0-9]+)!)?
    (?P<release>[0-9]+(?:\.[0-9]+)*)
    (?:
        [-_.]?
        (?P<pre_label>alpha|beta|preview|pre|rc|a|b|c)
        [-_.]?
        (?P<pre_number>[0-9]+)?
    )?
    (?:
        -(?P<post_implicit>[0-9]+)
        |
        [-_.]?(?P<post_label>post|rev|r)[-_.]?(?P<post_number>[0-9]+)?
    )?
    (?:
        [-_.]?(?P<dev_label>dev)[-_.]?(?P<dev_number>[0-9]+)?
    )?
    (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
    \s*$";

static VERSION_REGEX: LazyLock<Option<Regex>> = LazyLock::new(|| match Regex::new(VERSION_PATTERN) {
    Ok(regex) => Some(regex),
    Err(err) => {
        error!("Version pattern failed to compile, versions will be compared as strings: {}", err);
        None
    }
});

/// The string is not a PEP 440 version.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a semantic version")]
pub struct ParseVersionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreRelease {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            _ => PreRelease::ReleaseCandidate,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::ReleaseCandidate => "rc",
        }
    }
}

/// A parsed library version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreRelease, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl Version {
    pub fn parse(s: &str) -> Result<Self, ParseVersionError> {
        let invalid = || ParseVersionError(s.to_string());
        let caps = VERSION_REGEX
            .as_ref()
            .and_then(|re| re.captures(s))
            .ok_or_else(invalid)?;

        let number = |name: &str| -> Result<Option<u64>, ParseVersionError> {
            caps.name(name)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
                .transpose()
        };

        let release = caps
            .name("release")
            .ok_or_else(invalid)?
            .as_str()
            .split('.')
            .map(|segment| segment.parse::<u64>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_label") {
            Some(label) => Some((
                PreRelease::from_label(label.as_str()),
                number("pre_number")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = match number("post_implicit")? {
            Some(n) => Some(n),
            None if caps.name("post_label").is_some() => Some(number("post_number")?.unwrap_or(0)),
            None => None,
        };

        let dev = match caps.name("dev_label") {
            Some(_) => Some(number("dev_number")?.unwrap_or(0)),
            None => None,
        };

        Ok(Self {
            epoch: number("epoch")?.unwrap_or(0),
            release,
            pre,
            post,
            dev,
            local: caps.name("local").map(|m| m.as_str().to_ascii_lowercase()),
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn major(&self) -> u64 {
        self.release.first().copied().unwrap_or(0)
    }

    /// Second release segment; `1` reads as `1.0`.
    pub fn minor(&self) -> u64 {
        self.release.get(1).copied().unwrap_or(0)
    }

    pub fn micro(&self) -> u64 {
        self.release.get(2).copied().unwrap_or(0)
    }

    pub fn pre(&self) -> Option<(PreRelease, u64)> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Version {
    type Error = ParseVersionError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

/// Normalized form: `1!2.0rc1.post3.dev4+ubuntu.1`.
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((label, n)) = self.pre {
            write!(f, "{}{}", label.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}
