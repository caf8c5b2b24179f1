use crate::error::ResolutionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A dotted path such as `tests.fixtures.Person` or `tests.fixtures.Color.RED`.
///
/// The same dots separate package components, module components, and nested
/// attribute names, so a path alone does not say where the module ends.
/// [`DottedPath::module_splits`] enumerates the candidate boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DottedPath {
    segments: Vec<String>,
}

impl DottedPath {
    /// Build the path of an attribute `qualname` inside `module`.
    pub fn new(module: &str, qualname: &str) -> Self {
        let segments = module
            .split('.')
            .chain(qualname.split('.'))
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// Parse a dotted path, rejecting empty input and empty segments (`a..b`).
    pub fn parse(s: &str) -> Result<Self, ResolutionError> {
        if s.is_empty() || s.split('.').any(str::is_empty) {
            return Err(ResolutionError::InvalidPath(s.to_string()));
        }
        Ok(Self {
            segments: s.split('.').map(str::to_string).collect(),
        })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment of the path.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Split off the last segment: `a.b.Color.RED` becomes (`a.b.Color`, `RED`).
    ///
    /// Returns `None` for single-segment paths.
    pub fn split_last(&self) -> Option<(DottedPath, &str)> {
        match self.segments.split_last() {
            Some((last, rest)) if !rest.is_empty() => Some((
                DottedPath {
                    segments: rest.to_vec(),
                },
                last.as_str(),
            )),
            _ => None,
        }
    }

    /// Candidate (module, attribute segments) splits, longest module prefix first.
    ///
    /// At least one segment is always left for the attribute part.
    pub fn module_splits(&self) -> impl Iterator<Item = (String, &[String])> + '_ {
        (1..self.segments.len())
            .rev()
            .map(move |boundary| (self.segments[..boundary].join("."), &self.segments[boundary..]))
    }
}

impl fmt::Display for DottedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for DottedPath {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DottedPath> for String {
    fn from(path: DottedPath) -> String {
        path.to_string()
    }
}

impl TryFrom<String> for DottedPath {
    type Error = ResolutionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}
