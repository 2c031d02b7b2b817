//! Addresses into the output map.
//!
//! Paths use a dotted/array notation: `summary`, `sections[2].title`,
//! `answers[]`. An empty string is the root. A trailing `[]` is an append
//! segment: writing through it pushes a new element, reading through it is an
//! error.

use cantata_error::{CantataError, CantataResult, OutputError, OutputErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One step of an [`OutputPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
    /// Object member
    Key(String),
    /// Existing (or next) array element
    Index(usize),
    /// New element at the end of an array
    Append,
}

/// A parsed output address.
///
/// # Examples
///
/// ```
/// use cantata_core::{OutputPath, PathSegment};
///
/// let path: OutputPath = "sections[2].title".parse().unwrap();
/// assert_eq!(path.segments().len(), 3);
/// assert_eq!(path.segments()[1], PathSegment::Index(2));
/// assert_eq!(path.to_string(), "sections[2].title");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OutputPath {
    segments: Vec<PathSegment>,
}

impl OutputPath {
    /// The empty path, addressing the whole output map.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse dotted/array notation.
    ///
    /// # Errors
    ///
    /// Returns `OutputErrorKind::InvalidPath` for empty keys, unterminated
    /// brackets, non-numeric indices and paths that start with a bracket.
    pub fn parse(text: &str) -> CantataResult<Self> {
        if text.is_empty() {
            return Ok(Self::root());
        }

        let invalid = |reason: String| {
            CantataError::from(OutputError::new(OutputErrorKind::InvalidPath {
                path: text.to_string(),
                reason,
            }))
        };

        let mut segments = Vec::new();
        let mut rest = text;
        loop {
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            let key = &rest[..end];
            if key.is_empty() {
                return Err(invalid("empty key".to_string()));
            }
            if key.contains(']') {
                return Err(invalid(format!("unexpected ']' in '{}'", key)));
            }
            segments.push(PathSegment::Key(key.to_string()));
            rest = &rest[end..];

            while let Some(after) = rest.strip_prefix('[') {
                let close = after
                    .find(']')
                    .ok_or_else(|| invalid("unterminated '['".to_string()))?;
                let inner = &after[..close];
                if inner.is_empty() {
                    segments.push(PathSegment::Append);
                } else {
                    let index = inner
                        .parse::<usize>()
                        .map_err(|_| invalid(format!("'{}' is not an array index", inner)))?;
                    segments.push(PathSegment::Index(index));
                }
                rest = &after[close + 1..];
            }

            if rest.is_empty() {
                break;
            }
            rest = rest
                .strip_prefix('.')
                .ok_or_else(|| invalid(format!("expected '.' or '[' before '{}'", rest)))?;
        }

        Ok(Self { segments })
    }

    /// The segments in order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether any segment is an append (`[]`).
    pub fn has_append(&self) -> bool {
        self.segments.contains(&PathSegment::Append)
    }

    /// This path extended by an object key.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.with_segment(PathSegment::Key(key.into()))
    }

    /// This path extended by an array index.
    pub fn index(&self, index: usize) -> Self {
        self.with_segment(PathSegment::Index(index))
    }

    /// This path extended by an append segment.
    pub fn append(&self) -> Self {
        self.with_segment(PathSegment::Append)
    }

    /// The path without its last segment, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Prefix of this path holding the first `len` segments.
    pub fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len.min(self.segments.len())].to_vec(),
        }
    }

    fn with_segment(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Append => write!(f, "[]"),
        }
    }
}

impl fmt::Display for OutputPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            if position > 0 && matches!(segment, PathSegment::Key(_)) {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for OutputPath {
    type Err = CantataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for OutputPath {
    type Error = CantataError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for OutputPath {
    type Error = CantataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OutputPath> for String {
    fn from(path: OutputPath) -> Self {
        path.to_string()
    }
}
