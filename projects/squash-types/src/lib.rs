mod errors;

pub use errors::{Result, SquashError, SquashErrorKind, UnresolvedTable};

use std::fmt::{Display, Formatter};

/// Byte range within a normalized source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Where a statement came from: the migration source name and the
/// 1-based logical line after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLocation {
    pub source: String,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(source: impl Into<String>, line: usize) -> Self {
        Self { source: source.into(), line }
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.source, self.line)
    }
}
