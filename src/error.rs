//! Crate-level error types.

use std::fmt;

use crate::grid::GridBuildError;

/// Errors produced by the molframe crate.
#[derive(Debug)]
pub enum MolframeError {
    /// Spatial grid rebuild failure. The previously built grid remains
    /// valid and in use.
    GridBuild(GridBuildError),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for MolframeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GridBuild(e) => write!(f, "grid rebuild error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for MolframeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GridBuild(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::OptionsParse(_) => None,
        }
    }
}

impl From<GridBuildError> for MolframeError {
    fn from(e: GridBuildError) -> Self {
        Self::GridBuild(e)
    }
}

impl From<std::io::Error> for MolframeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
