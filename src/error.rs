use std::path::PathBuf;

/// Every failure the bridge reports to its host.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("File does not exist: {}", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to load font: {0}")]
    FontLoadFailed(String),
    #[error("Font handle is null or already disposed")]
    InvalidResource,
    #[error("Invalid feature tag {0:?}: expected exactly 4 ASCII characters")]
    InvalidFeatureTag(String),
}

/// Fieldless tag for hosts that marshal errors as `(kind, message)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    FontLoadFailed,
    InvalidResource,
    InvalidFeatureTag,
}

impl FontError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FontError::FileNotFound { .. } => ErrorKind::FileNotFound,
            FontError::FontLoadFailed(_) => ErrorKind::FontLoadFailed,
            FontError::InvalidResource => ErrorKind::InvalidResource,
            FontError::InvalidFeatureTag(_) => ErrorKind::InvalidFeatureTag,
        }
    }
}
