use std::path::PathBuf;

/// Coarse classification of a [`ScrapeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    NotFound,
    Parse,
    Filesystem,
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("GET {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("read body of {url}")]
    Body {
        url: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse: {0}")]
    Parse(String),

    #[error("{action}: {}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network { .. } | Self::HttpStatus { .. } | Self::Body { .. } => ErrorKind::Network,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Filesystem { .. } => ErrorKind::Filesystem,
        }
    }

    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}
