use std::{fmt, time::Duration};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KirinukiError {
    #[error("HTTP error: {0}")]
    HttpError(reqwest::StatusCode),

    #[error("Timed out after {timeout:?} fetching {uri}")]
    FetchTimeout { uri: String, timeout: Duration },

    #[error("Fetch task aborted before reporting")]
    FetchAborted,

    #[error("Invalid m3u8 file: {0}")]
    M3u8ParseError(String),

    #[error("Expected a {expected} playlist")]
    UnexpectedPlaylist { expected: PlaylistKind },

    #[error("Master playlist lists no rendition")]
    NoRendition,

    #[error("Media playlist lists no segment in the live window")]
    EmptyWindow,

    #[error("Failed to fetch {0}")]
    PartialFetchFailure(SegmentFailures),

    #[error("Remux failed: {0}")]
    CollaboratorFailure(String),

    #[error("{0}")]
    NotAllowed(String),

    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    UrlParseError(#[from] url::ParseError),

    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    #[error(transparent)]
    MissingExecutable(#[from] which::Error),
}

pub type KirinukiResult<T> = Result<T, KirinukiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Master,
    Media,
}

impl fmt::Display for PlaylistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Master => f.write_str("master"),
            Self::Media => f.write_str("media"),
        }
    }
}

/// One failed fetch inside a [KirinukiError::PartialFetchFailure].
#[derive(Debug)]
pub struct SegmentFailure {
    pub sequence: u64,
    pub uri: String,
    pub error: KirinukiError,
}

impl fmt::Display for SegmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[#{} {}] {}", self.sequence, self.uri, self.error)
    }
}

/// Every failed fetch of one assembly, flattened into a single message when displayed.
#[derive(Debug, Default)]
pub struct SegmentFailures(pub Vec<SegmentFailure>);

impl SegmentFailures {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentFailure> {
        self.0.iter()
    }
}

impl fmt::Display for SegmentFailures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} segment(s):", self.0.len())?;
        for failure in &self.0 {
            write!(f, " {failure}")?;
        }
        Ok(())
    }
}

/// Coarse classification of [KirinukiError].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Status,
    Decode,
    PartialFetch,
    Collaborator,
    Rejected,
    Io,
}

impl KirinukiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RequestError(_) | Self::FetchTimeout { .. } | Self::FetchAborted => {
                ErrorKind::Transport
            }
            Self::HttpError(_) => ErrorKind::Status,
            Self::M3u8ParseError(_)
            | Self::UnexpectedPlaylist { .. }
            | Self::NoRendition
            | Self::EmptyWindow
            | Self::UrlParseError(_) => ErrorKind::Decode,
            Self::PartialFetchFailure(_) => ErrorKind::PartialFetch,
            Self::CollaboratorFailure(_) | Self::MissingExecutable(_) => ErrorKind::Collaborator,
            Self::NotAllowed(_) => ErrorKind::Rejected,
            Self::IOError(_) => ErrorKind::Io,
        }
    }
}
