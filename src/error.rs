pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("malformed ticket: {0}")]
    MalformedTicket(String),

    #[error("content length mismatch for {url}: expected {expected} bytes, received {received}")]
    ContentLengthMismatch {
        url: String,
        expected: u64,
        received: u64,
    },

    #[error("failed to create HTTP client: {0}")]
    ClientBuild(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn transport(url: &str, reason: impl std::fmt::Display) -> Self {
        Error::Transport {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Classify a failed body read.
    ///
    /// A body that breaks off short of its declared Content-Length is a
    /// truncation; timeouts and bodies without a declared length stay
    /// transport errors.
    pub(crate) fn body_read(
        url: &str,
        declared: Option<u64>,
        received: u64,
        timed_out: bool,
        reason: impl std::fmt::Display,
    ) -> Self {
        match declared {
            Some(expected) if !timed_out && received < expected => Error::ContentLengthMismatch {
                url: url.to_string(),
                expected,
                received,
            },
            _ => Error::transport(url, reason),
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for network failures and non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport { .. } | Error::HttpStatus { .. })
    }
}
