//! Fault taxonomy for remote operations.
//!
//! Remote faults are surfaced verbatim to the caller; nothing in this crate
//! retries or downgrades them. Local input faults are the only errors that
//! short-circuit before a round trip is made.

use std::fmt;
use std::path::PathBuf;

/// The server rejected a batch, or the transport failed outright.
#[derive(Debug)]
pub enum RemoteFault {
    /// Non-success HTTP status from the endpoint.
    Http { status: u16, body: String },
    /// The batch reached the server but an action failed (ErrorInfo payload).
    Server { code: String, message: String },
    /// Connection-level failure before any response was produced.
    Transport(String),
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFault::Http { status, body } => {
                write!(f, "server returned HTTP {}: {}", status, body)
            }
            RemoteFault::Server { code, message } => {
                write!(f, "server fault {}: {}", code, message)
            }
            RemoteFault::Transport(message) => write!(f, "transport error: {}", message),
        }
    }
}

impl std::error::Error for RemoteFault {}

impl From<reqwest::Error> for RemoteFault {
    fn from(err: reqwest::Error) -> Self {
        RemoteFault::Transport(err.to_string())
    }
}

/// Caller-supplied input was unusable before any remote call was made.
#[derive(Debug)]
pub enum LocalInputFault {
    /// A required local file does not exist.
    MissingFile(PathBuf),
    /// A required parameter was empty.
    EmptyParameter(&'static str),
}

impl fmt::Display for LocalInputFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalInputFault::MissingFile(path) => {
                write!(f, "local file not found: {}", path.display())
            }
            LocalInputFault::EmptyParameter(name) => {
                write!(f, "parameter '{}' must not be empty", name)
            }
        }
    }
}

impl std::error::Error for LocalInputFault {}
