use reqwest::header::HeaderMap;
use std::io;
use thiserror::Error;

use crate::response::Response;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every way a request against the API can fail.
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials or environment are not set up for issuing requests.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connection, DNS, TLS or timeout failure reported by the transport.
    #[error(transparent)]
    Transport(BoxError),

    /// The response body could not be read. Headers were already captured.
    #[error("failed to read response body: {source}")]
    Read {
        #[source]
        source: io::Error,
        headers: HeaderMap,
    },

    /// The server answered outside of `[200, 400)`.
    #[error("{status_line}")]
    Status {
        status_line: String,
        response: Response,
    },

    #[error("invalid request to `{uri}`: {source}")]
    InvalidRequest {
        uri: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// The response attached to a status failure, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// Headers captured before the failure, if the server got that far.
    pub fn headers(&self) -> Option<&HeaderMap> {
        match self {
            Error::Status { response, .. } => Some(response.headers()),
            Error::Read { headers, .. } => Some(headers),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Transport(Box::new(e))
    }
}
