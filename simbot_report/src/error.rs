use http::StatusCode;
use thiserror::Error;

/// Why a report could not be put into the display container.
#[derive(Error, Debug)]
pub enum ReportError {
    /// The request could not be sent, the connection broke, it timed out,
    /// or the body could not be read.
    #[error("Network error while fetching report: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered, but not with a success status.
    #[error("Server answered {status}: {body}")]
    Server { status: StatusCode, body: String },

    /// The endpoint path does not resolve against the base url.
    #[error("Invalid report url: {0}")]
    InvalidUrl(String),
}

impl ReportError {
    pub fn is_network(&self) -> bool {
        matches!(self, ReportError::Network(_))
    }

    /// Status code of a `Server` error, `None` otherwise.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ReportError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ReportResult<T> = Result<T, ReportError>;
