use thiserror::Error;

/// Failure taxonomy surfaced by [`crate::AskClient::ask`].
///
/// The variants are distinguished so the presentation layer can show
/// different copy for "you cancelled" vs. "the network is down" vs. "the
/// server rejected this". `RequestFailed` carries the server's own message.
#[derive(Debug, Error)]
pub enum AskError {
    #[error("request was cancelled")]
    Cancelled,
    #[error("request timed out")]
    TimedOut,
    #[error("{message}")]
    RequestFailed { message: String },
    #[error("network failure: {message}")]
    Network { message: String },
    #[error("malformed response: {detail}")]
    MalformedResponse { detail: String },
}

impl AskError {
    pub(crate) fn network(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }

    /// Stable tag used in lifecycle events and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::TimedOut => "timed_out",
            Self::RequestFailed { .. } => "request_failed",
            Self::Network { .. } => "network_failure",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}
