//! Backend->UI events and failure copy for the desktop host.

use ask_client::AskError;
use shared::AskReply;

pub enum UiEvent {
    BackendFailed(String),
    ReplyReady(AskReply),
    AskFailed(AskError),
}

/// Maps the failure taxonomy to user-visible copy.
///
/// The server's own message is shown verbatim; every other kind gets fixed
/// copy so transport details never leak into the panel.
pub fn failure_copy(err: &AskError) -> String {
    match err {
        AskError::Cancelled => "Request was cancelled.".to_string(),
        AskError::TimedOut => "The request timed out. Please try again.".to_string(),
        AskError::RequestFailed { message } => message.clone(),
        AskError::Network { .. } => {
            "We couldn't reach the answering service. Check your connection and try again."
                .to_string()
        }
        AskError::MalformedResponse { .. } => {
            "The answering service returned something we couldn't read.".to_string()
        }
    }
}
