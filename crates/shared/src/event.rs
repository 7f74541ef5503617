use serde::{Deserialize, Serialize};

/// Panel lifecycle event delivered to a host-supplied callback.
///
/// Hosts use these for analytics only; nothing in the panel depends on the
/// callback being present or well-behaved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PanelEvent {
    Opened,
    Closed,
    Sent {
        query: String,
    },
    Response {
        answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        confidence: Option<f64>,
    },
    Failed {
        kind: String,
        message: String,
    },
}
