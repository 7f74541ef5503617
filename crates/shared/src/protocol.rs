use serde::{Deserialize, Serialize};

/// Context block sent with every query so the answering service can scope
/// retrieval to the embedding application and language.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryContext {
    pub dapp: String,
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub context: QueryContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Projected earnings attached to yield-related answers. `apr_value` is a
/// decimal fraction (0.124 = 12.4%); `updated_at` is a human freshness label
/// such as "2 hours ago", not a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EarningsData {
    pub yearly: f64,
    pub monthly: f64,
    pub apr_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceRef {
    pub title: String,
    pub url: String,
}

/// Inputs the service assumed when computing an earnings projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryAssumptions {
    pub pool: String,
    pub amount: f64,
    pub currency: String,
}

/// Structured answer from the remote service. Immutable once constructed;
/// the client never mutates a reply after returning it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskReply {
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<SourceRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings: Option<EarningsData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumptions: Option<QueryAssumptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Error body returned by the remote service on non-success statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
