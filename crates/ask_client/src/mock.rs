//! Offline reply fabrication for development without the remote service.

use std::time::Duration;

use rand::Rng;
use shared::{AskReply, EarningsData, QueryAssumptions, SourceRef};
use tokio::time;
use tracing::debug;

/// APR used by every mock earnings projection (12.4%).
pub const MOCK_APR: f64 = 0.124;

const DELAY_MIN_MS: u64 = 800;
const DELAY_MAX_MS: u64 = 1200;

const YIELD_KEYWORDS: [&str; 3] = ["earn", "yield", "apr"];
const STABLECOIN_KEYWORDS: [&str; 2] = ["usdc", "usdt"];
const UNCERTAINTY_KEYWORDS: [&str; 3] = ["specific", "exact", "when"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MockKind {
    Earnings,
    LowConfidence,
    General,
}

/// Pure three-way classification of the lowercased query text. Earnings
/// detection outranks the uncertainty heuristic.
pub(crate) fn classify(text: &str) -> MockKind {
    let lower = text.to_lowercase();
    let mentions_yield = YIELD_KEYWORDS.iter().any(|kw| lower.contains(kw));
    let mentions_stablecoin = STABLECOIN_KEYWORDS.iter().any(|kw| lower.contains(kw));
    let has_digit = lower.chars().any(|c| c.is_ascii_digit());

    if mentions_yield && (mentions_stablecoin || has_digit) {
        return MockKind::Earnings;
    }
    if UNCERTAINTY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return MockKind::LowConfidence;
    }
    MockKind::General
}

/// Waits a simulated service delay, then returns the canned reply for the
/// query's classification.
pub(crate) async fn answer(text: &str) -> AskReply {
    let delay = rand::thread_rng().gen_range(DELAY_MIN_MS..=DELAY_MAX_MS);
    time::sleep(Duration::from_millis(delay)).await;

    let kind = classify(text);
    debug!(?kind, delay_ms = delay, "mock reply fabricated");
    reply_for(kind)
}

fn reply_for(kind: MockKind) -> AskReply {
    match kind {
        MockKind::Earnings => AskReply {
            answer: "Based on current rates, depositing 1,000 USDC into the Allez USDC pool \
                     can earn you approximately $124 per year."
                .to_string(),
            confidence: Some(0.88),
            sources: Some(vec![SourceRef {
                title: "Allez USDC Pool".to_string(),
                url: "https://app.kamino.finance/lend/allez-usdc".to_string(),
            }]),
            followups: Some(vec![
                "How often are rewards distributed?".to_string(),
                "What are the risks?".to_string(),
                "Can I withdraw anytime?".to_string(),
            ]),
            earnings: Some(EarningsData {
                yearly: 124.0,
                monthly: 10.33,
                apr_value: MOCK_APR,
                updated_at: Some("2 hours ago".to_string()),
            }),
            assumptions: Some(QueryAssumptions {
                pool: "allez-usdc".to_string(),
                amount: 1000.0,
                currency: "USDC".to_string(),
            }),
            session_id: None,
        },
        MockKind::LowConfidence => AskReply {
            answer: "I couldn't find an exact figure for that. Rates change frequently, so \
                     please check the pool page for the current numbers."
                .to_string(),
            confidence: Some(0.35),
            sources: Some(vec![SourceRef {
                title: "Kamino Lend Documentation".to_string(),
                url: "https://docs.kamino.finance/lend".to_string(),
            }]),
            followups: None,
            earnings: None,
            assumptions: None,
            session_id: None,
        },
        MockKind::General => AskReply {
            answer: "Kamino Lend lets you deposit assets into lending pools and earn interest \
                     that accrues continuously. Deposits and withdrawals are permissionless."
                .to_string(),
            confidence: Some(0.72),
            sources: None,
            followups: Some(vec![
                "How much can I earn on 1000 USDC?".to_string(),
                "Is my deposit safe?".to_string(),
            ]),
            earnings: None,
            assumptions: None,
            session_id: None,
        },
    }
}

#[cfg(test)]
#[path = "tests/mock_tests.rs"]
mod tests;
