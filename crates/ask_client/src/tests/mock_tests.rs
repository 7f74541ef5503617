use super::*;

#[test]
fn earnings_queries_need_a_yield_word_plus_stablecoin_or_digit() {
    assert_eq!(classify("How much can I earn on 1000 USDC?"), MockKind::Earnings);
    assert_eq!(classify("what yield does usdt give"), MockKind::Earnings);
    assert_eq!(classify("APR on 500?"), MockKind::Earnings);
    // Yield word alone is not enough.
    assert_eq!(classify("can I earn here"), MockKind::General);
}

#[test]
fn earnings_detection_outranks_the_uncertainty_heuristic() {
    // Contains "when" but matches the earnings predicate first.
    assert_eq!(
        classify("When I deposit 1000 USDC, what do I earn?"),
        MockKind::Earnings
    );
}

#[test]
fn uncertainty_keywords_pick_the_low_confidence_reply() {
    assert_eq!(classify("what is the specific rate"), MockKind::LowConfidence);
    assert_eq!(classify("give me the exact number"), MockKind::LowConfidence);
    assert_eq!(classify("when are rewards paid"), MockKind::LowConfidence);
}

#[test]
fn everything_else_is_general() {
    assert_eq!(classify("is my deposit safe"), MockKind::General);
    assert_eq!(classify(""), MockKind::General);
}

#[test]
fn canned_earnings_reply_uses_the_documented_constants() {
    let reply = reply_for(MockKind::Earnings);
    let earnings = reply.earnings.expect("earnings present");
    assert_eq!(earnings.apr_value, MOCK_APR);
    assert_eq!(earnings.yearly, 124.0);
    assert_eq!(earnings.monthly, 10.33);
    assert!(earnings.updated_at.is_some());
}

#[test]
fn canned_low_confidence_reply_hedges_and_cites() {
    let reply = reply_for(MockKind::LowConfidence);
    assert!(reply.confidence.expect("confidence") < 0.5);
    assert!(!reply.sources.expect("sources").is_empty());
}

#[tokio::test(start_paused = true)]
async fn mock_answer_for_the_usdc_scenario() {
    let reply = answer("How much can I earn on 1000 USDC?").await;
    let earnings = reply.earnings.expect("earnings present");
    assert_eq!(earnings.yearly, 124.0);
    assert_eq!(earnings.monthly, 10.33);
}
