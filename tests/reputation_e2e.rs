//! End-to-end: real adapters and aggregator against stub provider endpoints.

mod common;

use common::*;
use proofbadge::chains::ETHEREUM_SEPOLIA;
use proofbadge::providers::WalletActivity;
use proofbadge::scoring::{ScoreBreakdown, ScoreTier};
use proofbadge::{Error, ReputationAggregator, TransactionStats};
use std::time::{Duration, Instant};

#[tokio::test]
async fn full_marks_across_all_providers() {
    let covalent_state = CovalentState::default();
    let config = config_for(
        &spawn(moralis_stub()),
        &spawn(covalent_stub(covalent_state.clone())),
        Some(&spawn(subgraph_stub())),
    );
    config.validate().unwrap();

    let aggregator = ReputationAggregator::from_config(&config).unwrap();
    let result = aggregator.compute_reputation(WALLET, ETHEREUM_SEPOLIA).await.unwrap();

    assert_eq!(result.stats, TransactionStats { unique_contracts: 20, defi_transactions: 10, dex_swaps: 39 });
    assert_eq!(
        result.breakdown,
        ScoreBreakdown { governance: 20, defi: 20, contracts: 15, airdrops: 15, dex: 15, balance: 15 }
    );
    assert_eq!(result.score.value(), 100);
    assert_eq!(result.tier, ScoreTier::High);
    assert!(result.badge_eligible);
    assert_eq!(result.activity.total_transactions, 128);
    assert_eq!(result.airdrops.len(), 5);
    assert_eq!(result.network, "Ethereum Sepolia");
    // chain data and the balance category each query balances
    assert_eq!(covalent_state.balance_hits.get(), 2);
    assert_eq!(covalent_state.transaction_hits.get(), 1);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["score"], 100);
    assert_eq!(json["chain"], 11155111);
    assert_eq!(json["tier"], "high");
}

#[tokio::test]
async fn wallet_activity_outage_does_not_affect_score() {
    let config = config_for(
        &spawn(failing_stub()),
        &spawn(covalent_stub(CovalentState::default())),
        Some(&spawn(subgraph_stub())),
    );
    let aggregator = ReputationAggregator::from_config(&config).unwrap();
    let result = aggregator.compute_reputation(WALLET, ETHEREUM_SEPOLIA).await.unwrap();

    assert_eq!(result.activity, WalletActivity::default());
    assert_eq!(result.score.value(), 100);
}

#[tokio::test]
async fn chain_data_outage_zeroes_its_categories_only() {
    let config = config_for(&spawn(moralis_stub()), &spawn(malformed_stub()), Some(&spawn(subgraph_stub())));
    let aggregator = ReputationAggregator::from_config(&config).unwrap();
    let result = aggregator.compute_reputation(WALLET, ETHEREUM_SEPOLIA).await.unwrap();

    assert_eq!(result.stats, TransactionStats::default());
    assert_eq!(result.total_balance_usd, 0.0);
    assert_eq!(
        result.breakdown,
        ScoreBreakdown { governance: 20, defi: 0, contracts: 0, airdrops: 15, dex: 0, balance: 0 }
    );
    assert_eq!(result.score.value(), 35);
    assert_eq!(result.tier, ScoreTier::Medium);
    assert!(!result.badge_eligible);
}

#[tokio::test]
async fn every_provider_down_is_zero_not_error() {
    let config = config_for(&dead_endpoint(), &spawn(failing_stub()), Some(&dead_endpoint()));
    let aggregator = ReputationAggregator::from_config(&config).unwrap();
    let result = aggregator.compute_reputation(WALLET, ETHEREUM_SEPOLIA).await.unwrap();

    assert_eq!(result.score.value(), 0);
    assert_eq!(result.breakdown, ScoreBreakdown::default());
    assert!(result.airdrops.is_empty());
    assert_eq!(result.tier, ScoreTier::Low);
}

#[tokio::test]
async fn slow_provider_does_not_delay_past_its_timeout() {
    // wallet activity times out after 2s; the rest answer immediately
    let config = config_for(
        &spawn(slow_stub(Duration::from_secs(10))),
        &spawn(covalent_stub(CovalentState::default())),
        None,
    );
    let aggregator = ReputationAggregator::from_config(&config).unwrap();

    let start = Instant::now();
    let result = aggregator.compute_reputation(WALLET, ETHEREUM_SEPOLIA).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(6));

    assert_eq!(result.activity, WalletActivity::default());
    // placeholder participation: fixed 5 votes, three airdrops
    assert_eq!(result.breakdown.governance, 20);
    assert_eq!(result.breakdown.airdrops, 10);
    assert_eq!(result.score.value(), 95);
}

#[tokio::test]
async fn invalid_address_is_rejected_before_any_request() {
    let covalent_state = CovalentState::default();
    let config = config_for(&spawn(moralis_stub()), &spawn(covalent_stub(covalent_state.clone())), None);
    let aggregator = ReputationAggregator::from_config(&config).unwrap();

    let err = aggregator.compute_reputation("", ETHEREUM_SEPOLIA).await.unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert_eq!(covalent_state.balance_hits.get(), 0);
}
