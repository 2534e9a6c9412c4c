//! Reputation aggregation: fan out to the providers, analyze, score.

use chrono::{DateTime, Utc};
use metrics::{counter, gauge, histogram};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::analysis::{TransactionAnalyzer, TransactionStats};
use crate::chains;
use crate::config::Config;
use crate::providers::{
    AirdropRecord, BalanceSource, ChainActivity, CovalentProvider, MoralisProvider, Participation,
    Provider, StaticParticipationProvider, SubgraphParticipationProvider, WalletActivity,
};
use crate::scoring::{ReputationScore, ScoreBreakdown, ScoreInputs, ScoreTable, ScoreTier};
use crate::utils::error::Result;
use crate::utils::types::{ChainId, WalletAddress};

pub type ActivityProvider = Arc<dyn Provider<Summary = WalletActivity>>;
pub type ChainDataProvider = Arc<dyn Provider<Summary = ChainActivity>>;
pub type ParticipationProvider = Arc<dyn Provider<Summary = Participation>>;

/// Everything computed for one wallet on one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationResult {
    pub address: WalletAddress,
    pub chain: ChainId,
    pub network: String,
    pub score: ReputationScore,
    pub tier: ScoreTier,
    pub badge_eligible: bool,
    pub breakdown: ScoreBreakdown,
    pub airdrops: Vec<AirdropRecord>,
    pub activity: WalletActivity,
    pub stats: TransactionStats,
    pub total_balance_usd: f64,
    pub computed_at: DateTime<Utc>,
}

/// Joins the three providers, the transaction analyzer and the score table.
///
/// Every call recomputes from scratch; nothing is cached between calls.
pub struct ReputationAggregator {
    activity: ActivityProvider,
    chain_data: ChainDataProvider,
    balances: Arc<dyn BalanceSource>,
    participation: ParticipationProvider,
    analyzer: TransactionAnalyzer,
    table: ScoreTable,
}

impl ReputationAggregator {
    pub fn new(
        activity: ActivityProvider, chain_data: ChainDataProvider,
        balances: Arc<dyn BalanceSource>, participation: ParticipationProvider,
    ) -> Self {
        Self {
            activity,
            chain_data,
            balances,
            participation,
            analyzer: TransactionAnalyzer::default(),
            table: ScoreTable::standard(),
        }
    }

    /// Build the production providers from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let activity = Arc::new(MoralisProvider::new(config.moralis.clone())?);
        let covalent = Arc::new(CovalentProvider::new(config.covalent.clone())?);
        let participation: ParticipationProvider = match &config.participation.subgraph_url {
            | Some(url) => {
                log::info!("Participation data from subgraph {}", url);
                Arc::new(SubgraphParticipationProvider::new(url.clone(), &config.participation)?)
            }
            | None => {
                log::info!("No participation subgraph configured, using placeholder data");
                Arc::new(StaticParticipationProvider::from_config(&config.participation))
            }
        };

        Ok(Self::new(activity, covalent.clone(), covalent, participation)
            .with_analyzer(TransactionAnalyzer::new(&config.analysis.defi_contracts)))
    }

    pub fn with_analyzer(mut self, analyzer: TransactionAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_score_table(mut self, table: ScoreTable) -> Self {
        self.table = table;
        self
    }

    /// Entry point for callers holding a raw address string.
    pub async fn compute_reputation(&self, address: &str, chain: ChainId) -> Result<AggregationResult> {
        let address = WalletAddress::new(address)?;
        self.compute(&address, chain).await
    }

    pub async fn compute(&self, address: &WalletAddress, chain: ChainId) -> Result<AggregationResult> {
        let start = Instant::now();
        log::info!("Computing reputation for {} on {}", address.short(), chains::network_name(chain));

        let (activity, chain_activity, participation, balance_usd) = tokio::join!(
            self.activity.fetch_summary(address, chain),
            self.chain_data.fetch_summary(address, chain),
            self.participation.fetch_summary(address, chain),
            self.balance_usd(address, chain),
        );

        let stats = self.analyzer.analyze(&chain_activity.transactions);
        let inputs = ScoreInputs {
            governance_votes: participation.governance_votes,
            defi_transactions: stats.defi_transactions,
            unique_contracts: stats.unique_contracts,
            airdrop_count: participation.airdrop_count,
            dex_swaps: stats.dex_swaps,
            balance_usd,
        };
        let breakdown = self.table.score(&inputs);
        breakdown.check_caps().map_err(|e| {
            counter!("reputation_aggregation_failures_total", 1);
            log::error!("Reputation for {} rejected: {}", address.short(), e);
            e
        })?;
        let score = ReputationScore::from_breakdown(&breakdown);

        histogram!("reputation_aggregation_ms", start.elapsed().as_millis() as f64);
        gauge!("reputation_score", score.value() as f64);
        log::info!(
            "Reputation for {}: {} (governance={} defi={} contracts={} airdrops={} dex={} balance={})",
            address.short(),
            score,
            breakdown.governance,
            breakdown.defi,
            breakdown.contracts,
            breakdown.airdrops,
            breakdown.dex,
            breakdown.balance
        );

        Ok(AggregationResult {
            address: address.clone(),
            chain,
            network: chains::network_name(chain),
            score,
            tier: score.tier(),
            badge_eligible: score.is_badge_eligible(),
            breakdown,
            airdrops: participation.airdrops,
            activity,
            stats,
            total_balance_usd: balance_usd,
            computed_at: Utc::now(),
        })
    }

    /// Balance for the balance category; a failed call scores that category 0.
    async fn balance_usd(&self, address: &WalletAddress, chain: ChainId) -> f64 {
        match self.balances.fetch_balance_usd(address, chain).await {
            | Ok(usd) if usd.is_finite() => usd,
            | Ok(usd) => {
                log::warn!("Ignoring non-finite balance {} for {}", usd, address.short());
                0.0
            }
            | Err(e) => {
                log::warn!("Balance lookup failed for {}: {} (balance scores 0)", address.short(), e);
                counter!("provider_failures_total", 1, "provider" => "balance");
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::LogEvent;
    use crate::analysis::TransactionRecord;
    use crate::scoring::BandTable;
    use crate::utils::error::Error;
    use async_trait::async_trait;

    const WALLET: &str = "0x52A90BfEc58cc5394A52aD53Fc83ebEF5B0119b6";
    const UNISWAP_V3: &str = "0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45";

    struct Fixed<T>(T);

    #[async_trait]
    impl<T: Clone + Default + Send + Sync + 'static> Provider for Fixed<T> {
        type Summary = T;

        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn try_fetch(&self, _address: &WalletAddress, _chain: ChainId) -> Result<T> {
            Ok(self.0.clone())
        }
    }

    struct Down;

    #[async_trait]
    impl Provider for Down {
        type Summary = WalletActivity;

        fn name(&self) -> &'static str {
            "down"
        }

        async fn try_fetch(&self, _address: &WalletAddress, _chain: ChainId) -> Result<WalletActivity> {
            Err(Error::ProviderUnavailable { provider: "down", message: "connection refused".into() })
        }
    }

    struct Balance(Option<f64>);

    #[async_trait]
    impl BalanceSource for Balance {
        async fn fetch_balance_usd(&self, _address: &WalletAddress, _chain: ChainId) -> Result<f64> {
            self.0.ok_or_else(|| Error::ProviderUnavailable {
                provider: "balance",
                message: "HTTP 500".into(),
            })
        }
    }

    fn busy_chain() -> ChainActivity {
        let mut transactions: Vec<TransactionRecord> = (0..10)
            .map(|_| TransactionRecord {
                to_address: Some(UNISWAP_V3.to_string()),
                log_events: vec![LogEvent::named("Swap"), LogEvent::named("Swap"), LogEvent::named("Transfer")],
                ..Default::default()
            })
            .collect();
        for i in 0..19 {
            transactions.push(TransactionRecord {
                to_address: Some(format!("0x{:040x}", i + 1)),
                log_events: vec![LogEvent::named("TokenExchange")],
                ..Default::default()
            });
        }
        ChainActivity { total_balance_usd: 300.0, tokens: vec![], transactions }
    }

    fn aggregator(
        activity: ActivityProvider, balance: Option<f64>, votes: u64,
    ) -> ReputationAggregator {
        let participation = StaticParticipationProvider::default().with_fixed_votes(votes).with_airdrops(vec![
            AirdropRecord::new("Uniswap", "Ethereum Sepolia", "100", "UNI", "2023-05-15"),
            AirdropRecord::new("Aave", "Polygon Mumbai", "50", "AAVE", "2023-06-20"),
            AirdropRecord::new("Compound", "Ethereum Sepolia", "75", "COMP", "2023-07-10"),
            AirdropRecord::new("Optimism", "Ethereum Sepolia", "12.5", "OP", "2023-08-01"),
            AirdropRecord::new("Arbitrum", "Arbitrum Goerli", "625", "ARB", "2023-09-12"),
        ]);
        ReputationAggregator::new(
            activity,
            Arc::new(Fixed(busy_chain())),
            Arc::new(Balance(balance)),
            Arc::new(participation),
        )
    }

    #[tokio::test]
    async fn test_full_marks() {
        let agg = aggregator(Arc::new(Fixed(WalletActivity::default())), Some(300.0), 5);
        let result = agg.compute_reputation(WALLET, chains::ETHEREUM_SEPOLIA).await.unwrap();

        assert_eq!(result.stats, TransactionStats { unique_contracts: 20, defi_transactions: 10, dex_swaps: 39 });
        assert_eq!(
            result.breakdown,
            ScoreBreakdown { governance: 20, defi: 20, contracts: 15, airdrops: 15, dex: 15, balance: 15 }
        );
        assert_eq!(result.score.value(), 100);
        assert!(result.badge_eligible);
        assert_eq!(result.airdrops.len(), 5);
        assert_eq!(result.network, "Ethereum Sepolia");
    }

    #[tokio::test]
    async fn test_failed_provider_does_not_abort_others() {
        let agg = aggregator(Arc::new(Down), Some(300.0), 3);
        let result = agg.compute_reputation(WALLET, chains::POLYGON_MUMBAI).await.unwrap();
        assert_eq!(result.activity, WalletActivity::default());
        assert_eq!(result.breakdown.governance, 15);
        assert_eq!(result.breakdown.defi, 20);
        assert_eq!(result.score.value(), 95);
    }

    #[tokio::test]
    async fn test_failed_balance_zeroes_only_balance() {
        let agg = aggregator(Arc::new(Fixed(WalletActivity::default())), None, 5);
        let result = agg.compute_reputation(WALLET, chains::ETHEREUM_SEPOLIA).await.unwrap();
        assert_eq!(result.breakdown.balance, 0);
        assert_eq!(result.total_balance_usd, 0.0);
        assert_eq!(result.score.value(), 85);
    }

    #[tokio::test]
    async fn test_balance_boundary() {
        let agg = aggregator(Arc::new(Fixed(WalletActivity::default())), Some(50.0), 0);
        let result = agg.compute_reputation(WALLET, chains::ETHEREUM_SEPOLIA).await.unwrap();
        assert_eq!(result.breakdown.balance, 5);
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let agg = aggregator(Arc::new(Fixed(WalletActivity::default())), Some(1.0), 0);
        let err = agg.compute_reputation("  ", chains::ETHEREUM_SEPOLIA).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_out_of_range_table_is_aggregation_failure() {
        let mut table = ScoreTable::standard();
        table.governance = BandTable::at_least(&[(0.0, 40)]);
        let agg = aggregator(Arc::new(Fixed(WalletActivity::default())), Some(1.0), 0).with_score_table(table);
        let err = agg.compute_reputation(WALLET, chains::ETHEREUM_SEPOLIA).await.unwrap_err();
        assert!(matches!(err, Error::AggregationFailure(_)));
    }

    #[tokio::test]
    async fn test_everything_down_scores_zero_not_error() {
        let agg = ReputationAggregator::new(
            Arc::new(Down),
            Arc::new(Fixed(ChainActivity::default())),
            Arc::new(Balance(None)),
            Arc::new(Fixed(Participation::default())),
        );
        let result = agg.compute_reputation(WALLET, ChainId(1)).await.unwrap();
        assert_eq!(result.score.value(), 0);
        assert_eq!(result.breakdown, ScoreBreakdown::default());
        assert_eq!(result.network, "Chain ID: 1");
        assert!(!result.badge_eligible);
    }

    #[test]
    fn test_from_config() {
        let config = Config::default();
        assert!(ReputationAggregator::from_config(&config).is_ok());

        let mut config = Config::default();
        config.participation.subgraph_url = Some("http://127.0.0.1:8000/subgraphs/name/airdrops".into());
        assert!(ReputationAggregator::from_config(&config).is_ok());
    }
}
