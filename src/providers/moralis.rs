//! Wallet-activity adapter backed by the Moralis deep-index API.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

use super::http::{build_client, decode_json, join_url, send};
use super::Provider;
use crate::chains;
use crate::config::MoralisConfig;
use crate::utils::error::Result;
use crate::utils::types::{ChainId, WalletAddress};

const PROVIDER: &str = "moralis";

/// Wallet age and recency derived from first / last transaction timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletActivity {
    pub wallet_age_days: f64,
    pub active_last_30_days: bool,
    pub total_transactions: u64,
    pub first_transaction: Option<DateTime<Utc>>,
    pub last_transaction: Option<DateTime<Utc>>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(crate) struct WalletStatsResponse {
    #[serde(default)]
    first_transaction: Option<TransactionRef>,
    #[serde(default)]
    last_transaction: Option<TransactionRef>,
    // Moralis sends counts either as numbers or numeric strings
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    total_transactions: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TransactionRef {
    #[serde(default)]
    block_timestamp: Option<DateTime<Utc>>,
}

impl WalletStatsResponse {
    /// Missing first transaction means a brand new wallet (age 0); a missing
    /// last transaction is treated as the Unix epoch (inactive).
    pub(crate) fn summarize(self, now: DateTime<Utc>) -> WalletActivity {
        let first = self.first_transaction.and_then(|t| t.block_timestamp);
        let last = self.last_transaction.and_then(|t| t.block_timestamp);

        let age = now - first.unwrap_or(now);
        let wallet_age_days = (age.num_milliseconds() as f64 / 86_400_000.0).max(0.0);

        let since_last = match last {
            | Some(last) => now - last,
            | None => Duration::milliseconds(now.timestamp_millis()),
        };
        let active_last_30_days = since_last < Duration::days(30);

        WalletActivity {
            wallet_age_days,
            active_last_30_days,
            total_transactions: self.total_transactions.unwrap_or(0),
            first_transaction: first,
            last_transaction: last,
        }
    }
}

pub struct MoralisProvider {
    client: Client,
    config: MoralisConfig,
}

impl MoralisProvider {
    pub fn new(config: MoralisConfig) -> Result<Self> {
        let client = build_client(config.timeout())?;
        Ok(Self { client, config })
    }

    /// Moralis chain label for `chain`, falling back to the configured default.
    pub fn chain_label(&self, chain: ChainId) -> &str {
        match chains::find(chain) {
            | Some(info) => info.moralis_label,
            | None => &self.config.default_chain_label,
        }
    }
}

#[async_trait]
impl Provider for MoralisProvider {
    type Summary = WalletActivity;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn try_fetch(&self, address: &WalletAddress, chain: ChainId) -> Result<WalletActivity> {
        let url = join_url(&self.config.base_url, address.as_str());
        let request = self
            .client
            .get(&url)
            .header("X-API-Key", &self.config.api_key)
            .query(&[("chain", self.chain_label(chain))]);

        let resp = send(PROVIDER, request).await?;
        let stats: WalletStatsResponse = decode_json(PROVIDER, resp).await?;
        let activity = stats.summarize(Utc::now());
        log::debug!(
            "moralis: {} age={:.1}d active30={} txs={}",
            address.short(),
            activity.wallet_age_days,
            activity.active_last_30_days,
            activity.total_transactions
        );
        Ok(activity)
    }
}
