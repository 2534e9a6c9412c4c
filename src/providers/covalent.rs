//! Chain-data adapter backed by the Covalent v1 API.
//!
//! Two endpoints are used per chain and address: `balances_v2` for USD-quoted
//! token holdings and `transactions_v2` (with decoded logs) for activity.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::http::{build_client, decode_json, join_url, send};
use super::{BalanceSource, Provider};
use crate::analysis::TransactionRecord;
use crate::config::CovalentConfig;
use crate::utils::error::{Error, Result};
use crate::utils::types::{ChainId, WalletAddress};

const PROVIDER: &str = "covalent";

/// One token holding from `balances_v2`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub contract_ticker_symbol: Option<String>,
    /// USD value of the holding; absent when Covalent has no price
    #[serde(default)]
    pub quote: Option<f64>,
}

/// Sum of token quotes, a missing quote counting as 0.
pub fn total_quote(tokens: &[TokenBalance]) -> f64 {
    tokens.iter().map(|t| t.quote.unwrap_or(0.0)).sum()
}

/// Balances and raw transactions for one wallet on one chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainActivity {
    pub total_balance_usd: f64,
    pub tokens: Vec<TokenBalance>,
    pub transactions: Vec<TransactionRecord>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<ItemsPage<T>>,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemsPage<T> {
    items: Vec<T>,
}

impl<T> Envelope<T> {
    fn into_items(self) -> Result<Vec<T>> {
        if self.error {
            return Err(Error::ProviderUnavailable {
                provider: PROVIDER,
                message: self.error_message.unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        self.data.map(|page| page.items).ok_or_else(|| Error::MalformedResponse {
            provider: PROVIDER,
            message: "missing data.items".to_string(),
        })
    }
}

pub struct CovalentProvider {
    client: Client,
    config: CovalentConfig,
}

impl CovalentProvider {
    pub fn new(config: CovalentConfig) -> Result<Self> {
        let client = build_client(config.timeout())?;
        Ok(Self { client, config })
    }

    async fn get_items<T: DeserializeOwned>(
        &self, path: String, query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = join_url(&self.config.base_url, &path);
        let request = self.client.get(&url).query(&[("key", self.config.api_key.as_str())]).query(query);
        let resp = send(PROVIDER, request).await?;
        let envelope: Envelope<T> = decode_json(PROVIDER, resp).await?;
        envelope.into_items()
    }

    /// Token balances with USD quotes.
    pub async fn fetch_token_balances(
        &self, address: &WalletAddress, chain: ChainId,
    ) -> Result<Vec<TokenBalance>> {
        self.get_items(
            format!("{}/address/{}/balances_v2/", chain, address),
            &[("quote-currency", self.config.quote_currency.as_str())],
        )
        .await
    }

    /// Transaction history including decoded log events.
    pub async fn fetch_transactions(
        &self, address: &WalletAddress, chain: ChainId,
    ) -> Result<Vec<TransactionRecord>> {
        self.get_items(
            format!("{}/address/{}/transactions_v2/", chain, address),
            &[("no-logs", "false")],
        )
        .await
    }
}

#[async_trait]
impl Provider for CovalentProvider {
    type Summary = ChainActivity;

    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn try_fetch(&self, address: &WalletAddress, chain: ChainId) -> Result<ChainActivity> {
        let (tokens, transactions) = tokio::try_join!(
            self.fetch_token_balances(address, chain),
            self.fetch_transactions(address, chain)
        )?;
        let total_balance_usd = total_quote(&tokens);
        log::debug!(
            "covalent: {} chain={} tokens={} txs={} balance=${:.2}",
            address.short(),
            chain,
            tokens.len(),
            transactions.len(),
            total_balance_usd
        );
        Ok(ChainActivity { total_balance_usd, tokens, transactions })
    }
}

#[async_trait]
impl BalanceSource for CovalentProvider {
    async fn fetch_balance_usd(&self, address: &WalletAddress, chain: ChainId) -> Result<f64> {
        let tokens = self.fetch_token_balances(address, chain).await?;
        Ok(total_quote(&tokens))
    }
}
