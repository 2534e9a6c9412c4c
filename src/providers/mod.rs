//! Data provider adapters.
//!
//! Each adapter turns one external data source into a fixed-shape summary.
//! Adapters implement the fallible [`Provider::try_fetch`]; callers use
//! [`Provider::fetch_summary`], which never fails: any transport error,
//! non-success status, timeout or malformed payload is logged and replaced by
//! the summary's zeroed `Default`.

pub mod covalent;
mod http;
pub mod moralis;
pub mod participation;

use async_trait::async_trait;
use metrics::{counter, histogram};
use std::time::Instant;

use crate::utils::error::Result;
use crate::utils::types::{ChainId, WalletAddress};

pub use covalent::{ChainActivity, CovalentProvider, TokenBalance};
pub use moralis::{MoralisProvider, WalletActivity};
pub use participation::{
    AirdropRecord, Participation, StaticParticipationProvider, SubgraphParticipationProvider,
};

/// Common capability of every data source.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Normalized summary produced by this provider. `Default` is the zeroed
    /// summary returned on failure.
    type Summary: Default + Send + 'static;

    /// Short provider name used in logs and metric labels
    fn name(&self) -> &'static str;

    /// Query the provider, surfacing failures.
    async fn try_fetch(&self, address: &WalletAddress, chain: ChainId) -> Result<Self::Summary>;

    /// Query the provider, degrading any failure to the zeroed summary.
    async fn fetch_summary(&self, address: &WalletAddress, chain: ChainId) -> Self::Summary {
        let start = Instant::now();
        let result = self.try_fetch(address, chain).await;
        histogram!(
            "provider_fetch_ms",
            start.elapsed().as_millis() as f64,
            "provider" => self.name()
        );

        match result {
            | Ok(summary) => summary,
            | Err(e) => {
                log::warn!(
                    "{} fetch failed for {} on chain {}: {} (using zeroed summary)",
                    self.name(),
                    address.short(),
                    chain,
                    e
                );
                counter!("provider_failures_total", 1, "provider" => self.name());
                Self::Summary::default()
            }
        }
    }
}

/// Balance-only query used independently by the balance category.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Total USD value of the wallet's token holdings.
    async fn fetch_balance_usd(&self, address: &WalletAddress, chain: ChainId) -> Result<f64>;
}
