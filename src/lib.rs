//! # ProofBadge
//! Wallet reputation engine.
//!
//! A score in `0..=100` is computed for a wallet on an EVM network by
//! querying three data providers concurrently, classifying the wallet's
//! transactions and summing six capped scoring categories.
//!
//! ```no_run
//! use proofbadge::{chains, config::Config, ReputationAggregator};
//!
//! # async fn run() -> proofbadge::Result<()> {
//! let config = Config::load()?;
//! let aggregator = ReputationAggregator::from_config(&config)?;
//! let result = aggregator
//!     .compute_reputation("0x52A90BfEc58cc5394A52aD53Fc83ebEF5B0119b6", chains::ETHEREUM_SEPOLIA)
//!     .await?;
//! println!("{} ({:?})", result.score, result.tier);
//! # Ok(())
//! # }
//! ```

pub use crate::utils::error::{Error, Result};

pub mod aggregator;
pub mod analysis;
pub mod chains;
pub mod config;
pub mod metrics;
pub mod providers;
pub mod scoring;
pub mod server;
pub mod utils;

pub use aggregator::{AggregationResult, ReputationAggregator};
pub use analysis::{TransactionAnalyzer, TransactionStats};
pub use providers::{BalanceSource, Provider};
pub use scoring::{ReputationScore, ScoreBreakdown, ScoreTable, ScoreTier};
pub use utils::types::{ChainId, WalletAddress};
