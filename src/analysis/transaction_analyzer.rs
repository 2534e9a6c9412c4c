use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Known DeFi and DEX router addresses, lowercased.
pub const DEFAULT_DEFI_CONTRACTS: [&str; 5] = [
    "0x7a250d5630b4cf539739df2c5dacb4c659f2488d", // Uniswap V2 Router
    "0x68b3465833fb72a70ecdf485e0e4c7bd8665fc45", // Uniswap V3 Router
    "0x1111111254eeb25477b68fb85ed929f73a960582", // 1inch
    "0x881d40237659c251811cec9c364ef91dc08d300c", // MetaMask Swap
    "0xd9e1ce17f2641f24ae83637ab66a2cca9c378b9f", // SushiSwap Router
];

/// Decoded event names counted as a DEX swap.
pub const SWAP_EVENT_NAMES: [&str; 2] = ["Swap", "TokenExchange"];

/// One transaction as returned by the chain-data provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub tx_hash: Option<String>,
    #[serde(default)]
    pub block_signed_at: Option<String>,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub log_events: Vec<LogEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    #[serde(default)]
    pub decoded: Option<DecodedEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedEvent {
    #[serde(default)]
    pub name: Option<String>,
}

impl LogEvent {
    pub fn named(name: &str) -> Self {
        Self { decoded: Some(DecodedEvent { name: Some(name.to_string()) }) }
    }

    fn is_swap(&self) -> bool {
        self.decoded
            .as_ref()
            .and_then(|d| d.name.as_deref())
            .map(|name| SWAP_EVENT_NAMES.contains(&name))
            .unwrap_or(false)
    }
}

// Covalent sends `"log_events": null` for transactions without logs.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<LogEvent>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<LogEvent>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counts derived from a wallet's transaction list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionStats {
    pub unique_contracts: u64,
    pub defi_transactions: u64,
    pub dex_swaps: u64,
}

/// Classifies transactions against a DeFi allowlist and decoded swap events.
#[derive(Debug, Clone)]
pub struct TransactionAnalyzer {
    defi_contracts: HashSet<String>,
}

impl Default for TransactionAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_DEFI_CONTRACTS)
    }
}

impl TransactionAnalyzer {
    /// Build an analyzer over the given allowlist. Entries are lowercased.
    pub fn new<I, S>(defi_contracts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            defi_contracts: defi_contracts
                .into_iter()
                .map(|a| a.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn is_defi_contract(&self, address: &str) -> bool {
        self.defi_contracts.contains(&address.to_lowercase())
    }

    /// Scan `transactions` and produce unique-contract, DeFi and swap counts.
    ///
    /// DeFi interactions are counted per transaction, swaps per event. The
    /// result does not depend on input order.
    pub fn analyze(&self, transactions: &[TransactionRecord]) -> TransactionStats {
        let mut contracts: HashSet<String> = HashSet::new();
        let mut defi_transactions = 0u64;
        let mut dex_swaps = 0u64;

        for tx in transactions {
            if let Some(to) = tx.to_address.as_deref().filter(|to| !to.is_empty()) {
                if self.is_defi_contract(to) {
                    defi_transactions += 1;
                }
                contracts.insert(to.to_lowercase());
            }

            dex_swaps += tx.log_events.iter().filter(|e| e.is_swap()).count() as u64;
        }

        TransactionStats { unique_contracts: contracts.len() as u64, defi_transactions, dex_swaps }
    }
}
