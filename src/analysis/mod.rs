//! Transaction classification for wallet reputation

pub mod transaction_analyzer;

pub use transaction_analyzer::{
    DecodedEvent, LogEvent, TransactionAnalyzer, TransactionRecord, TransactionStats,
    DEFAULT_DEFI_CONTRACTS, SWAP_EVENT_NAMES,
};
