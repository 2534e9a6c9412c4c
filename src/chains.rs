//! Registry of the test networks the dashboard knows about.

use serde::Serialize;

use crate::utils::types::ChainId;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Static description of a supported network.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct ChainInfo {
    pub id: ChainId,
    pub name: &'static str,
    /// Chain label understood by the Moralis API
    pub moralis_label: &'static str,
    pub rpc_url: &'static str,
    pub explorer_url: &'static str,
    pub native_currency: NativeCurrency,
    /// Badge colour used by front ends (bootstrap palette names)
    pub color: &'static str,
}

impl ChainInfo {
    pub fn hex_id(&self) -> String {
        self.id.to_hex()
    }
}

pub const ETHEREUM_SEPOLIA: ChainId = ChainId(11155111);
pub const POLYGON_MUMBAI: ChainId = ChainId(80001);
pub const BSC_TESTNET: ChainId = ChainId(97);
pub const ARBITRUM_GOERLI: ChainId = ChainId(421613);

const CHAINS: [ChainInfo; 4] = [
    ChainInfo {
        id: ETHEREUM_SEPOLIA,
        name: "Ethereum Sepolia",
        moralis_label: "sepolia",
        rpc_url: "https://rpc.sepolia.org",
        explorer_url: "https://sepolia.etherscan.io",
        native_currency: NativeCurrency { name: "Sepolia ETH", symbol: "ETH", decimals: 18 },
        color: "primary",
    },
    ChainInfo {
        id: POLYGON_MUMBAI,
        name: "Polygon Mumbai",
        moralis_label: "mumbai",
        rpc_url: "https://rpc-mumbai.maticvigil.com",
        explorer_url: "https://mumbai.polygonscan.com",
        native_currency: NativeCurrency { name: "Matic", symbol: "MATIC", decimals: 18 },
        color: "success",
    },
    ChainInfo {
        id: BSC_TESTNET,
        name: "BSC Testnet",
        moralis_label: "bsc testnet",
        rpc_url: "https://data-seed-prebsc-1-s1.binance.org:8545",
        explorer_url: "https://testnet.bscscan.com",
        native_currency: NativeCurrency {
            name: "Binance Chain Native Token",
            symbol: "tBNB",
            decimals: 18,
        },
        color: "warning",
    },
    ChainInfo {
        id: ARBITRUM_GOERLI,
        name: "Arbitrum Goerli",
        moralis_label: "arbitrum goerli",
        rpc_url: "https://goerli-rollup.arbitrum.io/rpc",
        explorer_url: "https://goerli.arbiscan.io",
        native_currency: NativeCurrency {
            name: "Arbitrum Goerli ETH",
            symbol: "AGOR",
            decimals: 18,
        },
        color: "info",
    },
];

/// All known networks, in menu order.
pub fn all() -> &'static [ChainInfo] {
    &CHAINS
}

pub fn find(chain: ChainId) -> Option<&'static ChainInfo> {
    CHAINS.iter().find(|c| c.id == chain)
}

/// Human readable network name, `Chain ID: n` for unknown chains.
pub fn network_name(chain: ChainId) -> String {
    match find(chain) {
        | Some(info) => info.name.to_string(),
        | None => format!("Chain ID: {}", chain),
    }
}

pub fn badge_color(chain: ChainId) -> &'static str {
    find(chain).map(|c| c.color).unwrap_or("secondary")
}
