//! Governance and airdrop participation.
//!
//! No production indexer exists for this data yet. Two adapters share the
//! same interface: a synthetic placeholder and a GraphQL subgraph client.

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::http::{build_client, decode_json, send};
use super::Provider;
use crate::config::ParticipationConfig;
use crate::utils::error::{Error, Result};
use crate::utils::types::{ChainId, WalletAddress};

/// A claimed airdrop, rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AirdropRecord {
    pub project: String,
    pub network: String,
    /// Decimal string, kept verbatim
    pub amount: String,
    pub token: String,
    pub date: String,
}

impl AirdropRecord {
    pub fn new(project: &str, network: &str, amount: &str, token: &str, date: &str) -> Self {
        Self {
            project: project.to_string(),
            network: network.to_string(),
            amount: amount.to_string(),
            token: token.to_string(),
            date: date.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Participation {
    pub governance_votes: u64,
    pub airdrop_count: u64,
    pub airdrops: Vec<AirdropRecord>,
}

impl Participation {
    /// The airdrop count is derived from the list.
    pub fn new(governance_votes: u64, airdrops: Vec<AirdropRecord>) -> Self {
        Self { governance_votes, airdrop_count: airdrops.len() as u64, airdrops }
    }
}

/// Highest synthetic governance vote count.
const MAX_SYNTHETIC_VOTES: u64 = 5;

fn placeholder_airdrops() -> Vec<AirdropRecord> {
    vec![
        AirdropRecord::new("Uniswap", "Ethereum Sepolia", "100", "UNI", "2023-05-15"),
        AirdropRecord::new("Aave", "Polygon Mumbai", "50", "AAVE", "2023-06-20"),
        AirdropRecord::new("Compound", "Ethereum Sepolia", "75", "COMP", "2023-07-10"),
    ]
}

#[derive(Debug, Clone, Copy)]
enum GovernanceVotes {
    Fixed(u64),
    /// Uniform in `0..=5`, reproducible per address when seeded
    Random { seed: Option<u64> },
}

/// Synthetic participation data standing in for a real indexer.
#[derive(Debug, Clone)]
pub struct StaticParticipationProvider {
    airdrops: Vec<AirdropRecord>,
    votes: GovernanceVotes,
}

impl Default for StaticParticipationProvider {
    fn default() -> Self {
        Self { airdrops: placeholder_airdrops(), votes: GovernanceVotes::Random { seed: None } }
    }
}

impl StaticParticipationProvider {
    pub fn from_config(config: &ParticipationConfig) -> Self {
        let votes = match config.governance_votes {
            | Some(n) => GovernanceVotes::Fixed(n),
            | None => GovernanceVotes::Random { seed: config.seed },
        };
        Self { votes, ..Self::default() }
    }

    pub fn with_fixed_votes(mut self, votes: u64) -> Self {
        self.votes = GovernanceVotes::Fixed(votes);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.votes = GovernanceVotes::Random { seed: Some(seed) };
        self
    }

    pub fn with_airdrops(mut self, airdrops: Vec<AirdropRecord>) -> Self {
        self.airdrops = airdrops;
        self
    }

    fn governance_votes(&self, address: &WalletAddress) -> u64 {
        match self.votes {
            | GovernanceVotes::Fixed(n) => n,
            | GovernanceVotes::Random { seed: Some(seed) } => {
                let mut hasher = DefaultHasher::new();
                address.key().hash(&mut hasher);
                StdRng::seed_from_u64(seed ^ hasher.finish()).gen_range(0..=MAX_SYNTHETIC_VOTES)
            }
            | GovernanceVotes::Random { seed: None } => {
                rand::thread_rng().gen_range(0..=MAX_SYNTHETIC_VOTES)
            }
        }
    }
}

#[async_trait]
impl Provider for StaticParticipationProvider {
    type Summary = Participation;

    fn name(&self) -> &'static str {
        "participation"
    }

    async fn try_fetch(&self, address: &WalletAddress, _chain: ChainId) -> Result<Participation> {
        Ok(Participation::new(self.governance_votes(address), self.airdrops.clone()))
    }
}

const SUBGRAPH_PROVIDER: &str = "subgraph";

const PARTICIPATION_QUERY: &str = r#"
query Participation($address: String!) {
  governanceVotes(address: $address)
  airdrops(where: { recipient: $address }) {
    project
    network
    amount
    token
    date
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<ParticipationData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParticipationData {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    governance_votes: Option<u64>,
    #[serde(default)]
    airdrops: Vec<AirdropRecord>,
}

/// Participation read from a GraphQL subgraph.
pub struct SubgraphParticipationProvider {
    client: Client,
    endpoint: String,
}

impl SubgraphParticipationProvider {
    pub fn new(endpoint: impl Into<String>, config: &ParticipationConfig) -> Result<Self> {
        Ok(Self { client: build_client(config.timeout())?, endpoint: endpoint.into() })
    }
}

#[async_trait]
impl Provider for SubgraphParticipationProvider {
    type Summary = Participation;

    fn name(&self) -> &'static str {
        SUBGRAPH_PROVIDER
    }

    async fn try_fetch(&self, address: &WalletAddress, _chain: ChainId) -> Result<Participation> {
        let body = json!({
            "query": PARTICIPATION_QUERY,
            "variables": { "address": address.key() },
        });
        let resp = send(SUBGRAPH_PROVIDER, self.client.post(&self.endpoint).json(&body)).await?;
        let payload: GraphQlResponse = decode_json(SUBGRAPH_PROVIDER, resp).await?;

        if !payload.errors.is_empty() {
            let messages: Vec<String> = payload.errors.into_iter().map(|e| e.message).collect();
            return Err(Error::MalformedResponse {
                provider: SUBGRAPH_PROVIDER,
                message: messages.join("; "),
            });
        }
        let data = payload.data.ok_or_else(|| Error::MalformedResponse {
            provider: SUBGRAPH_PROVIDER,
            message: "missing data".to_string(),
        })?;
        Ok(Participation::new(data.governance_votes.unwrap_or(0), data.airdrops))
    }
}
