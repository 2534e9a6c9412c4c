//! Threshold-band scoring of normalized wallet metrics.
//!
//! Every category maps one metric to points through a list of bands,
//! evaluated from the highest threshold down; the first satisfied band wins
//! and a metric below every band scores 0. The six category scores are summed
//! and clamped to [`MAX_SCORE`].

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::error::{Error, Result};

/// Upper bound of a reputation score.
pub const MAX_SCORE: u32 = 100;

/// Minimum score required to mint a ProofBadge.
pub const BADGE_MIN_SCORE: u8 = 50;

/// How a metric is compared against a band threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// metric >= threshold
    AtLeast,
    /// metric > threshold
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub threshold: f64,
    pub points: u32,
}

impl Band {
    pub const fn new(threshold: f64, points: u32) -> Self {
        Self { threshold, points }
    }
}

/// Non-overlapping bands for one category, kept sorted by descending threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandTable {
    comparison: Comparison,
    bands: Vec<Band>,
}

impl BandTable {
    pub fn new(comparison: Comparison, mut bands: Vec<Band>) -> Self {
        bands.sort_by(|a, b| {
            b.threshold.partial_cmp(&a.threshold).unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { comparison, bands }
    }

    pub fn at_least(bands: &[(f64, u32)]) -> Self {
        Self::new(Comparison::AtLeast, bands.iter().map(|&(t, p)| Band::new(t, p)).collect())
    }

    pub fn above(bands: &[(f64, u32)]) -> Self {
        Self::new(Comparison::Above, bands.iter().map(|&(t, p)| Band::new(t, p)).collect())
    }

    /// Points for `metric`: the highest satisfied band, else 0.
    pub fn points(&self, metric: f64) -> u32 {
        self.bands
            .iter()
            .find(|band| match self.comparison {
                | Comparison::AtLeast => metric >= band.threshold,
                | Comparison::Above => metric > band.threshold,
            })
            .map(|band| band.points)
            .unwrap_or(0)
    }

    pub fn max_points(&self) -> u32 {
        self.bands.iter().map(|b| b.points).max().unwrap_or(0)
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }
}

/// The six reputation categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Governance,
    Defi,
    Contracts,
    Airdrops,
    Dex,
    Balance,
}

impl Category {
    /// Display order.
    pub const ALL: [Category; 6] = [
        Category::Governance,
        Category::Defi,
        Category::Contracts,
        Category::Airdrops,
        Category::Dex,
        Category::Balance,
    ];

    /// Maximum points this category may contribute.
    pub fn cap(self) -> u32 {
        match self {
            | Category::Governance | Category::Defi => 20,
            | Category::Contracts | Category::Airdrops | Category::Dex | Category::Balance => 15,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            | Category::Governance => "Governance Participation",
            | Category::Defi => "DeFi Engagement",
            | Category::Contracts => "Unique Contract Interactions",
            | Category::Airdrops => "Airdrops Claimed",
            | Category::Dex => "DEX Swaps",
            | Category::Balance => "On-Chain Balance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalized metrics fed to the scoring tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub governance_votes: u64,
    pub defi_transactions: u64,
    pub unique_contracts: u64,
    pub airdrop_count: u64,
    pub dex_swaps: u64,
    pub balance_usd: f64,
}

/// Band tables for every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreTable {
    pub governance: BandTable,
    pub defi: BandTable,
    pub contracts: BandTable,
    pub airdrops: BandTable,
    pub dex: BandTable,
    pub balance: BandTable,
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoreTable {
    /// The production scoring table.
    pub fn standard() -> Self {
        Self {
            governance: BandTable::at_least(&[(5.0, 20), (3.0, 15), (1.0, 5)]),
            defi: BandTable::at_least(&[(10.0, 20), (5.0, 10), (1.0, 5)]),
            contracts: BandTable::at_least(&[(20.0, 15), (10.0, 10), (5.0, 5)]),
            airdrops: BandTable::at_least(&[(5.0, 15), (3.0, 10), (1.0, 5)]),
            dex: BandTable::at_least(&[(25.0, 15), (15.0, 10), (5.0, 5), (2.0, 1)]),
            balance: BandTable::above(&[(250.0, 15), (50.0, 10), (10.0, 5)]),
        }
    }

    pub fn table(&self, category: Category) -> &BandTable {
        match category {
            | Category::Governance => &self.governance,
            | Category::Defi => &self.defi,
            | Category::Contracts => &self.contracts,
            | Category::Airdrops => &self.airdrops,
            | Category::Dex => &self.dex,
            | Category::Balance => &self.balance,
        }
    }

    pub fn governance_score(&self, proposals_voted: u64) -> u32 {
        self.governance.points(proposals_voted as f64)
    }

    pub fn defi_score(&self, defi_transactions: u64) -> u32 {
        self.defi.points(defi_transactions as f64)
    }

    pub fn contract_score(&self, unique_contracts: u64) -> u32 {
        self.contracts.points(unique_contracts as f64)
    }

    pub fn airdrop_score(&self, airdrop_count: u64) -> u32 {
        self.airdrops.points(airdrop_count as f64)
    }

    pub fn dex_score(&self, dex_swaps: u64) -> u32 {
        self.dex.points(dex_swaps as f64)
    }

    /// Balance uses strict `>` bands. NaN scores 0.
    pub fn balance_score(&self, balance_usd: f64) -> u32 {
        self.balance.points(balance_usd)
    }

    pub fn score(&self, inputs: &ScoreInputs) -> ScoreBreakdown {
        ScoreBreakdown {
            governance: self.governance_score(inputs.governance_votes),
            defi: self.defi_score(inputs.defi_transactions),
            contracts: self.contract_score(inputs.unique_contracts),
            airdrops: self.airdrop_score(inputs.airdrop_count),
            dex: self.dex_score(inputs.dex_swaps),
            balance: self.balance_score(inputs.balance_usd),
        }
    }
}

static STANDARD: Lazy<ScoreTable> = Lazy::new(ScoreTable::standard);

pub fn governance_score(proposals_voted: u64) -> u32 {
    STANDARD.governance_score(proposals_voted)
}

pub fn defi_score(defi_transactions: u64) -> u32 {
    STANDARD.defi_score(defi_transactions)
}

pub fn contract_score(unique_contracts: u64) -> u32 {
    STANDARD.contract_score(unique_contracts)
}

pub fn airdrop_score(airdrop_count: u64) -> u32 {
    STANDARD.airdrop_score(airdrop_count)
}

pub fn dex_score(dex_swaps: u64) -> u32 {
    STANDARD.dex_score(dex_swaps)
}

pub fn balance_score(balance_usd: f64) -> u32 {
    STANDARD.balance_score(balance_usd)
}

/// Points per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub governance: u32,
    pub defi: u32,
    pub contracts: u32,
    pub airdrops: u32,
    pub dex: u32,
    pub balance: u32,
}

impl ScoreBreakdown {
    pub fn get(&self, category: Category) -> u32 {
        match category {
            | Category::Governance => self.governance,
            | Category::Defi => self.defi,
            | Category::Contracts => self.contracts,
            | Category::Airdrops => self.airdrops,
            | Category::Dex => self.dex,
            | Category::Balance => self.balance,
        }
    }

    /// Unclamped sum of all categories, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        Category::ALL.iter().fold(0u32, |acc, &c| acc.saturating_add(self.get(c)))
    }

    /// `(label, points, cap)` rows in display order.
    pub fn rows(&self) -> Vec<(&'static str, u32, u32)> {
        Category::ALL.iter().map(|&c| (c.label(), self.get(c), c.cap())).collect()
    }

    /// Every category must stay within its cap.
    pub fn check_caps(&self) -> Result<()> {
        for category in Category::ALL {
            let points = self.get(category);
            if points > category.cap() {
                return Err(Error::AggregationFailure(format!(
                    "{} scored {} points, above its cap of {}",
                    category.label(),
                    points,
                    category.cap()
                )));
            }
        }
        Ok(())
    }
}

/// Coarse score bands used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Low,
    Medium,
    High,
}

/// Reputation score in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReputationScore(u8);

impl ReputationScore {
    /// Clamp an arbitrary total to [`MAX_SCORE`].
    pub fn from_total(total: u32) -> Self {
        ReputationScore(total.min(MAX_SCORE) as u8)
    }

    pub fn from_breakdown(breakdown: &ScoreBreakdown) -> Self {
        Self::from_total(breakdown.total())
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> ScoreTier {
        match self.0 {
            | 0..=29 => ScoreTier::Low,
            | 30..=69 => ScoreTier::Medium,
            | _ => ScoreTier::High,
        }
    }

    pub fn is_badge_eligible(self) -> bool {
        self.0 >= BADGE_MIN_SCORE
    }
}

impl fmt::Display for ReputationScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
