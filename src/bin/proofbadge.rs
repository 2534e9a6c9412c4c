//! Command line entrypoint for ProofBadge.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proofbadge::config::Config;
use proofbadge::scoring::ScoreTier;
use proofbadge::server::DEFAULT_CHAIN;
use proofbadge::utils::init_logging;
use proofbadge::{chains, AggregationResult, ChainId, ReputationAggregator};

#[derive(Debug, Parser)]
#[command(name = "proofbadge", author, version, about = "Wallet reputation scoring", long_about = None)]
struct Args {
    /// Path to the configuration file (TOML). Defaults to the standard search path.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print the default configuration to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the reputation score of a wallet
    Score {
        /// Wallet address
        #[arg(short, long)]
        address: String,
        /// Chain id, decimal or 0x-prefixed hex
        #[arg(long, default_value_t = DEFAULT_CHAIN)]
        chain: ChainId,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported networks
    Chains,
    /// Write a default configuration file to `--config` (or `proofbadge.toml`)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Serve the reputation API over HTTP
    Serve {
        /// Listen address, overrides `server.bind_addr`
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    if args.print_default_config {
        println!("{}", Config::default_toml());
        return Ok(());
    }

    let command = match args.command {
        | Some(command) => command,
        | None => {
            eprintln!("No command given. Run with --help for usage.");
            return Ok(());
        }
    };

    if let Command::Init { force } = &command {
        let output = args.config.clone().unwrap_or_else(|| PathBuf::from("proofbadge.toml"));
        return write_default_config(&output, *force);
    }

    let config = load_config(args.config.as_ref())?;
    init_logging(&config.app.log_level);
    config.validate().context("Invalid configuration")?;

    match command {
        | Command::Score { address, chain, json } => {
            let aggregator = ReputationAggregator::from_config(&config)?;
            let result = aggregator
                .compute_reputation(&address, chain)
                .await
                .with_context(|| format!("Failed to compute reputation for {}", address))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_report(&result);
            }
        }
        | Command::Chains => {
            for chain in chains::all() {
                println!(
                    "{:>10}  {:<9} {:<18} {}",
                    chain.id.as_u64(),
                    chain.hex_id(),
                    chain.name,
                    chain.native_currency.symbol
                );
            }
        }
        | Command::Serve { bind } => {
            if let Err(e) = proofbadge::metrics::init() {
                log::warn!("Metrics disabled: {}", e);
            }
            let bind = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            let listener =
                TcpListener::bind(&bind).with_context(|| format!("Failed to bind {}", bind))?;
            let aggregator = Arc::new(ReputationAggregator::from_config(&config)?);
            proofbadge::server::serve(listener, aggregator, async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Shutdown signal received. Stopping...");
                }
            })
            .await?;
        }
        | Command::Init { .. } => {}
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        | Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        | None => Config::load().context("Failed to load configuration"),
    }
}

fn write_default_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("{} already exists. Use --force to overwrite.", output.display());
    }
    Config::default()
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("✅ Wrote default config to {}", output.display());
    Ok(())
}

fn print_report(result: &AggregationResult) {
    let score = format!("{}/100", result.score);
    let score = match result.tier {
        | ScoreTier::High => score.green().bold(),
        | ScoreTier::Medium => score.yellow().bold(),
        | ScoreTier::Low => score.red().bold(),
    };

    let network = match chains::badge_color(result.chain) {
        | "primary" => result.network.blue(),
        | "success" => result.network.green(),
        | "warning" => result.network.yellow(),
        | "info" => result.network.cyan(),
        | _ => result.network.normal(),
    };
    println!("{} on {}", result.address.to_string().bold(), network);
    println!("Reputation score: {}", score);
    for (label, points, cap) in result.breakdown.rows() {
        println!("  {:<24} {:>3} / {}", label, points, cap);
    }
    println!(
        "Wallet age {:.0} days, {} transactions, active last 30 days: {}",
        result.activity.wallet_age_days,
        result.activity.total_transactions,
        result.activity.active_last_30_days
    );
    println!(
        "{} unique contracts, {} DeFi interactions, {} DEX swaps, ${:.2} in tokens",
        result.stats.unique_contracts,
        result.stats.defi_transactions,
        result.stats.dex_swaps,
        result.total_balance_usd
    );
    if !result.airdrops.is_empty() {
        println!("Airdrops:");
        for airdrop in &result.airdrops {
            println!(
                "  {} {} {} ({}, {})",
                airdrop.project, airdrop.amount, airdrop.token, airdrop.network, airdrop.date
            );
        }
    }
    if result.badge_eligible {
        println!("{}", "Eligible to mint a reputation badge".green());
    }
}
