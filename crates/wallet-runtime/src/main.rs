//! # Wallet Runtime
//!
//! Command-line entry point for the wallet core.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logging, metrics)
//! 2. Load configuration from the environment and flags, then validate it
//! 3. Wire both modules to the LCD node
//! 4. Probe the node and record the connection state
//! 5. Run the requested command and print the resulting state as JSON

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use shared_types::{Address, FetchOutcome, ProposalId};
use tracing::{info, warn};
use wallet_runtime::{
    build_lcd_runtime, spawn_notification_logger, CommandResult, StoreCommand, WalletConfig,
};
use wallet_telemetry::{init_telemetry, TelemetryConfig, TracingErrorReporter};

/// Wallet core: transaction history and proposal deposits from an LCD node
#[derive(Parser, Debug)]
#[command(name = "wallet-runtime")]
#[command(about = "Inspect a wallet's history and proposal deposits")]
struct Args {
    /// LCD REST endpoint (overrides WALLET_LCD_URL)
    #[arg(short, long)]
    lcd: Option<String>,

    /// Chain id (overrides WALLET_CHAIN_ID)
    #[arg(long)]
    chain_id: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the transaction history of an address
    History {
        /// Bech32 wallet address
        address: String,
    },
    /// Fetch and print the deposits on a proposal
    Deposits {
        /// Proposal id
        proposal_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _telemetry = init_telemetry(TelemetryConfig::from_env())
        .context("Failed to initialize telemetry")?;

    let mut config = WalletConfig::from_env().context("Invalid environment")?;
    if let Some(lcd) = args.lcd {
        config.lcd.url = lcd;
    }
    if let Some(chain_id) = args.chain_id {
        config.lcd.chain_id = chain_id;
    }
    config.validate().context("Invalid configuration")?;

    let wired = build_lcd_runtime(&config, Arc::new(TracingErrorReporter))
        .context("Failed to wire wallet runtime")?;
    let runtime = wired.runtime;
    let notifier = spawn_notification_logger(runtime.bus());

    let reachable = wired.client.is_reachable().await;
    if !reachable {
        warn!(lcd = %config.lcd.url, "LCD node is not reachable");
    }
    runtime
        .dispatch(StoreCommand::SetConnected(reachable))
        .await?;

    let output = match args.command {
        Command::History { address } => {
            runtime
                .dispatch(StoreCommand::SignIn {
                    address: Address(address),
                })
                .await?;
            let result = runtime.dispatch(StoreCommand::GetAllTxs).await?;
            if let CommandResult::Transactions(FetchOutcome::Failed(error)) = &result {
                bail!("Fetching transactions failed: {error}");
            }

            let state = runtime.transactions().snapshot().value;
            info!(
                staking = state.staking.len(),
                governance = state.governance.len(),
                wallet = state.wallet.len(),
                "History fetched"
            );
            json!({
                "loaded": state.loaded,
                "staking": state.staking,
                "governance": state.governance,
                "wallet": state.wallet,
            })
        }
        Command::Deposits { proposal_id } => {
            let proposal_id = ProposalId(proposal_id);
            let result = runtime
                .dispatch(StoreCommand::GetProposalDeposits {
                    proposal_id: proposal_id.clone(),
                })
                .await?;
            if let CommandResult::Deposits(FetchOutcome::Failed(error)) = &result {
                bail!("Fetching deposits failed: {error}");
            }

            json!({
                "proposal_id": proposal_id,
                "deposits": runtime.deposits().deposits_for(&proposal_id).unwrap_or_default(),
            })
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to render output")?
    );

    // Dropping the runtime closes the bus, which ends the notifier.
    drop(runtime);
    let _ = tokio::time::timeout(Duration::from_secs(1), notifier).await;
    Ok(())
}
