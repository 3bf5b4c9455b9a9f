//! votelock — extend and merge voting lockups from the command line.

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use votelock_chain::{EvmRpc, RpcWallet, Wallet};
use votelock_client::{
    AccountSession, ClientConfig, SessionSnapshot, ShutdownController, VoteSequencer,
};
use votelock_types::{ContractParams, Timestamp, WalletAddress};

#[derive(Parser)]
#[command(name = "votelock", about = "Extend and merge MAV voting lockups on Base")]
struct Cli {
    /// EVM RPC endpoint for reads.
    #[arg(long, env = "VOTELOCK_RPC_URL")]
    rpc_url: Option<String>,

    /// Wallet-connection project identifier.
    #[arg(long, env = "VOTELOCK_PROJECT_ID")]
    project_id: Option<String>,

    /// Explicit wallet endpoint (defaults to the relay derived from the
    /// project identifier).
    #[arg(long, env = "VOTELOCK_WALLET_URL")]
    wallet_url: Option<String>,

    /// Poll interval for `watch`, in seconds.
    #[arg(long, env = "VOTELOCK_POLL_INTERVAL")]
    poll_interval_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VOTELOCK_LOG_FORMAT")]
    log_format: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VOTELOCK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Show the account's staking state once.
    Status {
        /// Inspect an address without connecting a wallet.
        #[arg(long)]
        address: Option<String>,
    },
    /// Poll the account's staking state until interrupted.
    Watch {
        /// Watch an address without connecting a wallet.
        #[arg(long)]
        address: Option<String>,
    },
    /// Add the given amount of MAV (or "max" for the full balance) to the
    /// lockup and extend all votes to 4 years.
    Extend { amount: String },
    /// Merge all additional lockups into the canonical one, then extend it
    /// to 4 years.
    Merge,
}

/// Merge the optional config file with CLI flags and env vars; flags win.
/// The RPC endpoint and project identifier are required from one of the two.
fn resolve_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let file_config: Option<ClientConfig> = match &cli.config {
        Some(path) => Some(
            ClientConfig::from_toml_file(path.to_str().context("config path is not UTF-8")?)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
        ),
        None => None,
    };

    let rpc_url = cli
        .rpc_url
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.rpc_url.clone()));
    let project_id = cli
        .project_id
        .clone()
        .or_else(|| file_config.as_ref().map(|c| c.project_id.clone()));

    let Some(rpc_url) = rpc_url else {
        bail!("missing required setting: VOTELOCK_RPC_URL (or rpc_url in the config file)");
    };
    let Some(project_id) = project_id else {
        bail!("missing required setting: VOTELOCK_PROJECT_ID (or project_id in the config file)");
    };

    let base = file_config.unwrap_or(ClientConfig {
        rpc_url: rpc_url.clone(),
        project_id: project_id.clone(),
        wallet_url: None,
        poll_interval_secs: 2,
        log_format: "human".to_string(),
        log_level: "info".to_string(),
    });

    Ok(ClientConfig {
        rpc_url,
        project_id,
        wallet_url: cli.wallet_url.clone().or(base.wallet_url),
        poll_interval_secs: cli.poll_interval_secs.unwrap_or(base.poll_interval_secs),
        log_format: cli.log_format.clone().unwrap_or(base.log_format),
        log_level: cli.log_level.clone().unwrap_or(base.log_level),
    })
}

async fn connect_wallet(config: &ClientConfig, params: ContractParams) -> anyhow::Result<RpcWallet> {
    let endpoint = config
        .wallet_url
        .clone()
        .unwrap_or_else(|| RpcWallet::relay_endpoint(&config.project_id, params.chain_id));
    RpcWallet::connect(endpoint, params)
        .await
        .context("wallet connection failed")
}

/// Resolve the address to observe: an explicit flag, or the connected wallet.
async fn resolve_address(
    explicit: Option<String>,
    config: &ClientConfig,
    params: &ContractParams,
) -> anyhow::Result<WalletAddress> {
    match explicit {
        Some(s) => Ok(WalletAddress::parse(&s)?),
        None => Ok(connect_wallet(config, params.clone()).await?.address()),
    }
}

fn print_snapshot(snap: &SessionSnapshot) {
    let Some(address) = snap.address else {
        return;
    };
    println!("Account:        {}", address.short());
    if let Some(balance) = snap.balance {
        println!("Balance:        {} MAV", balance.format_short(4));
    }
    if snap.total_staked.is_zero() && !snap.scanning {
        println!("No staking established yet.");
        return;
    }
    println!("Total staked:   {} MAV", snap.total_staked.whole_units());
    println!("Voting power:   {} votes", snap.total_votes.whole_units());
    if snap.latest_expiration != Timestamp::EPOCH {
        println!(
            "Expiration:     in {} days",
            snap.latest_expiration.days_until(Timestamp::now())
        );
    }
    if snap.lockup_count > 1 {
        println!("Lockups found:  {}", snap.lockup_count);
    }
    if let Some(delegate) = snap.delegate {
        println!("Delegated to:   {}", delegate.short());
    }
    if snap.scanning {
        println!("Loading lockups...");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    logging::init(&config.log_format, &config.log_level);

    let params = ContractParams::base_mainnet();
    let chain = Arc::new(EvmRpc::new(config.rpc_url.clone(), params.clone())?);

    // The endpoint serving the wrong chain would make every read garbage.
    match chain.chain_id().await {
        Ok(id) if id != params.chain_id => {
            bail!(
                "RPC endpoint serves chain {id}, expected chain {}",
                params.chain_id
            );
        }
        Ok(_) => {}
        Err(e) => tracing::warn!("could not verify endpoint chain id: {e}"),
    }

    match cli.command {
        Command::Status { address } => {
            let address = resolve_address(address, &config, &params).await?;
            let mut session = AccountSession::new(chain, params);
            session.set_address(Some(address));
            session.refresh().await?;
            print_snapshot(&session.snapshot());
        }

        Command::Watch { address } => {
            let address = resolve_address(address, &config, &params).await?;
            let mut session = AccountSession::new(chain, params);
            session.set_address(Some(address));

            let controller = ShutdownController::new();
            let shutdown_rx = controller.subscribe();
            tokio::spawn(async move { controller.wait_for_signal().await });

            tracing::info!(
                interval_secs = config.poll_interval_secs,
                "watching {}",
                address.short()
            );
            session
                .run(config.poll_interval(), shutdown_rx, |session| {
                    print_snapshot(&session.snapshot());
                    println!();
                })
                .await;
        }

        Command::Extend { amount } => {
            let wallet = connect_wallet(&config, params.clone()).await?;
            let mut session = AccountSession::new(chain.clone(), params.clone());
            session.set_address(Some(wallet.address()));
            session.refresh().await?;

            let input = if amount == "max" {
                let Some(balance) = session.balance() else {
                    bail!("balance unavailable, cannot stake max");
                };
                balance.format_units()
            } else {
                amount
            };

            let mut sequencer = VoteSequencer::new(wallet, params);
            let receipt = sequencer.submit_extend(chain.as_ref(), &input).await?;

            if let Some(tx) = receipt.approved {
                println!("Approval submitted:  {tx}");
            }
            println!("Votes extended:      {}", receipt.extended);
            println!("Amount staked:       {} MAV", receipt.amount);

            session.refresh_balance().await?;
            if let Some(balance) = session.balance() {
                println!("New balance:         {} MAV", balance.format_short(4));
            }
        }

        Command::Merge => {
            let wallet = connect_wallet(&config, params.clone()).await?;
            let mut session = AccountSession::new(chain.clone(), params.clone());
            session.set_address(Some(wallet.address()));
            session.refresh().await?;

            let indices = session.snapshot().active_indices;
            let mut sequencer = VoteSequencer::new(wallet, params);
            let receipt = sequencer.merge_and_extend(&indices).await?;

            println!("Lockups merged:      {}", receipt.merged);
            println!("Votes re-anchored:   {}", receipt.extended);
            println!("Merged indices:      {:?}", receipt.indices);
        }
    }

    Ok(())
}
