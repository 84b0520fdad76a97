use std::{io::Write, path::PathBuf};

use bigdecimal::BigDecimal;
use clap::{ArgAction, Parser, Subcommand};
use console::style;
use holders_common::log::to_events;
use holders_engine::{
    decoder::decode_logs,
    fetcher::LogFetcher,
    ledger::compute_balances,
    timeseries::{ensure_ordered, history, GiniSource},
};
use holders_rpc::HttpGateway;
use holders_utils::{
    alloy::StringExt,
    config::Config,
    disk_storage::DiskStorageInterface,
    files::{
        read_transfer_logs, write_balances, write_series, write_to_path, write_transfer_logs,
        OutputFormat,
    },
};
use tracing::info;

use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "holders", bin_name = "holders", version)]
/// Reconstruct ERC20 holder balances and their distribution from Transfer logs
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a token's Transfer logs and print its balances or the transfers
    Fetch {
        /// Token contract address
        contract: String,

        #[arg(short, long, default_value_t = 18)]
        decimals: u8,

        /// Blocks per eth_getLogs window, overrides the config file
        #[arg(short, long)]
        chunk_size: Option<u64>,

        #[arg(long, default_value_t = 1)]
        from_block: u64,

        /// Print the decoded transfer logs instead of balances
        #[arg(short, long)]
        transfers: bool,

        /// Leave out balances below this amount
        #[arg(long)]
        cutoff: Option<BigDecimal>,

        #[arg(long)]
        csv: bool,

        #[arg(long, env = "INFURA_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Compute balances from a saved transfer file
    Balances {
        #[arg(short, long)]
        transfers: PathBuf,

        /// Only apply transfers up to and including this block
        #[arg(long)]
        to_block: Option<u64>,

        #[arg(long)]
        cutoff: Option<BigDecimal>,

        #[arg(long)]
        csv: bool,
    },

    /// Write holder counts and Gini coefficients over time
    History {
        /// Transfer file of the current token contract
        #[arg(short, long)]
        transfers: PathBuf,

        /// Transfer file of the legacy token contract
        #[arg(short, long)]
        old: PathBuf,

        /// Keep only the last N snapshots
        #[arg(short, long)]
        days: Option<usize>,

        /// Compute the Gini over current and legacy balances combined
        #[arg(short = 'b', long, conflicts_with = "gini_old")]
        gini_both: bool,

        /// Compute the Gini over legacy balances only
        #[arg(short = 'l', long)]
        gini_old: bool,

        /// Blocks between snapshots, overrides the config file
        #[arg(long)]
        step: Option<u64>,

        #[arg(long)]
        csv: bool,

        output: PathBuf,
    },

    /// Show or edit ~/.holders/config.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    Show,
    SetApiKey { api_key: String },
    /// Use `{}` where the API key goes, e.g. https://mainnet.infura.io/v3/{}
    SetRpcUrl { rpc_url: String },
}

impl Commands {
    pub async fn run(self) -> Result<()> {
        match self {
            Commands::Fetch {
                contract,
                decimals,
                chunk_size,
                from_block,
                transfers,
                cutoff,
                csv,
                api_key,
            } => {
                let config = Config::load()?;
                let contract = contract.parse_as_address()?;
                let mut fetch_config = config.fetch_config();
                if let Some(chunk_size) = chunk_size {
                    fetch_config.chunk_size = chunk_size;
                }
                let url = config.resolve_rpc_url(api_key.as_deref())?;

                let fetcher = LogFetcher::new(HttpGateway::new(url)?, fetch_config)?;
                let raw = fetcher.fetch_transfer_logs_from(contract, from_block).await?;
                let logs = decode_logs(raw, decimals)?;

                let format = OutputFormat::from_csv_flag(csv);
                let mut out = std::io::stdout().lock();
                if transfers {
                    write_transfer_logs(&mut out, &logs, format)?;
                } else {
                    let events = to_events(&logs)?;
                    let balances = compute_balances(&events, None, cutoff.as_ref());
                    write_balances(&mut out, &balances, format)?;
                }
            }

            Commands::Balances {
                transfers,
                to_block,
                cutoff,
                csv,
            } => {
                let events = to_events(&read_transfer_logs(&transfers)?)?;
                ensure_ordered(&events)?;
                let balances = compute_balances(&events, to_block, cutoff.as_ref());
                info!(holders = balances.len(), "computed balances");

                let mut out = std::io::stdout().lock();
                write_balances(&mut out, &balances, OutputFormat::from_csv_flag(csv))?;
            }

            Commands::History {
                transfers,
                old,
                days,
                gini_both,
                gini_old,
                step,
                csv,
                output,
            } => {
                let config = Config::load()?;
                let current = to_events(&read_transfer_logs(&transfers)?)?;
                let legacy = to_events(&read_transfer_logs(&old)?)?;

                let mut history_config = config.history_config();
                history_config.days = days;
                history_config.source = if gini_both {
                    GiniSource::Combined
                } else if gini_old {
                    GiniSource::Legacy
                } else {
                    GiniSource::Current
                };
                if let Some(step) = step {
                    history_config.step = step;
                }

                let series = history(&current, &legacy, &history_config)?;
                info!(snapshots = series.len(), output = %output.display(), "writing history");

                let format = OutputFormat::from_csv_flag(csv);
                write_to_path(&output, |w| write_series(w, &series, format))?;
            }

            Commands::Config { action } => match action {
                ConfigAction::Show => {
                    let path = Config::path()?;
                    let config = Config::load()?;
                    let mut out = std::io::stdout().lock();
                    writeln!(out, "{}", style(path.display()).dim())
                        .map_err(holders_utils::Error::from)?;
                    write!(out, "{}", config.to_toml()?).map_err(holders_utils::Error::from)?;
                }
                ConfigAction::SetApiKey { api_key } => Config::set_api_key(api_key)?,
                ConfigAction::SetRpcUrl { rpc_url } => Config::set_rpc_url(rpc_url)?,
            },
        }

        Ok(())
    }
}
