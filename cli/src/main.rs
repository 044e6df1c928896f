//! CLI entry point for the hedgebook delta-hedge ledger.

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use hedgebook::{Observation, OptionType};
use hedgebook_cli::commands;
use hedgebook_cli::config::Config;

#[derive(Parser)]
#[command(name = "hedgebook")]
#[command(about = "Delta-hedge ledger: record option observations, track the stock hedge")]
#[command(version)]
struct Cli {
    /// Path to config.toml
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

/// One option observation, as command-line arguments.
#[derive(Args)]
struct ObservationArgs {
    /// Observation date (YYYY-MM-DD)
    #[arg(long)]
    date: NaiveDate,

    #[arg(long)]
    underlying_price: f64,

    #[arg(long)]
    strike_price: f64,

    #[arg(long)]
    option_price: f64,

    /// Implied volatility as a fraction (e.g. 0.25)
    #[arg(long)]
    iv: f64,

    /// Option delta in [-1, 1], sign as quoted
    #[arg(long, allow_hyphen_values = true)]
    delta: f64,

    /// Expiration date (YYYY-MM-DD)
    #[arg(long)]
    expiration: NaiveDate,

    /// 'call' or 'put'
    #[arg(long)]
    option_type: OptionType,

    /// Number of contracts (signed; 1 contract = 100 shares)
    #[arg(long, allow_hyphen_values = true)]
    position_size: i64,
}

impl ObservationArgs {
    fn into_observation(self) -> Observation {
        Observation {
            date: self.date,
            underlying_price: self.underlying_price,
            strike_price: self.strike_price,
            option_price: self.option_price,
            implied_volatility: self.iv,
            delta: self.delta,
            expiration: self.expiration,
            option_type: self.option_type,
            position_size: self.position_size,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Record a new observation and update the hedge
    Add {
        #[command(flatten)]
        observation: ObservationArgs,
    },

    /// Replace the observation at INDEX and replay the ledger from there
    Edit {
        index: usize,

        #[command(flatten)]
        observation: ObservationArgs,
    },

    /// Delete the observation at INDEX and replay the ledger from scratch
    Delete {
        index: usize,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Show the position summary
    Summary {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the ledger entry history
    History {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the stock transaction log
    Transactions {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Update transaction cost parameters (applies to later trades only)
    SetCosts {
        /// Flat fee per trade
        #[arg(long)]
        fixed: f64,

        /// Fee as a fraction of traded notional (e.g. 0.001)
        #[arg(long)]
        percentage: f64,
    },

    /// Set initial capital and replay the ledger from scratch
    SetCapital { amount: f64 },

    /// Export the full session document as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Import a previously exported document, replacing all state
    Import {
        input: PathBuf,

        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },

    /// Clear all data and reset to the default initial capital
    Clear {
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Command::Add { observation } => commands::add(&config, observation.into_observation()),
        Command::Edit { index, observation } => {
            commands::edit(&config, index, observation.into_observation())
        }
        Command::Delete { index, force } => commands::delete(&config, index, force),
        Command::Summary { json } => commands::show_summary(&config, json),
        Command::History { json } => commands::show_history(&config, json),
        Command::Transactions { json } => commands::show_transactions(&config, json),
        Command::SetCosts { fixed, percentage } => commands::set_costs(&config, fixed, percentage),
        Command::SetCapital { amount } => commands::set_capital(&config, amount),
        Command::Export { output } => commands::export(&config, output),
        Command::Import { input, force } => commands::import(&config, input, force),
        Command::Clear { force } => commands::clear(&config, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
