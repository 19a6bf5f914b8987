//! Command Line Interface module
//!
//! Implements the CLI commands and argument parsing for CoinView.

use clap::{Parser, Subcommand};

use crate::market_data::SortField;

#[derive(Parser, Debug, Clone)]
#[command(name = "coinview")]
#[command(about = "CoinView Crypto Market Browser")]
#[command(
    long_about = "Browse cryptocurrency markets, price history and news from the terminal"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(long, default_value = "config.toml")]
    pub config_file: String,

    /// Log level (trace, debug, info, warn, error); overrides the configured level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Dry-run mode: show welcome page and configuration without starting UI
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start interactive terminal session
    #[command(hide = true)]
    Interactive,

    /// Print one page of the market list
    Markets {
        /// Case-insensitive substring of the coin name or symbol
        #[arg(long)]
        search: Option<String>,

        /// Sort field (price, market-cap, volume)
        #[arg(long)]
        sort: Option<SortField>,

        /// Sort descending instead of ascending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show detail stats and price history for one coin
    Coin {
        /// CoinGecko coin id, e.g. `bitcoin`
        id: String,

        /// Lookback window in days (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Print the latest crypto news
    News {
        /// Maximum number of articles to print
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Interactive
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the actual command, using default if none provided
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or_default()
    }

    /// Check if we're running in interactive mode
    pub fn is_interactive_mode(&self) -> bool {
        matches!(self.command(), Commands::Interactive)
    }

    /// Resolve the log level: `-v`, then `--log-level`, then the configured level
    pub fn effective_log_level(&self, configured: &str) -> String {
        if self.verbose {
            "debug".to_string()
        } else {
            self.log_level.clone().unwrap_or_else(|| configured.to_string())
        }
    }

    /// Check if we're running in dry-run mode
    pub fn is_dry_run_mode(&self) -> bool {
        self.dry_run
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_interactive() {
        let cli = Cli::parse_from(["coinview"]);
        assert!(cli.is_interactive_mode());
        assert_eq!(cli.config_file, "config.toml");
        assert_eq!(cli.effective_log_level("info"), "info");
    }

    #[test]
    fn test_markets_arguments() {
        let cli = Cli::parse_from([
            "coinview", "-v", "markets", "--search", "eth", "--sort", "market-cap", "--desc",
            "--page", "2",
        ]);
        assert_eq!(cli.effective_log_level("warn"), "debug");
        match cli.command() {
            Commands::Markets {
                search,
                sort,
                desc,
                page,
                page_size,
            } => {
                assert_eq!(search.as_deref(), Some("eth"));
                assert_eq!(sort, Some(SortField::MarketCap));
                assert!(desc);
                assert_eq!(page, 2);
                assert_eq!(page_size, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_sort_field() {
        assert!(Cli::try_parse_from(["coinview", "markets", "--sort", "rank"]).is_err());
        assert!(Cli::try_parse_from(["coinview", "markets", "--desc"]).is_err());
    }

    #[test]
    fn test_coin_command() {
        let cli = Cli::parse_from(["coinview", "coin", "bitcoin", "--days", "7"]);
        match cli.command() {
            Commands::Coin { id, days } => {
                assert_eq!(id, "bitcoin");
                assert_eq!(days, Some(7));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level_falls_back_to_config() {
        let cli = Cli::parse_from(["coinview", "news"]);
        assert_eq!(cli.effective_log_level("warn"), "warn");

        let cli = Cli::parse_from(["coinview", "--log-level", "trace", "news"]);
        assert_eq!(cli.effective_log_level("warn"), "trace");
    }
}
