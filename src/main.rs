use colored::Colorize;
use coinview::{
    AppResult,
    cli::{Cli, Commands},
    config::Config,
    init_logging,
    session::SessionManager,
    ui::cli::{self as cli_output, MarketsOptions},
};

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Load configuration; a load failure is reported once logging is up
    let (config, load_error) = Config::load_or_default(&cli.config_file);

    // The TUI owns the terminal, so interactive sessions log to a file
    let to_file = cli.is_interactive_mode() && !cli.is_dry_run_mode();
    let log_level = cli.effective_log_level(&config.log_level);
    let log_guard = init_logging(&log_level, &config.log, to_file)?;

    if let Some(err) = load_error {
        tracing::warn!("Failed to load config: {:#}, using defaults", err);
        if to_file {
            eprintln!("{} {:#}, using defaults", "Warning:".yellow().bold(), err);
        }
    }

    tracing::info!("CoinView starting...");
    tracing::debug!("CLI arguments: {:?}", cli);

    let result: AppResult<()> = match cli.command() {
        Commands::Interactive => {
            let mut session_manager = SessionManager::new(&cli, config)?;
            session_manager.start().await.map_err(Into::into)
        }
        Commands::Markets {
            search,
            sort,
            desc,
            page,
            page_size,
        } => {
            let options = MarketsOptions {
                search,
                sort,
                descending: desc,
                page,
                page_size,
            };
            cli_output::run_markets(&config, options).await
        }
        Commands::Coin { id, days } => cli_output::run_coin(&config, &id, days).await,
        Commands::News { limit } => cli_output::run_news(&config, limit).await,
        Commands::Config { action } => {
            Config::handle_command(&action, &cli.config_file, &config).map_err(Into::into)
        }
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {}", e);
        eprintln!("{} {}", "Error:".red().bold(), e);
        drop(log_guard);
        std::process::exit(1);
    }

    drop(log_guard);
    Ok(())
}
