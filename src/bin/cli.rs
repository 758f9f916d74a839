//! Homework bot CLI
//!
//! Polls the review API and forwards status changes to Telegram.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use homework_bot::{
    config::{self, Credentials},
    error::Result,
    models::Config,
    pipeline::Poller,
    services::{PracticumClient, TelegramClient},
    utils::{format_timestamp, http},
};

/// Homework review status notifier
#[derive(Parser, Debug)]
#[command(name = "homework-bot", version, about = "Homework review status notifier")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll forever and send notifications
    Run {
        /// Starting cursor as a UNIX timestamp (default: config or now)
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Run a single polling cycle and exit
    Once {
        /// Cursor as a UNIX timestamp (default: config or now)
        #[arg(long)]
        from_date: Option<i64>,
    },

    /// Validate configuration and credentials
    Validate,
}

/// Initialize logging; `RUST_LOG` wins over the flag and the config.
fn init_logging(verbose: bool, config_path: &Path) {
    let level = if verbose {
        "debug".to_string()
    } else {
        Config::load(config_path)
            .map(|c| c.logging.level)
            .unwrap_or_else(|_| "info".to_string())
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, &cli.config);

    let (mut config, credentials) = match config::load_all(&cli.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            log::error!("Startup check failed: {}", e);
            log::error!("The bot is stopped");
            return Err(e);
        }
    };
    log::info!("Tokens check completed");

    match cli.command {
        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!("    endpoint: {}", config.api.endpoint);
            log::info!("    interval: {}s", config.poll.interval_secs);
            log::info!("    report errors to chat: {}", config.telegram.report_errors);
            log::info!("✓ Credentials OK (chat {})", credentials.chat_id);
        }

        Command::Run { from_date } => {
            if from_date.is_some() {
                config.poll.initial_from_date = from_date;
            }
            run(&config, &credentials, false).await?;
        }

        Command::Once { from_date } => {
            if from_date.is_some() {
                config.poll.initial_from_date = from_date;
            }
            run(&config, &credentials, true).await?;
        }
    }

    Ok(())
}

async fn run(config: &Config, credentials: &Credentials, once: bool) -> Result<()> {
    let client = http::create_client(&config.api)?;
    let api = PracticumClient::new(client.clone(), &config.api, &credentials.practicum_token);
    let messenger = TelegramClient::new(
        client,
        &config.telegram,
        &credentials.telegram_token,
        &credentials.chat_id,
    );

    let mut poller = Poller::new(&api, &messenger, config);

    if once {
        let report = poller.run_cycle().await?;
        log::info!(
            "{} received, {} rejected, {} sent, {} failed; next from_date {} ({})",
            report.received,
            report.rejected,
            report.sent,
            report.failed,
            report.cursor,
            format_timestamp(report.cursor)
        );
        return Ok(());
    }

    poller.run_forever().await;
    Ok(())
}
