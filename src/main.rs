//! Solana DEX swap terminal - Main executable
//!
//! Quotes token swaps through the Jupiter aggregator, keeps the quote fresh
//! while the user decides, and submits the swap with a locally held wallet.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use solana_dex_swap::commands::{handle_command, help_text, Command};
use solana_dex_swap::presenter::SwapPresenter;
use solana_dex_swap::services::QuoteRefreshService;
use solana_dex_swap::view::TerminalSwapView;
use solana_dex_swap::{AppConfig, ServiceContainer};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Solana DEX swap v{}", solana_dex_swap::VERSION);

    let config = AppConfig::load().context("Failed to load configuration")?;
    let services = ServiceContainer::new(config).context("Failed to initialize services")?;

    let view = Arc::new(TerminalSwapView::new(&services.config().explorer_url));
    let presenter: Arc<dyn SwapPresenter> = services.swap_presenter(view);

    info!("Loading token list...");
    if let Err(e) = presenter.load_tokens().await {
        error!("{}", e);
    }

    let mut refresh_service =
        QuoteRefreshService::new(presenter.clone(), services.config().refresh_interval());
    refresh_service
        .start()
        .await
        .context("Failed to start quote refresh service")?;

    print!("{}", help_text());

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match handle_command(presenter.as_ref(), command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => error!("Command failed: {}", e),
        }
    }

    info!("Stopping quote refresh service...");
    refresh_service.stop().await;

    Ok(())
}
