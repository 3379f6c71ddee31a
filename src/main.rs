use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gifportal::application::PortalController;
use gifportal::infrastructure::solana::http_client;
use gifportal::infrastructure::{
    AppConfig, CliArgs, KeypairFileWallet, SolanaProgramFactory, StorageManager,
};
use gifportal::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<AppConfig> {
    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn create_app() -> Result<App> {
    let config = load_config()?;

    init_logging(&config)?;

    info!(
        version = gifportal::VERSION,
        cluster = %config.network.cluster,
        "Starting {}",
        gifportal::NAME
    );

    let program = Arc::new(config.program_config()?);
    info!(
        program_id = %program.program_id,
        storage = %program.storage_address(),
        rpc_url = %program.rpc_url,
        "Program resolved"
    );

    let wallet = config
        .effective_wallet_path()
        .and_then(|path| KeypairFileWallet::detect(&path));
    if wallet.is_none() {
        warn!("No wallet keypair found; connecting will report a missing wallet");
    }

    let factory = Arc::new(SolanaProgramFactory::new(program, http_client()?));
    let controller = PortalController::new(config.portal_settings(), wallet, factory);

    let network = config
        .network
        .rpc_url
        .clone()
        .unwrap_or_else(|| config.network.cluster.to_string());

    Ok(App::new(
        controller,
        Duration::from_secs(config.ui.notification_duration),
        network,
        config.wallet.auto_connect,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let app = create_app()?;

    let mut terminal = ratatui::init();

    let result = app.run(&mut terminal).await;

    ratatui::restore();

    result
}
