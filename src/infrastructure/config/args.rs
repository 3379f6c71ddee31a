use super::app_config::LogLevel;
use crate::domain::entities::Pubkey;
use crate::infrastructure::solana::Cluster;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "gifportal",
    version,
    about = "A terminal portal for sharing and voting on GIFs stored on Solana",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", env = "GIFPORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", env = "GIFPORTAL_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, env = "GIFPORTAL_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Cluster to talk to.
    #[arg(long, value_enum, env = "GIFPORTAL_CLUSTER")]
    pub cluster: Option<Cluster>,

    /// Custom JSON-RPC endpoint.
    #[arg(long, value_name = "URL", env = "GIFPORTAL_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Program id (base58).
    #[arg(long, value_name = "BASE58", env = "GIFPORTAL_PROGRAM_ID")]
    pub program_id: Option<Pubkey>,

    /// Storage account keypair file.
    #[arg(long, value_name = "PATH", env = "GIFPORTAL_STORAGE_KEYPAIR")]
    pub storage_keypair: Option<PathBuf>,

    /// Wallet keypair file.
    #[arg(long, value_name = "PATH", env = "GIFPORTAL_WALLET_KEYPAIR")]
    pub wallet_keypair: Option<PathBuf>,

    /// Check for an approved wallet at startup.
    #[arg(long, env = "GIFPORTAL_AUTO_CONNECT")]
    pub auto_connect: Option<bool>,

    /// Notification duration in seconds.
    #[arg(long)]
    pub notification_duration: Option<u64>,
}
