//! Application configuration.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use super::storage::ConfigError;
use crate::application::portal::PortalSettings;
use crate::domain::entities::Pubkey;
use crate::domain::serde_utils::option_base58;
use crate::infrastructure::solana::{Cluster, Commitment, Keypair, ProgramConfig};
use crate::infrastructure::wallet::PROVIDER_NAME;

const APP_NAME: &str = "gifportal";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "buildspace";
const STORAGE_KEYPAIR_FILE: &str = "storage-keypair.json";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Cluster connection.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Deployed program and its storage account.
    #[serde(default)]
    pub program: ProgramSection,

    /// Wallet provider.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// UI configuration.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Cluster connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub cluster: Cluster,

    /// Custom JSON-RPC endpoint; overrides `cluster`.
    #[serde(default)]
    pub rpc_url: Option<String>,

    #[serde(default)]
    pub commitment: Commitment,

    /// Signature status polls before giving up on a transaction.
    #[serde(default = "default_confirm_attempts")]
    pub confirm_attempts: u32,

    /// Delay between signature status polls in milliseconds.
    #[serde(default = "default_confirm_interval_ms")]
    pub confirm_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            commitment: Commitment::default(),
            confirm_attempts: default_confirm_attempts(),
            confirm_interval_ms: default_confirm_interval_ms(),
        }
    }
}

/// Program addressing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramSection {
    /// Base58 program id.
    #[serde(default, with = "option_base58")]
    pub program_id: Option<Pubkey>,

    /// Keypair file identifying the storage account.
    #[serde(default)]
    pub storage_keypair: Option<PathBuf>,
}

/// Wallet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Provider name the wallet check accepts.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Keypair file used as the wallet. Defaults to the Solana CLI keypair.
    #[serde(default)]
    pub keypair_path: Option<PathBuf>,

    /// Check for an already-approved wallet at startup.
    #[serde(default = "default_true")]
    pub auto_connect: bool,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            keypair_path: None,
            auto_connect: true,
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Notification duration in seconds.
    #[serde(default = "default_notification_duration")]
    pub notification_duration: u64,

    /// Reload the list after a vote lands.
    #[serde(default = "default_true")]
    pub refresh_after_vote: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notification_duration: default_notification_duration(),
            refresh_after_vote: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_notification_duration() -> u64 {
    5
}

fn default_confirm_attempts() -> u32 {
    30
}

fn default_confirm_interval_ms() -> u64 {
    500
}

fn default_provider() -> String {
    PROVIDER_NAME.to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cluster) = args.cluster {
            self.network.cluster = cluster;
            if args.rpc_url.is_none() {
                self.network.rpc_url = None;
            }
        }
        if let Some(rpc_url) = args.rpc_url {
            self.network.rpc_url = Some(rpc_url);
        }
        if let Some(program_id) = args.program_id {
            self.program.program_id = Some(program_id);
        }
        if let Some(storage_keypair) = args.storage_keypair {
            self.program.storage_keypair = Some(storage_keypair);
        }
        if let Some(wallet_keypair) = args.wallet_keypair {
            self.wallet.keypair_path = Some(wallet_keypair);
        }
        if let Some(auto_connect) = args.auto_connect {
            self.wallet.auto_connect = auto_connect;
        }
        if let Some(notification_duration) = args.notification_duration {
            self.ui.notification_duration = notification_duration;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("gifportal.log"))
    }

    /// Returns the Solana CLI default keypair, `~/.config/solana/id.json`.
    #[must_use]
    pub fn default_wallet_path() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().join(".config/solana/id.json"))
    }

    /// Returns effective config path.
    #[must_use]
    pub fn effective_config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Self::default_config_path)
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    #[must_use]
    pub fn effective_rpc_url(&self) -> String {
        self.network
            .rpc_url
            .clone()
            .unwrap_or_else(|| self.network.cluster.url().to_string())
    }

    #[must_use]
    pub fn effective_wallet_path(&self) -> Option<PathBuf> {
        self.wallet
            .keypair_path
            .clone()
            .or_else(Self::default_wallet_path)
    }

    #[must_use]
    pub fn effective_storage_keypair_path(&self) -> Option<PathBuf> {
        self.program.storage_keypair.clone().or_else(|| {
            Self::default_config_dir().map(|dir| dir.join(STORAGE_KEYPAIR_FILE))
        })
    }

    /// Resolves the program addressing used by every program handle.
    ///
    /// # Errors
    /// Returns error if the program id is unset or the storage keypair
    /// cannot be loaded.
    pub fn program_config(&self) -> Result<ProgramConfig, ConfigError> {
        let program_id = self.program.program_id.ok_or(ConfigError::MissingProgramId)?;
        let path = self
            .effective_storage_keypair_path()
            .ok_or(ConfigError::ConfigDirNotFound)?;
        let storage = Keypair::read_from_file(&path)
            .map_err(|source| ConfigError::StorageKeypair { path, source })?;

        Ok(ProgramConfig {
            rpc_url: self.effective_rpc_url(),
            commitment: self.network.commitment,
            program_id,
            storage: Arc::new(storage),
            confirm_attempts: self.network.confirm_attempts.max(1),
            confirm_interval: Duration::from_millis(self.network.confirm_interval_ms),
        })
    }

    #[must_use]
    pub fn portal_settings(&self) -> PortalSettings {
        PortalSettings::new(self.wallet.provider.clone())
            .with_refresh_after_vote(self.ui.refresh_after_vote)
    }
}
