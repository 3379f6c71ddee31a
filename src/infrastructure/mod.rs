//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Solana JSON-RPC client and program adapter.
pub mod solana;
/// Wallet providers.
pub mod wallet;

pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use solana::{Cluster, Commitment, Keypair, ProgramConfig, SolanaProgramFactory};
pub use wallet::KeypairFileWallet;
