//! Wallet adapters.

mod keypair_wallet;

pub use keypair_wallet::{KeypairFileWallet, PROVIDER_NAME};
