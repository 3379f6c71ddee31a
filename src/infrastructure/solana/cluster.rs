//! Cluster endpoints and commitment levels.

use serde::{Deserialize, Serialize};

/// Public cluster selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    Devnet,
    #[default]
    Testnet,
    MainnetBeta,
    Localnet,
}

impl Cluster {
    /// Default JSON-RPC endpoint.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Devnet => write!(f, "devnet"),
            Self::Testnet => write!(f, "testnet"),
            Self::MainnetBeta => write!(f, "mainnet-beta"),
            Self::Localnet => write!(f, "localnet"),
        }
    }
}

/// How settled a transaction must be before it counts as done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    /// Parses the `confirmationStatus` reported by the node.
    #[must_use]
    pub fn from_status(status: &str) -> Option<Self> {
        match status {
            "processed" => Some(Self::Processed),
            "confirmed" => Some(Self::Confirmed),
            "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commitment_ordering() {
        assert!(Commitment::Finalized > Commitment::Confirmed);
        assert!(Commitment::Confirmed > Commitment::Processed);
        assert_eq!(Commitment::from_status("confirmed"), Some(Commitment::Confirmed));
        assert_eq!(Commitment::from_status("unknown"), None);
    }

    #[test]
    fn test_cluster_serde_names() {
        #[derive(Deserialize)]
        struct Holder {
            cluster: Cluster,
        }
        let holder: Holder = toml::from_str(r#"cluster = "mainnet-beta""#).unwrap();
        assert_eq!(holder.cluster, Cluster::MainnetBeta);
        assert_eq!(holder.cluster.to_string(), "mainnet-beta");
    }
}
