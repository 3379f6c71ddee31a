//! Solana adapters: JSON-RPC, transaction wire format and the portal program.

pub mod anchor;
pub mod cluster;
pub mod dto;
pub mod keypair;
pub mod program_client;
pub mod rpc;
pub mod transaction;

pub use cluster::{Cluster, Commitment};
pub use keypair::{Keypair, KeypairError};
pub use program_client::{GifProgramClient, ProgramConfig, SolanaProgramFactory};
pub use rpc::{AccountData, RpcClient, RpcError, http_client};
