mod gif_program_port;
mod wallet_port;

pub use gif_program_port::{GifProgramPort, ProgramHandleFactory};
pub use wallet_port::WalletPort;

#[cfg(test)]
pub mod mocks {
    pub use super::gif_program_port::mock::{FixedWallet, InMemoryGifProgram};
    pub use super::wallet_port::MockWalletPort;
}
