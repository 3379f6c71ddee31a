//! Domain error types.

mod program_error;
mod request_error;
mod wallet_error;

pub use program_error::{FetchError, ProgramError};
pub use request_error::RequestError;
pub use wallet_error::WalletError;
