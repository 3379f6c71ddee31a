//! Domain layer with core value objects and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// User-visible notices.
pub mod notification;
/// Uniform operation results.
pub mod outcome;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{GifRecord, Pubkey, RecordList, Signature};
pub use notification::{Notification, NotificationLevel};
pub use outcome::{Operation, OperationFailure, OperationResult};
pub use ports::{GifProgramPort, ProgramHandleFactory, WalletPort};
