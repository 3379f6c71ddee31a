//! Domain entity definitions.

mod gif_record;
mod pubkey;
mod record_list;
mod signature;

pub use gif_record::GifRecord;
pub use pubkey::{PUBKEY_BYTES, ParsePubkeyError, Pubkey};
pub use record_list::RecordList;
pub use signature::{SIGNATURE_BYTES, Signature};
