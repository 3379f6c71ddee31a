//! Anchor instruction and account codec for the GIF portal program.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::domain::entities::{GifRecord, Pubkey};
use crate::domain::errors::ProgramError;

use super::transaction::{AccountMeta, Instruction, SYSTEM_PROGRAM_ID};

/// Length of Anchor's instruction and account discriminators.
pub const DISCRIMINATOR_LEN: usize = 8;

const INITIALIZE: &str = "start_stuff_off";
const ADD_GIF: &str = "add_gif";
const VOTE_GIF: &str = "vote_gif";
const STORAGE_ACCOUNT: &str = "BaseAccount";

/// First eight bytes of `sha256("<namespace>:<name>")`.
#[must_use]
pub fn discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

fn instruction_data<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>, ProgramError> {
    let mut data = discriminator("global", name).to_vec();
    args.serialize(&mut data)
        .map_err(|e| ProgramError::encode(e.to_string()))?;
    Ok(data)
}

#[derive(BorshSerialize)]
struct AddGifArgs<'a> {
    gif_link: &'a str,
}

#[derive(BorshSerialize)]
struct VoteGifArgs {
    index: u32,
}

#[derive(BorshDeserialize)]
struct ItemData {
    gif_link: String,
    user_address: Pubkey,
    votes: u64,
}

#[derive(BorshDeserialize)]
struct StorageAccountData {
    #[allow(dead_code)]
    total_gifs: u64,
    gif_list: Vec<ItemData>,
}

/// Builds the instructions of the GIF portal program.
#[derive(Debug, Clone, Copy)]
pub struct GifPortalInstructions {
    program_id: Pubkey,
    storage: Pubkey,
}

impl GifPortalInstructions {
    #[must_use]
    pub const fn new(program_id: Pubkey, storage: Pubkey) -> Self {
        Self {
            program_id,
            storage,
        }
    }

    /// Creates the storage account; both `user` and the storage key sign.
    ///
    /// # Errors
    /// Returns error if argument encoding fails.
    pub fn initialize(&self, user: Pubkey) -> Result<Instruction, ProgramError> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(self.storage, true),
                AccountMeta::new(user, true),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data: instruction_data(INITIALIZE, &())?,
        })
    }

    /// Appends `link` attributed to `user`.
    ///
    /// # Errors
    /// Returns error if argument encoding fails.
    pub fn add_gif(&self, user: Pubkey, link: &str) -> Result<Instruction, ProgramError> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts: self.mutation_accounts(user),
            data: instruction_data(ADD_GIF, &AddGifArgs { gif_link: link })?,
        })
    }

    /// Votes for the record at `index`.
    ///
    /// # Errors
    /// Returns error if argument encoding fails.
    pub fn vote_gif(&self, user: Pubkey, index: u32) -> Result<Instruction, ProgramError> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts: self.mutation_accounts(user),
            data: instruction_data(VOTE_GIF, &VoteGifArgs { index })?,
        })
    }

    fn mutation_accounts(&self, user: Pubkey) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.storage, false),
            AccountMeta::new(user, true),
        ]
    }
}

/// Decodes the storage account; trailing zero padding is ignored.
///
/// # Errors
/// Returns error on a foreign discriminator or malformed body.
pub fn decode_storage_account(data: &[u8]) -> Result<Vec<GifRecord>, ProgramError> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(ProgramError::decode("account data shorter than discriminator"));
    }
    let (head, mut body) = data.split_at(DISCRIMINATOR_LEN);
    if head != discriminator("account", STORAGE_ACCOUNT) {
        return Err(ProgramError::decode("account is not a BaseAccount"));
    }

    let account = StorageAccountData::deserialize(&mut body)
        .map_err(|e| ProgramError::decode(e.to_string()))?;

    Ok(account
        .gif_list
        .into_iter()
        .map(|item| GifRecord::new(item.gif_link, item.votes, item.user_address))
        .collect())
}
