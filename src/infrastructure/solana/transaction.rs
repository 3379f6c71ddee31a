//! Legacy transaction message compilation and wire encoding.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::entities::{ParsePubkeyError, Pubkey, Signature};

/// The system program, owner of freshly created accounts.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0; 32]);

/// Largest serialized transaction accepted by the cluster.
pub const PACKET_DATA_SIZE: usize = 1232;

const MAX_ACCOUNTS: usize = u8::MAX as usize + 1;

/// Transaction assembly errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("too many accounts in message: {0}")]
    TooManyAccounts(usize),

    #[error("instruction data too long: {0} bytes")]
    DataTooLong(usize),

    #[error("{0} is not a required signer")]
    NotASigner(Pubkey),

    #[error("missing signature for {0}")]
    MissingSignature(Pubkey),
}

/// Recent blockhash a message is anchored to.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Blockhash([u8; 32]);

impl Blockhash {
    #[must_use]
    pub const fn new_from_array(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Blockhash {
    type Err = ParsePubkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Pubkey>().map(|key| Self(key.to_bytes()))
    }
}

impl fmt::Debug for Blockhash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blockhash({})", bs58::encode(self.0).into_string())
    }
}

/// Account referenced by an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// Writable account.
    #[must_use]
    pub const fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// Read-only account.
    #[must_use]
    pub const fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// Program invocation before compilation into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// Instruction with accounts replaced by indexes into the key table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Blockhash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compiles instructions with `payer` as the first signer.
    ///
    /// Keys are ordered writable signers, read-only signers, writable
    /// non-signers, read-only non-signers; duplicates merge their flags.
    ///
    /// # Errors
    /// Returns error if the key table or instruction data exceed wire limits.
    pub fn compile(
        instructions: &[Instruction],
        payer: &Pubkey,
        recent_blockhash: Blockhash,
    ) -> Result<Self, TransactionError> {
        let mut metas = vec![AccountMeta::new(*payer, true)];
        for instruction in instructions {
            for meta in &instruction.accounts {
                merge_meta(&mut metas, *meta);
            }
        }
        for instruction in instructions {
            merge_meta(
                &mut metas,
                AccountMeta::new_readonly(instruction.program_id, false),
            );
        }

        if metas.len() > MAX_ACCOUNTS {
            return Err(TransactionError::TooManyAccounts(metas.len()));
        }

        metas.sort_by_key(|meta| match (meta.is_signer, meta.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        let count = |pred: fn(&AccountMeta) -> bool| {
            u8::try_from(metas.iter().filter(|m| pred(m)).count())
                .map_err(|_| TransactionError::TooManyAccounts(metas.len()))
        };
        let header = MessageHeader {
            num_required_signatures: count(|m| m.is_signer)?,
            num_readonly_signed_accounts: count(|m| m.is_signer && !m.is_writable)?,
            num_readonly_unsigned_accounts: count(|m| !m.is_signer && !m.is_writable)?,
        };

        let account_keys: Vec<Pubkey> = metas.iter().map(|m| m.pubkey).collect();
        let index_of = |key: &Pubkey| -> Result<u8, TransactionError> {
            let position = account_keys
                .iter()
                .position(|k| k == key)
                .unwrap_or(account_keys.len());
            u8::try_from(position).map_err(|_| TransactionError::TooManyAccounts(position))
        };

        let instructions = instructions
            .iter()
            .map(|instruction| {
                if instruction.data.len() > usize::from(u16::MAX) {
                    return Err(TransactionError::DataTooLong(instruction.data.len()));
                }
                Ok(CompiledInstruction {
                    program_id_index: index_of(&instruction.program_id)?,
                    accounts: instruction
                        .accounts
                        .iter()
                        .map(|meta| index_of(&meta.pubkey))
                        .collect::<Result<_, _>>()?,
                    data: instruction.data.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions,
        })
    }

    /// Encodes the message bytes that signers sign.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PACKET_DATA_SIZE);
        out.push(self.header.num_required_signatures);
        out.push(self.header.num_readonly_signed_accounts);
        out.push(self.header.num_readonly_unsigned_accounts);

        encode_length(self.account_keys.len(), &mut out);
        for key in &self.account_keys {
            out.extend_from_slice(key.as_bytes());
        }
        out.extend_from_slice(&self.recent_blockhash.0);

        encode_length(self.instructions.len(), &mut out);
        for instruction in &self.instructions {
            out.push(instruction.program_id_index);
            encode_length(instruction.accounts.len(), &mut out);
            out.extend_from_slice(&instruction.accounts);
            encode_length(instruction.data.len(), &mut out);
            out.extend_from_slice(&instruction.data);
        }
        out
    }

    /// Keys that must sign, in signature order.
    #[must_use]
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..usize::from(self.header.num_required_signatures)]
    }
}

/// Signed (or partially signed) transaction.
#[derive(Debug, Clone)]
pub struct Transaction {
    signatures: Vec<Option<Signature>>,
    message: Message,
}

impl Transaction {
    #[must_use]
    pub fn new_unsigned(message: Message) -> Self {
        Self {
            signatures: vec![None; usize::from(message.header.num_required_signatures)],
            message,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &Message {
        &self.message
    }

    /// Stores `signature` in the slot belonging to `signer`.
    ///
    /// # Errors
    /// Returns error if `signer` is not a required signer.
    pub fn add_signature(
        &mut self,
        signer: &Pubkey,
        signature: Signature,
    ) -> Result<(), TransactionError> {
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|key| key == signer)
            .ok_or(TransactionError::NotASigner(*signer))?;
        self.signatures[slot] = Some(signature);
        Ok(())
    }

    #[must_use]
    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(Option::is_some)
    }

    /// First signature, which identifies the transaction.
    #[must_use]
    pub fn signature(&self) -> Option<Signature> {
        self.signatures.first().copied().flatten()
    }

    /// Encodes signatures followed by the message.
    ///
    /// # Errors
    /// Returns error naming the first signer whose signature is missing.
    pub fn serialize(&self) -> Result<Vec<u8>, TransactionError> {
        let mut out = Vec::with_capacity(PACKET_DATA_SIZE);
        encode_length(self.signatures.len(), &mut out);
        for (slot, signature) in self.signatures.iter().enumerate() {
            let signature = signature.ok_or_else(|| {
                TransactionError::MissingSignature(self.message.account_keys[slot])
            })?;
            out.extend_from_slice(signature.as_bytes());
        }
        out.extend_from_slice(&self.message.serialize());
        Ok(out)
    }
}

fn merge_meta(metas: &mut Vec<AccountMeta>, meta: AccountMeta) {
    if let Some(existing) = metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        existing.is_signer |= meta.is_signer;
        existing.is_writable |= meta.is_writable;
    } else {
        metas.push(meta);
    }
}

/// Writes a compact-u16 ("shortvec") length prefix.
pub fn encode_length(len: usize, out: &mut Vec<u8>) {
    let mut value = len;
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        byte |= 0x80;
        out.push(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::solana::Keypair;
    use test_case::test_case;

    fn key(byte: u8) -> Pubkey {
        Pubkey::new_from_array([byte; 32])
    }

    #[test_case(0, &[0x00] ; "zero")]
    #[test_case(0x7f, &[0x7f] ; "one_byte_max")]
    #[test_case(0x80, &[0x80, 0x01] ; "two_bytes_min")]
    #[test_case(0x3fff, &[0xff, 0x7f] ; "two_bytes_max")]
    #[test_case(0x4000, &[0x80, 0x80, 0x01] ; "three_bytes_min")]
    #[test_case(0xffff, &[0xff, 0xff, 0x03] ; "u16_max")]
    fn test_compact_length(len: usize, expected: &[u8]) {
        let mut out = Vec::new();
        encode_length(len, &mut out);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_compile_orders_accounts() {
        let payer = key(1);
        let storage = key(2);
        let program = key(9);
        let instruction = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new(storage, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ],
            data: vec![1, 2, 3],
        };

        let message = Message::compile(&[instruction], &payer, Blockhash::default()).unwrap();

        assert_eq!(
            message.account_keys,
            vec![payer, storage, SYSTEM_PROGRAM_ID, program]
        );
        assert_eq!(
            message.header,
            MessageHeader {
                num_required_signatures: 2,
                num_readonly_signed_accounts: 0,
                num_readonly_unsigned_accounts: 2,
            }
        );
        assert_eq!(message.instructions[0].program_id_index, 3);
        assert_eq!(message.instructions[0].accounts, vec![1, 0, 2]);
    }

    #[test]
    fn test_duplicate_accounts_merge_flags() {
        let payer = key(1);
        let other = key(3);
        let instruction = Instruction {
            program_id: key(9),
            accounts: vec![
                AccountMeta::new_readonly(other, false),
                AccountMeta::new(other, false),
            ],
            data: Vec::new(),
        };

        let message = Message::compile(&[instruction], &payer, Blockhash::default()).unwrap();

        assert_eq!(message.account_keys, vec![payer, other, key(9)]);
        assert_eq!(message.header.num_readonly_unsigned_accounts, 1);
    }

    #[test]
    fn test_serialized_message_layout() {
        let payer = key(1);
        let instruction = Instruction {
            program_id: key(9),
            accounts: vec![AccountMeta::new(key(2), false)],
            data: vec![7; 5],
        };
        let message =
            Message::compile(&[instruction], &payer, Blockhash::new_from_array([4; 32])).unwrap();

        let bytes = message.serialize();

        assert_eq!(&bytes[..3], &[1, 0, 1]);
        assert_eq!(bytes[3], 3);
        assert_eq!(&bytes[4..36], payer.as_bytes());
        assert_eq!(&bytes[100..132], &[4; 32]);
        assert_eq!(&bytes[132..], &[1, 2, 1, 1, 5, 7, 7, 7, 7, 7]);
    }

    #[test]
    fn test_transaction_requires_every_signature() {
        let payer = Keypair::from_seed(&[1; 32]);
        let storage = Keypair::from_seed(&[2; 32]);
        let instruction = Instruction {
            program_id: key(9),
            accounts: vec![
                AccountMeta::new(storage.pubkey(), true),
                AccountMeta::new(payer.pubkey(), true),
            ],
            data: Vec::new(),
        };
        let message =
            Message::compile(&[instruction], &payer.pubkey(), Blockhash::default()).unwrap();
        let data = message.serialize();
        let mut tx = Transaction::new_unsigned(message);

        tx.add_signature(&payer.pubkey(), payer.sign(&data)).unwrap();
        assert_eq!(
            tx.serialize(),
            Err(TransactionError::MissingSignature(storage.pubkey()))
        );

        tx.add_signature(&storage.pubkey(), storage.sign(&data))
            .unwrap();
        let bytes = tx.serialize().unwrap();

        assert!(tx.is_fully_signed());
        assert_eq!(bytes[0], 2);
        assert_eq!(&bytes[1..65], payer.sign(&data).as_bytes());
        assert_eq!(&bytes[129..], data.as_slice());
        assert_eq!(tx.signature(), Some(payer.sign(&data)));
    }

    #[test]
    fn test_non_signer_cannot_sign() {
        let payer = key(1);
        let instruction = Instruction {
            program_id: key(9),
            accounts: vec![AccountMeta::new(key(2), false)],
            data: Vec::new(),
        };
        let message = Message::compile(&[instruction], &payer, Blockhash::default()).unwrap();
        let mut tx = Transaction::new_unsigned(message);

        assert_eq!(
            tx.add_signature(&key(2), Signature::default()),
            Err(TransactionError::NotASigner(key(2)))
        );
    }
}
