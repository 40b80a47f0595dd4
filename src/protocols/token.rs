//! SPL token instruction payloads that move value: transfer, mint-to and burn,
//! each in its unchecked (`[tag, amount_le]`, 9 bytes) and checked
//! (`[tag, amount_le, decimals]`, 10 bytes) encoding.

use crate::error::Error;

pub const UNCHECKED_LEN: usize = 9;
pub const CHECKED_LEN: usize = 10;

const TRANSFER: u8 = 3;
const MINT_TO: u8 = 7;
const BURN: u8 = 8;
const TRANSFER_CHECKED: u8 = 12;
const MINT_TO_CHECKED: u8 = 14;
const BURN_CHECKED: u8 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TokenInstructionKind {
    Transfer,
    MintTo,
    Burn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Unchecked,
    /// Carries an explicit mint account, shifting later account positions by one.
    Checked { decimals: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenInstruction {
    pub kind: TokenInstructionKind,
    pub amount: u64,
    pub encoding: Encoding,
}

impl TokenInstruction {
    /// The encoding is decided by payload length alone; the tag must then
    /// agree with it.
    pub fn unpack(data: &[u8]) -> Result<Self, Error> {
        let len = data.len();
        let encoding = match len {
            UNCHECKED_LEN => Encoding::Unchecked,
            CHECKED_LEN => Encoding::Checked {
                decimals: data[CHECKED_LEN - 1],
            },
            _ => {
                return Err(Error::Decode {
                    reason: format!("unsupported token instruction length {len}"),
                });
            }
        };
        let tag = data[0];
        let kind = token_kind(tag, encoding).ok_or_else(|| Error::Decode {
            reason: format!("unknown token instruction tag {tag} for {len} bytes"),
        })?;

        let amount = data
            .get(1..UNCHECKED_LEN)
            .and_then(|b| <[u8; 8]>::try_from(b).ok())
            .map(u64::from_le_bytes)
            .ok_or_else(|| Error::Decode {
                reason: "token instruction amount truncated".into(),
            })?;

        Ok(Self {
            kind,
            amount,
            encoding,
        })
    }

    /// Decodes a base58 payload as carried by [`crate::types::Instruction`].
    pub fn from_base58(data: &str) -> Result<Self, Error> {
        let bytes = bs58::decode(data).into_vec().map_err(|e| Error::Decode {
            reason: format!("invalid base58 payload: {e}"),
        })?;
        Self::unpack(&bytes)
    }

    /// A zero-amount unchecked transfer moves nothing and has no counterpart
    /// in the upstream transfer list.
    pub fn is_empty_transfer(&self) -> bool {
        self.kind == TokenInstructionKind::Transfer
            && self.encoding == Encoding::Unchecked
            && self.amount == 0
    }

    pub fn is_checked(&self) -> bool {
        matches!(self.encoding, Encoding::Checked { .. })
    }
}

fn token_kind(tag: u8, encoding: Encoding) -> Option<TokenInstructionKind> {
    let checked = matches!(encoding, Encoding::Checked { .. });
    match (tag, checked) {
        (TRANSFER, false) | (TRANSFER_CHECKED, true) => Some(TokenInstructionKind::Transfer),
        (MINT_TO, false) | (MINT_TO_CHECKED, true) => Some(TokenInstructionKind::MintTo),
        (BURN, false) | (BURN_CHECKED, true) => Some(TokenInstructionKind::Burn),
        _ => None,
    }
}
