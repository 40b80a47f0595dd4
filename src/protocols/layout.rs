//! Fixed account positions of the instructions this crate reads. Any program
//! upgrade that reorders accounts is a change to this file only.

use crate::error::Error;
use crate::protocols::token::{Encoding, TokenInstructionKind};

/// `initialize(amp_factor | weights, swap_fee, max_caps)`:
/// owner, mint, pool, pool_authority, withdraw_authority, vault, then one
/// account per constituent token mint.
pub struct CreateLayout;

impl CreateLayout {
    pub const LP_MINT: usize = 1;
    pub const POOL: usize = 2;
    pub const FIRST_TOKEN_MINT: usize = 6;
}

/// `shutdown()`: owner, pool.
pub struct CloseLayout;

impl CloseLayout {
    pub const POOL: usize = 1;
}

/// `swap(amount_in, minimum_amount_out)`: user, user_token_in, user_token_out,
/// vault_token_in, vault_token_out, beneficiary_token_out, pool, ...
///
/// `swap_v2` inserts mint_in and mint_out after the user.
pub struct SwapLayout;

impl SwapLayout {
    pub const POOL: usize = 6;
    pub const POOL_V2: usize = 8;

    /// Inner instruction carrying the user's input transfer.
    pub const INPUT_LEG: usize = 0;
    /// Output leg, or beneficiary fee leg when one is present.
    pub const FIRST_OUTPUT_LEG: usize = 2;
    /// Output leg following a beneficiary fee leg.
    pub const OUTPUT_AFTER_FEE: usize = 3;

    pub const fn pool(v2: bool) -> usize {
        if v2 { Self::POOL_V2 } else { Self::POOL }
    }
}

/// `deposit(amounts, minimum_amount_out)` and `withdraw(amount,
/// minimum_amounts_out)`: user, user_pool_token, mint, pool, ...
pub struct LiquidityLayout;

impl LiquidityLayout {
    pub const POOL: usize = 3;
}

/// Where each side of a token instruction sits in its account list, and which
/// upstream transfer field it must equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenAccountLayout {
    /// Source token account, matched against `from_token_account`.
    pub source: Option<usize>,
    /// Mint, matched against `mint`.
    pub mint: Option<usize>,
    /// Destination token account, matched against `to_token_account`.
    pub destination: Option<usize>,
    /// Owner of the source, matched against `from_user_account`.
    pub owner: Option<usize>,
}

impl TokenAccountLayout {
    pub const fn for_instruction(kind: TokenInstructionKind, encoding: Encoding) -> Self {
        match (kind, encoding) {
            // burn / burn_checked: account, mint, owner
            (TokenInstructionKind::Burn, _) => Self {
                source: Some(0),
                mint: Some(1),
                destination: None,
                owner: Some(2),
            },
            // mint_to / mint_to_checked: mint, destination, authority
            (TokenInstructionKind::MintTo, _) => Self {
                source: None,
                mint: Some(0),
                destination: Some(1),
                owner: None,
            },
            (TokenInstructionKind::Transfer, Encoding::Unchecked) => Self {
                source: Some(0),
                mint: None,
                destination: Some(1),
                owner: None,
            },
            // transfer_checked: source, mint, destination, owner
            (TokenInstructionKind::Transfer, Encoding::Checked { .. }) => Self {
                source: Some(0),
                mint: Some(1),
                destination: Some(2),
                owner: Some(3),
            },
        }
    }

    /// Resolves every position this layout requires; a short account list is a
    /// protocol error rather than a silent non-match.
    pub fn resolve<'a>(&self, accounts: &'a [String]) -> Result<ResolvedAccounts<'a>, Error> {
        let pick = |position: Option<usize>| -> Result<Option<&'a str>, Error> {
            position
                .map(|idx| account_at(accounts, idx, "token instruction"))
                .transpose()
        };
        Ok(ResolvedAccounts {
            source: pick(self.source)?,
            mint: pick(self.mint)?,
            destination: pick(self.destination)?,
            owner: pick(self.owner)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAccounts<'a> {
    pub source: Option<&'a str>,
    pub mint: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub owner: Option<&'a str>,
}

pub fn account_at<'a>(accounts: &'a [String], idx: usize, what: &str) -> Result<&'a str, Error> {
    accounts
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| Error::Protocol {
            reason: format!(
                "{what} account index {idx} out of bounds ({} accounts)",
                accounts.len()
            ),
        })
}
