use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::ParserConfig;
use crate::decimals::DecimalsLookup;
use crate::error::Error;
use crate::protocols::layout::{ResolvedAccounts, TokenAccountLayout};
use crate::protocols::token::{TokenInstruction, TokenInstructionKind};
use crate::types::{Instruction, TokenTransfer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled<'a> {
    Matched {
        transfer: &'a TokenTransfer,
        raw_amount: u64,
    },
    /// Zero-amount unchecked transfer: nothing moved, nothing to match.
    Empty,
}

impl<'a> Reconciled<'a> {
    pub fn matched(self) -> Option<(&'a TokenTransfer, u64)> {
        match self {
            Reconciled::Matched {
                transfer,
                raw_amount,
            } => Some((transfer, raw_amount)),
            Reconciled::Empty => None,
        }
    }
}

/// Matches decoded token instructions against the upstream transfer list.
pub struct Reconciler<'a> {
    transfers: Vec<&'a TokenTransfer>,
    decimals: &'a dyn DecimalsLookup,
    config: &'a ParserConfig,
}

impl<'a> Reconciler<'a> {
    /// Transfers whose mint has no known scale cannot be compared by amount
    /// and are dropped up front.
    pub fn new(
        transfers: &'a [TokenTransfer],
        decimals: &'a dyn DecimalsLookup,
        config: &'a ParserConfig,
    ) -> Self {
        let visible: Vec<&TokenTransfer> = transfers
            .iter()
            .filter(|t| decimals.lookup(&t.mint).is_some())
            .collect();
        if visible.len() < transfers.len() {
            tracing::debug!(
                dropped = transfers.len() - visible.len(),
                "token transfers without known decimals ignored"
            );
        }
        Self {
            transfers: visible,
            decimals,
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        self.config
    }

    pub fn visible_transfers(&self) -> usize {
        self.transfers.len()
    }

    /// Decodes `ix` and reconciles it as `expected`. A payload of another kind
    /// has no transfer of the expected kind, so it fails the same way an
    /// unmatched amount does.
    pub fn reconcile(
        &self,
        ix: &Instruction,
        expected: TokenInstructionKind,
    ) -> Result<Reconciled<'a>, Error> {
        let decoded = TokenInstruction::from_base58(&ix.data)?;
        self.reconcile_decoded(ix, decoded, expected)
    }

    pub fn reconcile_decoded(
        &self,
        ix: &Instruction,
        decoded: TokenInstruction,
        expected: TokenInstructionKind,
    ) -> Result<Reconciled<'a>, Error> {
        if decoded.kind != expected {
            return Err(not_found(expected, decoded.amount, ix));
        }
        if decoded.is_empty_transfer() {
            return Ok(Reconciled::Empty);
        }

        let layout = TokenAccountLayout::for_instruction(decoded.kind, decoded.encoding);
        let accounts = layout.resolve(&ix.accounts)?;

        self.transfers
            .iter()
            .copied()
            .find(|t| self.matches(t, &accounts, decoded.amount))
            .map(|transfer| Reconciled::Matched {
                transfer,
                raw_amount: decoded.amount,
            })
            .ok_or_else(|| not_found(expected, decoded.amount, ix))
    }

    fn matches(
        &self,
        transfer: &TokenTransfer,
        accounts: &ResolvedAccounts<'_>,
        amount: u64,
    ) -> bool {
        accounts_match(transfer, accounts) && self.amount_matches(transfer, amount)
    }

    fn amount_matches(&self, transfer: &TokenTransfer, raw: u64) -> bool {
        let Some(decimals) = self.decimals.lookup(&transfer.mint) else {
            return false;
        };
        let scale = u32::from(decimals);
        let Ok(scaled) = Decimal::try_from_i128_with_scale(i128::from(raw), scale) else {
            return false;
        };
        if scaled == transfer.token_amount {
            return true;
        }
        // Upstream renders amounts as f64; beyond ~15 significant digits the
        // exact decimal is lost, so compare in that representation as well.
        match (scaled.to_f64(), transfer.token_amount.to_f64()) {
            (Some(a), Some(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

fn accounts_match(transfer: &TokenTransfer, accounts: &ResolvedAccounts<'_>) -> bool {
    field_matches(accounts.source, transfer.from_token_account.as_deref())
        && field_matches(accounts.destination, transfer.to_token_account.as_deref())
        && field_matches(accounts.owner, transfer.from_user_account.as_deref())
        && field_matches(accounts.mint, Some(transfer.mint.as_str()))
}

fn field_matches(required: Option<&str>, actual: Option<&str>) -> bool {
    required.is_none_or(|r| actual == Some(r))
}

fn not_found(kind: TokenInstructionKind, amount: u64, ix: &Instruction) -> Error {
    Error::TokenTransferNotFound {
        kind,
        amount,
        program_id: ix.program_id.clone(),
    }
}
