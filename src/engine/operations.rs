//! Per-operation parsers. Each reads one AMM instruction through an
//! [`InstructionView`], so the same code serves a top-level instruction and an
//! operation embedded in another program's CPI chain.

use rust_decimal::Decimal;

use crate::engine::reconcile::{Reconciled, Reconciler};
use crate::error::Error;
use crate::events::{ClosePool, CreatePool, PoolActivity, Variant};
use crate::protocols::layout::{
    CloseLayout, CreateLayout, LiquidityLayout, SwapLayout, account_at,
};
use crate::protocols::token::{TokenInstruction, TokenInstructionKind};
use crate::protocols::{DISCRIMINATOR_LEN, is_token_program, uses_token_2022};
use crate::types::{Instruction, TokenTransfer};

#[derive(Debug, Clone, Copy)]
pub struct InstructionView<'a> {
    pub program_id: &'a str,
    pub accounts: &'a [String],
    pub data: &'a str,
    pub inner: &'a [Instruction],
}

impl<'a> InstructionView<'a> {
    pub fn direct(ix: &'a Instruction) -> Self {
        Self {
            program_id: &ix.program_id,
            accounts: &ix.accounts,
            data: &ix.data,
            inner: &ix.inner_instructions,
        }
    }

    /// Treats `slice[0]` as the operation and everything after it as its
    /// inner instructions.
    pub fn from_cpi_slice(slice: &'a [Instruction]) -> Option<Self> {
        let (head, rest) = slice.split_first()?;
        Some(Self {
            program_id: &head.program_id,
            accounts: &head.accounts,
            data: &head.data,
            inner: rest,
        })
    }

    pub fn account(&self, idx: usize, what: &str) -> Result<&'a str, Error> {
        account_at(self.accounts, idx, what)
    }

    pub fn inner_at(&self, idx: usize, what: &str) -> Result<&'a Instruction, Error> {
        self.inner.get(idx).ok_or_else(|| Error::Protocol {
            reason: format!(
                "{what}: inner instruction {idx} missing ({} present)",
                self.inner.len()
            ),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Leg {
    /// Tokens entering the pool, credited from the source owner.
    Inbound,
    /// Tokens leaving the pool to the destination owner.
    Outbound,
    /// Swap fee paid to the beneficiary; no user attached.
    Fee,
}

fn activity(
    pool: &str,
    variant: Variant,
    reconciled: Reconciled<'_>,
    leg: Leg,
) -> Option<PoolActivity> {
    let (transfer, raw_amount) = reconciled.matched()?;
    let (amount, user_address) = match leg {
        Leg::Inbound => (transfer.token_amount, transfer.from_user_account.clone()),
        Leg::Outbound => (outflow(transfer), transfer.to_user_account.clone()),
        Leg::Fee => (outflow(transfer), None),
    };
    Some(PoolActivity {
        address: pool.to_string(),
        token_address: transfer.mint.clone(),
        user_address,
        amount,
        variant,
        raw_amount: Some(raw_amount.to_string()),
    })
}

/// Amount leaving the pool, negated. Zero stays unsigned so it never renders
/// as `-0`.
fn outflow(transfer: &TokenTransfer) -> Decimal {
    if transfer.token_amount.is_zero() {
        Decimal::ZERO
    } else {
        -transfer.token_amount
    }
}

/// Structural guess: a beneficiary fee leg and the output leg are both paid
/// out of the same vault token account, so two consecutive transfers by the
/// same program with the same source mean "fee, then output". Nothing in the
/// payload confirms it; a program change that emits two same-source transfers
/// for another reason would be misread as a fee.
pub fn has_beneficiary_fee_leg(candidate: &Instruction, next: &Instruction) -> bool {
    candidate.program_id == next.program_id
        && candidate.accounts.first().is_some()
        && candidate.accounts.first() == next.accounts.first()
}

/// Emits the input leg, an optional fee leg, then the output leg.
pub fn parse_swap(
    view: InstructionView<'_>,
    reconciler: &Reconciler<'_>,
) -> Result<Vec<PoolActivity>, Error> {
    let v2 = uses_token_2022(view.accounts);
    let variant = Variant::swap(v2);
    let pool = view.account(SwapLayout::pool(v2), "swap pool")?;

    let input_ix = view.inner_at(SwapLayout::INPUT_LEG, "swap input")?;
    let first_out_ix = view.inner_at(SwapLayout::FIRST_OUTPUT_LEG, "swap output")?;

    let mut activities = Vec::with_capacity(3);
    let input = reconciler.reconcile(input_ix, TokenInstructionKind::Transfer)?;
    activities.extend(activity(pool, variant, input, Leg::Inbound));

    let fee_pair = view
        .inner
        .get(SwapLayout::OUTPUT_AFTER_FEE)
        .filter(|next| has_beneficiary_fee_leg(first_out_ix, next));

    let output_ix = match fee_pair {
        Some(after_fee_ix) => {
            let fee = reconciler.reconcile(first_out_ix, TokenInstructionKind::Transfer)?;
            if fee_collector_accepted(reconciler, fee) {
                activities.extend(activity(pool, variant, fee, Leg::Fee));
                after_fee_ix
            } else {
                tracing::debug!(
                    pool,
                    "fee-leg candidate paid to unknown collector, read as output"
                );
                first_out_ix
            }
        }
        None => first_out_ix,
    };

    let output = reconciler.reconcile(output_ix, TokenInstructionKind::Transfer)?;
    activities.extend(activity(pool, variant, output, Leg::Outbound));
    Ok(activities)
}

fn fee_collector_accepted(reconciler: &Reconciler<'_>, fee: Reconciled<'_>) -> bool {
    match fee {
        Reconciled::Matched { transfer, .. } => reconciler
            .config()
            .accepts_fee_collector(transfer.to_user_account.as_deref()),
        Reconciled::Empty => true,
    }
}

/// Token transfers into the pool, terminated by the LP mint to the user.
pub fn parse_deposit(
    view: InstructionView<'_>,
    reconciler: &Reconciler<'_>,
) -> Result<Vec<PoolActivity>, Error> {
    let variant = Variant::deposit(uses_token_2022(view.accounts));
    let pool = view.account(LiquidityLayout::POOL, "deposit pool")?;

    let mut activities = Vec::new();
    for ix in view.inner {
        let decoded = TokenInstruction::from_base58(&ix.data)?;
        if decoded.kind == TokenInstructionKind::MintTo {
            let minted = reconciler.reconcile_decoded(ix, decoded, TokenInstructionKind::MintTo)?;
            activities.extend(activity(pool, variant, minted, Leg::Outbound));
            break;
        }
        let deposited = reconciler.reconcile_decoded(ix, decoded, TokenInstructionKind::Transfer)?;
        activities.extend(activity(pool, variant, deposited, Leg::Inbound));
    }
    Ok(activities)
}

/// LP burn followed by token transfers out of the pool. Vault bookkeeping
/// CPIs between them are skipped.
pub fn parse_withdraw(
    view: InstructionView<'_>,
    reconciler: &Reconciler<'_>,
) -> Result<Vec<PoolActivity>, Error> {
    let variant = Variant::withdraw(uses_token_2022(view.accounts));
    let pool = view.account(LiquidityLayout::POOL, "withdraw pool")?;
    // One burn plus one transfer per pool token.
    let limit = withdraw_token_count(view.data).map_or(usize::MAX, |n| n + 1);

    let mut activities = Vec::new();
    for ix in view
        .inner
        .iter()
        .filter(|ix| is_token_program(&ix.program_id))
        .take(limit)
    {
        match reconciler.reconcile(ix, TokenInstructionKind::Burn) {
            Ok(burned) => activities.extend(activity(pool, variant, burned, Leg::Inbound)),
            Err(burn_err) => {
                tracing::trace!(%burn_err, "not a burn, reconciling as transfer");
                let withdrawn = reconciler.reconcile(ix, TokenInstructionKind::Transfer)?;
                activities.extend(activity(pool, variant, withdrawn, Leg::Outbound));
            }
        }
    }
    Ok(activities)
}

/// Number of pool tokens named by a `withdraw(amount: u64,
/// minimum_amounts_out: Vec<u64>)` payload, or `None` if it does not have that
/// shape.
pub fn withdraw_token_count(data: &str) -> Option<usize> {
    const AMOUNT_END: usize = DISCRIMINATOR_LEN + 8;
    const LEN_END: usize = AMOUNT_END + 4;

    let bytes = bs58::decode(data).into_vec().ok()?;
    let len_bytes = <[u8; 4]>::try_from(bytes.get(AMOUNT_END..LEN_END)?).ok()?;
    let count = usize::try_from(u32::from_le_bytes(len_bytes)).ok()?;
    let expected = count.checked_mul(8)?.checked_add(LEN_END)?;
    (bytes.len() == expected).then_some(count)
}

pub fn parse_create(view: InstructionView<'_>) -> Result<CreatePool, Error> {
    let address = view.account(CreateLayout::POOL, "create pool")?;
    let lp_mint = view.account(CreateLayout::LP_MINT, "create lp mint")?;

    let mut token_addresses: Vec<String> = Vec::new();
    for mint in view
        .accounts
        .get(CreateLayout::FIRST_TOKEN_MINT..)
        .unwrap_or_default()
    {
        if !token_addresses.contains(mint) {
            token_addresses.push(mint.clone());
        }
    }

    Ok(CreatePool {
        address: address.to_string(),
        token_address: lp_mint.to_string(),
        token_addresses,
        variant: Variant::Create,
    })
}

pub fn parse_close(view: InstructionView<'_>) -> Result<ClosePool, Error> {
    Ok(ClosePool {
        address: view.account(CloseLayout::POOL, "close pool")?.to_string(),
        variant: Variant::Close,
    })
}
