use rust_decimal::Decimal;
use serde::Serialize;

/// Top-level instructions are spaced this far apart in `instruction_index`, so
/// a transaction is assumed to carry fewer top-level instructions than this.
pub const INSTRUCTION_INDEX_STRIDE: u64 = 1000;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display, strum_macros::AsRefStr,
)]
pub enum Variant {
    Create,
    Close,
    Swap,
    SwapV2,
    Deposit,
    DepositV2,
    Withdraw,
    WithdrawV2,
}

impl Variant {
    pub fn swap(v2: bool) -> Self {
        if v2 { Self::SwapV2 } else { Self::Swap }
    }

    pub fn deposit(v2: bool) -> Self {
        if v2 { Self::DepositV2 } else { Self::Deposit }
    }

    pub fn withdraw(v2: bool) -> Self {
        if v2 { Self::WithdrawV2 } else { Self::Withdraw }
    }
}

/// One token leg of a swap, deposit or withdrawal.
///
/// `amount` is signed from the pool's side: tokens the user pays in (swap
/// input, deposited tokens, redeemed LP) are positive; tokens the user or the
/// fee collector receives (swap output, fee, withdrawn tokens, minted LP) are
/// negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolActivity {
    pub address: String,
    pub token_address: String,
    pub user_address: Option<String>,
    pub amount: Decimal,
    pub variant: Variant,
    /// Unscaled integer amount, kept exact for downstream accounting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_amount: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePool {
    pub address: String,
    /// The pool's LP mint.
    pub token_address: String,
    /// Constituent mints, de-duplicated in first-seen order.
    pub token_addresses: Vec<String>,
    pub variant: Variant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosePool {
    pub address: String,
    pub variant: Variant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionLog<T> {
    pub signature: String,
    /// `top_level_index * 1000 + inner_offset`.
    pub instruction_index: u64,
    /// Outer program when the operation was found by CPI scanning.
    pub parent_program_id: Option<String>,
    /// Program that issued the matched instruction.
    pub program_id: String,
    pub event: T,
}

/// Everything one parse call produced, in instruction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub creates: Vec<InstructionLog<CreatePool>>,
    pub closes: Vec<InstructionLog<ClosePool>>,
    pub activities: Vec<InstructionLog<PoolActivity>>,
}

impl ParsedTransaction {
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.closes.is_empty() && self.activities.is_empty()
    }

    /// Appends another batch after this one, preserving both orders.
    pub fn merge(&mut self, other: ParsedTransaction) {
        self.creates.extend(other.creates);
        self.closes.extend(other.closes);
        self.activities.extend(other.activities);
    }
}
