use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// One instruction of an enriched transaction, top-level or inner.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// Program that executed this instruction.
    pub program_id: String,
    /// Ordered account list. Positions carry per-operation meaning.
    #[serde(default)]
    pub accounts: Vec<String>,
    /// Instruction payload, base58 encoded.
    #[serde(default)]
    pub data: String,
    /// CPI descendants in execution order; empty for inner instructions.
    #[serde(default)]
    pub inner_instructions: Vec<Instruction>,
}

/// A transaction as produced by the upstream enrichment service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction signature (base58).
    pub signature: String,
    /// Top-level instructions in execution order.
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// Token movements already decoded and decimal-scaled upstream.
    #[serde(default)]
    pub token_transfers: Vec<TokenTransfer>,
    /// Per-account balance changes; the only source of mint decimals.
    #[serde(default)]
    pub account_data: Vec<AccountData>,
}

/// A decoded token movement. Account fields are `None` where the movement has
/// no such side (mints have no source, burns have no destination).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransfer {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub from_user_account: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub to_user_account: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub from_token_account: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub to_token_account: Option<String>,
    pub mint: String,
    /// Decimal-scaled quantity, e.g. `0.001` for 1000 raw units at 6 decimals.
    pub token_amount: Decimal,
    #[serde(default)]
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    pub account: String,
    #[serde(default)]
    pub token_balance_changes: Vec<TokenBalanceChange>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalanceChange {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_account: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub token_account: Option<String>,
    pub mint: String,
    pub raw_token_amount: RawTokenAmount,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTokenAmount {
    /// Signed raw delta as a decimal string.
    pub token_amount: String,
    pub decimals: u8,
}

impl Transaction {
    /// Every mint→decimals pair observed in this transaction's balance changes,
    /// in account order.
    pub fn observed_decimals(&self) -> impl Iterator<Item = (&str, u8)> {
        self.account_data
            .iter()
            .flat_map(|a| a.token_balance_changes.iter())
            .map(|c| (c.mint.as_str(), c.raw_token_amount.decimals))
    }
}

/// The upstream service renders a missing account as `""`.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
