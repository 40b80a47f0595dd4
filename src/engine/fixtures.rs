//! Builders shared by the engine's unit tests.
#![expect(clippy::unwrap_used, reason = "test fixtures")]

use crate::protocols::{
    OperationKind, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID, VAULT_PROGRAM_ID,
    WEIGHTED_SWAP_PROGRAM_ID,
};
use crate::types::{
    AccountData, Instruction, RawTokenAmount, TokenBalanceChange, TokenTransfer, Transaction,
};

pub const SIGNATURE: &str = "5igTest";

pub const USER: &str = "UserWa11et1111111111111111111111111111111111";
pub const OTHER: &str = "0therWa11et11111111111111111111111111111111";
pub const USER_ATA_A: &str = "UserAtaA111111111111111111111111111111111111";
pub const USER_ATA_B: &str = "UserAtaB111111111111111111111111111111111111";
pub const USER_LP_ATA: &str = "UserLpAta11111111111111111111111111111111111";
pub const VAULT: &str = "Vau1t111111111111111111111111111111111111111";
pub const VAULT_AUTH: &str = "Vau1tAuth1111111111111111111111111111111111";
pub const VAULT_ATA_A: &str = "Vau1tAtaA111111111111111111111111111111111";
pub const VAULT_ATA_B: &str = "Vau1tAtaB111111111111111111111111111111111";
pub const BENEFICIARY_ATA_B: &str = "BeneficiaryAtaB1111111111111111111111111111";
pub const BENEFICIARY: &str = "Beneficiary11111111111111111111111111111111";
pub const POOL: &str = "Poo1111111111111111111111111111111111111111";
pub const POOL_AUTH: &str = "Poo1Auth111111111111111111111111111111111111";
pub const WITHDRAW_AUTH: &str = "WithdrawAuth1111111111111111111111111111111";
pub const LP_MINT: &str = "LpMint11111111111111111111111111111111111111";
pub const MINT_A: &str = "MintA111111111111111111111111111111111111111";
pub const MINT_B: &str = "MintB111111111111111111111111111111111111111";
pub const ROUTER: &str = "Router1111111111111111111111111111111111111";

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub fn instruction(program_id: &str, accounts: &[&str], data: &[u8]) -> Instruction {
    Instruction {
        program_id: program_id.to_string(),
        accounts: strings(accounts),
        data: bs58::encode(data).into_string(),
        inner_instructions: Vec::new(),
    }
}

fn amount_payload(tag: u8, amount: u64, decimals: Option<u8>) -> Vec<u8> {
    let mut data = vec![tag];
    data.extend_from_slice(&amount.to_le_bytes());
    data.extend(decimals);
    data
}

pub fn transfer_ix(source: &str, destination: &str, owner: &str, amount: u64) -> Instruction {
    instruction(
        TOKEN_PROGRAM_ID,
        &[source, destination, owner],
        &amount_payload(3, amount, None),
    )
}

pub fn transfer_checked_ix(
    source: &str,
    mint: &str,
    destination: &str,
    owner: &str,
    amount: u64,
    decimals: u8,
) -> Instruction {
    instruction(
        TOKEN_2022_PROGRAM_ID,
        &[source, mint, destination, owner],
        &amount_payload(12, amount, Some(decimals)),
    )
}

pub fn mint_to_ix(mint: &str, destination: &str, authority: &str, amount: u64) -> Instruction {
    instruction(
        TOKEN_PROGRAM_ID,
        &[mint, destination, authority],
        &amount_payload(7, amount, None),
    )
}

pub fn burn_ix(account: &str, mint: &str, owner: &str, amount: u64) -> Instruction {
    instruction(
        TOKEN_PROGRAM_ID,
        &[account, mint, owner],
        &amount_payload(8, amount, None),
    )
}

/// Vault bookkeeping CPI interleaved between token movements.
pub fn vault_ix() -> Instruction {
    instruction(VAULT_PROGRAM_ID, &[VAULT, VAULT_AUTH], &[0xb7, 0x12, 0x46])
}

pub fn token_transfer(
    from_user: &str,
    to_user: &str,
    from_token: &str,
    to_token: &str,
    mint: &str,
    amount: &str,
) -> TokenTransfer {
    TokenTransfer {
        from_user_account: Some(from_user.to_string()),
        to_user_account: Some(to_user.to_string()),
        from_token_account: Some(from_token.to_string()),
        to_token_account: Some(to_token.to_string()),
        mint: mint.to_string(),
        token_amount: amount.parse().unwrap(),
        decimals: None,
    }
}

pub fn burn_transfer(owner: &str, from_token: &str, mint: &str, amount: &str) -> TokenTransfer {
    TokenTransfer {
        to_user_account: None,
        to_token_account: None,
        ..token_transfer(owner, "", from_token, "", mint, amount)
    }
}

pub fn mint_transfer(to_user: &str, to_token: &str, mint: &str, amount: &str) -> TokenTransfer {
    TokenTransfer {
        from_user_account: None,
        from_token_account: None,
        ..token_transfer("", to_user, "", to_token, mint, amount)
    }
}

pub fn amm_ix(
    kind: OperationKind,
    args: &[u8],
    accounts: &[&str],
    inner: Vec<Instruction>,
) -> Instruction {
    let mut data = hex::decode(kind.discriminator()).unwrap();
    data.extend_from_slice(args);
    Instruction {
        inner_instructions: inner,
        ..instruction(WEIGHTED_SWAP_PROGRAM_ID, accounts, &data)
    }
}

/// `create` with the fixed accounts followed by `mints`.
pub fn create_ix(mints: &[&str]) -> Instruction {
    let mut accounts = vec![OTHER, LP_MINT, POOL, POOL_AUTH, WITHDRAW_AUTH, VAULT];
    accounts.extend_from_slice(mints);
    amm_ix(OperationKind::Create, &[], &accounts, Vec::new())
}

pub fn swap_accounts(v2: bool) -> Vec<&'static str> {
    let mut accounts = vec![USER];
    if v2 {
        accounts.extend([MINT_A, MINT_B]);
    }
    accounts.extend([
        USER_ATA_A,
        USER_ATA_B,
        VAULT_ATA_A,
        VAULT_ATA_B,
        BENEFICIARY_ATA_B,
        POOL,
        WITHDRAW_AUTH,
        VAULT,
        VAULT_AUTH,
        VAULT_PROGRAM_ID,
        TOKEN_PROGRAM_ID,
    ]);
    if v2 {
        accounts.push(TOKEN_2022_PROGRAM_ID);
    }
    accounts
}

pub fn liquidity_accounts(v2: bool) -> Vec<&'static str> {
    let mut accounts = vec![
        USER,
        USER_LP_ATA,
        LP_MINT,
        POOL,
        POOL_AUTH,
        VAULT,
        VAULT_AUTH,
        TOKEN_PROGRAM_ID,
    ];
    if v2 {
        accounts.push(TOKEN_2022_PROGRAM_ID);
    }
    accounts
}

/// Input 1000 raw of A; optional 20 raw fee of B; output 2000 raw of B.
pub fn swap_inner(with_fee: bool) -> Vec<Instruction> {
    let mut inner = vec![
        transfer_ix(USER_ATA_A, VAULT_ATA_A, USER, 1_000),
        vault_ix(),
    ];
    if with_fee {
        inner.push(transfer_ix(VAULT_ATA_B, BENEFICIARY_ATA_B, VAULT_AUTH, 20));
    }
    inner.push(transfer_ix(VAULT_ATA_B, USER_ATA_B, VAULT_AUTH, 2_000));
    inner
}

/// A v1 (`v2 == false`) or v2 swap carrying [`swap_inner`] as its CPIs.
pub fn swap_ix(v2: bool, with_fee: bool) -> Instruction {
    let kind = if v2 {
        OperationKind::SwapV2
    } else {
        OperationKind::Swap
    };
    amm_ix(kind, &[], &swap_accounts(v2), swap_inner(with_fee))
}

pub fn swap_transfers(with_fee: bool) -> Vec<TokenTransfer> {
    let input = token_transfer(USER, VAULT_AUTH, USER_ATA_A, VAULT_ATA_A, MINT_A, "0.001");
    let output = token_transfer(VAULT_AUTH, USER, VAULT_ATA_B, USER_ATA_B, MINT_B, "0.002");
    let fee = token_transfer(
        VAULT_AUTH,
        BENEFICIARY,
        VAULT_ATA_B,
        BENEFICIARY_ATA_B,
        MINT_B,
        "0.00002",
    );
    if with_fee {
        vec![input, fee, output]
    } else {
        vec![input, output]
    }
}

pub fn transaction(
    instructions: Vec<Instruction>,
    token_transfers: Vec<TokenTransfer>,
) -> Transaction {
    Transaction {
        signature: SIGNATURE.to_string(),
        instructions,
        token_transfers,
        account_data: Vec::new(),
    }
}

/// Balance-change evidence that `mint` has `decimals` places.
pub fn balance_change(token_account: &str, mint: &str, decimals: u8) -> AccountData {
    AccountData {
        account: token_account.to_string(),
        token_balance_changes: vec![TokenBalanceChange {
            user_account: Some(USER.to_string()),
            token_account: Some(token_account.to_string()),
            mint: mint.to_string(),
            raw_token_amount: RawTokenAmount {
                token_amount: "1000".to_string(),
                decimals,
            },
        }],
    }
}

/// `withdraw(amount, minimum_amounts_out)` arguments.
pub fn withdraw_args(amount: u64, minimum_amounts_out: &[u64]) -> Vec<u8> {
    let mut args = amount.to_le_bytes().to_vec();
    let len = u32::try_from(minimum_amounts_out.len()).unwrap();
    args.extend_from_slice(&len.to_le_bytes());
    for min in minimum_amounts_out {
        args.extend_from_slice(&min.to_le_bytes());
    }
    args
}
