pub mod layout;
pub mod token;

use serde::Serialize;

pub const WEIGHTED_SWAP_PROGRAM_ID: &str = "swapFpHZwjELNnjvThjajtiVmkz3yPQEHjLtka2fwHW";
pub const STABLE_SWAP_PROGRAM_ID: &str = "swapNyd8XiQwJ6ianp9snpu4brUqFxadzvHebnAXjJZ";
pub const VAULT_PROGRAM_ID: &str = "vo1tWgqZMjG61Z2T9qUaMYKqZ75CYzMuaZ2LZP1n7HV";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";

/// Owner of the vault's beneficiary token accounts (swap fee collector).
pub const BENEFICIARY_ADDRESS: &str = "9rHUPE2ng7stBuaeAM7heiVHLLGPAqGjYKQ3BBUWxKSP";

pub const DISCRIMINATOR_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Protocol {
    WeightedSwap,
    StableSwap,
}

impl Protocol {
    pub fn from_program_id(program_id: &str) -> Option<Self> {
        match program_id {
            WEIGHTED_SWAP_PROGRAM_ID => Some(Self::WeightedSwap),
            STABLE_SWAP_PROGRAM_ID => Some(Self::StableSwap),
            _ => None,
        }
    }

    pub fn program_id(self) -> &'static str {
        match self {
            Self::WeightedSwap => WEIGHTED_SWAP_PROGRAM_ID,
            Self::StableSwap => STABLE_SWAP_PROGRAM_ID,
        }
    }

    pub fn all_program_ids() -> &'static [&'static str] {
        &[WEIGHTED_SWAP_PROGRAM_ID, STABLE_SWAP_PROGRAM_ID]
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::AsRefStr,
    strum_macros::VariantArray,
)]
pub enum OperationKind {
    Create,
    Close,
    Swap,
    SwapV2,
    Deposit,
    Withdraw,
}

/// Anchor discriminators (`sha256("global:<ix>")[..8]`), hex rendered.
/// Both programs share the same instruction names and therefore the same keys.
pub const DISCRIMINATORS: &[(&str, OperationKind)] = &[
    ("afaf6d1f0d989bed", OperationKind::Create),
    ("92ccf1d55615fdd3", OperationKind::Close),
    ("f8c69e91e17587c8", OperationKind::Swap),
    ("2b04ed0b1ac91e62", OperationKind::SwapV2),
    ("f223c68952e1f2b6", OperationKind::Deposit),
    ("b712469c946da122", OperationKind::Withdraw),
];

impl OperationKind {
    pub fn from_discriminator(key: &str) -> Option<Self> {
        DISCRIMINATORS
            .iter()
            .find(|(hex, _)| *hex == key)
            .map(|(_, kind)| *kind)
    }

    pub fn discriminator(self) -> &'static str {
        DISCRIMINATORS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("", |(hex, _)| hex)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Operation {
        protocol: Protocol,
        kind: OperationKind,
    },
    Unrecognized,
}

impl Classification {
    pub fn kind(self) -> Option<OperationKind> {
        match self {
            Self::Operation { kind, .. } => Some(kind),
            Self::Unrecognized => None,
        }
    }
}

/// Maps an instruction to the AMM operation it encodes. Never fails: foreign
/// programs, short payloads and unknown discriminators are all `Unrecognized`.
pub fn classify_instruction(program_id: &str, data: &str) -> Classification {
    let Some(protocol) = Protocol::from_program_id(program_id) else {
        return Classification::Unrecognized;
    };
    let Ok(bytes) = bs58::decode(data).into_vec() else {
        return Classification::Unrecognized;
    };
    let Some(prefix) = bytes.get(..DISCRIMINATOR_LEN) else {
        return Classification::Unrecognized;
    };
    match OperationKind::from_discriminator(&hex::encode(prefix)) {
        Some(kind) => Classification::Operation { protocol, kind },
        None => Classification::Unrecognized,
    }
}

pub fn is_token_program(program_id: &str) -> bool {
    program_id == TOKEN_PROGRAM_ID || program_id == TOKEN_2022_PROGRAM_ID
}

/// The V2 variants of swap/deposit/withdraw are told apart only by the
/// presence of the token-2022 program among the instruction accounts.
pub fn uses_token_2022(accounts: &[String]) -> bool {
    accounts.iter().any(|a| a == TOKEN_2022_PROGRAM_ID)
}
