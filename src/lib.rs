#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod config;
pub mod decimals;
pub mod engine;
pub mod error;
pub mod events;
pub mod protocols;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::ParserConfig;
pub use decimals::DecimalsTable;
pub use engine::{cpi_stride, parse_transaction};
pub use error::Error;
pub use events::{ClosePool, CreatePool, InstructionLog, ParsedTransaction, PoolActivity, Variant};
pub use protocols::{Classification, OperationKind, Protocol, classify_instruction};
pub use types::{Instruction, TokenTransfer, Transaction};
