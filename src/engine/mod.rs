//! Walks a transaction's instruction tree and turns every recognised AMM
//! operation into output records.

pub mod operations;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::ParserConfig;
use crate::decimals::DecimalsTable;
use crate::error::Error;
use crate::events::{
    ClosePool, CreatePool, INSTRUCTION_INDEX_STRIDE, InstructionLog, ParsedTransaction,
    PoolActivity,
};
use crate::protocols::{OperationKind, classify_instruction};
use crate::types::{Instruction, Transaction};

use self::operations::{
    InstructionView, parse_close, parse_create, parse_deposit, parse_swap, parse_withdraw,
};
use self::reconcile::Reconciler;

/// Parses one transaction into an owned batch of pool events.
///
/// `cache` learns every mint scale the transaction reveals, even when parsing
/// later fails. Any parse error aborts the call and no partial batch is
/// returned.
pub fn parse_transaction(
    tx: &Transaction,
    cache: &mut DecimalsTable,
    config: &ParserConfig,
) -> Result<ParsedTransaction, Error> {
    let learned = cache.absorb(tx);
    tracing::trace!(signature = %tx.signature, learned, "decimals cache updated");
    let confident = cache.confident_for(tx);

    let reconciler = Reconciler::new(&tx.token_transfers, &confident, config);

    let count = u64::try_from(tx.instructions.len()).unwrap_or(u64::MAX);
    if count >= INSTRUCTION_INDEX_STRIDE {
        tracing::warn!(
            signature = %tx.signature,
            instructions = tx.instructions.len(),
            "instruction count reaches the index stride, indices may collide"
        );
    }

    let mut batch = ParsedTransaction::default();
    for (i, ix) in tx.instructions.iter().enumerate() {
        let base = instruction_index(i, 0);
        match classify_instruction(&ix.program_id, &ix.data).kind() {
            Some(kind) => {
                tracing::debug!(
                    signature = %tx.signature,
                    index = base,
                    %kind,
                    "operation matched"
                );
                let outcome = dispatch(kind, InstructionView::direct(ix), &reconciler)?;
                let site = Site {
                    signature: &tx.signature,
                    instruction_index: base,
                    parent_program_id: None,
                    program_id: &ix.program_id,
                };
                outcome.record(&site, &mut batch);
            }
            None if config.scan_cpi => scan_cpi(tx, i, ix, &reconciler, &mut batch)?,
            None => {
                tracing::trace!(signature = %tx.signature, index = base, "not an AMM instruction");
            }
        }
    }
    Ok(batch)
}

/// Looks for AMM operations among the inner instructions of a foreign
/// top-level instruction. A match consumes the operation together with the
/// token movements it emitted.
fn scan_cpi(
    tx: &Transaction,
    outer_index: usize,
    outer: &Instruction,
    reconciler: &Reconciler<'_>,
    batch: &mut ParsedTransaction,
) -> Result<(), Error> {
    let mut cursor = 0;
    while let Some(slice) = outer.inner_instructions.get(cursor..) {
        let Some((head, _)) = slice.split_first() else {
            break;
        };
        let index = instruction_index(outer_index, cursor);

        let Some(kind) = classify_instruction(&head.program_id, &head.data).kind() else {
            tracing::trace!(
                signature = %tx.signature,
                index,
                program_id = %head.program_id,
                "inner entry skipped"
            );
            cursor += 1;
            continue;
        };
        let Some(view) = InstructionView::from_cpi_slice(slice) else {
            break;
        };

        tracing::debug!(
            signature = %tx.signature,
            index,
            %kind,
            parent = %outer.program_id,
            "operation matched in CPI chain"
        );
        let outcome = dispatch(kind, view, reconciler)?;
        let stride = cpi_stride(kind, outcome.activity_count());
        let site = Site {
            signature: &tx.signature,
            instruction_index: index,
            parent_program_id: Some(outer.program_id.as_str()),
            program_id: &head.program_id,
        };
        outcome.record(&site, batch);
        cursor += stride;
    }
    Ok(())
}

/// How many inner-instruction entries a matched CPI operation occupies,
/// counting the operation itself.
///
/// These offsets come from observed mainnet traces, not from the programs'
/// interfaces: a swap emits input, vault bookkeeping, an optional fee and the
/// output; a deposit emits one entry per record; a withdraw interleaves a
/// vault entry with every record. Always at least 1.
///
/// Counts are records, not entries. A zero-amount unchecked fee leg yields no
/// record, so such a swap reports 2 and strides 4; the cursor then lands on its
/// output leg, a token-program entry the scan steps over, and resumes in the
/// same place a 5-stride would have left it.
pub fn cpi_stride(kind: OperationKind, activity_count: usize) -> usize {
    match kind {
        OperationKind::Swap | OperationKind::SwapV2 if activity_count == 3 => 5,
        OperationKind::Swap | OperationKind::SwapV2 => 4,
        OperationKind::Deposit => activity_count + 1,
        OperationKind::Withdraw => activity_count.saturating_mul(2).max(1),
        OperationKind::Create | OperationKind::Close => 1,
    }
}

fn instruction_index(outer: usize, inner: usize) -> u64 {
    let outer = u64::try_from(outer).unwrap_or(u64::MAX);
    let inner = u64::try_from(inner).unwrap_or(u64::MAX);
    outer
        .saturating_mul(INSTRUCTION_INDEX_STRIDE)
        .saturating_add(inner)
}

fn dispatch(
    kind: OperationKind,
    view: InstructionView<'_>,
    reconciler: &Reconciler<'_>,
) -> Result<Outcome, Error> {
    Ok(match kind {
        OperationKind::Create => Outcome::Created(parse_create(view)?),
        OperationKind::Close => Outcome::Closed(parse_close(view)?),
        OperationKind::Swap | OperationKind::SwapV2 => {
            Outcome::Activities(parse_swap(view, reconciler)?)
        }
        OperationKind::Deposit => Outcome::Activities(parse_deposit(view, reconciler)?),
        OperationKind::Withdraw => Outcome::Activities(parse_withdraw(view, reconciler)?),
    })
}

struct Site<'a> {
    signature: &'a str,
    instruction_index: u64,
    parent_program_id: Option<&'a str>,
    program_id: &'a str,
}

impl Site<'_> {
    fn log<T>(&self, event: T) -> InstructionLog<T> {
        InstructionLog {
            signature: self.signature.to_string(),
            instruction_index: self.instruction_index,
            parent_program_id: self.parent_program_id.map(str::to_string),
            program_id: self.program_id.to_string(),
            event,
        }
    }
}

enum Outcome {
    Created(CreatePool),
    Closed(ClosePool),
    Activities(Vec<PoolActivity>),
}

impl Outcome {
    fn activity_count(&self) -> usize {
        match self {
            Outcome::Activities(records) => records.len(),
            Outcome::Created(_) | Outcome::Closed(_) => 0,
        }
    }

    fn record(self, site: &Site<'_>, batch: &mut ParsedTransaction) {
        match self {
            Outcome::Created(event) => batch.creates.push(site.log(event)),
            Outcome::Closed(event) => batch.closes.push(site.log(event)),
            Outcome::Activities(records) => {
                let logged = records.into_iter().map(|event| site.log(event));
                batch.activities.extend(logged);
            }
        }
    }
}
