use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::ParserConfig;
use crate::decimals::DecimalsTable;
use crate::engine;
use crate::protocols::{self, Classification, Protocol};
use crate::types::Transaction;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = JSON)]
    fn parse(s: &str) -> JsValue;
}

fn to_js(value: &serde_json::Value) -> JsValue {
    match serde_json::to_string(value) {
        Ok(json_str) => parse(&json_str),
        Err(_) => JsValue::NULL,
    }
}

fn error_result(msg: &str) -> JsValue {
    let obj = serde_json::json!({"error": msg});
    to_js(&obj)
}

/// Parse one enriched transaction.
///
/// `decimals_json` is the caller's mint→decimals cache (`null` or empty for a
/// fresh one) and `config_json` a partial `ParserConfig`. Returns
/// `{ result, decimals }` with the updated cache, or `{ error }`.
#[wasm_bindgen]
pub fn parse_transaction_json(
    tx_json: &str,
    decimals_json: Option<String>,
    config_json: Option<String>,
) -> JsValue {
    let tx: Transaction = match serde_json::from_str(tx_json) {
        Ok(tx) => tx,
        Err(e) => return error_result(&format!("Invalid transaction JSON: {e}")),
    };
    let mut cache: DecimalsTable = match decimals_json.as_deref().filter(|s| !s.is_empty()) {
        Some(json) => match serde_json::from_str(json) {
            Ok(table) => table,
            Err(e) => return error_result(&format!("Invalid decimals JSON: {e}")),
        },
        None => DecimalsTable::new(),
    };
    let config: ParserConfig = match config_json.as_deref().filter(|s| !s.is_empty()) {
        Some(json) => match serde_json::from_str(json) {
            Ok(config) => config,
            Err(e) => return error_result(&format!("Invalid config JSON: {e}")),
        },
        None => ParserConfig::default(),
    };

    let batch = match engine::parse_transaction(&tx, &mut cache, &config) {
        Ok(batch) => batch,
        Err(e) => return error_result(&e.to_string()),
    };
    match (serde_json::to_value(&batch), serde_json::to_value(&cache)) {
        (Ok(result), Ok(decimals)) => to_js(&serde_json::json!({
            "result": result,
            "decimals": decimals,
        })),
        (Err(e), _) | (_, Err(e)) => error_result(&e.to_string()),
    }
}

/// Classify one instruction. Returns `{ protocol, operation }` or null.
#[wasm_bindgen]
pub fn classify_instruction_data(program_id: &str, data: &str) -> JsValue {
    match protocols::classify_instruction(program_id, data) {
        Classification::Operation { protocol, kind } => to_js(&serde_json::json!({
            "protocol": protocol.as_ref(),
            "operation": kind.as_ref(),
        })),
        Classification::Unrecognized => JsValue::NULL,
    }
}

/// Program ids the parser recognises, keyed by role.
#[wasm_bindgen]
pub fn get_program_ids() -> JsValue {
    let ids = serde_json::json!({
        "weightedSwap": Protocol::WeightedSwap.program_id(),
        "stableSwap": Protocol::StableSwap.program_id(),
        "vault": protocols::VAULT_PROGRAM_ID,
        "token": protocols::TOKEN_PROGRAM_ID,
        "token2022": protocols::TOKEN_2022_PROGRAM_ID,
        "beneficiary": protocols::BENEFICIARY_ADDRESS,
    });
    ids.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}
